//! Request contracts for transaction operations.

use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    database_id::{CategoryId, TransactionId, UserId},
    models::{NewTransaction, TransactionType},
    pagination,
    requests::Violation,
};

/// The fields needed to create a new transaction.
///
/// The non-text fields are optional so that a request deserialized from an
/// incomplete payload can still be validated as a whole, with every missing
/// field reported together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// The user that will own the transaction.
    pub user_id: UserId,
    /// A short description of what the transaction was for.
    #[serde(default)]
    pub title: String,
    /// Whether the amount was received or spent.
    pub transaction_type: Option<TransactionType>,
    /// The amount of money received or spent.
    pub amount: Option<Decimal>,
    /// The category to record the transaction against.
    pub category_id: Option<CategoryId>,
    /// When the money was paid or received.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub paid_or_received_at: Option<OffsetDateTime>,
}

impl CreateTransactionRequest {
    /// Check every field and hand back the insert payload.
    ///
    /// # Errors
    /// Returns the full list of violations, not just the first one found.
    pub fn validate(&self) -> Result<NewTransaction, Vec<Violation>> {
        validate_transaction_fields(
            self.user_id,
            &self.title,
            self.transaction_type,
            self.amount,
            self.category_id,
            self.paid_or_received_at,
        )
    }
}

/// The fields needed to overwrite an existing transaction.
///
/// Every content field is overwritten; the ID and owner of the transaction
/// are fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    /// The user that owns the transaction.
    pub user_id: UserId,
    /// The transaction to update.
    pub id: TransactionId,
    /// The new description of the transaction.
    #[serde(default)]
    pub title: String,
    /// The new transaction type.
    pub transaction_type: Option<TransactionType>,
    /// The new amount.
    pub amount: Option<Decimal>,
    /// The new category to record the transaction against.
    pub category_id: Option<CategoryId>,
    /// The new payment date.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub paid_or_received_at: Option<OffsetDateTime>,
}

impl UpdateTransactionRequest {
    /// Check every field and hand back the validated replacement fields.
    ///
    /// # Errors
    /// Returns the full list of violations, not just the first one found.
    pub fn validate(&self) -> Result<NewTransaction, Vec<Violation>> {
        validate_transaction_fields(
            self.user_id,
            &self.title,
            self.transaction_type,
            self.amount,
            self.category_id,
            self.paid_or_received_at,
        )
    }
}

/// Identifies the transaction to delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTransactionRequest {
    /// The user that owns the transaction.
    pub user_id: UserId,
    /// The transaction to delete.
    pub id: TransactionId,
}

/// Identifies the transaction to fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTransactionByIdRequest {
    /// The user that owns the transaction.
    pub user_id: UserId,
    /// The transaction to fetch.
    pub id: TransactionId,
}

/// Selects one page of a user's transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllTransactionsRequest {
    /// The user whose transactions should be listed.
    pub user_id: UserId,
    /// The 1-based page to fetch.
    #[serde(default = "pagination::default_page_number")]
    pub page_number: u64,
    /// The number of transactions per page.
    #[serde(default = "pagination::default_page_size")]
    pub page_size: u64,
    /// Include only transactions paid or received within this range
    /// (inclusive). `None` includes every transaction the user owns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<RangeInclusive<OffsetDateTime>>,
}

impl GetAllTransactionsRequest {
    /// Create a request for the first page with the default page size and no
    /// date filter.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            page_number: pagination::DEFAULT_PAGE_NUMBER,
            page_size: pagination::DEFAULT_PAGE_SIZE,
            date_range: None,
        }
    }
}

fn validate_transaction_fields(
    user_id: UserId,
    title: &str,
    transaction_type: Option<TransactionType>,
    amount: Option<Decimal>,
    category_id: Option<CategoryId>,
    paid_or_received_at: Option<OffsetDateTime>,
) -> Result<NewTransaction, Vec<Violation>> {
    let mut violations = Vec::new();

    if title.trim().is_empty() {
        violations.push(Violation {
            field: "title",
            message: "Título inválido",
        });
    }

    if transaction_type.is_none() {
        violations.push(Violation {
            field: "transaction_type",
            message: "Tipo inválido",
        });
    }

    if amount.is_none() {
        violations.push(Violation {
            field: "amount",
            message: "Valor inválido",
        });
    }

    if category_id.is_none() {
        violations.push(Violation {
            field: "category_id",
            message: "Categoria Inválida",
        });
    }

    if paid_or_received_at.is_none() {
        violations.push(Violation {
            field: "paid_or_received_at",
            message: "Data inválida",
        });
    }

    match (transaction_type, amount, category_id, paid_or_received_at) {
        (Some(transaction_type), Some(amount), Some(category_id), Some(paid_or_received_at))
            if violations.is_empty() =>
        {
            Ok(NewTransaction {
                user_id,
                title: title.to_string(),
                transaction_type,
                amount,
                category_id,
                paid_or_received_at,
            })
        }
        _ => Err(violations),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use crate::{
        models::TransactionType,
        requests::{CreateTransactionRequest, GetAllTransactionsRequest},
    };

    fn valid_request() -> CreateTransactionRequest {
        CreateTransactionRequest {
            user_id: 1,
            title: "Supermercado".to_string(),
            transaction_type: Some(TransactionType::Expense),
            amount: Some(dec!(129.90)),
            category_id: Some(2),
            paid_or_received_at: Some(datetime!(2025-03-14 10:30 UTC)),
        }
    }

    #[test]
    fn valid_request_produces_payload() {
        let request = valid_request();

        let new_transaction = request.validate().expect("Request should be valid");

        assert_eq!(1, new_transaction.user_id);
        assert_eq!("Supermercado", new_transaction.title);
        assert_eq!(TransactionType::Expense, new_transaction.transaction_type);
        assert_eq!(dec!(129.90), new_transaction.amount);
        assert_eq!(2, new_transaction.category_id);
    }

    #[test]
    fn every_missing_field_is_reported_together() {
        let request = CreateTransactionRequest {
            user_id: 1,
            title: String::new(),
            transaction_type: None,
            amount: None,
            category_id: None,
            paid_or_received_at: None,
        };

        let violations = request.validate().expect_err("Request should be invalid");

        let fields: Vec<_> = violations.iter().map(|violation| violation.field).collect();
        assert_eq!(
            vec![
                "title",
                "transaction_type",
                "amount",
                "category_id",
                "paid_or_received_at"
            ],
            fields
        );
    }

    #[test]
    fn single_missing_field_is_the_only_violation() {
        let request = CreateTransactionRequest {
            amount: None,
            ..valid_request()
        };

        let violations = request.validate().expect_err("Request should be invalid");

        assert_eq!(1, violations.len());
        assert_eq!("Valor inválido", violations[0].message);
    }

    #[test]
    fn get_all_defaults_have_no_date_filter() {
        let request = GetAllTransactionsRequest::new(9);

        assert_eq!(9, request.user_id);
        assert_eq!(1, request.page_number);
        assert_eq!(25, request.page_size);
        assert!(request.date_range.is_none());
    }
}
