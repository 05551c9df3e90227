//! This file defines the `Transaction` type, the core type of the
//! record-keeping part of the application.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::database_id::{CategoryId, TransactionId, UserId};

/// Whether a transaction represents money received or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum TransactionType {
    /// Money received, e.g. wages.
    Income = 1,
    /// Money spent, e.g. groceries.
    Expense = 2,
}

impl TransactionType {
    /// The integer code the type is stored as in the database.
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Convert a stored integer code back into a transaction type.
    ///
    /// Returns `None` for codes that do not name a type.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Income),
            2 => Some(Self::Expense),
            _ => None,
        }
    }
}

/// An income or expense recorded against one of the user's categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the user that owns the transaction.
    pub user_id: UserId,
    /// A short description of what the transaction was for.
    pub title: String,
    /// Whether the amount was received or spent.
    pub transaction_type: TransactionType,
    /// The amount of money received or spent.
    pub amount: Decimal,
    /// The ID of the category the transaction is recorded against.
    pub category_id: CategoryId,
    /// When the money was paid or received.
    pub paid_or_received_at: OffsetDateTime,
}

/// The fields needed to insert a new [Transaction] into a store.
///
/// The ID is generated by the store on insert. Also used as the validated
/// field set when overwriting an existing transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The ID of the user that will own the transaction.
    pub user_id: UserId,
    /// A short description of what the transaction was for.
    pub title: String,
    /// Whether the amount was received or spent.
    pub transaction_type: TransactionType,
    /// The amount of money received or spent.
    pub amount: Decimal,
    /// The ID of the category the transaction is recorded against.
    pub category_id: CategoryId,
    /// When the money was paid or received.
    pub paid_or_received_at: OffsetDateTime,
}
