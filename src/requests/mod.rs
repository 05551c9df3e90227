//! This module defines the request contracts accepted by the handlers.
//!
//! Every request carries the `user_id` that scopes the operation. Create and
//! update requests expose a `validate` method that checks every field before
//! any store access and reports all violations together, handing back the
//! parsed payload on success.

mod category;
mod transaction;

pub use category::{
    CreateCategoryRequest, DeleteCategoryRequest, GetAllCategoriesRequest,
    GetCategoryByIdRequest, UpdateCategoryRequest,
};
pub use transaction::{
    CreateTransactionRequest, DeleteTransactionRequest, GetAllTransactionsRequest,
    GetTransactionByIdRequest, UpdateTransactionRequest,
};

/// A single field-level problem found while validating a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    /// The request field that failed validation.
    pub field: &'static str,
    /// The user-facing description of the problem.
    pub message: &'static str,
}

/// Combine the messages from every violation into one caller-facing string.
pub fn describe_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| violation.message)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use crate::requests::{Violation, describe_violations};

    #[test]
    fn describe_violations_joins_every_message() {
        let violations = [
            Violation {
                field: "title",
                message: "Título inválido",
            },
            Violation {
                field: "amount",
                message: "Valor inválido",
            },
        ];

        assert_eq!(
            "Título inválido; Valor inválido",
            describe_violations(&violations)
        );
    }
}
