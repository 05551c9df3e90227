//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// Database identifier for a user.
///
/// Users are resolved by the caller before a request reaches a handler, so
/// the crate only ever sees their IDs.
pub type UserId = i64;

/// Database identifier for a category.
pub type CategoryId = i64;

/// Database identifier for a transaction.
pub type TransactionId = i64;
