//! This file defines the `Category` type, the grouping that transactions are
//! recorded against.

use serde::{Deserialize, Serialize};

use crate::database_id::{CategoryId, UserId};

/// A grouping for income and expense transactions, e.g., 'Groceries',
/// 'Wages'.
///
/// Categories belong to exactly one user and are only ever visible to that
/// user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The ID of the user that owns the category.
    pub user_id: UserId,
    /// The display name of the category.
    pub title: String,
    /// An optional longer description of what belongs in the category.
    pub description: Option<String>,
}

/// The fields needed to insert a new [Category] into a store.
///
/// The ID is generated by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// The ID of the user that will own the category.
    pub user_id: UserId,
    /// The display name of the category.
    pub title: String,
    /// An optional longer description of what belongs in the category.
    pub description: Option<String>,
}
