//! Defines the category store trait.

use crate::{
    Error,
    database_id::{CategoryId, UserId},
    models::{Category, NewCategory},
};

/// Persists categories and answers queries scoped to a single user.
///
/// Each mutating call commits as its own atomic unit; no pending state is
/// held between calls.
pub trait CategoryStore {
    /// Add a new category to the store, returning it with its generated ID.
    fn add(&mut self, category: NewCategory) -> Result<Category, Error>;

    /// Find the category matching both `id` and `user_id`.
    ///
    /// A category that exists under a different user is reported as absent.
    fn find_one(&self, id: CategoryId, user_id: UserId) -> Result<Option<Category>, Error>;

    /// Retrieve one page of the user's categories, ordered by title and then
    /// ID so that pages are disjoint even with duplicate titles.
    fn page(&self, user_id: UserId, offset: u64, limit: u64) -> Result<Vec<Category>, Error>;

    /// Count every category owned by `user_id`.
    ///
    /// Observes the same filter as [CategoryStore::page], before pagination.
    fn count(&self, user_id: UserId) -> Result<u64, Error>;

    /// Persist changes to the content fields of an existing category.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingCategory] if the category is no longer in
    /// the store.
    fn save(&mut self, category: &Category) -> Result<(), Error>;

    /// Remove a category from the store.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingCategory] if the category is no longer in
    /// the store.
    fn remove(&mut self, category: &Category) -> Result<(), Error>;
}
