//! Defines the transaction store trait.

use std::ops::RangeInclusive;

use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{TransactionId, UserId},
    models::{NewTransaction, Transaction},
};

/// Handles the persistence and retrieval of transactions.
///
/// Each mutating call commits as its own atomic unit; no pending state is
/// held between calls.
pub trait TransactionStore {
    /// Add a new transaction to the store, returning it with its generated
    /// ID.
    fn add(&mut self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Find the transaction matching both `id` and `user_id`.
    ///
    /// A transaction that exists under a different user is reported as
    /// absent.
    fn find_one(
        &self,
        id: TransactionId,
        user_id: UserId,
    ) -> Result<Option<Transaction>, Error>;

    /// Retrieve one page of the transactions selected by `filter`, ordered
    /// by title and then ID so that pages are disjoint even with duplicate
    /// titles.
    fn page(
        &self,
        filter: &TransactionFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Transaction>, Error>;

    /// Count the transactions selected by `filter`.
    ///
    /// Observes the same filter as [TransactionStore::page], before
    /// pagination.
    fn count(&self, filter: &TransactionFilter) -> Result<u64, Error>;

    /// Persist changes to the content fields of an existing transaction.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingTransaction] if the transaction is no
    /// longer in the store.
    fn save(&mut self, transaction: &Transaction) -> Result<(), Error>;

    /// Remove a transaction from the store.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if the transaction is no
    /// longer in the store.
    fn remove(&mut self, transaction: &Transaction) -> Result<(), Error>;
}

/// Defines which transactions [TransactionStore::page] and
/// [TransactionStore::count] should select.
#[derive(Debug, Clone)]
pub struct TransactionFilter {
    /// Include only transactions owned by this user.
    pub user_id: UserId,
    /// Include only transactions paid or received within this range
    /// (inclusive). `None` includes every transaction the user owns.
    pub date_range: Option<RangeInclusive<OffsetDateTime>>,
}

impl TransactionFilter {
    /// A filter that selects every transaction owned by `user_id`.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            date_range: None,
        }
    }
}
