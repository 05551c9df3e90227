//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{
    Connection, OptionalExtension, Row, params_from_iter,
    types::{Type, Value},
};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{TransactionId, UserId},
    db::{CreateTable, MapRow},
    models::{NewTransaction, Transaction, TransactionType},
    stores::{TransactionFilter, TransactionStore},
};

/// Stores transactions in a SQLite database.
///
/// Note that a transaction references a [Category](crate::models::Category),
/// so the category table must be set up in the database as well (see
/// [initialize](crate::db::initialize)).
///
/// Amounts are stored as TEXT to keep their decimal precision;
/// `paid_or_received_at` is stored as a unix timestamp (seconds, UTC) so
/// range comparisons stay integer comparisons.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new transaction store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }

    /// Build the WHERE clause and parameters for `filter`.
    ///
    /// Shared by [TransactionStore::page] and [TransactionStore::count] so
    /// both always observe the same predicate.
    fn where_clause(filter: &TransactionFilter) -> (String, Vec<Value>) {
        let mut clause = String::from("WHERE user_id = ?1");
        let mut parameters = vec![Value::Integer(filter.user_id)];

        if let Some(date_range) = &filter.date_range {
            clause.push_str(" AND paid_or_received_at BETWEEN ?2 AND ?3");
            parameters.push(Value::Integer(date_range.start().unix_timestamp()));
            parameters.push(Value::Integer(date_range.end().unix_timestamp()));
        }

        (clause, parameters)
    }
}

const TRANSACTION_COLUMNS: &str =
    "id, user_id, title, transaction_type, amount, category_id, paid_or_received_at";

impl TransactionStore for SQLiteTransactionStore {
    /// Create a transaction in the database and return it with its generated
    /// ID.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::InvalidForeignKey] if `category_id` does not refer to an
    ///   existing category,
    /// - [Error::SqlError] if there is some other SQL error.
    fn add(&mut self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let query = format!(
            "INSERT INTO \"transaction\"
             (user_id, title, transaction_type, amount, category_id, paid_or_received_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        );

        let transaction = self.connection()?.prepare(&query)?.query_row(
            (
                transaction.user_id,
                &transaction.title,
                transaction.transaction_type.code(),
                transaction.amount.to_string(),
                transaction.category_id,
                transaction.paid_or_received_at.unix_timestamp(),
            ),
            Self::map_row,
        )?;

        Ok(transaction)
    }

    /// Retrieve the transaction matching both `id` and `user_id`.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn find_one(
        &self,
        id: TransactionId,
        user_id: UserId,
    ) -> Result<Option<Transaction>, Error> {
        let query = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2;"
        );

        self.connection()?
            .prepare(&query)?
            .query_row((id, user_id), Self::map_row)
            .optional()
            .map_err(Error::from)
    }

    /// Retrieve one page of the transactions selected by `filter`, ordered
    /// by title.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn page(
        &self,
        filter: &TransactionFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Transaction>, Error> {
        let (where_clause, parameters) = Self::where_clause(filter);
        let query = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             {where_clause}
             ORDER BY title ASC, id ASC
             LIMIT {limit} OFFSET {offset};"
        );

        self.connection()?
            .prepare(&query)?
            .query_map(params_from_iter(parameters.iter()), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Count the transactions selected by `filter`.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn count(&self, filter: &TransactionFilter) -> Result<u64, Error> {
        let (where_clause, parameters) = Self::where_clause(filter);
        let query = format!("SELECT COUNT(id) FROM \"transaction\" {where_clause};");

        self.connection()?
            .query_row(&query, params_from_iter(parameters.iter()), |row| {
                row.get::<_, i64>(0).map(|count| count as u64)
            })
            .map_err(Error::from)
    }

    /// Overwrite the content fields of an existing transaction.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::UpdateMissingTransaction] if no row matched the
    ///   transaction's `(id, user_id)` pair,
    /// - [Error::InvalidForeignKey] if the new `category_id` does not refer
    ///   to an existing category.
    fn save(&mut self, transaction: &Transaction) -> Result<(), Error> {
        let rows_affected = self.connection()?.execute(
            "UPDATE \"transaction\"
             SET title = ?1, transaction_type = ?2, amount = ?3, category_id = ?4,
                 paid_or_received_at = ?5
             WHERE id = ?6 AND user_id = ?7;",
            (
                &transaction.title,
                transaction.transaction_type.code(),
                transaction.amount.to_string(),
                transaction.category_id,
                transaction.paid_or_received_at.unix_timestamp(),
                transaction.id,
                transaction.user_id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingTransaction);
        }

        Ok(())
    }

    /// Delete a transaction.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if no row matched the
    /// transaction's `(id, user_id)` pair.
    fn remove(&mut self, transaction: &Transaction) -> Result<(), Error> {
        let rows_affected = self.connection()?.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2;",
            (transaction.id, transaction.user_id),
        )?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                transaction_type INTEGER NOT NULL,
                amount TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                paid_or_received_at INTEGER NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id)
                    ON UPDATE CASCADE ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_transaction_user_id ON \"transaction\"(user_id);",
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let type_code: i64 = row.get(offset + 3)?;
        let transaction_type = TransactionType::from_code(type_code).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 3,
                Type::Integer,
                format!("unknown transaction type code {type_code}").into(),
            )
        })?;

        let raw_amount: String = row.get(offset + 4)?;
        let amount = raw_amount.parse::<Decimal>().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 4, Type::Text, Box::new(error))
        })?;

        let timestamp: i64 = row.get(offset + 6)?;
        let paid_or_received_at = OffsetDateTime::from_unix_timestamp(timestamp).map_err(
            |error| {
                rusqlite::Error::FromSqlConversionFailure(
                    offset + 6,
                    Type::Integer,
                    Box::new(error),
                )
            },
        )?;

        Ok(Transaction {
            id: row.get(offset)?,
            user_id: row.get(offset + 1)?,
            title: row.get(offset + 2)?,
            transaction_type,
            amount,
            category_id: row.get(offset + 5)?,
            paid_or_received_at,
        })
    }
}
