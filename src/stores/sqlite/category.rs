//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    database_id::{CategoryId, UserId},
    db::{CreateTable, MapRow},
    models::{Category, NewCategory},
    stores::CategoryStore,
};

/// Stores categories in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create a category in the database and return it with its generated
    /// ID.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn add(&mut self, category: NewCategory) -> Result<Category, Error> {
        let connection = self.connection()?;
        connection.execute(
            "INSERT INTO category (user_id, title, description) VALUES (?1, ?2, ?3);",
            (category.user_id, &category.title, &category.description),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Category {
            id,
            user_id: category.user_id,
            title: category.title,
            description: category.description,
        })
    }

    /// Retrieve the category matching both `id` and `user_id`.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn find_one(&self, id: CategoryId, user_id: UserId) -> Result<Option<Category>, Error> {
        self.connection()?
            .prepare(
                "SELECT id, user_id, title, description FROM category
                 WHERE id = ?1 AND user_id = ?2;",
            )?
            .query_row((id, user_id), Self::map_row)
            .optional()
            .map_err(Error::from)
    }

    /// Retrieve one page of the user's categories ordered by title.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn page(&self, user_id: UserId, offset: u64, limit: u64) -> Result<Vec<Category>, Error> {
        let query = format!(
            "SELECT id, user_id, title, description FROM category
             WHERE user_id = ?1
             ORDER BY title ASC, id ASC
             LIMIT {limit} OFFSET {offset};"
        );

        self.connection()?
            .prepare(&query)?
            .query_map((user_id,), Self::map_row)?
            .map(|maybe_category| maybe_category.map_err(Error::SqlError))
            .collect()
    }

    /// Count every category owned by `user_id`.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn count(&self, user_id: UserId) -> Result<u64, Error> {
        self.connection()?
            .query_row(
                "SELECT COUNT(id) FROM category WHERE user_id = ?1;",
                (user_id,),
                |row| row.get::<_, i64>(0).map(|count| count as u64),
            )
            .map_err(Error::from)
    }

    /// Overwrite the title and description of an existing category.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingCategory] if no row matched the
    /// category's `(id, user_id)` pair.
    fn save(&mut self, category: &Category) -> Result<(), Error> {
        let rows_affected = self.connection()?.execute(
            "UPDATE category SET title = ?1, description = ?2
             WHERE id = ?3 AND user_id = ?4;",
            (
                &category.title,
                &category.description,
                category.id,
                category.user_id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingCategory);
        }

        Ok(())
    }

    /// Delete a category.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingCategory] if no row matched the
    /// category's `(id, user_id)` pair.
    fn remove(&mut self, category: &Category) -> Result<(), Error> {
        let rows_affected = self.connection()?.execute(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2;",
            (category.id, category.user_id),
        )?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingCategory);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);",
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Category {
            id: row.get(offset)?,
            user_id: row.get(offset + 1)?,
            title: row.get(offset + 2)?,
            description: row.get(offset + 3)?,
        })
    }
}
