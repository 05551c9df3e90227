//! Implements the transaction operations exposed to the transport layer.

use crate::{
    database_id::{CategoryId, UserId},
    models::Transaction,
    pagination::{self, PaginationConfig},
    requests::{
        CreateTransactionRequest, DeleteTransactionRequest, GetAllTransactionsRequest,
        GetTransactionByIdRequest, UpdateTransactionRequest, describe_violations,
    },
    response::{
        BAD_REQUEST, CREATED, INTERNAL_SERVER_ERROR, NOT_FOUND, OK, PagedResponse, Response,
    },
    stores::{CategoryStore, TransactionFilter, TransactionStore},
};

/// The outcome of checking that a category belongs to the requesting user.
enum CategoryCheck {
    Owned,
    Missing,
    Failed,
}

/// Serves the create, read, update and delete operations for transactions.
///
/// Holds a category store alongside the transaction store: a transaction may
/// only reference a category owned by the same user, and that invariant is
/// enforced here rather than left to the schema.
#[derive(Debug, Clone)]
pub struct TransactionHandler<T: TransactionStore, C: CategoryStore> {
    transactions: T,
    categories: C,
    pagination: PaginationConfig,
}

impl<T: TransactionStore, C: CategoryStore> TransactionHandler<T, C> {
    /// Create a handler backed by the given stores.
    pub fn new(transactions: T, categories: C, pagination: PaginationConfig) -> Self {
        Self {
            transactions,
            categories,
            pagination,
        }
    }

    fn check_category(&self, category_id: CategoryId, user_id: UserId) -> CategoryCheck {
        match self.categories.find_one(category_id, user_id) {
            Ok(Some(_)) => CategoryCheck::Owned,
            Ok(None) => CategoryCheck::Missing,
            Err(error) => {
                tracing::error!("could not verify category {category_id}: {error}");
                CategoryCheck::Failed
            }
        }
    }

    /// Create a new transaction owned by the requesting user.
    ///
    /// Returns a `201` envelope with no payload on success; the created ID
    /// is not echoed back, callers refetch when they need it. The referenced
    /// category must belong to the same user.
    pub fn create(&mut self, request: &CreateTransactionRequest) -> Response<Transaction> {
        let new_transaction = match request.validate() {
            Ok(new_transaction) => new_transaction,
            Err(violations) => {
                return Response::new(None, BAD_REQUEST, &describe_violations(&violations));
            }
        };

        match self.check_category(new_transaction.category_id, request.user_id) {
            CategoryCheck::Owned => {}
            CategoryCheck::Missing => {
                return Response::new(None, BAD_REQUEST, "Categoria Inválida");
            }
            CategoryCheck::Failed => {
                return Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Não foi possível criar a transação",
                );
            }
        }

        match self.transactions.add(new_transaction) {
            Ok(_) => Response::new(None, CREATED, "Transação criada com sucesso"),
            Err(error) => {
                tracing::error!("could not create transaction: {error}");
                Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Não foi possível criar a transação",
                )
            }
        }
    }

    /// Look up a single transaction by ID.
    ///
    /// A transaction owned by another user is reported as not found, exactly
    /// like a transaction that does not exist.
    pub fn get_by_id(&self, request: &GetTransactionByIdRequest) -> Response<Transaction> {
        match self.transactions.find_one(request.id, request.user_id) {
            Ok(Some(transaction)) => Response::ok(transaction),
            Ok(None) => Response::new(None, NOT_FOUND, "Transação não encontrada"),
            Err(error) => {
                tracing::error!("could not fetch transaction {}: {error}", request.id);
                Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Houve um erro ao pesquisar a transação",
                )
            }
        }
    }

    /// List one page of the user's transactions, ordered by title.
    ///
    /// An optional inclusive date range narrows the listing; the reported
    /// total is the size of the whole filtered set, not of the returned
    /// page, and an empty page is not an error.
    pub fn get_all(&self, request: &GetAllTransactionsRequest) -> PagedResponse<Vec<Transaction>> {
        let (page_number, page_size) = self
            .pagination
            .clamp(request.page_number, request.page_size);
        let offset = pagination::offset(page_number, page_size);

        let filter = TransactionFilter {
            user_id: request.user_id,
            date_range: request.date_range.clone(),
        };

        let result = self.transactions.count(&filter).and_then(|total_count| {
            let transactions = self.transactions.page(&filter, offset, page_size)?;
            Ok((transactions, total_count))
        });

        match result {
            Ok((transactions, total_count)) => {
                PagedResponse::new(transactions, total_count, page_number, page_size)
            }
            Err(error) => {
                tracing::error!("could not list transactions: {error}");
                PagedResponse::failure(
                    INTERNAL_SERVER_ERROR,
                    "Não foi possível consultar as transações",
                )
            }
        }
    }

    /// Overwrite the content fields of an existing transaction.
    ///
    /// The transaction's ID and owner are never altered, and the new
    /// category must belong to the same user.
    pub fn update(&mut self, request: &UpdateTransactionRequest) -> Response<Transaction> {
        let new_fields = match request.validate() {
            Ok(new_fields) => new_fields,
            Err(violations) => {
                return Response::new(None, BAD_REQUEST, &describe_violations(&violations));
            }
        };

        let transaction = match self.transactions.find_one(request.id, request.user_id) {
            Ok(Some(transaction)) => transaction,
            Ok(None) => return Response::new(None, NOT_FOUND, "Transação não encontrada"),
            Err(error) => {
                tracing::error!(
                    "could not fetch transaction {} for update: {error}",
                    request.id
                );
                return Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Não foi possível alterar a transação",
                );
            }
        };

        match self.check_category(new_fields.category_id, request.user_id) {
            CategoryCheck::Owned => {}
            CategoryCheck::Missing => {
                return Response::new(None, BAD_REQUEST, "Categoria Inválida");
            }
            CategoryCheck::Failed => {
                return Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Não foi possível alterar a transação",
                );
            }
        }

        let transaction = Transaction {
            title: new_fields.title,
            transaction_type: new_fields.transaction_type,
            amount: new_fields.amount,
            category_id: new_fields.category_id,
            paid_or_received_at: new_fields.paid_or_received_at,
            ..transaction
        };

        match self.transactions.save(&transaction) {
            Ok(()) => Response::new(Some(transaction), OK, "Transação atualizada com sucesso"),
            Err(error) => {
                tracing::error!("could not update transaction {}: {error}", request.id);
                Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Não foi possível alterar a transação",
                )
            }
        }
    }

    /// Delete a transaction and return a snapshot of what was removed.
    pub fn delete(&mut self, request: &DeleteTransactionRequest) -> Response<Transaction> {
        let transaction = match self.transactions.find_one(request.id, request.user_id) {
            Ok(Some(transaction)) => transaction,
            Ok(None) => return Response::new(None, NOT_FOUND, "Transação não encontrada"),
            Err(error) => {
                tracing::error!(
                    "could not fetch transaction {} for delete: {error}",
                    request.id
                );
                return Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Houve um erro ao excluir a transação, tente novamente.",
                );
            }
        };

        match self.transactions.remove(&transaction) {
            Ok(()) => Response::new(Some(transaction), OK, "Transação excluida com sucesso"),
            Err(error) => {
                tracing::error!("could not delete transaction {}: {error}", request.id);
                Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Houve um erro ao excluir a transação, tente novamente.",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use crate::{
        database_id::CategoryId,
        handlers::TransactionHandler,
        models::{NewCategory, TransactionType},
        pagination::PaginationConfig,
        requests::{
            CreateTransactionRequest, DeleteTransactionRequest, GetAllTransactionsRequest,
            GetTransactionByIdRequest, UpdateTransactionRequest,
        },
        response::{BAD_REQUEST, CREATED, INTERNAL_SERVER_ERROR, NOT_FOUND, OK},
        stores::{
            CategoryStore,
            sqlite::{SQLiteCategoryStore, SQLiteTransactionStore},
        },
    };

    type TestHandler = TransactionHandler<SQLiteTransactionStore, SQLiteCategoryStore>;

    fn get_test_handler() -> (TestHandler, CategoryId) {
        let _ = crate::logging::initialize();

        let connection = Connection::open_in_memory().expect("Could not open database");
        crate::db::initialize(&connection).expect("Could not create tables");
        let connection = Arc::new(Mutex::new(connection));

        let mut category_store = SQLiteCategoryStore::new(connection.clone());
        let category = category_store
            .add(NewCategory {
                user_id: 1,
                title: "Geral".to_string(),
                description: None,
            })
            .expect("Could not create test category");

        (
            TransactionHandler::new(
                SQLiteTransactionStore::new(connection),
                category_store,
                PaginationConfig::default(),
            ),
            category.id,
        )
    }

    fn create_request(user_id: i64, title: &str, category_id: CategoryId) -> CreateTransactionRequest {
        CreateTransactionRequest {
            user_id,
            title: title.to_string(),
            transaction_type: Some(TransactionType::Expense),
            amount: Some(dec!(129.90)),
            category_id: Some(category_id),
            paid_or_received_at: Some(datetime!(2025-03-14 10:30 UTC)),
        }
    }

    #[test]
    fn create_returns_201_and_the_transaction_is_retrievable() {
        let (mut handler, category_id) = get_test_handler();

        let response = handler.create(&create_request(1, "Supermercado", category_id));

        assert_eq!(CREATED, response.code());
        assert_eq!(None, response.data());
        assert_eq!("Transação criada com sucesso", response.message());

        let page = handler.get_all(&GetAllTransactionsRequest::new(1));
        let transactions = page.data().expect("Page should carry data");
        assert_eq!(1, transactions.len());

        let fetched = handler.get_by_id(&GetTransactionByIdRequest {
            user_id: 1,
            id: transactions[0].id,
        });
        assert_eq!(OK, fetched.code());
        assert_eq!(
            "Supermercado",
            fetched.data().expect("Fetch should return the entity").title
        );
    }

    #[test]
    fn create_reports_every_missing_field_at_once() {
        let (mut handler, _) = get_test_handler();

        let response = handler.create(&CreateTransactionRequest {
            user_id: 1,
            title: String::new(),
            transaction_type: None,
            amount: None,
            category_id: None,
            paid_or_received_at: None,
        });

        assert_eq!(BAD_REQUEST, response.code());
        assert_eq!(
            "Título inválido; Tipo inválido; Valor inválido; Categoria Inválida; Data inválida",
            response.message()
        );

        let page = handler.get_all(&GetAllTransactionsRequest::new(1));
        assert_eq!(0, page.total_count());
    }

    #[test]
    fn create_rejects_another_users_category() {
        let (mut handler, category_id) = get_test_handler();

        let response = handler.create(&create_request(2, "Supermercado", category_id));

        assert_eq!(BAD_REQUEST, response.code());
        assert_eq!("Categoria Inválida", response.message());

        let page = handler.get_all(&GetAllTransactionsRequest::new(2));
        assert_eq!(0, page.total_count());
    }

    #[test]
    fn get_by_id_hides_other_users_transactions() {
        let (mut handler, category_id) = get_test_handler();
        handler.create(&create_request(1, "Supermercado", category_id));
        let page = handler.get_all(&GetAllTransactionsRequest::new(1));
        let id = page.data().expect("Page should carry data")[0].id;

        let response = handler.get_by_id(&GetTransactionByIdRequest { user_id: 2, id });

        assert_eq!(NOT_FOUND, response.code());
        assert_eq!(None, response.data());
    }

    #[test]
    fn get_all_covers_the_filtered_set_exactly_once() {
        let (mut handler, category_id) = get_test_handler();
        for index in 0..5 {
            handler.create(&create_request(1, &format!("Compra {index}"), category_id));
        }

        let first_page = handler.get_all(&GetAllTransactionsRequest {
            user_id: 1,
            page_number: 1,
            page_size: 2,
            date_range: None,
        });
        assert_eq!(5, first_page.total_count());
        assert_eq!(3, first_page.total_pages());

        let mut seen = Vec::new();
        for page_number in 1..=first_page.total_pages() {
            let page = handler.get_all(&GetAllTransactionsRequest {
                user_id: 1,
                page_number,
                page_size: 2,
                date_range: None,
            });
            seen.extend(
                page.data()
                    .expect("Page should carry data")
                    .iter()
                    .map(|transaction| transaction.id),
            );
        }

        let mut deduplicated = seen.clone();
        deduplicated.sort_unstable();
        deduplicated.dedup();
        assert_eq!(5, seen.len());
        assert_eq!(5, deduplicated.len());
    }

    #[test]
    fn get_all_applies_the_date_range_to_page_and_count() {
        let (mut handler, category_id) = get_test_handler();
        for (title, timestamp) in [
            ("Janeiro", datetime!(2025-01-15 12:00 UTC)),
            ("Fevereiro", datetime!(2025-02-15 12:00 UTC)),
            ("Março", datetime!(2025-03-15 12:00 UTC)),
        ] {
            handler.create(&CreateTransactionRequest {
                paid_or_received_at: Some(timestamp),
                ..create_request(1, title, category_id)
            });
        }

        let response = handler.get_all(&GetAllTransactionsRequest {
            user_id: 1,
            page_number: 1,
            page_size: 25,
            date_range: Some(
                datetime!(2025-02-01 00:00 UTC)..=datetime!(2025-03-31 23:59 UTC),
            ),
        });

        assert_eq!(2, response.total_count());
        let titles: Vec<_> = response
            .data()
            .expect("Page should carry data")
            .iter()
            .map(|transaction| transaction.title.as_str())
            .collect();
        assert_eq!(vec!["Fevereiro", "Março"], titles);
    }

    #[test]
    fn update_missing_transaction_returns_404() {
        let (mut handler, category_id) = get_test_handler();

        let response = handler.update(&UpdateTransactionRequest {
            user_id: 1,
            id: 999,
            title: "Novo".to_string(),
            transaction_type: Some(TransactionType::Income),
            amount: Some(dec!(1)),
            category_id: Some(category_id),
            paid_or_received_at: Some(datetime!(2025-03-14 10:30 UTC)),
        });

        assert_eq!(NOT_FOUND, response.code());
        assert_eq!(None, response.data());
    }

    #[test]
    fn update_overwrites_only_content_fields() {
        let (mut handler, category_id) = get_test_handler();
        handler.create(&create_request(1, "Mercadinho", category_id));
        let page = handler.get_all(&GetAllTransactionsRequest::new(1));
        let original = page.data().expect("Page should carry data")[0].clone();

        let response = handler.update(&UpdateTransactionRequest {
            user_id: 1,
            id: original.id,
            title: "Mercado".to_string(),
            transaction_type: Some(TransactionType::Income),
            amount: Some(dec!(55.00)),
            category_id: Some(category_id),
            paid_or_received_at: Some(datetime!(2025-04-01 08:00 UTC)),
        });

        assert_eq!(OK, response.code());
        let updated = response.data().expect("Update should return the entity");
        assert_eq!(original.id, updated.id);
        assert_eq!(original.user_id, updated.user_id);
        assert_eq!("Mercado", updated.title);
        assert_eq!(TransactionType::Income, updated.transaction_type);
        assert_eq!(dec!(55.00), updated.amount);
    }

    #[test]
    fn delete_returns_the_removed_snapshot_then_404() {
        let (mut handler, category_id) = get_test_handler();
        handler.create(&create_request(1, "Supermercado", category_id));
        let page = handler.get_all(&GetAllTransactionsRequest::new(1));
        let id = page.data().expect("Page should carry data")[0].id;

        let first = handler.delete(&DeleteTransactionRequest { user_id: 1, id });
        let second = handler.delete(&DeleteTransactionRequest { user_id: 1, id });

        assert_eq!(OK, first.code());
        assert_eq!(
            "Supermercado",
            first.data().expect("Delete should return a snapshot").title
        );

        assert_eq!(NOT_FOUND, second.code());
        assert_eq!(None, second.data());
    }

    #[test]
    fn store_failure_becomes_a_500_envelope() {
        let (mut handler, category_id) = get_test_handler();
        handler.create(&create_request(1, "Supermercado", category_id));

        // Recreate the stores over a connection whose transaction table is
        // gone to force query failures.
        let connection = Connection::open_in_memory().expect("Could not open database");
        crate::db::initialize(&connection).expect("Could not create tables");
        connection
            .execute("DROP TABLE \"transaction\";", ())
            .expect("Could not drop table");
        let connection = Arc::new(Mutex::new(connection));
        let mut category_store = SQLiteCategoryStore::new(connection.clone());
        let category = category_store
            .add(NewCategory {
                user_id: 1,
                title: "Geral".to_string(),
                description: None,
            })
            .expect("Could not create test category");
        let mut broken_handler: TestHandler = TransactionHandler::new(
            SQLiteTransactionStore::new(connection),
            category_store,
            PaginationConfig::default(),
        );

        let create = broken_handler.create(&create_request(1, "Supermercado", category.id));
        let listing = broken_handler.get_all(&GetAllTransactionsRequest::new(1));

        assert_eq!(INTERNAL_SERVER_ERROR, create.code());
        assert_eq!("Não foi possível criar a transação", create.message());

        assert_eq!(INTERNAL_SERVER_ERROR, listing.code());
        assert_eq!(
            "Não foi possível consultar as transações",
            listing.message()
        );
    }
}
