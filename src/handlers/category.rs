//! Implements the category operations exposed to the transport layer.

use crate::{
    models::Category,
    pagination::{self, PaginationConfig},
    requests::{
        CreateCategoryRequest, DeleteCategoryRequest, GetAllCategoriesRequest,
        GetCategoryByIdRequest, UpdateCategoryRequest, describe_violations,
    },
    response::{
        BAD_REQUEST, CREATED, INTERNAL_SERVER_ERROR, NOT_FOUND, OK, PagedResponse, Response,
    },
    stores::CategoryStore,
};

/// Serves the create, read, update and delete operations for categories.
#[derive(Debug, Clone)]
pub struct CategoryHandler<C: CategoryStore> {
    store: C,
    pagination: PaginationConfig,
}

impl<C: CategoryStore> CategoryHandler<C> {
    /// Create a handler backed by `store`.
    pub fn new(store: C, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    /// Create a new category owned by the requesting user.
    ///
    /// Returns a `201` envelope with no payload on success; the created ID
    /// is not echoed back, callers refetch when they need it.
    pub fn create(&mut self, request: &CreateCategoryRequest) -> Response<Category> {
        let new_category = match request.validate() {
            Ok(new_category) => new_category,
            Err(violations) => {
                return Response::new(None, BAD_REQUEST, &describe_violations(&violations));
            }
        };

        match self.store.add(new_category) {
            Ok(_) => Response::new(None, CREATED, "Categoria criada com sucesso."),
            Err(error) => {
                tracing::error!("could not create category: {error}");
                Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Não foi possível criar a categoria",
                )
            }
        }
    }

    /// Look up a single category by ID.
    ///
    /// A category owned by another user is reported as not found, exactly
    /// like a category that does not exist.
    pub fn get_by_id(&self, request: &GetCategoryByIdRequest) -> Response<Category> {
        match self.store.find_one(request.id, request.user_id) {
            Ok(Some(category)) => Response::ok(category),
            Ok(None) => Response::new(None, NOT_FOUND, "Categoria não encontrada"),
            Err(error) => {
                tracing::error!("could not fetch category {}: {error}", request.id);
                Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Houve um erro ao pesquisar categoria",
                )
            }
        }
    }

    /// List one page of the user's categories, ordered by title.
    ///
    /// The reported total is the size of the user's whole category set, not
    /// of the returned page, and an empty page is not an error.
    pub fn get_all(&self, request: &GetAllCategoriesRequest) -> PagedResponse<Vec<Category>> {
        let (page_number, page_size) = self
            .pagination
            .clamp(request.page_number, request.page_size);
        let offset = pagination::offset(page_number, page_size);

        let result = self.store.count(request.user_id).and_then(|total_count| {
            let categories = self.store.page(request.user_id, offset, page_size)?;
            Ok((categories, total_count))
        });

        match result {
            Ok((categories, total_count)) => {
                PagedResponse::new(categories, total_count, page_number, page_size)
            }
            Err(error) => {
                tracing::error!("could not list categories: {error}");
                PagedResponse::failure(
                    INTERNAL_SERVER_ERROR,
                    "Não foi possível consultar as categorias",
                )
            }
        }
    }

    /// Overwrite the title and description of an existing category.
    ///
    /// The category's ID and owner are never altered.
    pub fn update(&mut self, request: &UpdateCategoryRequest) -> Response<Category> {
        let new_fields = match request.validate() {
            Ok(new_fields) => new_fields,
            Err(violations) => {
                return Response::new(None, BAD_REQUEST, &describe_violations(&violations));
            }
        };

        let category = match self.store.find_one(request.id, request.user_id) {
            Ok(Some(category)) => category,
            Ok(None) => return Response::new(None, NOT_FOUND, "Categoria não encontrada"),
            Err(error) => {
                tracing::error!("could not fetch category {} for update: {error}", request.id);
                return Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Não foi possível alterar a categoria",
                );
            }
        };

        let category = Category {
            title: new_fields.title,
            description: new_fields.description,
            ..category
        };

        match self.store.save(&category) {
            Ok(()) => Response::new(Some(category), OK, "Categoria atualizada com sucesso"),
            Err(error) => {
                tracing::error!("could not update category {}: {error}", request.id);
                Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Não foi possível alterar a categoria",
                )
            }
        }
    }

    /// Delete a category and return a snapshot of what was removed.
    pub fn delete(&mut self, request: &DeleteCategoryRequest) -> Response<Category> {
        let category = match self.store.find_one(request.id, request.user_id) {
            Ok(Some(category)) => category,
            Ok(None) => return Response::new(None, NOT_FOUND, "Categoria não encontrada"),
            Err(error) => {
                tracing::error!("could not fetch category {} for delete: {error}", request.id);
                return Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Houve um erro ao excluir categoria, tente novamente.",
                );
            }
        };

        match self.store.remove(&category) {
            Ok(()) => Response::new(Some(category), OK, "Categoria excluida com sucesso"),
            Err(error) => {
                tracing::error!("could not delete category {}: {error}", request.id);
                Response::new(
                    None,
                    INTERNAL_SERVER_ERROR,
                    "Houve um erro ao excluir categoria, tente novamente.",
                )
            }
        }
    }
}
