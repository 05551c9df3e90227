//! Request contracts for category operations.

use serde::{Deserialize, Serialize};

use crate::{
    database_id::{CategoryId, UserId},
    models::NewCategory,
    pagination,
    requests::Violation,
};

/// The fields needed to create a new category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    /// The user that will own the category.
    pub user_id: UserId,
    /// The display name of the category.
    pub title: String,
    /// An optional longer description of what belongs in the category.
    pub description: Option<String>,
}

impl CreateCategoryRequest {
    /// Check every field and hand back the insert payload.
    ///
    /// # Errors
    /// Returns the full list of violations, not just the first one found.
    pub fn validate(&self) -> Result<NewCategory, Vec<Violation>> {
        validate_category_fields(self.user_id, &self.title, self.description.as_deref())
    }
}

/// The fields needed to overwrite an existing category.
///
/// Only `title` and `description` are overwritten; the ID and owner of the
/// category are fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    /// The user that owns the category.
    pub user_id: UserId,
    /// The category to update.
    pub id: CategoryId,
    /// The new display name of the category.
    pub title: String,
    /// The new description of the category.
    pub description: Option<String>,
}

impl UpdateCategoryRequest {
    /// Check every field and hand back the validated replacement fields.
    ///
    /// # Errors
    /// Returns the full list of violations, not just the first one found.
    pub fn validate(&self) -> Result<NewCategory, Vec<Violation>> {
        validate_category_fields(self.user_id, &self.title, self.description.as_deref())
    }
}

/// Identifies the category to delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCategoryRequest {
    /// The user that owns the category.
    pub user_id: UserId,
    /// The category to delete.
    pub id: CategoryId,
}

/// Identifies the category to fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCategoryByIdRequest {
    /// The user that owns the category.
    pub user_id: UserId,
    /// The category to fetch.
    pub id: CategoryId,
}

/// Selects one page of a user's categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllCategoriesRequest {
    /// The user whose categories should be listed.
    pub user_id: UserId,
    /// The 1-based page to fetch.
    #[serde(default = "pagination::default_page_number")]
    pub page_number: u64,
    /// The number of categories per page.
    #[serde(default = "pagination::default_page_size")]
    pub page_size: u64,
}

impl GetAllCategoriesRequest {
    /// Create a request for the first page with the default page size.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            page_number: pagination::DEFAULT_PAGE_NUMBER,
            page_size: pagination::DEFAULT_PAGE_SIZE,
        }
    }
}

fn validate_category_fields(
    user_id: UserId,
    title: &str,
    description: Option<&str>,
) -> Result<NewCategory, Vec<Violation>> {
    let mut violations = Vec::new();

    if title.trim().is_empty() {
        violations.push(Violation {
            field: "title",
            message: "Título inválido",
        });
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(NewCategory {
        user_id,
        title: title.to_string(),
        description: description.map(|description| description.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use crate::requests::{CreateCategoryRequest, GetAllCategoriesRequest, UpdateCategoryRequest};

    #[test]
    fn create_with_title_produces_payload() {
        let request = CreateCategoryRequest {
            user_id: 1,
            title: "Alimentação".to_string(),
            description: Some("Mercado e restaurantes".to_string()),
        };

        let new_category = request.validate().expect("Request should be valid");

        assert_eq!(1, new_category.user_id);
        assert_eq!("Alimentação", new_category.title);
        assert_eq!(
            Some("Mercado e restaurantes".to_string()),
            new_category.description
        );
    }

    #[test]
    fn create_with_blank_title_is_invalid() {
        let request = CreateCategoryRequest {
            user_id: 1,
            title: " \t\n".to_string(),
            description: None,
        };

        let violations = request.validate().expect_err("Request should be invalid");

        assert_eq!(1, violations.len());
        assert_eq!("title", violations[0].field);
        assert_eq!("Título inválido", violations[0].message);
    }

    #[test]
    fn update_with_blank_title_is_invalid() {
        let request = UpdateCategoryRequest {
            user_id: 1,
            id: 7,
            title: String::new(),
            description: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn get_all_defaults_to_first_page_of_twenty_five() {
        let request = GetAllCategoriesRequest::new(42);

        assert_eq!(42, request.user_id);
        assert_eq!(1, request.page_number);
        assert_eq!(25, request.page_size);
    }

    #[test]
    fn get_all_deserializes_missing_paging_fields_to_defaults() {
        let request: GetAllCategoriesRequest =
            serde_json::from_str(r#"{"user_id": 3}"#).expect("Could not deserialize request");

        assert_eq!(3, request.user_id);
        assert_eq!(1, request.page_number);
        assert_eq!(25, request.page_size);
    }
}
