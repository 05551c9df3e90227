//! Defines the result envelope types shared by every handler operation.

use serde::{Deserialize, Serialize};

/// Status code for an operation that succeeded.
pub const OK: u16 = 200;

/// Status code for an operation that created a resource.
pub const CREATED: u16 = 201;

/// Status code for a request that failed validation.
pub const BAD_REQUEST: u16 = 400;

/// Status code for a resource that could not be found for the requesting
/// user.
pub const NOT_FOUND: u16 = 404;

/// Status code for an operation that failed in the store layer.
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// The message reported when an operation succeeds.
pub const DEFAULT_MESSAGE: &str = "Operação realizada com sucesso";

/// The envelope returned by every handler operation.
///
/// Carries the operation's payload alongside a status code and a user-facing
/// message, so the transport layer can translate any result into a response
/// without inspecting the payload type. Envelopes are immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    data: Option<T>,
    code: u16,
    message: String,
}

impl<T> Response<T> {
    /// Create an envelope with an explicit status code and message.
    pub fn new(data: Option<T>, code: u16, message: &str) -> Self {
        Self {
            data,
            code,
            message: message.to_string(),
        }
    }

    /// Create a success envelope with the default code and message.
    pub fn ok(data: T) -> Self {
        Self::new(Some(data), OK, DEFAULT_MESSAGE)
    }

    /// The payload carried by the envelope. `None` when the operation did not
    /// produce one.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// The status code describing the success or failure class.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The user-facing message describing the outcome.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consume the envelope and return its payload.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// A result envelope extended with the bookkeeping needed to page through a
/// list.
///
/// The page count is always derived via [PagedResponse::total_pages] so it
/// cannot drift from `total_count` and `page_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    data: Option<T>,
    code: u16,
    message: String,
    total_count: u64,
    page_number: u64,
    page_size: u64,
}

impl<T> PagedResponse<T> {
    /// Create a success envelope for one page of results.
    ///
    /// `total_count` is the size of the whole filtered set, not of this page.
    pub fn new(data: T, total_count: u64, page_number: u64, page_size: u64) -> Self {
        Self {
            data: Some(data),
            code: OK,
            message: DEFAULT_MESSAGE.to_string(),
            total_count,
            page_number,
            page_size,
        }
    }

    /// Create a failure envelope carrying no page data.
    pub fn failure(code: u16, message: &str) -> Self {
        Self {
            data: None,
            code,
            message: message.to_string(),
            total_count: 0,
            page_number: crate::pagination::DEFAULT_PAGE_NUMBER,
            page_size: crate::pagination::DEFAULT_PAGE_SIZE,
        }
    }

    /// The page of results. `None` when the query failed.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// The status code describing the success or failure class.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The user-facing message describing the outcome.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The size of the filtered set before pagination was applied.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// The 1-based page this envelope holds.
    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    /// The maximum number of items per page.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// The number of pages needed to cover the filtered set.
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.page_size)
    }

    /// Consume the envelope and return its page of results.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
