//! The response envelope shared by every endpoint.

use serde::{Deserialize, Serialize};

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    /// String form of the offending value.
    pub value: String,
    pub message: String,
    pub target: String,
    /// The violated constraint, e.g. `required`.
    pub tag: String,
}

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    /// Total number of pages, `ceil(total / limit)`.
    pub pages: i64,
}

/// Uniform wrapper for API responses.
///
/// `data` is always present on the wire (as `null` when absent); `pagination`
/// and `error` are omitted unless set.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            data: Some(data),
            success: true,
            message: message.into(),
            pagination: None,
            errors: None,
        }
    }

    /// A successful response that carries no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            success: true,
            message: message.into(),
            pagination: None,
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>, errors: Option<Vec<FieldError>>) -> Self {
        Self {
            data: None,
            success: false,
            message: message.into(),
            pagination: None,
            errors,
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}
