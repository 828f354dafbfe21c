//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` used throughout the application.
//! Every failure a handler can produce is one of its variants, and each variant
//! knows its HTTP status code and how to render itself as a response envelope.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers and
//! middleware can return it directly. `From` implementations for [`StoreError`],
//! `jsonwebtoken::errors::Error` and `bcrypt::BcryptError` allow conversion with
//! the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;

use crate::response::{ApiResponse, FieldError};
use crate::store::StoreError;

/// Message shown to clients for every server-side failure.
pub const GENERIC_FAILURE: &str = "Failed! Something went wrong.";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// The request body could not be parsed into the expected shape (HTTP 400).
    Parse(String),
    /// One or more declared field constraints failed, or a required identifier
    /// argument was empty (HTTP 400).
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },
    /// A user with the same email already exists (HTTP 409).
    DuplicateEmail,
    /// Unknown email or wrong password. Both cases share this variant (HTTP 401).
    InvalidCredentials,
    /// Missing, malformed, tampered or expired bearer token (HTTP 401).
    Unauthorized(String),
    /// Required server configuration is absent, e.g. the signing secret (HTTP 500).
    Configuration(String),
    /// No matching record (HTTP 404).
    NotFound(String),
    /// Unclassified persistence failure (HTTP 500).
    Store(String),
    /// Any other unexpected server-side failure (HTTP 500).
    Internal(String),
}

impl AppError {
    /// Validation failure without per-field details, used for empty identifiers.
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// The message placed in the response envelope.
    ///
    /// Server-side failures never expose their internal detail.
    fn public_message(&self) -> String {
        match self {
            AppError::Parse(_) => "Failed! Invalid request body.".into(),
            AppError::Validation { message, .. } => message.clone(),
            AppError::DuplicateEmail => "Failed! Email already registered.".into(),
            AppError::InvalidCredentials => "Failed! Invalid credentials.".into(),
            AppError::Unauthorized(_) => "unauthorized".into(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Configuration(_) | AppError::Store(_) | AppError::Internal(_) => {
                GENERIC_FAILURE.into()
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Parse(msg) => write!(f, "Parse Error: {}", msg),
            AppError::Validation { message, errors } => {
                write!(f, "Validation Error: {} ({} field errors)", message, errors.len())
            }
            AppError::DuplicateEmail => write!(f, "Duplicate Email"),
            AppError::InvalidCredentials => write!(f, "Invalid Credentials"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration Error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Store(msg) => write!(f, "Store Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into enveloped `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Parse(_) | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::Configuration(_) | AppError::Store(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("{}", self);
        }

        let errors = match self {
            AppError::Validation { errors, .. } if !errors.is_empty() => Some(errors.clone()),
            _ => None,
        };
        HttpResponse::build(status).json(ApiResponse::<()>::failure(self.public_message(), errors))
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        AppError::Store(error.to_string())
    }
}

/// Token decoding failures are the caller's problem: a bad or expired token.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {:?}", error.kind()))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("bcrypt failure: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Parse("eof".into()).status_code(), 400);
        assert_eq!(AppError::invalid("id is required").status_code(), 400);
        assert_eq!(AppError::InvalidCredentials.status_code(), 401);
        assert_eq!(AppError::Unauthorized("Missing token".into()).status_code(), 401);
        assert_eq!(AppError::NotFound("task not found".into()).status_code(), 404);
        assert_eq!(AppError::DuplicateEmail.status_code(), 409);
        assert_eq!(AppError::Configuration("JWT_SECRET".into()).status_code(), 500);
        assert_eq!(AppError::Store("connection reset".into()).status_code(), 500);
    }

    #[actix_rt::test]
    async fn test_store_error_hides_details() {
        let response = AppError::Store("relation \"tasks\" does not exist".into()).error_response();
        assert_eq!(response.status(), 500);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], GENERIC_FAILURE);
        assert!(json["data"].is_null());
        assert!(!body.windows(8).any(|w| w == b"relation"));
    }

    #[actix_rt::test]
    async fn test_validation_error_lists_fields() {
        let error = AppError::Validation {
            message: "Failed! Validation error.".into(),
            errors: vec![FieldError {
                field: "title".into(),
                value: String::new(),
                message: "Field 'title' is required".into(),
                target: "/task".into(),
                tag: "required".into(),
            }],
        };
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"][0]["field"], "title");
        assert_eq!(json["error"][0]["tag"], "required");
        assert_eq!(json["error"][0]["target"], "/task");
    }

    #[test]
    fn test_store_errors_are_server_errors() {
        let error = AppError::from(StoreError::Backend("pool timed out".into()));
        assert!(matches!(error, AppError::Store(ref msg) if msg.contains("pool timed out")));
        assert_eq!(error.status_code(), 500);
    }
}
