//!
//! # Error Handling
//!
//! Two layers of errors live here.
//!
//! `DomainError` is what the business logic returns. Every variant belongs to
//! exactly one `ErrorKind`, so callers branch on the kind (or match the variant)
//! instead of inspecting messages.
//!
//! `AppError` is the delivery-facing type. It implements
//! `actix_web::error::ResponseError` and renders `{"error": "<message>"}` with the
//! status code matching the kind. `From<DomainError>` does the mapping so handlers
//! can use `?` directly on business-logic results.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::password::PasswordError;
use crate::auth::token::TokenError;
use crate::repository::StoreError;

/// Coarse classification of every failure the core can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or malformed input, bad date or status.
    Validation,
    /// The user or task does not exist.
    NotFound,
    /// Duplicate username.
    Conflict,
    /// Bad credentials or a missing, invalid or expired token.
    Unauthorized,
    /// Authenticated but lacking the required role.
    Forbidden,
    /// Unexpected store or signing failure.
    Internal,
}

/// Errors returned by the user and task business logic.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("password must be at least 8 characters")]
    PasswordTooShort,
    #[error("user already exists")]
    UserExists,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid user ID")]
    InvalidUserId,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("task not found")]
    TaskNotFound,
    #[error("invalid task ID")]
    InvalidTaskId,
    #[error("due date must be in the future")]
    InvalidDueDate,
    #[error("invalid task status")]
    InvalidTaskStatus,
    #[error("no valid fields provided for update")]
    NoFieldsProvided,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::EmptyField(_)
            | DomainError::PasswordTooShort
            | DomainError::InvalidUserId
            | DomainError::InvalidTaskId
            | DomainError::InvalidDueDate
            | DomainError::InvalidTaskStatus
            | DomainError::NoFieldsProvided => ErrorKind::Validation,
            DomainError::UserNotFound | DomainError::TaskNotFound => ErrorKind::NotFound,
            DomainError::UserExists => ErrorKind::Conflict,
            DomainError::InvalidCredentials => ErrorKind::Unauthorized,
            DomainError::Password(PasswordError::TooLong) => ErrorKind::Validation,
            DomainError::Password(_) => ErrorKind::Internal,
            DomainError::Token(err) if err.is_rejection() => ErrorKind::Unauthorized,
            DomainError::Token(_) => ErrorKind::Internal,
            DomainError::Store(StoreError::Duplicate) => ErrorKind::Conflict,
            DomainError::Store(StoreError::NotFound) => ErrorKind::NotFound,
            DomainError::Store(_) => ErrorKind::Internal,
        }
    }

    /// Returns true when this error belongs to `kind`.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

/// Represents all possible errors that can leave an HTTP handler.
///
/// Each variant corresponds to one HTTP status class and carries the message
/// placed in the JSON body.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is required but missing (HTTP 401).
    Unauthorized(String),
    /// Authenticated caller lacks the required role (HTTP 403).
    Forbidden(String),
    /// Malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// Requested resource was not found (HTTP 404).
    NotFound(String),
    /// Resource already exists (HTTP 409).
    Conflict(String),
    /// Unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Errors originating from the persistence layer (HTTP 500).
    DatabaseError(String),
    /// Payload failed declarative validation (HTTP 422).
    ValidationError(String),
}

impl AppError {
    fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg)
            | AppError::ValidationError(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({ "error": self.message() });
        match self {
            AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(body),
            AppError::Forbidden(_) => HttpResponse::Forbidden().json(body),
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(body),
            AppError::NotFound(_) => HttpResponse::NotFound().json(body),
            AppError::Conflict(_) => HttpResponse::Conflict().json(body),
            // Database errors are presented as generic internal server errors.
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                HttpResponse::InternalServerError().json(body)
            }
            AppError::ValidationError(_) => HttpResponse::UnprocessableEntity().json(body),
        }
    }
}

/// Maps business-logic failures onto HTTP classes by `ErrorKind`.
///
/// Store failures keep their original message.
impl From<DomainError> for AppError {
    fn from(error: DomainError) -> AppError {
        let message = error.to_string();
        match error.kind() {
            ErrorKind::Validation => AppError::BadRequest(message),
            ErrorKind::NotFound => AppError::NotFound(message),
            ErrorKind::Conflict => AppError::Conflict(message),
            ErrorKind::Unauthorized => AppError::Unauthorized(message),
            ErrorKind::Forbidden => AppError::Forbidden(message),
            ErrorKind::Internal => match error {
                DomainError::Store(_) => AppError::DatabaseError(message),
                _ => AppError::InternalServerError(message),
            },
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}
