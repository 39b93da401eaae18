//! Typed error handling for the contact book
//!
//! Every early exit a handler can take is a variant of [`ApiError`], which
//! knows its HTTP status and renders its own JSON body.
//!
//! # Error Categories
//!
//! - [`ApiError::Unauthenticated`]: no principal could be resolved (401)
//! - [`ApiError::Forbidden`]: principal does not own the contact (403)
//! - [`EntityError`]: a path id does not resolve to a stored record (404)
//! - [`ValidationError`]: body is malformed (400) or breaks field rules (422)
//! - [`StorageError`]: the persistence store failed (500)
//!
//! # Example
//!
//! ```rust,ignore
//! async fn load(store: &dyn ContactStore, id: Uuid) -> ApiResult<Contact> {
//!     store
//!         .find_contact(&id)
//!         .await?
//!         .ok_or_else(|| EntityError::not_found::<Contact>(id).into())
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::core::entity::Entity;

/// The main error type returned by handlers
#[derive(Debug)]
pub enum ApiError {
    /// No authenticated principal
    Unauthenticated,

    /// Principal is authenticated but does not own the resource
    Forbidden,

    /// Entity lookup errors
    Entity(EntityError),

    /// Body validation errors
    Validation(ValidationError),

    /// Storage backend errors
    Storage(StorageError),

    /// Anything unexpected; the message is logged, never returned to clients
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthenticated => write!(f, "Unauthenticated."),
            ApiError::Forbidden => write!(f, "Forbidden"),
            ApiError::Entity(e) => write!(f, "{}", e),
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Entity(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            ApiError::Storage(e) => Some(e),
            ApiError::Unauthenticated | ApiError::Forbidden | ApiError::Internal(_) => None,
        }
    }
}

/// JSON body of every error response
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
    /// Field name to failed rule messages, only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Entity(e) => e.status_code(),
            ApiError::Validation(e) => e.status_code(),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error, used in logs
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::Entity(e) => e.error_code(),
            ApiError::Validation(e) => e.error_code(),
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            ApiError::Storage(_) | ApiError::Internal(_) => ErrorResponse {
                message: "Server Error".to_string(),
                errors: None,
            },
            ApiError::Validation(ValidationError::FieldErrors(errors)) => ErrorResponse {
                message: self.to_string(),
                errors: Some(group_field_errors(errors)),
            },
            _ => ErrorResponse {
                message: self.to_string(),
                errors: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), status = %status, "request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}

fn group_field_errors(errors: &[FieldValidationError]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for error in errors {
        grouped
            .entry(error.field.clone())
            .or_default()
            .push(error.message.clone());
    }
    grouped
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity lookup
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    /// No stored record answers to the id, including ids that are not UUIDs
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: String },
}

impl EntityError {
    /// Not-found error for an entity type
    pub fn not_found<T: Entity>(id: impl fmt::Display) -> Self {
        EntityError::NotFound {
            entity_type: T::resource_name_singular().to_string(),
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
        }
    }
}

impl From<EntityError> for ApiError {
    fn from(err: EntityError) -> Self {
        ApiError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request body validation
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// One or more fields break their rules
    #[error("{}", summarize(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Body is not a JSON object of the expected shape
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// A single failed field rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn summarize(errors: &[FieldValidationError]) -> String {
    match errors {
        [] => "The given data was invalid.".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!(
            "{} (and {} more error{})",
            first.message,
            rest.len(),
            if rest.len() == 1 { "" } else { "s" }
        ),
    }
}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::FieldErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationError::InvalidJson { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Query execution error
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

/// Store and provider results surface as `anyhow::Error`
///
/// A store reports a record that vanished under a concurrent delete as an
/// [`EntityError`], which keeps its 404.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<EntityError>() {
            Ok(entity) => return ApiError::Entity(entity),
            Err(other) => other,
        };
        match err.downcast::<StorageError>() {
            Ok(storage) => ApiError::Storage(storage),
            Err(other) => ApiError::Internal(format!("{:#}", other)),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for handler operations
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Tests
// =============================================================================
