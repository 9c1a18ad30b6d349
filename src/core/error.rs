//! Typed error handling for invoice operations
//!
//! Every store operation returns [`InvoiceError`] so that callers can match
//! the exact failure instead of inspecting a message string.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: missing or malformed candidate fields
//! - [`InvoiceError::Duplicate`]: `invoiceNumber` collision
//! - [`InvoiceError::NotFound`]: unknown id on update
//! - [`StorageError`]: persistence backend faults on write
//!
//! # Example
//!
//! ```rust,ignore
//! match store.create(candidate).await {
//!     Ok(record) => println!("created {}", record.id),
//!     Err(InvoiceError::Validation(ValidationError::MissingFields(fields))) => {
//!         println!("missing: {}", fields.join(", "));
//!     }
//!     Err(InvoiceError::Duplicate { invoice_number }) => {
//!         println!("{} already exists", invoice_number);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Result alias used by the store contract
pub type StoreResult<T> = std::result::Result<T, InvoiceError>;

/// The main error type for invoice operations
#[derive(Debug)]
pub enum InvoiceError {
    /// Candidate failed field validation
    Validation(ValidationError),

    /// Another record already uses this invoice number
    Duplicate { invoice_number: String },

    /// No record with this id
    NotFound { id: String },

    /// Persistence backend failure
    Storage(StorageError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for InvoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceError::Validation(e) => write!(f, "{}", e),
            InvoiceError::Duplicate { invoice_number } => {
                write!(f, "Invoice number '{}' already exists", invoice_number)
            }
            InvoiceError::NotFound { id } => write!(f, "Invoice '{}' not found", id),
            InvoiceError::Storage(e) => write!(f, "{}", e),
            InvoiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for InvoiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvoiceError::Validation(e) => Some(e),
            InvoiceError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl InvoiceError {
    pub fn not_found(id: impl Into<String>) -> Self {
        InvoiceError::NotFound { id: id.into() }
    }

    pub fn duplicate(invoice_number: impl Into<String>) -> Self {
        InvoiceError::Duplicate {
            invoice_number: invoice_number.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvoiceError::Validation(_) => StatusCode::BAD_REQUEST,
            InvoiceError::Duplicate { .. } => StatusCode::CONFLICT,
            InvoiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InvoiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            InvoiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            InvoiceError::Validation(e) => e.error_code(),
            InvoiceError::Duplicate { .. } => "DUPLICATE_INVOICE_NUMBER",
            InvoiceError::NotFound { .. } => "INVOICE_NOT_FOUND",
            InvoiceError::Storage(_) => "STORAGE_ERROR",
            InvoiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            InvoiceError::Validation(ValidationError::MissingFields(fields)) => {
                Some(serde_json::json!({ "fields": fields }))
            }
            InvoiceError::Validation(ValidationError::NotNumeric { field }) => {
                Some(serde_json::json!({ "fields": [field] }))
            }
            InvoiceError::Duplicate { invoice_number } => {
                Some(serde_json::json!({ "invoiceNumber": invoice_number }))
            }
            InvoiceError::NotFound { id } => Some(serde_json::json!({ "id": id })),
            _ => None,
        }
    }
}

impl IntoResponse for InvoiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to candidate validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required fields absent or empty, in canonical field order
    MissingFields(Vec<String>),

    /// Field present but not a JSON number
    NotNumeric { field: String },

    /// Request body could not be decoded
    InvalidJson { message: String },
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields(_) | ValidationError::NotNumeric { .. } => {
                "VALIDATION_ERROR"
            }
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
        }
    }

    /// Names of the offending fields, if any
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::MissingFields(fields) => fields.iter().map(String::as_str).collect(),
            ValidationError::NotNumeric { field } => vec![field.as_str()],
            ValidationError::InvalidJson { .. } => Vec::new(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingFields(fields) => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            ValidationError::NotNumeric { field } => {
                write!(f, "Field '{}' must be a number", field)
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for InvoiceError {
    fn from(err: ValidationError) -> Self {
        InvoiceError::Validation(err)
    }
}

impl From<JsonRejection> for InvoiceError {
    fn from(rejection: JsonRejection) -> Self {
        InvoiceError::Validation(ValidationError::InvalidJson {
            message: rejection.body_text(),
        })
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Reading or writing the backing medium failed
    Io { backend: String, message: String },

    /// Encoding the record set failed
    Serialization { backend: String, message: String },

    /// A lock was poisoned by a panicking writer
    LockPoisoned { backend: String },
}

impl StorageError {
    pub fn io(backend: &str, err: impl fmt::Display) -> Self {
        StorageError::Io {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }

    pub fn serialization(backend: &str, err: impl fmt::Display) -> Self {
        StorageError::Serialization {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { backend, message } => {
                write!(f, "{} storage error: {}", backend, message)
            }
            StorageError::Serialization { backend, message } => {
                write!(f, "{} serialization error: {}", backend, message)
            }
            StorageError::LockPoisoned { backend } => {
                write!(f, "{} storage lock poisoned", backend)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for InvoiceError {
    fn from(err: StorageError) -> Self {
        InvoiceError::Storage(err)
    }
}
