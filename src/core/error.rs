//! Typed error handling for the order tracking service.
//!
//! One error enum is shared by the store, the lifecycle service, and the
//! HTTP transport, so every failure a caller can see is typed and carries
//! its own HTTP mapping.
//!
//! # Error categories
//!
//! - [`OrderError::Validation`]: request shape was invalid (missing or
//!   empty required fields)
//! - [`OrderError::DuplicateSerial`]: the serial-number uniqueness
//!   invariant would be violated
//! - [`OrderError::NotFound`]: the referenced order does not exist
//! - [`OrderError::Storage`]: the persistence backend failed; see
//!   [`StorageError`] for the failure class
//!
//! # Example
//!
//! ```rust,ignore
//! match service.update_order(&id, update).await {
//!     Ok(order) => println!("updated {}", order.id),
//!     Err(OrderError::NotFound { id }) => println!("no order {}", id),
//!     Err(OrderError::DuplicateSerial { serial_number }) => {
//!         println!("{} is already taken", serial_number);
//!     }
//!     Err(e) => eprintln!("request failed: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// The error type returned by every order operation.
#[derive(Debug)]
pub enum OrderError {
    /// Request shape was invalid. Maps field name to a message.
    Validation { fields: BTreeMap<String, String> },

    /// Another order already holds the requested serial number. The
    /// existing record is left untouched.
    DuplicateSerial { serial_number: String },

    /// The referenced order id does not exist.
    NotFound { id: Uuid },

    /// The storage backend failed; the caller should retry later.
    Storage(StorageError),
}

/// Failure classes for the persistence backend.
#[derive(Debug)]
pub enum StorageError {
    /// The backend could not be reached.
    Connection(String),

    /// A storage operation failed.
    Operation(String),

    /// Stored data could not be serialized or deserialized.
    Serialization(String),

    /// Concurrent writers kept invalidating the read-modify-write cycle.
    Contention { id: Uuid },
}

impl StorageError {
    pub fn connection(message: impl fmt::Display) -> Self {
        StorageError::Connection(message.to_string())
    }

    pub fn operation(message: impl fmt::Display) -> Self {
        StorageError::Operation(message.to_string())
    }

    pub fn serialization(message: impl fmt::Display) -> Self {
        StorageError::Serialization(message.to_string())
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Connection(msg) => write!(f, "storage connection failed: {}", msg),
            StorageError::Operation(msg) => write!(f, "storage operation failed: {}", msg),
            StorageError::Serialization(msg) => write!(f, "storage serialization failed: {}", msg),
            StorageError::Contention { id } => {
                write!(f, "update contention on order {}", id)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::Validation { fields } => {
                write!(f, "Validation failed")?;
                for (field, message) in fields {
                    write!(f, "; {}: {}", field, message)?;
                }
                Ok(())
            }
            OrderError::DuplicateSerial { serial_number } => {
                write!(
                    f,
                    "An order with serial number '{}' already exists",
                    serial_number
                )
            }
            OrderError::NotFound { id } => write!(f, "Order not found: {}", id),
            OrderError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for OrderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrderError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for OrderError {
    fn from(e: StorageError) -> Self {
        OrderError::Storage(e)
    }
}

/// Error response structure for HTTP responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl OrderError {
    /// Build a single-field validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), message.into());
        OrderError::Validation { fields }
    }

    /// Convert the output of a `validator` check into a typed error.
    pub fn from_validator(errors: &validator::ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            if let Some(error) = field_errors.first() {
                let message = error
                    .message
                    .clone()
                    .map(|m| m.into_owned())
                    .unwrap_or_else(|| "invalid value".to_string());
                fields.insert(field.to_string(), message);
            }
        }
        OrderError::Validation { fields }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::Validation { .. } => StatusCode::BAD_REQUEST,
            OrderError::DuplicateSerial { .. } => StatusCode::CONFLICT,
            OrderError::NotFound { .. } => StatusCode::NOT_FOUND,
            OrderError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::Validation { .. } => "VALIDATION_ERROR",
            OrderError::DuplicateSerial { .. } => "DUPLICATE_SERIAL",
            OrderError::NotFound { .. } => "NOT_FOUND",
            OrderError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Convert to an error response.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error.
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            OrderError::Validation { fields } => Some(serde_json::json!({ "fields": fields })),
            OrderError::DuplicateSerial { serial_number } => {
                Some(serde_json::json!({ "serialNumber": serial_number }))
            }
            OrderError::NotFound { id } => Some(serde_json::json!({ "id": id.to_string() })),
            OrderError::Storage(_) => None,
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}
