//! Response envelopes for the boundary layer.
//!
//! The core does not route HTTP, but it owns the envelope shapes so every
//! embedding boundary serializes results and errors the same way.

use serde::Serialize;

use super::error::DomainError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            data,
            message: message.into(),
            success: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
    pub errors: Vec<String>,
}

impl From<&DomainError> for ApiFailure {
    fn from(err: &DomainError) -> Self {
        let errors = match err {
            DomainError::Validation { field, reason } => vec![format!("{}: {}", field, reason)],
            DomainError::MissingParameter { field } => vec![format!("{}: missing", field)],
            _ => Vec::new(),
        };
        Self {
            status_code: err.status_code(),
            message: err.to_string(),
            success: false,
            errors,
        }
    }
}
