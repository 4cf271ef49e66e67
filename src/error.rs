//! Error types for the OpenPlantbook SDK.

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A single field-level rejection from the OpenPlantbook API.
///
/// The API reports validation failures in the Django REST framework
/// standardized format: a machine-readable `code`, a human-readable
/// `detail`, and optionally the offending attribute name.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FieldError {
    /// Machine-readable error code (e.g. `invalid_pid`)
    pub code: String,
    /// Human-readable description of the rejection
    pub detail: String,
    /// Name of the rejected field, if the API attributes the error to one
    #[serde(default)]
    pub attr: Option<String>,
}

/// Main error type for the OpenPlantbook SDK.
#[derive(Error, Debug)]
pub enum Error {
    /// Client id or secret were empty at construction. Raised before any
    /// network call is attempted.
    #[error("client id and secret are required to obtain a token")]
    MissingCredentials,

    /// The token endpoint rejected the client id/secret pair.
    #[error("token exchange failed: wrong client id or secret")]
    InvalidCredentials,

    /// The API rejected the request payload with structured field errors.
    #[error("API returned validation errors: {}", format_field_errors(.errors))]
    Validation {
        /// Per-field errors exactly as reported by the API
        errors: Vec<FieldError>,
    },

    /// Any other non-2xx response from the API.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Transport-layer failure: timeouts, redirect loops, connection errors,
    /// or an unparseable response body.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create an API error from HTTP response details.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a validation error from structured field errors.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.code, e.detail))
        .collect::<Vec<_>>()
        .join("; ")
}
