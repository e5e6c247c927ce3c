//! # Client Error Types
//!
//! Error types for everything that crosses the REST boundary.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Payload             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Config         │  │  Http           │  │  Decode                 │ │
//! │  │  InvalidUrl     │  │  Server         │  │                         │ │
//! │  │  Io / Toml      │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Core(CoreError)  - business rule raised by stockline-core      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockline_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Shown when the backend rejects a new order without saying why.
pub const CREATE_ORDER_FALLBACK: &str = "Failed to create order";

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced a usable response (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// A response did not match the expected shape. `context` names the
    /// record (`inventory[3]`, `orders[0].price`).
    #[error("Malformed response at {context}: {reason}")]
    Decode { context: String, reason: String },

    // =========================================================================
    // Domain Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl ClientError {
    pub(crate) fn decode(context: impl Into<String>, reason: impl Into<String>) -> Self {
        ClientError::Decode {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// True for failures the cashier should retry by hand (network down,
    /// backend 5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_connect() || e.is_timeout(),
            ClientError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Text for the console's error banner.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Server { message, .. } => message.clone(),
            ClientError::Http(_) => "Could not reach the inventory server".to_string(),
            ClientError::Decode { .. } => "The server sent data the console cannot read".to_string(),
            ClientError::Core(CoreError::Validation(v)) => v.to_string(),
            ClientError::Core(e) => e.to_string(),
            ClientError::Config(_) | ClientError::InvalidUrl(_) | ClientError::Io(_) | ClientError::Toml(_) => {
                format!("Configuration problem: {}", self)
            }
        }
    }
}
