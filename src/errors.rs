//! Unified error type for the inventory service.
//!
//! Every failure the core can raise lives here, together with the HTTP-style
//! status code the transport layer renders it with.

use thiserror::Error;

/// Message shown to callers in place of any 500-class error detail.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "An unexpected error occurred while processing the request.";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    Validation { message: String },

    #[error("Invalid intention: {value}. Expected one of: buy, restock, delete, list, retrieve.")]
    InvalidIntention { value: String },

    #[error("Item '{name}' not found.")]
    ItemNotFound { name: String },

    #[error("No transactions found.")]
    TransactionsNotFound,

    #[error(
        "Not enough quantity for '{name}'. Available: {available}, Requested: {requested}."
    )]
    InsufficientQuantity {
        name: String,
        available: i64,
        requested: i64,
    },

    #[error("Could not understand the prompt: {message}")]
    Extraction { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// HTTP-style status code for this failure.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. }
            | Self::InvalidIntention { .. }
            | Self::InsufficientQuantity { .. }
            | Self::Extraction { .. } => 400,
            Self::ItemNotFound { .. } | Self::TransactionsNotFound => 404,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::Internal { .. } => 500,
        }
    }

    /// Message safe to hand back to a caller.
    ///
    /// Business-rule failures are reported verbatim, anything server-side is
    /// replaced by [`GENERIC_FAILURE_MESSAGE`].
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.status_code() >= 500 {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
