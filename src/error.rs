// src/error.rs
//! Error taxonomy for portal workflows.
//!
//! Nothing in this crate retries. A stateful portal session cannot be
//! replayed from an intermediate step, so every variant halts the current
//! workflow and goes back to the caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    /// Client certificate bundle or CA material could not be used.
    #[error("credential error: {0}")]
    Credential(String),

    /// Network or TLS failure, including non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A character or byte sequence outside the Shift_JIS repertoire.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// An expected menu / form / table element is missing. Usually the
    /// portal layout changed, or the session expired / failed to log in.
    #[error("unexpected page at {context}: {message}")]
    Structural { context: String, message: String },

    /// Business-level rejection reported by the portal.
    #[error("portal rejected the request: {0}")]
    Application(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PortalError {
    pub fn structural(context: impl Into<String>, message: impl Into<String>) -> Self {
        PortalError::Structural { context: context.into(), message: message.into() }
    }

    /// Cancellation or deadline; never swallowed, even inside a traversal.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, PortalError::Cancelled | PortalError::DeadlineExceeded)
    }
}

pub type Result<T, E = PortalError> = std::result::Result<T, E>;
