//! Error types for the audit engine.
//!
//! Nothing here ever reaches an end user: transport errors degrade to an
//! inactive sink and identity errors degrade to an absent subject. The
//! types exist so collaborators implementing the boundaries have something
//! precise to return.

use thiserror::Error;

/// Errors from the external audit transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport could not be opened.
    #[error("Failed to open audit transport at {path}: {source}")]
    Open {
        /// The transport endpoint that was tried.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A write to the open transport failed.
    #[error("Failed to write audit event: {source}")]
    Write {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The transport is not available on this system.
    #[error("Audit transport unavailable: {reason}")]
    Unavailable {
        /// Why the transport cannot be used.
        reason: String,
    },
}

/// Errors from resolving a caller's identity out of an invocation context.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The invocation carries no caller credentials.
    #[error("Invocation carries no caller credentials")]
    Missing,

    /// Credentials exist but could not be read.
    #[error("Failed to read caller credentials: {reason}")]
    Lookup {
        /// Why the lookup failed.
        reason: String,
    },
}
