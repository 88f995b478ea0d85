//! Error types for the reconciliation engine
//!
//! The taxonomy follows the three operations of a tick: resolving the
//! public IP, looking up the provider record, and mutating it. All three
//! are recoverable on the next tick; only configuration errors are fatal.

use thiserror::Error;

/// Result type alias for zonesync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the reconciliation engine
#[derive(Error, Debug)]
pub enum Error {
    /// Public IP resolution failed (echo service unreachable or malformed body)
    #[error("public IP resolution failed: {0}")]
    Resolve(String),

    /// Record lookup failed (provider unreachable, malformed body, or
    /// body-level failure on the list call)
    #[error("record lookup failed: {0}")]
    Lookup(String),

    /// Record create/update failed (provider unreachable, malformed body,
    /// or body-level failure indicator)
    #[error("record mutation failed: {0}")]
    Mutation(String),

    /// Configuration errors (fatal at startup)
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider-specific error with provider context
    #[error("provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a public IP resolution error
    pub fn resolve(msg: impl Into<String>) -> Self {
        Self::Resolve(msg.into())
    }

    /// Create a record lookup error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a record mutation error
    pub fn mutation(msg: impl Into<String>) -> Self {
        Self::Mutation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
