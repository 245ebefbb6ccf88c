//! Error types for the tdns system
//!
//! Every failure in a reconciliation pass is fatal to that pass. The variants
//! follow the failure classes a pass can hit: configuration, transport,
//! protocol (HTTP status) and decoding.

use thiserror::Error;

/// Result type alias for tdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the tdns system
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (including malformed instance URLs)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request construction or network failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status from a Traefik instance
    #[error("Unexpected HTTP status from {instance}: {status}")]
    Status {
        /// Display name of the instance
        instance: String,
        /// HTTP status code returned
        status: u16,
    },

    /// Unreadable body or invalid router JSON
    #[error("Decode error: {0}")]
    Decode(String),

    /// Public address lookup failures
    #[error("Address source error: {0}")]
    AddressSource(String),

}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a status error for an instance
    pub fn status(instance: impl Into<String>, status: u16) -> Self {
        Self::Status {
            instance: instance.into(),
            status,
        }
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an address source error
    pub fn address_source(msg: impl Into<String>) -> Self {
        Self::AddressSource(msg.into())
    }

    /// Whether this error stems from configuration rather than the environment
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = Error::status("edge", 503);
        assert_eq!(err.to_string(), "Unexpected HTTP status from edge: 503");
        assert!(!err.is_config());
    }

    #[test]
    fn test_only_config_errors_are_config() {
        assert!(Error::config("no instances").is_config());
        assert!(!Error::transport("connection refused").is_config());
        assert!(!Error::decode("expected an array").is_config());
        assert!(!Error::address_source("no IPv6 answer").is_config());
    }
}
