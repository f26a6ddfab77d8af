//! Layered error definitions
//!
//! Categorized by source: config / registry / store / payload / delivery

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Registry / Store Errors =====
    /// The destination registry could not be read.
    ///
    /// Dispatch treats this as unknown state and aborts without sending.
    #[error("destination registry unavailable: {message}")]
    RegistryUnavailable { message: String },

    /// The record store could not be read or written
    #[error("record store unavailable: {message}")]
    StoreUnavailable { message: String },

    // ===== Payload Errors =====
    /// Incoming payload could not be decoded
    #[error("payload decode error: {message}")]
    PayloadDecode { message: String },

    // ===== Delivery Errors =====
    /// Outbound request failed or the collector rejected it
    #[error("delivery to '{destination}' failed: {message}")]
    Delivery {
        destination: String,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create registry unavailable error
    pub fn registry_unavailable(message: impl Into<String>) -> Self {
        Self::RegistryUnavailable {
            message: message.into(),
        }
    }

    /// Create store unavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Create payload decode error
    pub fn payload_decode(message: impl Into<String>) -> Self {
        Self::PayloadDecode {
            message: message.into(),
        }
    }

    /// Create delivery error
    pub fn delivery(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            destination: destination.into(),
            message: message.into(),
        }
    }
}
