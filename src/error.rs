//! Error types for storage onboarding
//!
//! Provides structured error types for the inventory adapters, the settings
//! registry, the eligibility resolver and the REST API.

use thiserror::Error;

/// Unified error type for onboarding
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Inventory Errors
    // =========================================================================
    #[error("Inventory query failed: {service} - {operation}: {reason}")]
    InventoryQuery {
        service: String,
        operation: String,
        reason: String,
    },

    #[error("Inventory query returned HTTP {status}: {service} - {operation}")]
    InventoryStatus {
        service: String,
        operation: String,
        status: u16,
    },

    // =========================================================================
    // Settings Registry Errors
    // =========================================================================
    #[error("Settings unavailable for module {module}: {reason}")]
    Settings { module: String, reason: String },

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    // =========================================================================
    // API Errors
    // =========================================================================
    #[error("API request validation failed: {0}")]
    ApiValidation(String),

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // =========================================================================
    // Metrics Errors
    // =========================================================================
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error is transient.
    ///
    /// Nothing in this crate retries; callers use this to decide whether a
    /// second attempt is worthwhile.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::InventoryStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Check if this error was caused by an upstream collaborator
    /// (inventory proxy or settings registry) rather than local state
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::InventoryQuery { .. }
                | Error::InventoryStatus { .. }
                | Error::Settings { .. }
                | Error::Http(_)
        )
    }
}

/// Result type alias for onboarding
pub type Result<T> = std::result::Result<T, Error>;
