//! Shared error types for the library

use thiserror::Error;

/// Main error type for pavemap operations
///
/// Data-quality problems (missing measurements, unknown categories in a
/// filter) are not errors; they degrade to "no class" or "no constraint".
/// The variants here cover configuration faults and contract violations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors found while building a model
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A KPI key with no definition in the catalog
    #[error("Unknown KPI: {0}")]
    UnknownKpi(String),

    /// A continuous KPI with no boundaries for the requested year
    #[error("No thresholds configured for KPI '{kpi}' (year {year})")]
    MissingThresholds { kpi: String, year: u16 },

    /// Chart selection set is full
    #[error("Selection limit reached: at most {capacity} chart selections are allowed")]
    SelectionLimit { capacity: usize },

    /// Input data that cannot be interpreted as records
    #[error("Invalid record data: {0}")]
    InvalidRecords(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    /// Whether the error indicates a broken contract rather than bad input.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::UnknownKpi(_) | Self::MissingThresholds { .. })
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
