//! Error types for the Constellation engine
//!
//! Scoring itself never fails: missing data resolves to documented defaults
//! and blocking is a filtering outcome. Errors only arise at the boundary,
//! when a snapshot or a configuration is rejected.

use thiserror::Error;

/// Result type alias using ConstellationError
pub type Result<T> = std::result::Result<T, ConstellationError>;

/// Unified error type for Constellation operations
#[derive(Debug, Error)]
pub enum ConstellationError {
    // Input-contract violations in a snapshot
    #[error("Snapshot rejected: {0}")]
    Snapshot(#[from] SnapshotError),

    // Invalid weights or caps
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Snapshot provider failures
    #[error("Provider error: {0}")]
    Provider(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Snapshot validation errors
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("Duplicate star id: {0}")]
    DuplicateStar(String),

    #[error("Invalid brightness for star {star_id}: {value}")]
    InvalidBrightness { star_id: String, value: f64 },

    #[error("Invalid brightness history sample for star {star_id}: {value}")]
    InvalidHistorySample { star_id: String, value: f64 },

    #[error("Relationship references unknown star: {0}")]
    UnknownEndpoint(String),

    #[error("Relationship is a self-loop on star {0}")]
    SelfLoop(String),

    #[error("Relationship strength out of range [0, 1]: {0}")]
    InvalidStrength(f64),

    #[error("Rate {name} out of range [0, 1]: {value}")]
    InvalidRate { name: String, value: f64 },

    #[error("Invalid time window: {start_hour}h - {end_hour}h")]
    InvalidTimeWindow { start_hour: u32, end_hour: u32 },

    #[error("Invalid UTC offset: {0} minutes")]
    InvalidUtcOffset(i32),

    #[error("In-flight experiment references unknown star: {0}")]
    UnknownActiveStar(String),
}

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Weight {name} must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("Capacity weights must sum to 1.0, got {0}")]
    CapacityWeightSum(f64),

    #[error("Admission cap must be at least 1")]
    ZeroAdmissionCap,

    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl From<serde_json::Error> for ConstellationError {
    fn from(err: serde_json::Error) -> Self {
        ConstellationError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConstellationError::Snapshot(SnapshotError::UnknownEndpoint("soul".to_string()));
        assert!(err.to_string().contains("soul"));
    }

    #[test]
    fn test_config_error() {
        let err = ConfigError::CapacityWeightSum(0.9);
        assert!(err.to_string().contains("0.9"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: ConstellationError = parse.unwrap_err().into();
        assert!(matches!(err, ConstellationError::Serialization(_)));
    }
}
