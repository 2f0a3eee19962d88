//! # Constellation Common
//!
//! Shared types, errors, and numeric primitives for the Constellation
//! experiment selection engine.
//!
//! ## Core Types
//!
//! - [`Star`]: a tracked life domain with a brightness trajectory
//! - [`Relationship`]: a typed, directed, weighted edge between two stars
//! - [`UserCapacityProfile`]: stress, load, and completion history of a user
//! - [`Experiment`]: a scored candidate action targeting one star
//!
//! ## Metrics
//!
//! - [`metrics`]: clamp, ratio-with-default, interpolation and weighted sums
//!   used by every scoring formula

pub mod error;
pub mod metrics;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ConfigError, ConstellationError, Result, SnapshotError};
pub use types::{
    capacity::{StressLevel, TimeWindow, UserCapacityProfile},
    experiment::{ActiveExperiment, Difficulty, Experiment, ScoreBreakdown},
    relationship::{Relationship, RelationshipKind},
    star::{Star, StarId, StarLifecycle},
};

/// Constellation version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Brightness at or below which a star counts as struggling
pub const STRUGGLING_THRESHOLD: f64 = 0.25;

/// Brightness above which a relationship source counts as thriving
pub const THRIVING_SOURCE_THRESHOLD: f64 = 0.6;
