//! # Constellation Selection
//!
//! Experiment selection engine for the Constellation life-domain tracker.
//!
//! Given a snapshot of a user's stars, the typed relationships between them,
//! and the user's capacity signals, the engine produces a ranked,
//! constraint-satisfying list of experiments to surface next.
//!
//! ## Priority Formula
//!
//! ```text
//! priority = clamp(U × 0.40 + C × 0.35 + S × 0.25 + R, 0, 1)
//! ```
//!
//! Where:
//! - U: urgency of the star (state, trajectory, relationships, neglect)
//! - C: capacity fit of the user for the chosen difficulty
//! - S: success probability of the experiment
//! - R: net relationship bonus (growth, resonance, causation, shadow − tension)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  ExperimentSelector                     │
//! │   sort by priority → block → per-star / category caps   │
//! └──────────────────────────┬──────────────────────────────┘
//!                            │
//! ┌──────────────────────────┴──────────────────────────────┐
//! │                  CandidateGenerator                     │
//! │        difficulty table → template → sub-scores         │
//! └───┬──────────────┬──────────────┬──────────────┬────────┘
//!     │              │              │              │
//! ┌───┴─────┐  ┌─────┴────┐  ┌──────┴────┐  ┌──────┴───────┐
//! │ Urgency │  │ Capacity │  │  Success  │  │ Relationship │
//! │  Model  │  │  Model   │  │   Model   │  │ Bonus Engine │
//! └─────────┘  └──────────┘  └───────────┘  └──────────────┘
//! ```
//!
//! The engine is a pure function of an immutable [`SelectionContext`]; it
//! performs no I/O and never mutates its input.

use constellation_common::ConfigError;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod context;
pub mod graph;
pub mod infra;
pub mod scenarios;
pub mod scoring;
pub mod selection;
pub mod state;
pub mod telemetry;

// Re-export core types
pub use context::{LocalClock, SelectionContext, Snapshot};
pub use graph::bonus::{RelationshipBonus, RelationshipBonusEngine};
pub use infra::provider::{InMemorySnapshotProvider, SnapshotProvider};
pub use infra::service::SelectionService;
pub use selection::generator::CandidateGenerator;
pub use selection::selector::{CapReason, CapRejection, ExperimentSelector, SelectionReport};
pub use state::{BrightnessBucket, StarState};
pub use telemetry::SelectionMetrics;

/// Maximum experiments a user can have in flight
pub const DEFAULT_MAX_ACTIVE: u32 = 3;

/// Maximum admitted experiments per star
pub const DEFAULT_MAX_PER_STAR: usize = 2;

/// Maximum admitted experiments per category
pub const DEFAULT_MAX_PER_CATEGORY: usize = 3;

/// Weights of the priority composite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub urgency: f64,
    pub capacity: f64,
    pub success: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            urgency: 0.40,
            capacity: 0.35,
            success: 0.25,
        }
    }
}

impl PriorityWeights {
    pub fn new(urgency: f64, capacity: f64, success: f64) -> Self {
        Self {
            urgency,
            capacity,
            success,
        }
    }
}

/// Weights of the capacity fit; must sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityWeights {
    pub energy: f64,
    pub time: f64,
    pub historical: f64,
    pub load: f64,
}

impl Default for CapacityWeights {
    fn default() -> Self {
        Self {
            energy: 0.30,
            time: 0.25,
            historical: 0.20,
            load: 0.25,
        }
    }
}

impl CapacityWeights {
    pub fn sum(&self) -> f64 {
        self.energy + self.time + self.historical + self.load
    }
}

/// Selection configuration
///
/// Passed explicitly into the selector so concurrent per-user evaluations
/// never observe each other's overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Priority composite weights
    pub priority: PriorityWeights,
    /// Capacity fit weights
    pub capacity: CapacityWeights,
    /// Admission ceiling on in-flight experiments
    pub max_active: u32,
    /// Diversity cap per star
    pub max_per_star: usize,
    /// Diversity cap per category
    pub max_per_category: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            priority: PriorityWeights::default(),
            capacity: CapacityWeights::default(),
            max_active: DEFAULT_MAX_ACTIVE,
            max_per_star: DEFAULT_MAX_PER_STAR,
            max_per_category: DEFAULT_MAX_PER_CATEGORY,
        }
    }
}

impl SelectionConfig {
    /// Replace the priority weights
    pub fn with_priority(mut self, priority: PriorityWeights) -> Self {
        self.priority = priority;
        self
    }

    /// Check weights and caps
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("priority.urgency", self.priority.urgency),
            ("priority.capacity", self.priority.capacity),
            ("priority.success", self.priority.success),
            ("capacity.energy", self.capacity.energy),
            ("capacity.time", self.capacity.time),
            ("capacity.historical", self.capacity.historical),
            ("capacity.load", self.capacity.load),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }

        let sum = self.capacity.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::CapacityWeightSum(sum));
        }

        if self.max_active == 0 {
            return Err(ConfigError::ZeroAdmissionCap);
        }

        Ok(())
    }

    /// Slots left for new experiments given the current in-flight count
    pub fn admission_capacity(&self, active_count: u32) -> usize {
        self.max_active.saturating_sub(active_count) as usize
    }
}
