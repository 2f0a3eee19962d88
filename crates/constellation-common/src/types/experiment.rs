//! Experiment - a scored candidate action targeting one star
//!
//! Experiments are created fresh on every selection run and are never
//! persisted by the engine. Each one carries its sub-scores so a caller can
//! render or log the ranking without recomputation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::star::StarId;

/// Difficulty tier of an experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    /// Half a minute, the floor under any stress level
    Tiny,
    /// Around five minutes
    Small,
    /// Around twenty minutes
    Medium,
    /// Three quarters of an hour or more
    Stretch,
}

impl Difficulty {
    /// Minutes the tier usually takes
    pub fn required_minutes(&self) -> f64 {
        match self {
            Difficulty::Tiny => 0.5,
            Difficulty::Small => 5.0,
            Difficulty::Medium => 20.0,
            Difficulty::Stretch => 45.0,
        }
    }

    /// Multiplier applied to the success probability
    pub fn success_modifier(&self) -> f64 {
        match self {
            Difficulty::Tiny => 1.10,
            Difficulty::Small => 1.00,
            Difficulty::Medium => 0.85,
            Difficulty::Stretch => 0.60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Tiny => "tiny",
            Difficulty::Small => "small",
            Difficulty::Medium => "medium",
            Difficulty::Stretch => "stretch",
        }
    }

    /// Template id for a category at this tier, e.g. `health-tiny`
    pub fn template_id(&self, category: &str) -> String {
        format!("{}-{}", category.to_lowercase(), self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four sub-scores behind a priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Urgency (0.0 - 1.0)
    pub urgency: f64,
    /// Capacity fit (0.0 - 1.0)
    pub capacity: f64,
    /// Success probability (0.05 - 0.95)
    pub success_probability: f64,
    /// Net relationship bonus, bonuses minus the tension penalty
    pub relationship_bonus: f64,
}

/// A scored, proposed action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub star_id: StarId,
    pub star_name: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub template_id: String,
    pub scores: ScoreBreakdown,
    /// Clamped weighted composite (0.0 - 1.0)
    pub priority: f64,
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) priority={:.3} [u={:.3} c={:.3} s={:.3} r={:+.3}]",
            self.star_name,
            self.category,
            self.difficulty,
            self.priority,
            self.scores.urgency,
            self.scores.capacity,
            self.scores.success_probability,
            self.scores.relationship_bonus,
        )
    }
}

/// An action already in flight for the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveExperiment {
    pub star_id: StarId,
    pub difficulty: Difficulty,
}

impl ActiveExperiment {
    pub fn new(star_id: impl Into<StarId>, difficulty: Difficulty) -> Self {
        Self {
            star_id: star_id.into(),
            difficulty,
        }
    }
}
