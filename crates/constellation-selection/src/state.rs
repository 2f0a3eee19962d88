//! Star state classification
//!
//! State is derived from brightness, trajectory and the external lifecycle
//! tag on every call. It is never stored, so it cannot drift from the
//! snapshot it was computed from.

use constellation_common::{Difficulty, Star, StarLifecycle, STRUGGLING_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trajectory delta below which a star counts as declining
pub const DECLINE_THRESHOLD: f64 = -0.02;

/// Upper brightness bound of the dim band
pub const DIM_CEILING: f64 = 0.5;

/// Brightness from which a star counts as thriving
pub const THRIVING_FLOOR: f64 = 0.7;

/// Trajectory-qualified star state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StarState {
    Flickering,
    DarkGrowing,
    DarkStable,
    DimDeclining,
    BrightDeclining,
    DimStable,
    BrightStable,
    Dormant,
}

impl StarState {
    /// Classify a star
    ///
    /// Stars with fewer than three brightness samples collapse to the stable
    /// variant of their band.
    pub fn classify(star: &Star) -> Self {
        match star.lifecycle {
            StarLifecycle::Dormant => return StarState::Dormant,
            StarLifecycle::Flickering => return StarState::Flickering,
            StarLifecycle::Active => {}
        }

        let declining = star
            .trajectory_delta()
            .map(|delta| delta < DECLINE_THRESHOLD)
            .unwrap_or(false);

        if star.brightness < STRUGGLING_THRESHOLD {
            if star.is_struggling && declining {
                StarState::DarkGrowing
            } else {
                StarState::DarkStable
            }
        } else if star.brightness < DIM_CEILING {
            if declining {
                StarState::DimDeclining
            } else {
                StarState::DimStable
            }
        } else if star.brightness < THRIVING_FLOOR {
            if declining {
                StarState::BrightDeclining
            } else {
                StarState::DimStable
            }
        } else if declining {
            StarState::BrightDeclining
        } else {
            StarState::BrightStable
        }
    }

    /// Base urgency before modifiers
    pub fn base_urgency(&self) -> f64 {
        match self {
            StarState::Flickering => 0.90,
            StarState::DarkGrowing => 0.85,
            StarState::DarkStable => 0.75,
            StarState::DimDeclining => 0.70,
            StarState::BrightDeclining => 0.65,
            StarState::DimStable => 0.50,
            StarState::BrightStable => 0.20,
            StarState::Dormant => 0.10,
        }
    }

    /// Difficulty suggested before capacity overrides
    pub fn default_difficulty(&self) -> Difficulty {
        match self {
            StarState::Flickering
            | StarState::DarkGrowing
            | StarState::DarkStable
            | StarState::Dormant => Difficulty::Tiny,
            StarState::DimDeclining | StarState::DimStable | StarState::BrightDeclining => {
                Difficulty::Small
            }
            StarState::BrightStable => Difficulty::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StarState::Flickering => "flickering",
            StarState::DarkGrowing => "dark-growing",
            StarState::DarkStable => "dark-stable",
            StarState::DimDeclining => "dim-declining",
            StarState::BrightDeclining => "bright-declining",
            StarState::DimStable => "dim-stable",
            StarState::BrightStable => "bright-stable",
            StarState::Dormant => "dormant",
        }
    }
}

impl fmt::Display for StarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse brightness bucket used by the success model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessBucket {
    Struggling,
    Dim,
    Ok,
    Thriving,
}

impl BrightnessBucket {
    pub fn of(brightness: f64) -> Self {
        if brightness < STRUGGLING_THRESHOLD {
            BrightnessBucket::Struggling
        } else if brightness < DIM_CEILING {
            BrightnessBucket::Dim
        } else if brightness < THRIVING_FLOOR {
            BrightnessBucket::Ok
        } else {
            BrightnessBucket::Thriving
        }
    }

    /// Multiplier applied to the success probability
    pub fn success_modifier(&self) -> f64 {
        match self {
            BrightnessBucket::Struggling => 0.70,
            BrightnessBucket::Dim => 1.00,
            BrightnessBucket::Ok => 1.00,
            BrightnessBucket::Thriving => 1.10,
        }
    }
}

/// Success multiplier for a star, honouring its lifecycle tag
pub fn star_success_modifier(star: &Star) -> f64 {
    match star.lifecycle {
        StarLifecycle::Flickering => 0.85,
        StarLifecycle::Dormant => 0.90,
        StarLifecycle::Active => BrightnessBucket::of(star.brightness).success_modifier(),
    }
}
