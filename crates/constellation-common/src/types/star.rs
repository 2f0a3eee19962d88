//! Star - a tracked life domain
//!
//! Stars are owned by the brightness/decay subsystem. The selection engine
//! only ever sees a read-only snapshot of them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of samples needed before a trajectory can be inferred
pub const TRAJECTORY_WINDOW: usize = 3;

/// Stable identifier of a star
///
/// Ordering is lexicographic and is used as the deterministic tie-break
/// between equal-priority candidates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StarId(String);

impl StarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for StarId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for StarId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Lifecycle tag assigned by the constellation-state subsystem
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarLifecycle {
    /// Regular star, classified from brightness and trajectory
    #[default]
    Active,
    /// Brightness is oscillating and has not settled yet
    Flickering,
    /// Star has been inactive past its dormancy threshold
    Dormant,
}

/// A tracked life domain with a brightness trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    /// Unique identifier
    pub id: StarId,
    /// Display name
    pub name: String,
    /// Category / domain tag (health, wealth, purpose, ...)
    pub category: String,
    /// Current brightness, conceptually 0.05 - 1.0
    pub brightness: f64,
    /// Short trailing history of brightness samples, oldest first
    #[serde(default)]
    pub brightness_history: Vec<f64>,
    /// Days since the last completed action on this star
    #[serde(default)]
    pub days_since_action: u32,
    /// Dark-candidate flag from the decay subsystem
    #[serde(default)]
    pub is_struggling: bool,
    /// Whether an action on this star is already in flight
    #[serde(default)]
    pub has_active_action: bool,
    /// Externally assigned lifecycle tag
    #[serde(default)]
    pub lifecycle: StarLifecycle,
}

impl Star {
    /// Create a star with a flat default brightness of 0.3
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: StarId::new(id),
            name: name.into(),
            category: category.into(),
            brightness: 0.3,
            brightness_history: Vec::new(),
            days_since_action: 0,
            is_struggling: false,
            has_active_action: false,
            lifecycle: StarLifecycle::Active,
        }
    }

    pub fn with_brightness(mut self, brightness: f64) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn with_history(mut self, history: impl Into<Vec<f64>>) -> Self {
        self.brightness_history = history.into();
        self
    }

    pub fn with_days_since_action(mut self, days: u32) -> Self {
        self.days_since_action = days;
        self
    }

    pub fn struggling(mut self) -> Self {
        self.is_struggling = true;
        self
    }

    pub fn with_active_action(mut self) -> Self {
        self.has_active_action = true;
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: StarLifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Change between the latest sample and the one two steps back.
    ///
    /// `None` until the history holds at least three samples.
    pub fn trajectory_delta(&self) -> Option<f64> {
        let len = self.brightness_history.len();
        if len < TRAJECTORY_WINDOW {
            return None;
        }
        Some(self.brightness_history[len - 1] - self.brightness_history[len - TRAJECTORY_WINDOW])
    }

    /// Brightness at or below the struggling threshold
    #[inline]
    pub fn is_below_struggling_threshold(&self) -> bool {
        self.brightness <= crate::STRUGGLING_THRESHOLD
    }

    /// Brightness above the thriving-source threshold
    #[inline]
    pub fn is_thriving_source(&self) -> bool {
        self.brightness > crate::THRIVING_SOURCE_THRESHOLD
    }
}
