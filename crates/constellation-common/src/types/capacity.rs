//! User capacity profile - stress, load and completion history
//!
//! Read-only input to the capacity and success-probability models.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Completion rate assumed for a weekday with no history
pub const DEFAULT_WEEKDAY_RATE: f64 = 0.5;

/// Current stress level of the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StressLevel {
    #[default]
    Low,
    Medium,
    High,
    Crisis,
}

impl StressLevel {
    /// Base energy available at this stress level
    pub fn energy(&self) -> f64 {
        match self {
            StressLevel::Low => 1.0,
            StressLevel::Medium => 0.7,
            StressLevel::High => 0.4,
            StressLevel::Crisis => 0.15,
        }
    }

    /// Additive penalty subtracted from the capacity score
    pub fn penalty(&self) -> f64 {
        match self {
            StressLevel::Low => 0.0,
            StressLevel::Medium => 0.05,
            StressLevel::High => 0.15,
            StressLevel::Crisis => 0.35,
        }
    }
}

/// Hour-of-day window `[start_hour, end_hour)`; wraps past midnight when
/// `start_hour > end_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl TimeWindow {
    pub const fn new(start_hour: u32, end_hour: u32) -> Self {
        Self { start_hour, end_hour }
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            self.start_hour <= hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

fn default_preferred_windows() -> Vec<TimeWindow> {
    vec![TimeWindow::new(6, 9), TimeWindow::new(12, 14), TimeWindow::new(18, 21)]
}

fn default_avoided_windows() -> Vec<TimeWindow> {
    vec![TimeWindow::new(22, 6)]
}

fn default_completion_rate() -> f64 {
    0.5
}

fn default_available_minutes() -> u32 {
    60
}

/// Capacity signals for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCapacityProfile {
    /// Current stress level
    #[serde(default)]
    pub stress: StressLevel,
    /// Actions currently in flight
    #[serde(default)]
    pub active_count: u32,
    /// Overall historical completion rate (0.0 - 1.0)
    #[serde(default = "default_completion_rate")]
    pub completion_rate: f64,
    /// Completion rate per weekday
    #[serde(default)]
    pub weekday_success: HashMap<Weekday, f64>,
    /// Hours the user tends to follow through
    #[serde(default = "default_preferred_windows")]
    pub preferred_windows: Vec<TimeWindow>,
    /// Hours the user tends to drop actions
    #[serde(default = "default_avoided_windows")]
    pub avoided_windows: Vec<TimeWindow>,
    /// Minutes available this cycle
    #[serde(default = "default_available_minutes")]
    pub available_minutes: u32,
    /// Success rate per template id
    #[serde(default)]
    pub template_success: HashMap<String, f64>,
    /// Last completion of each template
    #[serde(default)]
    pub template_last_completed: HashMap<String, DateTime<Utc>>,
    /// Offset of the user's local time from UTC
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for UserCapacityProfile {
    fn default() -> Self {
        Self {
            stress: StressLevel::Low,
            active_count: 0,
            completion_rate: default_completion_rate(),
            weekday_success: HashMap::new(),
            preferred_windows: default_preferred_windows(),
            avoided_windows: default_avoided_windows(),
            available_minutes: default_available_minutes(),
            template_success: HashMap::new(),
            template_last_completed: HashMap::new(),
            utc_offset_minutes: 0,
        }
    }
}

impl UserCapacityProfile {
    pub fn with_stress(mut self, stress: StressLevel) -> Self {
        self.stress = stress;
        self
    }

    pub fn with_active_count(mut self, count: u32) -> Self {
        self.active_count = count;
        self
    }

    pub fn with_completion_rate(mut self, rate: f64) -> Self {
        self.completion_rate = rate;
        self
    }

    pub fn with_available_minutes(mut self, minutes: u32) -> Self {
        self.available_minutes = minutes;
        self
    }

    pub fn with_template_success(mut self, template_id: impl Into<String>, rate: f64) -> Self {
        self.template_success.insert(template_id.into(), rate);
        self
    }

    /// Completion rate on `day`, defaulting to 0.5
    pub fn weekday_rate(&self, day: Weekday) -> f64 {
        self.weekday_success
            .get(&day)
            .copied()
            .unwrap_or(DEFAULT_WEEKDAY_RATE)
    }

    /// Success rate for a template, if any history exists
    pub fn template_rate(&self, template_id: &str) -> Option<f64> {
        self.template_success.get(template_id).copied()
    }

    pub fn in_preferred_window(&self, hour: u32) -> bool {
        self.preferred_windows.iter().any(|w| w.contains(hour))
    }

    pub fn in_avoided_window(&self, hour: u32) -> bool {
        self.avoided_windows.iter().any(|w| w.contains(hour))
    }

    /// Whole days since the template was last completed
    pub fn days_since_template(&self, template_id: &str, now: DateTime<Utc>) -> Option<i64> {
        self.template_last_completed
            .get(template_id)
            .map(|completed| (now - *completed).num_days().max(0))
    }
}
