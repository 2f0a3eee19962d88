//! Capacity model
//!
//! ```text
//! capacity = clamp(E·wE + T·wT + H·wH + L·wL − penalty(stress), 0, 1)
//! ```
//!
//! - E: energy from stress, time-of-day window and weekday history
//! - T: fit between available minutes and the difficulty's duration
//! - H: historical success with the template
//! - L: headroom left under the admission ceiling

use constellation_common::metrics::{clamp, clamp_unit, ratio_or, weighted_sum};
use constellation_common::{Difficulty, StressLevel, UserCapacityProfile};

use crate::context::LocalClock;
use crate::CapacityWeights;

/// Template success assumed when there is no history
pub const DEFAULT_TEMPLATE_SUCCESS: f64 = 0.5;

pub struct CapacityModel;

impl CapacityModel {
    /// Capacity fit (0.0 - 1.0)
    pub fn capacity(
        profile: &UserCapacityProfile,
        difficulty: Difficulty,
        template_id: &str,
        clock: LocalClock,
        weights: &CapacityWeights,
    ) -> f64 {
        let weighted = weighted_sum(&[
            (Self::energy(profile, clock), weights.energy),
            (Self::time_fit(profile.available_minutes, difficulty), weights.time),
            (Self::historical_fit(profile, template_id), weights.historical),
            (Self::load_headroom(profile.active_count), weights.load),
        ]);

        clamp_unit(weighted - profile.stress.penalty())
    }

    /// Estimated energy of the user right now
    pub fn energy(profile: &UserCapacityProfile, clock: LocalClock) -> f64 {
        let mut energy = profile.stress.energy();

        if profile.in_preferred_window(clock.hour) {
            energy *= 1.1;
        } else if profile.in_avoided_window(clock.hour) {
            energy *= 0.7;
        }

        // No adjustment when the overall rate is zero
        let day_modifier = if profile.completion_rate > 0.0 {
            clamp(
                ratio_or(profile.weekday_rate(clock.weekday), profile.completion_rate, 1.0),
                0.7,
                1.3,
            )
        } else {
            1.0
        };

        clamp_unit(energy * day_modifier)
    }

    /// How well the difficulty fits the available minutes
    pub fn time_fit(available_minutes: u32, difficulty: Difficulty) -> f64 {
        let available = f64::from(available_minutes);
        let required = difficulty.required_minutes();

        if available >= required * 2.0 {
            1.0
        } else if available >= required * 1.5 {
            0.85
        } else if available >= required {
            0.6
        } else {
            0.2
        }
    }

    /// Success rate with this template, 0.5 without history
    pub fn historical_fit(profile: &UserCapacityProfile, template_id: &str) -> f64 {
        profile
            .template_rate(template_id)
            .unwrap_or(DEFAULT_TEMPLATE_SUCCESS)
    }

    /// Headroom under the admission ceiling
    pub fn load_headroom(active_count: u32) -> f64 {
        match active_count {
            0 => 1.0,
            1 => 0.75,
            2 => 0.45,
            _ => 0.0,
        }
    }

    /// Cheap stand-in for capacity used before a difficulty is known
    pub fn proxy(stress: StressLevel, active_count: u32, weights: &CapacityWeights) -> f64 {
        stress.energy() * weights.energy + Self::load_headroom(active_count) * weights.load
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn clock(hour: u32) -> LocalClock {
        LocalClock {
            hour,
            weekday: Weekday::Tue,
        }
    }

    #[test]
    fn test_energy_windows() {
        let profile = UserCapacityProfile::default();
        // Neutral hour, weekday rate 0.5 / overall 0.5
        assert!((CapacityModel::energy(&profile, clock(10)) - 1.0).abs() < 1e-9);
        // Preferred window is capped at 1.0
        assert_eq!(CapacityModel::energy(&profile, clock(7)), 1.0);
        // Avoided window
        assert!((CapacityModel::energy(&profile, clock(23)) - 0.7).abs() < 1e-9);

        let stressed = profile.with_stress(StressLevel::High);
        assert!((CapacityModel::energy(&stressed, clock(7)) - 0.44).abs() < 1e-9);
    }

    #[test]
    fn test_energy_weekday_ratio() {
        let mut profile = UserCapacityProfile::default()
            .with_stress(StressLevel::Medium)
            .with_completion_rate(0.4);
        profile.weekday_success.insert(Weekday::Tue, 0.8);
        // ratio 2.0 clamped to 1.3: 0.7 × 1.3
        assert!((CapacityModel::energy(&profile, clock(10)) - 0.91).abs() < 1e-9);
    }

    #[test]
    fn test_energy_zero_completion_rate() {
        let profile = UserCapacityProfile::default()
            .with_stress(StressLevel::High)
            .with_completion_rate(0.0);
        assert!((CapacityModel::energy(&profile, clock(10)) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_time_fit_bands() {
        assert_eq!(CapacityModel::time_fit(60, Difficulty::Medium), 1.0);
        assert_eq!(CapacityModel::time_fit(30, Difficulty::Medium), 0.85);
        assert_eq!(CapacityModel::time_fit(20, Difficulty::Medium), 0.6);
        assert_eq!(CapacityModel::time_fit(10, Difficulty::Medium), 0.2);
        assert_eq!(CapacityModel::time_fit(1, Difficulty::Tiny), 1.0);
        assert_eq!(CapacityModel::time_fit(0, Difficulty::Tiny), 0.2);
    }

    #[test]
    fn test_load_headroom() {
        assert_eq!(CapacityModel::load_headroom(0), 1.0);
        assert_eq!(CapacityModel::load_headroom(1), 0.75);
        assert_eq!(CapacityModel::load_headroom(2), 0.45);
        assert_eq!(CapacityModel::load_headroom(3), 0.0);
        assert_eq!(CapacityModel::load_headroom(9), 0.0);
    }

    #[test]
    fn test_capacity_new_user() {
        // E=1.0, T=1.0, H=0.5, L=1.0 → 0.30 + 0.25 + 0.10 + 0.25
        let profile = UserCapacityProfile::default();
        let capacity = CapacityModel::capacity(
            &profile,
            Difficulty::Small,
            "health-small",
            clock(10),
            &CapacityWeights::default(),
        );
        assert!((capacity - 0.90).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_crisis_penalty() {
        let profile = UserCapacityProfile::default()
            .with_stress(StressLevel::Crisis)
            .with_completion_rate(0.6)
            .with_available_minutes(10);
        // E = 0.15 × (0.5 / 0.6) = 0.125, T = 1.0, H = 0.5, L = 1.0
        let expected = 0.125 * 0.30 + 0.25 + 0.10 + 0.25 - 0.35;
        let capacity = CapacityModel::capacity(
            &profile,
            Difficulty::Tiny,
            "health-tiny",
            clock(10),
            &CapacityWeights::default(),
        );
        assert!((capacity - expected).abs() < 1e-9);
    }

    #[test]
    fn test_proxy() {
        let weights = CapacityWeights::default();
        assert!((CapacityModel::proxy(StressLevel::Low, 0, &weights) - 0.55).abs() < 1e-9);
        assert!((CapacityModel::proxy(StressLevel::High, 1, &weights) - 0.3075).abs() < 1e-9);
        assert!(CapacityModel::proxy(StressLevel::Medium, 3, &weights) < 0.3);
    }
}
