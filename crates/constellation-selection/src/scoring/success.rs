//! Success probability model
//!
//! ```text
//! prob = clamp(base × difficulty × template × star × recency, 0.05, 0.95)
//! ```

use chrono::{DateTime, Utc};
use constellation_common::metrics::{clamp, product};
use constellation_common::{Difficulty, Star, UserCapacityProfile};

use crate::state::star_success_modifier;

/// Bounds applied to the overall completion rate before use
pub const BASE_RATE_MIN: f64 = 0.2;
pub const BASE_RATE_MAX: f64 = 0.95;

/// Bounds of the final probability
pub const PROBABILITY_MIN: f64 = 0.05;
pub const PROBABILITY_MAX: f64 = 0.95;

/// Recency multiplier when the template was never completed
pub const UNKNOWN_RECENCY: f64 = 0.95;

pub struct SuccessModel;

impl SuccessModel {
    /// Estimated completion likelihood of an experiment
    pub fn probability(
        profile: &UserCapacityProfile,
        star: &Star,
        difficulty: Difficulty,
        template_id: &str,
        now: DateTime<Utc>,
    ) -> f64 {
        let base = clamp(profile.completion_rate, BASE_RATE_MIN, BASE_RATE_MAX);

        let probability = product(&[
            base,
            difficulty.success_modifier(),
            Self::template_modifier(profile, template_id),
            star_success_modifier(star),
            Self::recency_modifier(profile.days_since_template(template_id, now)),
        ]);

        clamp(probability, PROBABILITY_MIN, PROBABILITY_MAX)
    }

    /// Scale by template history, neutral without it
    pub fn template_modifier(profile: &UserCapacityProfile, template_id: &str) -> f64 {
        match profile.template_rate(template_id) {
            Some(rate) => clamp(rate * 1.2, 0.5, 1.3),
            None => 1.0,
        }
    }

    /// Momentum from a recent completion of the same template
    pub fn recency_modifier(days_since_similar: Option<i64>) -> f64 {
        match days_since_similar {
            None => UNKNOWN_RECENCY,
            Some(days) if days <= 1 => 1.2,
            Some(days) if days <= 3 => 1.1,
            Some(days) if days <= 7 => 1.0,
            Some(_) => 0.9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use constellation_common::StarLifecycle;

    #[test]
    fn test_recency_bands() {
        assert_eq!(SuccessModel::recency_modifier(None), 0.95);
        assert_eq!(SuccessModel::recency_modifier(Some(0)), 1.2);
        assert_eq!(SuccessModel::recency_modifier(Some(1)), 1.2);
        assert_eq!(SuccessModel::recency_modifier(Some(3)), 1.1);
        assert_eq!(SuccessModel::recency_modifier(Some(7)), 1.0);
        assert_eq!(SuccessModel::recency_modifier(Some(8)), 0.9);
    }

    #[test]
    fn test_template_modifier() {
        let profile = UserCapacityProfile::default()
            .with_template_success("health-tiny", 0.9)
            .with_template_success("soul-small", 0.2);
        assert_eq!(SuccessModel::template_modifier(&profile, "wealth-tiny"), 1.0);
        assert!((SuccessModel::template_modifier(&profile, "health-tiny") - 1.08).abs() < 1e-9);
        assert_eq!(SuccessModel::template_modifier(&profile, "soul-small"), 0.5);
    }

    #[test]
    fn test_new_user_probability() {
        // 0.5 × 1.10 × 1.0 × 0.70 × 0.95
        let star = Star::new("health", "Health", "health").with_brightness(0.15);
        let prob = SuccessModel::probability(
            &UserCapacityProfile::default(),
            &star,
            Difficulty::Tiny,
            "health-tiny",
            Utc::now(),
        );
        assert!((prob - 0.36575).abs() < 1e-9);
    }

    #[test]
    fn test_recent_completion_boosts() {
        let now = Utc::now();
        let mut profile = UserCapacityProfile::default();
        profile
            .template_last_completed
            .insert("soul-small".to_string(), now - Duration::hours(20));
        let star = Star::new("soul", "Soul", "soul").with_brightness(0.4);

        // 0.5 × 1.0 × 1.0 × 1.0 × 1.2
        let prob = SuccessModel::probability(&profile, &star, Difficulty::Small, "soul-small", now);
        assert!((prob - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_probability_bounds() {
        let now = Utc::now();
        let perfect = UserCapacityProfile::default()
            .with_completion_rate(1.0)
            .with_template_success("purpose-tiny", 1.0);
        let bright = Star::new("purpose", "Purpose", "purpose").with_brightness(0.9);
        assert_eq!(
            SuccessModel::probability(&perfect, &bright, Difficulty::Tiny, "purpose-tiny", now),
            PROBABILITY_MAX
        );

        let hopeless = UserCapacityProfile::default()
            .with_completion_rate(0.0)
            .with_template_success("health-stretch", 0.0);
        let dim = Star::new("health", "Health", "health")
            .with_brightness(0.1)
            .with_lifecycle(StarLifecycle::Flickering);
        // 0.2 × 0.6 × 0.5 × 0.85 × 0.95 ≈ 0.048
        assert_eq!(
            SuccessModel::probability(&hopeless, &dim, Difficulty::Stretch, "health-stretch", now),
            PROBABILITY_MIN
        );
    }
}
