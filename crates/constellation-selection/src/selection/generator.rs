//! Candidate generator
//!
//! Turns one star into at most one scored [`Experiment`]: picks a difficulty
//! tier, derives the template id, and composes the four sub-scores into a
//! priority.

use chrono::{DateTime, Utc};
use constellation_common::metrics::{clamp_unit, weighted_sum};
use constellation_common::{Difficulty, Experiment, ScoreBreakdown, Star, StressLevel, UserCapacityProfile};

use crate::context::SelectionContext;
use crate::graph::RelationshipBonusEngine;
use crate::scoring::{CapacityModel, SuccessModel, UrgencyModel};
use crate::state::StarState;
use crate::SelectionConfig;

/// Capacity proxy below which every experiment is TINY
pub const TINY_ONLY_PROXY: f64 = 0.3;

/// Capacity proxy below which MEDIUM and STRETCH drop to SMALL
pub const DOWNGRADE_PROXY: f64 = 0.5;

/// Builds scored candidates under one configuration
pub struct CandidateGenerator<'a> {
    config: &'a SelectionConfig,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(config: &'a SelectionConfig) -> Self {
        Self { config }
    }

    /// Difficulty for a star given the user's stress and load
    pub fn select_difficulty(&self, star: &Star, profile: &UserCapacityProfile) -> Difficulty {
        if profile.stress == StressLevel::Crisis {
            return Difficulty::Tiny;
        }

        let proxy = CapacityModel::proxy(profile.stress, profile.active_count, &self.config.capacity);
        if proxy < TINY_ONLY_PROXY {
            return Difficulty::Tiny;
        }

        match StarState::classify(star).default_difficulty() {
            Difficulty::Medium | Difficulty::Stretch if proxy < DOWNGRADE_PROXY => Difficulty::Small,
            difficulty => difficulty,
        }
    }

    /// Scored candidate for `star`, or `None` when it is blocked
    pub fn generate(
        &self,
        star: &Star,
        ctx: &SelectionContext,
        now: DateTime<Utc>,
    ) -> Option<Experiment> {
        let bonus = RelationshipBonusEngine::evaluate(star, ctx, now)?;

        let profile = ctx.profile();
        let difficulty = self.select_difficulty(star, profile);
        let template_id = difficulty.template_id(&star.category);

        let scores = ScoreBreakdown {
            urgency: UrgencyModel::urgency(star, ctx),
            capacity: CapacityModel::capacity(
                profile,
                difficulty,
                &template_id,
                ctx.local_clock(now),
                &self.config.capacity,
            ),
            success_probability: SuccessModel::probability(
                profile,
                star,
                difficulty,
                &template_id,
                now,
            ),
            relationship_bonus: bonus.net(),
        };

        Some(Experiment {
            star_id: star.id.clone(),
            star_name: star.name.clone(),
            category: star.category.clone(),
            difficulty,
            template_id,
            priority: self.priority(&scores),
            scores,
        })
    }

    /// Clamped weighted composite of the sub-scores
    pub fn priority(&self, scores: &ScoreBreakdown) -> f64 {
        let weights = &self.config.priority;
        clamp_unit(
            weighted_sum(&[
                (scores.urgency, weights.urgency),
                (scores.capacity, weights.capacity),
                (scores.success_probability, weights.success),
            ]) + scores.relationship_bonus,
        )
    }
}
