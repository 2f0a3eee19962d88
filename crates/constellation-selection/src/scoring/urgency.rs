//! Urgency model
//!
//! ```text
//! urgency = clamp(base(state) × trajectory × relationship × time, 0, 1)
//! ```

use constellation_common::metrics::{clamp, clamp_unit, product};
use constellation_common::{RelationshipKind, Star};

use crate::context::SelectionContext;
use crate::state::StarState;

/// Bounds of the accumulated relationship modifier
pub const RELATIONSHIP_MODIFIER_MIN: f64 = 0.7;
pub const RELATIONSHIP_MODIFIER_MAX: f64 = 1.3;

/// Ceiling of the neglect modifier, reached after two weeks
pub const TIME_MODIFIER_CEILING: f64 = 1.5;

pub struct UrgencyModel;

impl UrgencyModel {
    /// Urgency of a star (0.0 - 1.0)
    pub fn urgency(star: &Star, ctx: &SelectionContext) -> f64 {
        let base = StarState::classify(star).base_urgency();
        clamp_unit(product(&[
            base,
            Self::trajectory_modifier(star),
            Self::relationship_modifier(star, ctx),
            Self::time_modifier(star.days_since_action),
        ]))
    }

    /// Raise urgency for declining stars, lower it for rising ones
    pub fn trajectory_modifier(star: &Star) -> f64 {
        let Some(delta) = star.trajectory_delta() else {
            return 1.0;
        };

        if delta < -0.05 {
            1.2
        } else if delta < -0.02 {
            1.1
        } else if delta > 0.05 {
            0.8
        } else if delta > 0.02 {
            0.9
        } else {
            1.0
        }
    }

    /// Neglect amplifies urgency with diminishing marginal effect
    pub fn time_modifier(days_since_action: u32) -> f64 {
        let days = f64::from(days_since_action);
        match days_since_action {
            0..=3 => 1.0,
            4..=7 => 1.0 + 0.05 * (days - 3.0),
            8..=14 => 1.2 + 0.02 * (days - 7.0),
            _ => TIME_MODIFIER_CEILING,
        }
    }

    /// Product of per-edge factors over incident relationships
    pub fn relationship_modifier(star: &Star, ctx: &SelectionContext) -> f64 {
        let mut modifier = 1.0;

        for edge in ctx.incident(&star.id) {
            let Some(source) = ctx.star(&edge.source) else {
                continue;
            };

            let factor = match edge.kind {
                RelationshipKind::Blocks if source.is_below_struggling_threshold() => 1.3,
                RelationshipKind::GrowthEdge if source.is_thriving_source() => 1.1,
                RelationshipKind::ShadowMirror if star.is_struggling => 1.2,
                RelationshipKind::Causation if source.is_thriving_source() => 1.1,
                _ => 1.0,
            };
            modifier *= factor;
        }

        clamp(modifier, RELATIONSHIP_MODIFIER_MIN, RELATIONSHIP_MODIFIER_MAX)
    }
}
