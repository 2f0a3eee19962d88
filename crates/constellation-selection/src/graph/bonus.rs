//! Relationship bonus engine
//!
//! Walks the relationships incident to a candidate star and turns them into
//! an additive contribution to its priority:
//!
//! ```text
//! net = growth + resonance + causation + shadow − tension
//! ```
//!
//! Blocking is evaluated first and is not a score: a blocked star yields no
//! bonus at all, and the generator emits no candidate for it.

use chrono::{DateTime, Utc};
use constellation_common::metrics::scale_between;
use constellation_common::{RelationshipKind, Star, StarId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::context::SelectionContext;
use crate::scoring::UrgencyModel;

/// Mentor brightness from which a growth edge pays out
pub const GROWTH_EDGE_THRESHOLD: f64 = 0.65;
pub const GROWTH_EDGE_BONUS_MIN: f64 = 0.15;
pub const GROWTH_EDGE_BONUS_MAX: f64 = 0.25;

/// Partner brightness from which resonance pays out
pub const RESONANCE_THRESHOLD: f64 = 0.7;
pub const RESONANCE_BONUS_PER_BRIGHT: f64 = 0.05;
pub const RESONANCE_BONUS_ACTIVE: f64 = 0.10;
pub const RESONANCE_BONUS_CAP: f64 = 0.15;

/// Downstream urgency from which a cause star is boosted
pub const CAUSATION_URGENCY_THRESHOLD: f64 = 0.6;
pub const CAUSATION_BOOST: f64 = 0.10;

/// Days between two shadow surfacings
pub const SHADOW_SURFACE_INTERVAL: i64 = 7;
pub const SHADOW_SURFACE_BONUS_BASE: f64 = 0.10;
pub const SHADOW_SURFACE_BONUS_RATE: f64 = 0.02;
/// Overdue days after which the shadow bonus stops growing
pub const SHADOW_SURFACE_MAX_OVERDUE: i64 = 14;
/// Assumed age of the last surfacing when a star was never surfaced
pub const SHADOW_NEVER_SURFACED_DAYS: i64 = 14;

pub const TENSION_PENALTY: f64 = 0.20;

/// Per-source breakdown of the relationship contribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipBonus {
    pub growth: f64,
    pub resonance: f64,
    pub causation: f64,
    pub shadow: f64,
    pub tension_penalty: f64,
}

impl RelationshipBonus {
    /// Bonuses minus the tension penalty, not clamped
    pub fn net(&self) -> f64 {
        self.growth + self.resonance + self.causation + self.shadow - self.tension_penalty
    }
}

pub struct RelationshipBonusEngine;

impl RelationshipBonusEngine {
    /// Full relationship contribution, `None` when the star is blocked
    pub fn evaluate(
        star: &Star,
        ctx: &SelectionContext,
        now: DateTime<Utc>,
    ) -> Option<RelationshipBonus> {
        if Self::is_blocked(star, ctx) {
            return None;
        }

        Some(RelationshipBonus {
            growth: Self::growth_edge_bonus(star, ctx),
            resonance: Self::resonance_bonus(star, ctx),
            causation: Self::causation_boost(star, ctx),
            shadow: Self::shadow_bonus(star, ctx, now),
            tension_penalty: Self::tension_penalty(star, ctx),
        })
    }

    /// Incoming BLOCKS edge from a source still at or below the struggling threshold
    pub fn is_blocked(star: &Star, ctx: &SelectionContext) -> bool {
        ctx.incident(&star.id).any(|edge| {
            edge.kind == RelationshipKind::Blocks
                && edge.target == star.id
                && ctx
                    .star(&edge.source)
                    .map(Star::is_below_struggling_threshold)
                    .unwrap_or(false)
        })
    }

    /// Best mentor among incoming growth edges; mentors do not stack
    pub fn growth_edge_bonus(star: &Star, ctx: &SelectionContext) -> f64 {
        ctx.incident(&star.id)
            .filter(|edge| edge.kind == RelationshipKind::GrowthEdge && edge.target == star.id)
            .filter_map(|edge| ctx.star(&edge.source))
            .filter(|mentor| mentor.brightness >= GROWTH_EDGE_THRESHOLD)
            .map(|mentor| {
                scale_between(
                    mentor.brightness,
                    GROWTH_EDGE_THRESHOLD,
                    1.0,
                    GROWTH_EDGE_BONUS_MIN,
                    GROWTH_EDGE_BONUS_MAX,
                )
            })
            .fold(0.0, f64::max)
    }

    /// Bright and in-flight resonance partners, capped
    pub fn resonance_bonus(star: &Star, ctx: &SelectionContext) -> f64 {
        let mut bonus = 0.0;

        for edge in ctx.incident(&star.id) {
            if edge.kind != RelationshipKind::Resonance {
                continue;
            }
            let Some(partner) = edge.partner_of(&star.id).and_then(|id| ctx.star(id)) else {
                continue;
            };

            if partner.brightness >= RESONANCE_THRESHOLD {
                bonus += RESONANCE_BONUS_PER_BRIGHT;
            }
            if partner.has_active_action {
                bonus += RESONANCE_BONUS_ACTIVE;
            }
        }

        bonus.min(RESONANCE_BONUS_CAP)
    }

    /// Boost a thriving cause star whose downstream effect is urgent
    pub fn causation_boost(star: &Star, ctx: &SelectionContext) -> f64 {
        if !star.is_thriving_source() {
            return 0.0;
        }

        let gates_urgent_effect = ctx
            .incident(&star.id)
            .filter(|edge| edge.kind == RelationshipKind::Causation && edge.source == star.id)
            .filter_map(|edge| ctx.star(&edge.target))
            .any(|effect| UrgencyModel::urgency(effect, ctx) >= CAUSATION_URGENCY_THRESHOLD);

        if gates_urgent_effect {
            CAUSATION_BOOST
        } else {
            0.0
        }
    }

    /// Periodic nudge for struggling stars on a shadow mirror
    pub fn shadow_bonus(star: &Star, ctx: &SelectionContext, now: DateTime<Utc>) -> f64 {
        if !star.is_struggling {
            return 0.0;
        }

        let mirrored = ctx
            .incident(&star.id)
            .any(|edge| edge.kind == RelationshipKind::ShadowMirror);
        if !mirrored {
            return 0.0;
        }

        let days_since = ctx
            .last_surfaced(&star.id)
            .map(|at| (now - at).num_days())
            .unwrap_or(SHADOW_NEVER_SURFACED_DAYS);

        if days_since < SHADOW_SURFACE_INTERVAL {
            return 0.0;
        }

        let overdue = (days_since - SHADOW_SURFACE_INTERVAL).min(SHADOW_SURFACE_MAX_OVERDUE);
        SHADOW_SURFACE_BONUS_BASE + SHADOW_SURFACE_BONUS_RATE * overdue as f64
    }

    /// Penalty when a tension partner already has an action in flight
    pub fn tension_penalty(star: &Star, ctx: &SelectionContext) -> f64 {
        let in_flight: HashSet<&StarId> = ctx.in_flight().iter().map(|a| &a.star_id).collect();
        if in_flight.is_empty() {
            return 0.0;
        }

        let strained = ctx
            .incident(&star.id)
            .filter(|edge| edge.kind == RelationshipKind::Tension)
            .filter_map(|edge| edge.partner_of(&star.id))
            .any(|partner| in_flight.contains(partner));

        if strained {
            TENSION_PENALTY
        } else {
            0.0
        }
    }
}
