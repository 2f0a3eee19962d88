//! Constrained selector
//!
//! Ranks every generated candidate by priority and greedily admits them under
//! the admission ceiling and the per-star / per-category diversity caps.
//!
//! ## Ordering
//!
//! Candidates are sorted by descending priority. Equal priorities fall back to
//! ascending star id so two runs over the same snapshot return the same list.

use chrono::{DateTime, Utc};
use constellation_common::{ConfigError, Experiment, StarId};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

use crate::context::SelectionContext;
use crate::selection::generator::CandidateGenerator;
use crate::SelectionConfig;

/// Why a candidate was passed over by the greedy admission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapReason {
    /// Star already holds its maximum number of experiments
    PerStar,
    /// Category already holds its maximum number of experiments
    PerCategory,
    /// Admission capacity was exhausted before this candidate
    Capacity,
}

/// A candidate that was generated but not admitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapRejection {
    pub star_id: StarId,
    pub reason: CapReason,
}

/// Outcome of one selection run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionReport {
    /// Admitted experiments, highest priority first
    pub admitted: Vec<Experiment>,
    /// Stars excluded by an active blocker
    pub blocked: Vec<StarId>,
    /// Candidates turned away by a cap
    pub capped: Vec<CapRejection>,
    /// Number of candidates generated before admission
    pub generated: usize,
    /// Slots that were available for this run
    pub admission_capacity: usize,
}

/// Greedy, explainable top-K selection
#[derive(Debug, Clone, Default)]
pub struct ExperimentSelector {
    config: SelectionConfig,
}

impl ExperimentSelector {
    /// Create a selector, rejecting invalid weights or caps
    pub fn new(config: SelectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Admitted experiments in priority order
    pub fn select(&self, ctx: &SelectionContext, now: DateTime<Utc>) -> Vec<Experiment> {
        self.select_with_report(ctx, now).admitted
    }

    /// Admitted experiments plus the blocked stars and cap rejections
    #[instrument(skip(self, ctx), fields(stars = ctx.stars().len()))]
    pub fn select_with_report(&self, ctx: &SelectionContext, now: DateTime<Utc>) -> SelectionReport {
        let admission_capacity = self.config.admission_capacity(ctx.profile().active_count);
        if admission_capacity == 0 {
            debug!(active = ctx.profile().active_count, "No admission capacity left");
            return SelectionReport::default();
        }

        let generator = CandidateGenerator::new(&self.config);
        let mut blocked = Vec::new();
        let mut candidates = Vec::with_capacity(ctx.stars().len());

        for star in ctx.stars() {
            match generator.generate(star, ctx, now) {
                Some(experiment) => candidates.push(experiment),
                None => {
                    debug!(star_id = %star.id, "Star blocked by an active blocker");
                    blocked.push(star.id.clone());
                }
            }
        }

        candidates.sort_by(|a, b| {
            Reverse(OrderedFloat(a.priority))
                .cmp(&Reverse(OrderedFloat(b.priority)))
                .then_with(|| a.star_id.cmp(&b.star_id))
        });

        let generated = candidates.len();
        let mut admitted = Vec::with_capacity(admission_capacity.min(generated));
        let mut capped = Vec::new();
        let mut per_star: HashMap<StarId, usize> = HashMap::new();
        let mut per_category: HashMap<String, usize> = HashMap::new();

        for candidate in candidates {
            let reason = if admitted.len() >= admission_capacity {
                Some(CapReason::Capacity)
            } else if per_star.get(&candidate.star_id).copied().unwrap_or(0) >= self.config.max_per_star {
                Some(CapReason::PerStar)
            } else if per_category.get(&candidate.category).copied().unwrap_or(0)
                >= self.config.max_per_category
            {
                Some(CapReason::PerCategory)
            } else {
                None
            };

            if let Some(reason) = reason {
                debug!(star_id = %candidate.star_id, ?reason, "Candidate not admitted");
                capped.push(CapRejection {
                    star_id: candidate.star_id,
                    reason,
                });
                continue;
            }

            *per_star.entry(candidate.star_id.clone()).or_default() += 1;
            *per_category.entry(candidate.category.clone()).or_default() += 1;
            admitted.push(candidate);
        }

        info!(
            generated,
            admitted = admitted.len(),
            blocked = blocked.len(),
            capped = capped.len(),
            "Selection complete"
        );

        SelectionReport {
            admitted,
            blocked,
            capped,
            generated,
            admission_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Snapshot;
    use chrono::TimeZone;
    use constellation_common::{Relationship, RelationshipKind, Star, UserCapacityProfile};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap()
    }

    fn context(stars: Vec<Star>, profile: UserCapacityProfile) -> SelectionContext {
        SelectionContext::new(Snapshot::new(stars, profile)).unwrap()
    }

    fn ids(experiments: &[Experiment]) -> Vec<&str> {
        experiments.iter().map(|e| e.star_id.as_str()).collect()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SelectionConfig {
            max_active: 0,
            ..SelectionConfig::default()
        };
        assert_eq!(ExperimentSelector::new(config).unwrap_err(), ConfigError::ZeroAdmissionCap);
    }

    #[test]
    fn test_struggling_outranks_thriving() {
        let struggling = Star::new("health", "Health", "health")
            .with_brightness(0.15)
            .with_history(vec![0.15; 3])
            .with_days_since_action(10)
            .struggling();
        let thriving = Star::new("purpose", "Purpose", "purpose")
            .with_brightness(0.85)
            .with_history(vec![0.85; 3])
            .with_days_since_action(10);
        let ctx = context(vec![thriving, struggling], UserCapacityProfile::default());

        let selected = ExperimentSelector::default().select(&ctx, now());
        assert_eq!(ids(&selected), vec!["health", "purpose"]);
        assert!(selected[0].priority > selected[1].priority);
    }

    #[test]
    fn test_ties_break_by_star_id() {
        let twin = |id: &str| Star::new(id, id, id).with_brightness(0.4).with_history(vec![0.4; 3]);
        let ctx = context(
            vec![twin("wealth"), twin("health"), twin("soul")],
            UserCapacityProfile::default(),
        );

        let selected = ExperimentSelector::default().select(&ctx, now());
        assert_eq!(ids(&selected), vec!["health", "soul", "wealth"]);
        assert_eq!(selected[0].priority, selected[2].priority);
    }

    #[test]
    fn test_zero_capacity_is_empty() {
        let star = Star::new("health", "Health", "health").with_brightness(0.1);
        let ctx = context(vec![star], UserCapacityProfile::default().with_active_count(3));
        let report = ExperimentSelector::default().select_with_report(&ctx, now());
        assert!(report.admitted.is_empty());
        assert_eq!(report.admission_capacity, 0);
    }

    #[test]
    fn test_truncates_to_capacity() {
        let stars = ["a", "b", "c", "d"]
            .iter()
            .map(|id| Star::new(*id, *id, *id).with_brightness(0.4))
            .collect();
        let ctx = context(stars, UserCapacityProfile::default().with_active_count(1));

        let report = ExperimentSelector::default().select_with_report(&ctx, now());
        assert_eq!(report.admission_capacity, 2);
        assert_eq!(ids(&report.admitted), vec!["a", "b"]);
        assert_eq!(report.generated, 4);
        assert!(report.capped.iter().all(|r| r.reason == CapReason::Capacity));
    }

    #[test]
    fn test_category_cap() {
        let config = SelectionConfig {
            max_per_category: 1,
            ..SelectionConfig::default()
        };
        let stars = vec![
            Star::new("gym", "Gym", "health").with_brightness(0.1),
            Star::new("sleep", "Sleep", "health").with_brightness(0.15),
            Star::new("budget", "Budget", "wealth").with_brightness(0.4),
        ];
        let ctx = context(stars, UserCapacityProfile::default());

        let report = ExperimentSelector::new(config).unwrap().select_with_report(&ctx, now());
        let categories: Vec<&str> = report.admitted.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories.iter().filter(|c| **c == "health").count(), 1);
        assert!(categories.contains(&"wealth"));
        assert!(report
            .capped
            .iter()
            .any(|r| r.reason == CapReason::PerCategory));
    }

    #[test]
    fn test_blocked_star_reported() {
        let stars = vec![
            Star::new("health", "Health", "health").with_brightness(0.15).struggling(),
            Star::new("wealth", "Wealth", "wealth").with_brightness(0.6),
        ];
        let snapshot = Snapshot::new(stars, UserCapacityProfile::default()).with_relationships(vec![
            Relationship::new(RelationshipKind::Blocks, "health", "wealth"),
        ]);
        let ctx = SelectionContext::new(snapshot).unwrap();

        let report = ExperimentSelector::default().select_with_report(&ctx, now());
        assert_eq!(ids(&report.admitted), vec!["health"]);
        assert_eq!(report.blocked, vec![StarId::from("wealth")]);
    }
}
