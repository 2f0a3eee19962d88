//! Named scenario fixtures and weight-sensitivity analysis
//!
//! Used by the `constellation-sim` binary, the integration tests and the
//! benchmarks. Every fixture is evaluated at [`reference_time`], a Monday at
//! 10:00 UTC, which sits outside all default time windows.

use chrono::{DateTime, Duration, Utc};
use constellation_common::{
    ActiveExperiment, ConfigError, Difficulty, Experiment, Relationship, RelationshipKind, Star,
    StressLevel, UserCapacityProfile,
};
use serde::Serialize;

use crate::context::{SelectionContext, Snapshot};
use crate::selection::ExperimentSelector;
use crate::{PriorityWeights, SelectionConfig};

/// A named, self-contained selection input
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub snapshot: Snapshot,
}

impl Scenario {
    fn new(name: &'static str, snapshot: Snapshot) -> Self {
        Self { name, snapshot }
    }
}

/// Unix seconds of Monday 2024-01-01 10:00 UTC
const REFERENCE_TIMESTAMP: i64 = 1_704_103_200;

/// Monday 2024-01-01 10:00 UTC
pub fn reference_time() -> DateTime<Utc> {
    DateTime::<Utc>::default() + Duration::seconds(REFERENCE_TIMESTAMP)
}

fn star(id: &str, name: &str, category: &str, brightness: f64, history: [f64; 3], days: u32) -> Star {
    Star::new(id, name, category)
        .with_brightness(brightness)
        .with_history(history)
        .with_days_since_action(days)
}

fn core_five(brightness: f64) -> Vec<Star> {
    [
        ("health", "Health"),
        ("wealth", "Wealth"),
        ("purpose", "Purpose"),
        ("relationships", "Relationships"),
        ("soul", "Soul"),
    ]
    .iter()
    .map(|(id, name)| star(id, name, id, brightness, [brightness; 3], 0))
    .collect()
}

/// Five flat stars at 0.3, no history with the engine yet
pub fn new_user() -> Scenario {
    Scenario::new(
        "New User",
        Snapshot::new(core_five(0.3), UserCapacityProfile::default()),
    )
}

/// Every star dark and declining, two shadow mirrors, high stress
pub fn all_dark() -> Scenario {
    let stars = vec![
        star("health", "Health", "health", 0.15, [0.25, 0.20, 0.15], 10).struggling(),
        star("wealth", "Wealth", "wealth", 0.10, [0.20, 0.15, 0.10], 14).struggling(),
        star("purpose", "Purpose", "purpose", 0.20, [0.30, 0.25, 0.20], 7).struggling(),
        star("relationships", "Relationships", "relationships", 0.12, [0.25, 0.18, 0.12], 21)
            .struggling(),
        star("soul", "Soul", "soul", 0.18, [0.28, 0.22, 0.18], 30).struggling(),
    ];
    let relationships = vec![
        Relationship::new(RelationshipKind::ShadowMirror, "health", "wealth"),
        Relationship::new(RelationshipKind::ShadowMirror, "purpose", "relationships"),
    ];
    let profile = UserCapacityProfile::default()
        .with_stress(StressLevel::High)
        .with_completion_rate(0.3);

    Scenario::new(
        "All-Dark Constellation",
        Snapshot::new(stars, profile).with_relationships(relationships),
    )
}

/// Bright, rising stars and a user who always completes
pub fn perfect_user() -> Scenario {
    let stars = vec![
        star("health", "Health", "health", 0.85, [0.80, 0.82, 0.85], 1),
        star("wealth", "Wealth", "wealth", 0.90, [0.87, 0.88, 0.90], 1),
        star("purpose", "Purpose", "purpose", 0.75, [0.70, 0.72, 0.75], 2),
        star("relationships", "Relationships", "relationships", 0.88, [0.85, 0.86, 0.88], 1),
        star("soul", "Soul", "soul", 0.92, [0.90, 0.91, 0.92], 0),
    ];
    let relationships = vec![
        Relationship::new(RelationshipKind::GrowthEdge, "soul", "purpose"),
        Relationship::new(RelationshipKind::Resonance, "health", "relationships"),
    ];
    let profile = UserCapacityProfile::default()
        .with_completion_rate(1.0)
        .with_template_success("health-tiny", 1.0)
        .with_template_success("wealth-small", 1.0)
        .with_template_success("purpose-medium", 1.0);

    Scenario::new(
        "Perfect User",
        Snapshot::new(stars, profile).with_relationships(relationships),
    )
}

/// Declining dim stars and a user who never completes
pub fn failing_user() -> Scenario {
    let stars = vec![
        star("health", "Health", "health", 0.25, [0.35, 0.30, 0.25], 3),
        star("wealth", "Wealth", "wealth", 0.30, [0.40, 0.35, 0.30], 5),
        star("purpose", "Purpose", "purpose", 0.20, [0.30, 0.25, 0.20], 7).struggling(),
        star("relationships", "Relationships", "relationships", 0.28, [0.35, 0.32, 0.28], 4),
        star("soul", "Soul", "soul", 0.35, [0.40, 0.38, 0.35], 6),
    ];
    let profile = UserCapacityProfile::default()
        .with_stress(StressLevel::High)
        .with_active_count(1)
        .with_completion_rate(0.0)
        .with_template_success("health-tiny", 0.1)
        .with_template_success("wealth-tiny", 0.1);

    Scenario::new("Failing User", Snapshot::new(stars, profile))
}

/// Crisis stress with ten minutes to spare
pub fn crisis() -> Scenario {
    let stars = vec![
        star("health", "Health", "health", 0.45, [0.50, 0.48, 0.45], 2),
        star("wealth", "Wealth", "wealth", 0.60, [0.62, 0.61, 0.60], 1),
        star("purpose", "Purpose", "purpose", 0.35, [0.40, 0.38, 0.35], 5),
    ];
    let profile = UserCapacityProfile::default()
        .with_stress(StressLevel::Crisis)
        .with_completion_rate(0.6)
        .with_available_minutes(10);

    Scenario::new("High Stress (CRISIS)", Snapshot::new(stars, profile))
}

/// Dark health blocks wealth
pub fn blocking() -> Scenario {
    let stars = vec![
        star("health", "Health", "health", 0.15, [0.20, 0.18, 0.15], 10).struggling(),
        star("wealth", "Wealth", "wealth", 0.60, [0.58, 0.59, 0.60], 2),
        star("purpose", "Purpose", "purpose", 0.50, [0.48, 0.49, 0.50], 3),
    ];
    let relationships = vec![Relationship::new(RelationshipKind::Blocks, "health", "wealth")];
    let profile = UserCapacityProfile::default().with_completion_rate(0.7);

    Scenario::new(
        "Blocking (Health blocks Wealth)",
        Snapshot::new(stars, profile).with_relationships(relationships),
    )
}

/// Bright purpose mentors dim health
pub fn growth_edge() -> Scenario {
    let stars = vec![
        star("purpose", "Purpose", "purpose", 0.80, [0.75, 0.78, 0.80], 1),
        star("health", "Health", "health", 0.35, [0.32, 0.33, 0.35], 4),
        star("wealth", "Wealth", "wealth", 0.40, [0.38, 0.39, 0.40], 5),
    ];
    let relationships = vec![Relationship::new(RelationshipKind::GrowthEdge, "purpose", "health")];
    let profile = UserCapacityProfile::default().with_completion_rate(0.7);

    Scenario::new(
        "Growth Edge (Purpose -> Health)",
        Snapshot::new(stars, profile).with_relationships(relationships),
    )
}

/// Work and rest in tension while work already has an action in flight
pub fn tension() -> Scenario {
    let stars = vec![
        star("health", "Health", "health", 0.50, [0.48, 0.49, 0.50], 2),
        star("work", "Work", "wealth", 0.55, [0.52, 0.53, 0.55], 3).with_active_action(),
        star("rest", "Rest", "soul", 0.45, [0.43, 0.44, 0.45], 4),
    ];
    let relationships = vec![Relationship::new(RelationshipKind::Tension, "work", "rest")];
    let profile = UserCapacityProfile::default()
        .with_active_count(1)
        .with_completion_rate(0.7);

    Scenario::new(
        "Tension (Work vs Rest)",
        Snapshot::new(stars, profile)
            .with_relationships(relationships)
            .with_in_flight(vec![ActiveExperiment::new("work", Difficulty::Small)]),
    )
}

/// Three identical stars in different categories
pub fn equal_priority() -> Scenario {
    let stars = vec![
        star("star1", "Star 1", "health", 0.45, [0.43, 0.44, 0.45], 3),
        star("star2", "Star 2", "wealth", 0.45, [0.43, 0.44, 0.45], 3),
        star("star3", "Star 3", "purpose", 0.45, [0.43, 0.44, 0.45], 3),
    ];

    Scenario::new(
        "Equal Priority",
        Snapshot::new(stars, UserCapacityProfile::default()),
    )
}

/// Every fixture in presentation order
pub fn all() -> Vec<Scenario> {
    vec![
        new_user(),
        all_dark(),
        perfect_user(),
        failing_user(),
        crisis(),
        blocking(),
        growth_edge(),
        tension(),
        equal_priority(),
    ]
}

/// A named set of priority weights
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SensitivityPreset {
    pub name: &'static str,
    pub weights: PriorityWeights,
}

/// Priority-weight presets compared by the sensitivity analysis
pub fn sensitivity_presets() -> Vec<SensitivityPreset> {
    let preset = |name, urgency, capacity, success| SensitivityPreset {
        name,
        weights: PriorityWeights::new(urgency, capacity, success),
    };
    vec![
        preset("Default", 0.40, 0.35, 0.25),
        preset("Urgency-heavy", 0.60, 0.25, 0.15),
        preset("Capacity-heavy", 0.25, 0.50, 0.25),
        preset("Success-heavy", 0.25, 0.25, 0.50),
        preset("Equal weights", 0.33, 0.34, 0.33),
    ]
}

/// Ranking produced under one preset
#[derive(Debug, Clone, Serialize)]
pub struct SensitivityRun {
    pub preset: SensitivityPreset,
    pub selected: Vec<Experiment>,
}

/// Re-run a context under every preset, each with its own configuration
pub fn sensitivity_analysis(
    base: &SelectionConfig,
    ctx: &SelectionContext,
    now: DateTime<Utc>,
) -> Result<Vec<SensitivityRun>, ConfigError> {
    sensitivity_presets()
        .into_iter()
        .map(|preset| {
            let selector = ExperimentSelector::new(base.clone().with_priority(preset.weights))?;
            Ok(SensitivityRun {
                preset,
                selected: selector.select(ctx, now),
            })
        })
        .collect()
}
