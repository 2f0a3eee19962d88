//! Property tests over randomly generated constellations

use std::collections::HashMap;

use chrono::{Duration, Weekday};
use constellation_common::{
    ActiveExperiment, Difficulty, Relationship, RelationshipKind, Star, StarId, StressLevel,
    TimeWindow, UserCapacityProfile,
};
use constellation_selection::graph::bonus::{
    CAUSATION_BOOST, GROWTH_EDGE_BONUS_MAX, RESONANCE_BONUS_CAP, SHADOW_SURFACE_BONUS_BASE,
    SHADOW_SURFACE_BONUS_RATE, SHADOW_SURFACE_MAX_OVERDUE, TENSION_PENALTY,
};
use constellation_selection::scenarios::reference_time;
use constellation_selection::{
    CandidateGenerator, ExperimentSelector, RelationshipBonusEngine, SelectionConfig,
    SelectionContext, Snapshot,
};
use proptest::prelude::*;

const CATEGORIES: [&str; 4] = ["health", "wealth", "purpose", "soul"];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Largest net bonus the engine can award: every term at its ceiling
fn max_bonus() -> f64 {
    GROWTH_EDGE_BONUS_MAX
        + RESONANCE_BONUS_CAP
        + CAUSATION_BOOST
        + SHADOW_SURFACE_BONUS_BASE
        + SHADOW_SURFACE_BONUS_RATE * SHADOW_SURFACE_MAX_OVERDUE as f64
}

fn kind() -> impl Strategy<Value = RelationshipKind> {
    prop_oneof![
        Just(RelationshipKind::GrowthEdge),
        Just(RelationshipKind::Resonance),
        Just(RelationshipKind::Tension),
        Just(RelationshipKind::Causation),
        Just(RelationshipKind::ShadowMirror),
        Just(RelationshipKind::Blocks),
    ]
}

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Tiny),
        Just(Difficulty::Small),
        Just(Difficulty::Medium),
        Just(Difficulty::Stretch),
    ]
}

fn windows() -> impl Strategy<Value = Vec<TimeWindow>> {
    prop::collection::vec(
        (0u32..24, 0u32..=24).prop_map(|(start, end)| TimeWindow::new(start, end)),
        0..3,
    )
}

fn stress() -> impl Strategy<Value = StressLevel> {
    prop_oneof![
        Just(StressLevel::Low),
        Just(StressLevel::Medium),
        Just(StressLevel::High),
        Just(StressLevel::Crisis),
    ]
}

fn star(index: usize) -> impl Strategy<Value = Star> {
    (
        0.05f64..=1.0,
        prop::collection::vec(0.05f64..=1.0, 0..5),
        0u32..40,
        any::<bool>(),
        any::<bool>(),
        0usize..CATEGORIES.len(),
    )
        .prop_map(move |(brightness, history, days, struggling, active, category)| {
            let mut star = Star::new(format!("s{}", index), format!("Star {}", index), CATEGORIES[category])
                .with_brightness(brightness)
                .with_history(history)
                .with_days_since_action(days);
            star.is_struggling = struggling;
            star.has_active_action = active;
            star
        })
}

fn profile() -> impl Strategy<Value = UserCapacityProfile> {
    let templates = prop::collection::vec(
        (0..CATEGORIES.len(), difficulty(), 0.0f64..=1.0, prop::option::of(0i64..30)),
        0..6,
    );
    (
        (stress(), 0u32..5, 0.0f64..=1.0, 0u32..120),
        prop::collection::vec(prop::option::of(0.0f64..=1.0), 7),
        templates,
        -720i32..=840,
        windows(),
        windows(),
    )
        .prop_map(|((stress, active, rate, minutes), weekdays, templates, offset, preferred, avoided)| {
            let mut profile = UserCapacityProfile::default()
                .with_stress(stress)
                .with_active_count(active)
                .with_completion_rate(rate)
                .with_available_minutes(minutes);

            profile.weekday_success = WEEKDAYS
                .iter()
                .zip(weekdays)
                .filter_map(|(day, rate)| rate.map(|rate| (*day, rate)))
                .collect();
            for (category, difficulty, rate, completed_days_ago) in templates {
                let template = difficulty.template_id(CATEGORIES[category]);
                if let Some(days) = completed_days_ago {
                    profile
                        .template_last_completed
                        .insert(template.clone(), reference_time() - Duration::days(days));
                }
                profile = profile.with_template_success(template, rate);
            }
            profile.utc_offset_minutes = offset;
            profile.preferred_windows = preferred;
            profile.avoided_windows = avoided;
            profile
        })
}

fn snapshot() -> impl Strategy<Value = Snapshot> {
    (1usize..9)
        .prop_flat_map(|n| {
            let stars: Vec<_> = (0..n).map(star).collect();
            let edges = prop::collection::vec((kind(), 0..n, 0..n), 0..(n * 2));
            let in_flight = prop::collection::vec((0..n, difficulty()), 0..3);
            let surfaced = prop::collection::vec((0..n, 0i64..40), 0..n);
            (stars, edges, in_flight, surfaced, profile())
        })
        .prop_map(|(stars, edges, in_flight, surfaced, profile)| {
            let relationships = edges
                .into_iter()
                .filter(|(_, source, target)| source != target)
                .map(|(kind, source, target)| {
                    Relationship::new(kind, stars[source].id.clone(), stars[target].id.clone())
                })
                .collect();
            let in_flight = in_flight
                .into_iter()
                .map(|(star, difficulty)| ActiveExperiment::new(stars[star].id.clone(), difficulty))
                .collect();
            let surfaced: Vec<_> = surfaced
                .into_iter()
                .map(|(star, days)| (stars[star].id.clone(), reference_time() - Duration::days(days)))
                .collect();

            let mut snapshot = Snapshot::new(stars, profile)
                .with_relationships(relationships)
                .with_in_flight(in_flight);
            for (star_id, at) in surfaced {
                snapshot = snapshot.with_last_surfaced(star_id, at);
            }
            snapshot
        })
}

proptest! {
    #[test]
    fn scores_stay_in_bounds(snapshot in snapshot()) {
        let ctx = SelectionContext::new(snapshot).unwrap();
        let config = SelectionConfig::default();
        let generator = CandidateGenerator::new(&config);

        for star in ctx.stars() {
            if let Some(experiment) = generator.generate(star, &ctx, reference_time()) {
                let scores = experiment.scores;
                prop_assert!((0.0..=1.0).contains(&scores.urgency));
                prop_assert!((0.0..=1.0).contains(&scores.capacity));
                prop_assert!((0.05..=0.95).contains(&scores.success_probability));
                prop_assert!((-TENSION_PENALTY..=max_bonus()).contains(&scores.relationship_bonus));
                prop_assert!((0.0..=1.0).contains(&experiment.priority));
            }
        }
    }

    #[test]
    fn blocked_stars_never_selected(snapshot in snapshot()) {
        let ctx = SelectionContext::new(snapshot).unwrap();
        let selected = ExperimentSelector::default().select(&ctx, reference_time());

        for experiment in &selected {
            let star = ctx.star(&experiment.star_id).unwrap();
            prop_assert!(!RelationshipBonusEngine::is_blocked(star, &ctx));
        }
    }

    #[test]
    fn caps_are_respected(snapshot in snapshot()) {
        let ctx = SelectionContext::new(snapshot).unwrap();
        let config = SelectionConfig::default();
        let report = ExperimentSelector::new(config.clone())
            .unwrap()
            .select_with_report(&ctx, reference_time());

        let capacity = config.admission_capacity(ctx.profile().active_count);
        prop_assert!(report.admitted.len() <= capacity.min(report.generated));

        let mut per_star: HashMap<&StarId, usize> = HashMap::new();
        let mut per_category: HashMap<&str, usize> = HashMap::new();
        for experiment in &report.admitted {
            *per_star.entry(&experiment.star_id).or_default() += 1;
            *per_category.entry(experiment.category.as_str()).or_default() += 1;
        }
        prop_assert!(per_star.values().all(|&count| count <= config.max_per_star));
        prop_assert!(per_category.values().all(|&count| count <= config.max_per_category));

        // Highest priority first
        prop_assert!(report.admitted.windows(2).all(|pair| pair[0].priority >= pair[1].priority));
    }

    #[test]
    fn selection_is_deterministic(snapshot in snapshot()) {
        let ctx = SelectionContext::new(snapshot).unwrap();
        let selector = ExperimentSelector::default();
        let first = selector.select(&ctx, reference_time());
        let second = selector.select(&ctx, reference_time());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn neglect_never_lowers_priority(snapshot in snapshot(), extra in 1u32..30) {
        let config = SelectionConfig::default();
        let generator = CandidateGenerator::new(&config);
        let target = snapshot.stars[0].id.clone();

        let before_ctx = SelectionContext::new(snapshot.clone()).unwrap();
        let mut neglected = snapshot;
        neglected.stars[0].days_since_action += extra;
        let after_ctx = SelectionContext::new(neglected).unwrap();

        let before = generator.generate(before_ctx.star(&target).unwrap(), &before_ctx, reference_time());
        let after = generator.generate(after_ctx.star(&target).unwrap(), &after_ctx, reference_time());

        if let (Some(before), Some(after)) = (before, after) {
            prop_assert!(after.scores.urgency >= before.scores.urgency);
            prop_assert!(after.priority >= before.priority);
        }
    }
}
