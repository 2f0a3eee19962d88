//! Selection context - the validated, immutable input of one selection run
//!
//! A [`Snapshot`] is the raw bundle handed over by the snapshot providers.
//! [`SelectionContext::new`] rejects malformed snapshots at the boundary and
//! pre-indexes relationships by incident star, so the models downstream never
//! re-validate and never scan the full edge list.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc, Weekday};
use constellation_common::{
    ActiveExperiment, Relationship, Result, SnapshotError, Star, StarId, UserCapacityProfile,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw selection input as delivered by the providers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// All tracked stars
    pub stars: Vec<Star>,
    /// All relationships between them
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// Capacity signals of the user
    #[serde(default)]
    pub profile: UserCapacityProfile,
    /// Experiments already in flight
    #[serde(default)]
    pub in_flight: Vec<ActiveExperiment>,
    /// When each star was last surfaced through a shadow mirror
    #[serde(default)]
    pub last_surfaced: HashMap<StarId, DateTime<Utc>>,
}

impl Snapshot {
    pub fn new(stars: Vec<Star>, profile: UserCapacityProfile) -> Self {
        Self {
            stars,
            profile,
            ..Default::default()
        }
    }

    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships = relationships;
        self
    }

    pub fn with_in_flight(mut self, in_flight: Vec<ActiveExperiment>) -> Self {
        self.in_flight = in_flight;
        self
    }

    pub fn with_last_surfaced(mut self, star_id: impl Into<StarId>, at: DateTime<Utc>) -> Self {
        self.last_surfaced.insert(star_id.into(), at);
        self
    }

    /// Parse a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Local hour and weekday of the user at selection time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    pub hour: u32,
    pub weekday: Weekday,
}

/// Validated selection input with relationships indexed by incident star
#[derive(Debug, Clone)]
pub struct SelectionContext {
    snapshot: Snapshot,
    utc_offset: FixedOffset,
    star_index: HashMap<StarId, usize>,
    incident: HashMap<StarId, Vec<usize>>,
}

impl SelectionContext {
    /// Validate a snapshot and build the context
    pub fn new(snapshot: Snapshot) -> std::result::Result<Self, SnapshotError> {
        let mut star_index = HashMap::with_capacity(snapshot.stars.len());
        for (i, star) in snapshot.stars.iter().enumerate() {
            validate_star(star)?;
            if star_index.insert(star.id.clone(), i).is_some() {
                return Err(SnapshotError::DuplicateStar(star.id.to_string()));
            }
        }

        let mut incident: HashMap<StarId, Vec<usize>> = HashMap::new();
        for (i, edge) in snapshot.relationships.iter().enumerate() {
            for endpoint in [&edge.source, &edge.target] {
                if !star_index.contains_key(endpoint) {
                    return Err(SnapshotError::UnknownEndpoint(endpoint.to_string()));
                }
            }
            if edge.source == edge.target {
                return Err(SnapshotError::SelfLoop(edge.source.to_string()));
            }
            if !edge.strength.is_finite() || !(0.0..=1.0).contains(&edge.strength) {
                return Err(SnapshotError::InvalidStrength(edge.strength));
            }
            incident.entry(edge.source.clone()).or_default().push(i);
            incident.entry(edge.target.clone()).or_default().push(i);
        }

        for active in &snapshot.in_flight {
            if !star_index.contains_key(&active.star_id) {
                return Err(SnapshotError::UnknownActiveStar(active.star_id.to_string()));
            }
        }

        let utc_offset = validate_profile(&snapshot.profile)?;

        Ok(Self {
            snapshot,
            utc_offset,
            star_index,
            incident,
        })
    }

    pub fn stars(&self) -> &[Star] {
        &self.snapshot.stars
    }

    pub fn star(&self, id: &StarId) -> Option<&Star> {
        self.star_index.get(id).map(|&i| &self.snapshot.stars[i])
    }

    /// Relationships where `id` is the source or the target
    pub fn incident(&self, id: &StarId) -> impl Iterator<Item = &Relationship> + '_ {
        self.incident
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.snapshot.relationships[i])
    }

    pub fn profile(&self) -> &UserCapacityProfile {
        &self.snapshot.profile
    }

    pub fn in_flight(&self) -> &[ActiveExperiment] {
        &self.snapshot.in_flight
    }

    pub fn last_surfaced(&self, id: &StarId) -> Option<DateTime<Utc>> {
        self.snapshot.last_surfaced.get(id).copied()
    }

    /// The user's local hour and weekday at `now`
    pub fn local_clock(&self, now: DateTime<Utc>) -> LocalClock {
        let local = now.with_timezone(&self.utc_offset);
        LocalClock {
            hour: local.hour(),
            weekday: local.weekday(),
        }
    }
}

fn validate_star(star: &Star) -> std::result::Result<(), SnapshotError> {
    if !star.brightness.is_finite() || star.brightness < 0.0 {
        return Err(SnapshotError::InvalidBrightness {
            star_id: star.id.to_string(),
            value: star.brightness,
        });
    }
    if let Some(&value) = star
        .brightness_history
        .iter()
        .find(|v| !v.is_finite() || **v < 0.0)
    {
        return Err(SnapshotError::InvalidHistorySample {
            star_id: star.id.to_string(),
            value,
        });
    }
    Ok(())
}

fn validate_rate(name: impl Into<String>, value: f64) -> std::result::Result<(), SnapshotError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SnapshotError::InvalidRate {
            name: name.into(),
            value,
        });
    }
    Ok(())
}

fn validate_profile(profile: &UserCapacityProfile) -> std::result::Result<FixedOffset, SnapshotError> {
    validate_rate("completion_rate", profile.completion_rate)?;
    for (day, rate) in &profile.weekday_success {
        validate_rate(format!("weekday_success.{}", day), *rate)?;
    }
    for (template, rate) in &profile.template_success {
        validate_rate(format!("template_success.{}", template), *rate)?;
    }
    for window in profile.preferred_windows.iter().chain(&profile.avoided_windows) {
        if window.start_hour > 23 || window.end_hour > 24 {
            return Err(SnapshotError::InvalidTimeWindow {
                start_hour: window.start_hour,
                end_hour: window.end_hour,
            });
        }
    }

    profile
        .utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or(SnapshotError::InvalidUtcOffset(profile.utc_offset_minutes))
}
