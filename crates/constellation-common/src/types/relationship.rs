//! Relationship - typed, directed edge between two stars
//!
//! GROWTH_EDGE, CAUSATION and BLOCKS are directional (source influences
//! target). RESONANCE and TENSION are read symmetrically. SHADOW_MIRROR only
//! matters when the star itself is struggling.

use serde::{Deserialize, Serialize};

use super::star::StarId;

/// Relationship types produced by the connection-formation subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipKind {
    GrowthEdge,
    Resonance,
    Tension,
    Causation,
    ShadowMirror,
    Blocks,
    /// Any type this engine does not understand; ignored by every model
    #[serde(other)]
    Unknown,
}

/// Directed, typed, weighted edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub source: StarId,
    pub target: StarId,
    /// Strength in [0, 1]
    #[serde(default = "default_strength")]
    pub strength: f64,
}

fn default_strength() -> f64 {
    1.0
}

impl Relationship {
    pub fn new(kind: RelationshipKind, source: impl Into<StarId>, target: impl Into<StarId>) -> Self {
        Self {
            kind,
            source: source.into(),
            target: target.into(),
            strength: default_strength(),
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    /// The endpoint opposite to `star`, if `star` is an endpoint
    pub fn partner_of(&self, star: &StarId) -> Option<&StarId> {
        if &self.source == star {
            Some(&self.target)
        } else if &self.target == star {
            Some(&self.source)
        } else {
            None
        }
    }
}
