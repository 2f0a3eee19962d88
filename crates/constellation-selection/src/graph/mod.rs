//! Relationship graph evaluation

pub mod bonus;

pub use bonus::{RelationshipBonus, RelationshipBonusEngine};
