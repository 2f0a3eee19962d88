//! Candidate generation and constrained top-K selection

pub mod generator;
pub mod selector;

pub use generator::CandidateGenerator;
pub use selector::{CapReason, CapRejection, ExperimentSelector, SelectionReport};
