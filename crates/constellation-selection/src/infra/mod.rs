//! Infrastructure around the pure engine

pub mod provider;
pub mod service;

pub use provider::{InMemorySnapshotProvider, SnapshotProvider};
pub use service::SelectionService;
