//! Core data types for the Constellation engine

pub mod capacity;
pub mod experiment;
pub mod relationship;
pub mod star;
