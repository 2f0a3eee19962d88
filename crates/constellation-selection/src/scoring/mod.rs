//! Per-candidate scoring models
//!
//! Each model is a stateless unit struct reading from the validated
//! [`SelectionContext`](crate::context::SelectionContext) or the user profile.

pub mod capacity;
pub mod success;
pub mod urgency;

pub use capacity::CapacityModel;
pub use success::SuccessModel;
pub use urgency::UrgencyModel;
