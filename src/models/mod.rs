//! Core data models for the statistics engine.

mod identity;
mod period;
mod record;
mod stats;

pub use identity::*;
pub use period::*;
pub use record::*;
pub use stats::*;
