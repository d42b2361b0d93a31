#![deny(missing_docs)]
#![doc = "Core data model and error types for the spgen phase-jump extractor."]

pub mod errors;
pub mod provenance;
mod types;

pub use errors::{ErrorInfo, SpError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use types::{ChannelId, ChannelSet, EventRow, EventTable, TimeKey, TimeSeriesRow};

/// One full phase rotation in radians; a single flux-quantum jump.
pub const TWO_PI: f64 = 2.0 * std::f64::consts::PI;
