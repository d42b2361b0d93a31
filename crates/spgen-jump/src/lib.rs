#![deny(missing_docs)]

//! Phase-jump extraction for simulated superconducting circuits.
//!
//! A trajectory is calibrated at a fixed instant, every later sample is
//! quantized into whole 2π jumps per channel, and a debounce gate decides
//! which samples become rows of the event table.

mod calibrate;
mod config;
mod extract;
mod gate;
mod quantize;
mod table;

pub use calibrate::{approx_eq, calibrate, Calibration, OffsetCalibrator};
pub use config::JumpConfig;
pub use extract::{extract_events, extract_from_rows, Extraction, ExtractionSummary};
pub use gate::StabilityGate;
pub use quantize::{normalized_jump, threshold_round};
pub use table::EventTableBuilder;
