//! Location of the calibration row and derivation of per-channel baselines.

use serde::{Deserialize, Serialize};
use spgen_core::errors::{ErrorInfo, SpError};
use spgen_core::TimeSeriesRow;
use tracing::debug;

use crate::config::JumpConfig;
use crate::quantize::normalized_jump;

/// Baselines captured at the calibration row. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// 0-based index of the calibration row in the input stream.
    pub index: usize,
    /// Time of the calibration row as read from the input.
    pub time: f64,
    /// Phase of every channel at the calibration row.
    pub offsets: Vec<f64>,
    /// Mean sample interval up to the calibration row.
    pub avg_timestep: f64,
}

impl Calibration {
    /// Number of consecutive rows a growing jump must persist, given the
    /// stability duration in seconds.
    pub fn stability_count(&self, stability_duration: f64) -> usize {
        (stability_duration / self.avg_timestep).ceil() as usize
    }

    /// Quantized jump count of every channel in `row`.
    pub fn jumps(&self, row: &TimeSeriesRow, threshold: f64) -> Vec<i64> {
        row.phases
            .iter()
            .zip(&self.offsets)
            .map(|(phase, offset)| normalized_jump(*phase, *offset, threshold))
            .collect()
    }
}

/// Streaming search for the calibration instant.
///
/// Rows are fed in time order; the calibrator counts them so the average
/// step can be derived without a second pass.
#[derive(Debug, Clone)]
pub struct OffsetCalibrator {
    instant: f64,
    tolerance: f64,
    consumed: usize,
    last_time: Option<f64>,
    found: bool,
}

impl OffsetCalibrator {
    /// Creates a calibrator for the configured instant.
    pub fn new(config: &JumpConfig) -> Self {
        Self {
            instant: config.calibration_instant,
            tolerance: config.calibration_tolerance,
            consumed: 0,
            last_time: None,
            found: false,
        }
    }

    /// Feeds the next row. Returns the calibration the first time a row
    /// matches the instant and `None` for every other row.
    pub fn observe(&mut self, row: &TimeSeriesRow) -> Result<Option<Calibration>, SpError> {
        let index = self.consumed;
        self.consumed += 1;
        self.last_time = Some(row.time);
        if self.found || !approx_eq(row.time, self.instant, self.tolerance) {
            return Ok(None);
        }
        if index == 0 {
            return Err(SpError::Calibration(
                ErrorInfo::new(
                    "spgen.calibration.first_row",
                    "calibration instant matches the first row",
                )
                .with_context("time", row.time.to_string())
                .with_hint("the average timestep needs at least one earlier sample"),
            ));
        }
        self.found = true;
        let calibration = Calibration {
            index,
            time: row.time,
            offsets: row.phases.clone(),
            avg_timestep: row.time / index as f64,
        };
        debug!(
            index,
            time = calibration.time,
            avg_timestep = calibration.avg_timestep,
            "calibration row located"
        );
        Ok(Some(calibration))
    }

    /// Error to report when the stream ended before the instant was seen.
    pub fn not_found(&self) -> SpError {
        let last = self
            .last_time
            .map(|time| time.to_string())
            .unwrap_or_else(|| "none".into());
        SpError::Calibration(
            ErrorInfo::new(
                "spgen.calibration.not_found",
                "input ended before the calibration instant",
            )
            .with_context("expected", self.instant.to_string())
            .with_context("last_time", last)
            .with_context("rows", self.consumed.to_string()),
        )
    }
}

/// Runs the calibrator over a complete row slice.
pub fn calibrate<'a, I>(rows: I, config: &JumpConfig) -> Result<Calibration, SpError>
where
    I: IntoIterator<Item = &'a TimeSeriesRow>,
{
    let mut calibrator = OffsetCalibrator::new(config);
    for row in rows {
        if let Some(calibration) = calibrator.observe(row)? {
            return Ok(calibration);
        }
    }
    Err(calibrator.not_found())
}

/// Relative closeness test: `|a - b| <= rel_tol * max(|a|, |b|)`.
pub fn approx_eq(a: f64, b: f64, rel_tol: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(step: f64, count: usize) -> Vec<TimeSeriesRow> {
        (0..count)
            .map(|i| TimeSeriesRow::new(i as f64 * step, vec![0.1 * i as f64, -0.5]))
            .collect()
    }

    #[test]
    fn average_step_from_index() {
        let calibration = calibrate(&rows(4e-12, 12), &JumpConfig::default()).unwrap();
        assert_eq!(calibration.index, 5);
        assert_eq!(calibration.avg_timestep, 4e-12);
        assert_eq!(calibration.stability_count(20e-12), 5);
        assert_eq!(calibration.offsets, vec![0.5, -0.5]);
    }

    #[test]
    fn missing_instant_reports_last_time() {
        let err = calibrate(&rows(1e-12, 10), &JumpConfig::default()).unwrap_err();
        assert_eq!(err.info().code, "spgen.calibration.not_found");
        assert_eq!(err.info().context["rows"], "10");
        assert_eq!(err.info().context["last_time"], (9.0_f64 * 1e-12).to_string());
    }

    #[test]
    fn first_row_match_is_rejected() {
        let config = JumpConfig {
            calibration_instant: 1e-12,
            ..JumpConfig::default()
        };
        let data = vec![
            TimeSeriesRow::new(1e-12, vec![0.0]),
            TimeSeriesRow::new(2e-12, vec![0.0]),
        ];
        let err = calibrate(&data, &config).unwrap_err();
        assert_eq!(err.info().code, "spgen.calibration.first_row");
    }

    #[test]
    fn closeness_is_relative() {
        assert!(approx_eq(20e-12, 20e-12 * (1.0 + 1e-12), 1e-9));
        assert!(!approx_eq(20e-12, 20.1e-12, 1e-9));
        assert!(approx_eq(0.0, 0.0, 1e-9));
    }
}
