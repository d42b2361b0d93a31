//! Run parameters, their defaults and domain validation.

use serde::{Deserialize, Serialize};
use spgen_core::errors::{ErrorInfo, SpError};

/// Immutable parameters governing one extraction run.
///
/// Constructed once (from defaults, a YAML file or CLI flags) and passed by
/// reference into the calibrator and the gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JumpConfig {
    /// Time in seconds at which the phase baselines are captured.
    #[serde(default = "default_calibration_instant")]
    pub calibration_instant: f64,
    /// Fraction of 2π past which a partial rotation counts as a full jump.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Time in seconds a growing jump must persist before it is accepted.
    #[serde(default = "default_stability_duration")]
    pub stability_duration: f64,
    /// Relative tolerance used to match the calibration instant.
    #[serde(default = "default_calibration_tolerance")]
    pub calibration_tolerance: f64,
    /// Emit the all-zero row at the calibration instant as the first event.
    #[serde(default = "default_include_baseline")]
    pub include_baseline: bool,
}

fn default_calibration_instant() -> f64 {
    20e-12
}

fn default_threshold() -> f64 {
    0.8
}

fn default_stability_duration() -> f64 {
    20e-12
}

fn default_calibration_tolerance() -> f64 {
    1e-9
}

fn default_include_baseline() -> bool {
    true
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            calibration_instant: default_calibration_instant(),
            threshold: default_threshold(),
            stability_duration: default_stability_duration(),
            calibration_tolerance: default_calibration_tolerance(),
            include_baseline: default_include_baseline(),
        }
    }
}

impl JumpConfig {
    /// Parses a configuration from YAML; omitted keys take their defaults.
    pub fn from_yaml_str(raw: &str) -> Result<Self, SpError> {
        let config: JumpConfig = serde_yaml::from_str(raw).map_err(|err| {
            SpError::Config(
                ErrorInfo::new("spgen.config.yaml", "failed to parse configuration")
                    .with_hint(err.to_string()),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values outside their domain before any row is read.
    pub fn validate(&self) -> Result<(), SpError> {
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(SpError::Config(
                ErrorInfo::new(
                    "spgen.config.threshold",
                    "threshold must lie strictly between 0 and 1",
                )
                .with_context("threshold", self.threshold.to_string()),
            ));
        }
        positive("stability_duration", self.stability_duration)?;
        positive("calibration_instant", self.calibration_instant)?;
        positive("calibration_tolerance", self.calibration_tolerance)?;
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<(), SpError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(SpError::Config(
        ErrorInfo::new(
            format!("spgen.config.{name}"),
            format!("{name} must be a positive finite number"),
        )
        .with_context(name, value.to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = JumpConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.threshold, 0.8);
        assert_eq!(config.stability_duration, 20e-12);
        assert_eq!(config.calibration_instant, 20e-12);
    }

    #[test]
    fn threshold_bounds_are_exclusive() {
        for bad in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let config = JumpConfig {
                threshold: bad,
                ..JumpConfig::default()
            };
            let err = config.validate().unwrap_err();
            assert_eq!(err.info().code, "spgen.config.threshold");
        }
    }

    #[test]
    fn non_positive_durations_rejected() {
        let config = JumpConfig {
            stability_duration: 0.0,
            ..JumpConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err().info().code,
            "spgen.config.stability_duration"
        );
        let config = JumpConfig {
            calibration_instant: -20e-12,
            ..JumpConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err().info().code,
            "spgen.config.calibration_instant"
        );
    }

    #[test]
    fn yaml_fills_missing_keys() {
        let config = JumpConfig::from_yaml_str("threshold: 0.6\n").unwrap();
        assert_eq!(config.threshold, 0.6);
        assert_eq!(config.stability_duration, 20e-12);
        assert!(config.include_baseline);
    }

    #[test]
    fn yaml_rejects_unknown_keys_and_bad_values() {
        assert!(matches!(
            JumpConfig::from_yaml_str("treshold: 0.6\n"),
            Err(SpError::Config(_))
        ));
        assert!(matches!(
            JumpConfig::from_yaml_str("threshold: 1.2\n"),
            Err(SpError::Config(_))
        ));
    }
}
