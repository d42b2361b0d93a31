//! JSON run reports with input provenance.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use spgen_core::errors::{ErrorInfo, SpError};
use spgen_core::provenance::{RunProvenance, SchemaVersion};
use spgen_jump::{Extraction, ExtractionSummary, JumpConfig};

use crate::write::ensure_parent;

/// Schema of [`RunReport`] payloads.
pub const REPORT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Machine readable record of one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema of this payload, always [`REPORT_SCHEMA`] when written.
    pub schema_version: SchemaVersion,
    /// Input file hash and path plus the tool version.
    pub provenance: RunProvenance,
    /// Parameters after defaults, file values and flags were merged.
    pub config: JumpConfig,
    /// Calibration and scan statistics.
    pub summary: ExtractionSummary,
    /// Calibration offset per channel label, in radians.
    pub offsets: BTreeMap<String, f64>,
}

impl RunReport {
    /// Assembles a report for a finished extraction of `input_path`.
    pub fn new(
        input_path: &Path,
        input_hash: String,
        config: &JumpConfig,
        extraction: &Extraction,
    ) -> Self {
        let offsets = extraction
            .table
            .channels
            .labels()
            .iter()
            .cloned()
            .zip(extraction.calibration.offsets.iter().copied())
            .collect();
        let tool_versions = [(
            env!("CARGO_PKG_NAME").to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        )]
        .into_iter()
        .collect();
        Self {
            schema_version: REPORT_SCHEMA,
            provenance: RunProvenance {
                input_hash,
                input_path: input_path.display().to_string(),
                tool_versions,
            },
            config: config.clone(),
            summary: extraction.summary.clone(),
            offsets,
        }
    }
}

/// SHA-256 of the file contents as lowercase hex.
pub fn hash_file(path: &Path) -> Result<String, SpError> {
    let bytes = fs::read(path).map_err(|err| SpError::io("spgen.io.hash", path, err))?;
    Ok(format!("{:x}", Sha256::digest(bytes)))
}

/// Serializes `value` as pretty JSON with object keys sorted.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SpError> {
    let value = serde_json::to_value(value).map_err(wrap_json)?;
    serde_json::to_vec_pretty(&value).map_err(wrap_json)
}

/// Writes the report as canonical JSON.
pub fn write_report(path: &Path, report: &RunReport) -> Result<(), SpError> {
    ensure_parent(path)?;
    let bytes = to_canonical_json_bytes(report)?;
    fs::write(path, bytes).map_err(|err| SpError::io("spgen.io.write_report", path, err))
}

fn wrap_json(err: serde_json::Error) -> SpError {
    SpError::Io(
        ErrorInfo::new("spgen.io.json", "failed to encode report").with_hint(err.to_string()),
    )
}
