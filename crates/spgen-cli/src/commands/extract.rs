use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use spgen_core::errors::SpError;
use spgen_io::{
    hash_file, load_csv, render_plain_table, write_plain_table, write_report, RunReport,
};
use spgen_jump::{extract_from_rows, JumpConfig};
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Phase trajectory CSV with a `time` column followed by phase columns.
    pub input: PathBuf,
    /// Output `.sp` file. Defaults to the input path with an `sp` extension.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Phase jump threshold as a fraction of 2π. Default: 0.8.
    #[arg(short, long)]
    pub threshold: Option<f64>,
    /// Seconds to wait for stability after a phase jump. Default: 20e-12.
    #[arg(short, long)]
    pub stability: Option<f64>,
    /// Calibration instant in seconds. Default: 20e-12.
    #[arg(short, long)]
    pub calibration: Option<f64>,
    /// YAML configuration file; explicit flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Omit the all-zero row at the calibration instant.
    #[arg(long)]
    pub no_baseline: bool,
    /// Also write a JSON run report to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Echo the resulting table on stdout.
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run(args: &ExtractArgs) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(args)?;
    let output = output_path(args);

    let trajectory = load_csv(&args.input)?;
    let extraction = extract_from_rows(trajectory.channels, &trajectory.rows, &config)?;

    let report = match &args.report {
        Some(path) => {
            let hash = hash_file(&args.input)?;
            Some((path, RunReport::new(&args.input, hash, &config, &extraction)))
        }
        None => None,
    };

    write_plain_table(&output, &extraction.table)?;
    if let Some((report_path, report)) = &report {
        if let Err(err) = write_report(report_path, report) {
            discard(&output);
            return Err(err.into());
        }
        info!(path = %report_path.display(), "run report written");
    }
    info!(path = %output.display(), rows = extraction.table.len(), "sp table written");

    if args.verbose {
        println!("{}", render_plain_table(&extraction.table));
    }
    Ok(())
}

/// Removes an output written earlier in a run that later failed.
fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %err, "could not remove partial output");
    }
}

/// Defaults, then the YAML file, then explicit flags; validated last.
pub fn resolve_config(args: &ExtractArgs) -> Result<JumpConfig, SpError> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| SpError::io("spgen.config.read", path, err))?;
            JumpConfig::from_yaml_str(&raw)?
        }
        None => JumpConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(stability) = args.stability {
        config.stability_duration = stability;
    }
    if let Some(calibration) = args.calibration {
        config.calibration_instant = calibration;
    }
    if args.no_baseline {
        config.include_baseline = false;
    }
    config.validate()?;
    Ok(config)
}

fn output_path(args: &ExtractArgs) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| default_output(&args.input))
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("sp")
}
