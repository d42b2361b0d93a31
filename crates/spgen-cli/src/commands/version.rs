use std::error::Error;

use clap::Args;
use serde::Serialize;
use spgen_core::SchemaVersion;
use spgen_io::{to_canonical_json_bytes, REPORT_SCHEMA};

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit the report schema version and default parameters as JSON.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: String,
    report_schema: SchemaVersion,
    defaults: spgen_jump::JumpConfig,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("spgen {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let info = VersionInfo {
        version: env!("CARGO_PKG_VERSION").into(),
        report_schema: REPORT_SCHEMA,
        defaults: spgen_jump::JumpConfig::default(),
    };
    let json = to_canonical_json_bytes(&info)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}
