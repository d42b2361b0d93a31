use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{
    extract::{self, ExtractArgs},
    version::{self, VersionArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "spgen",
    about = "Phase-jump specification file generator for simulated circuits"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a phase trajectory CSV into a table of quantized jumps.
    Extract(ExtractArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let verbose = matches!(&cli.command, Command::Extract(args) if args.verbose);
    init_tracing(verbose);
    match cli.command {
        Command::Extract(args) => extract::run(&args),
        Command::Version(args) => version::run(&args),
    }
}

/// Logs go to stderr so the verbose table echo on stdout stays clean.
/// `RUST_LOG` takes precedence over the verbosity flag.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
