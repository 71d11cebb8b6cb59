use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Arkwin: replay and inspect display-service boundary traffic.
#[derive(Parser, Debug)]
#[command(name = "arkwin", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (e.g. `arkwin=debug`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register the capture's callbacks, drain its events, print each call.
    Replay {
        /// Capture file (JSON).
        capture: PathBuf,
    },
    /// Decode every event in a capture without invoking anything.
    Inspect {
        /// Capture file (JSON).
        capture: PathBuf,
    },
    /// Write an example capture file.
    Sample {
        /// Output path.
        output: PathBuf,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
