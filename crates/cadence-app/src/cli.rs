use std::path::PathBuf;

use clap::Parser;

/// Cadence, a calendar assistant that talks to you on the console.
#[derive(Parser, Debug)]
#[command(name = "cadence", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Session key to continue; a fresh one is minted when absent.
    #[arg(short = 's', long)]
    pub session: Option<String>,

    /// Override `agent.max_model_calls` for this run.
    #[arg(long)]
    pub max_model_calls: Option<u32>,

    /// Log directive override (e.g. `cadence=debug`). `RUST_LOG` wins over both.
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
