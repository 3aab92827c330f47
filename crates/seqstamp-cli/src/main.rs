#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod telemetry;

use std::io::{BufWriter, Write};

use clap::Parser;
use config::{CliArgs, Config};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry()?;
    tracing::debug!(?config, "starting");

    let lines = commands::run(&config)?;

    let mut out = BufWriter::new(std::io::stdout().lock());
    for line in &lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    tracing::debug!(lines = lines.len(), "done");
    Ok(())
}
