//! Skyfly Dome - Headless Player
//!
//! Flies the stock city scene on the software reference device.
//!
//! # Usage
//!
//! ```bash
//! skyfly-dome --frames 600
//! skyfly-dome --frames 120 --fixed-dt 0.016 --script fly.toml
//! skyfly-dome --frames 1 --screenshot noon.png --config skyfly.toml
//! RUST_LOG=skyfly_core=trace skyfly-dome --frames 3
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use skyfly_dome::player::{PlayerConfig, run};

#[derive(Parser)]
#[command(name = "skyfly-dome")]
#[command(author, version, about = "Skyfly Dome - free-fly city scene on a software rasterizer")]
struct Args {
    /// Number of frames to run (runs until interrupted when omitted)
    #[arg(long, short = 'n')]
    frames: Option<u64>,

    /// Configuration file (TOML)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Input script (TOML) replayed one frame per tick
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Advance a fixed number of seconds per frame instead of wall time
    #[arg(long, value_name = "SECONDS")]
    fixed_dt: Option<f32>,

    /// Write the last presented frame to a PNG file
    #[arg(long, value_name = "FILE.png")]
    screenshot: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// `--verbose` forces debug; otherwise `RUST_LOG` when it parses, else info
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.verbose, std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    if let Some(dt) = args.fixed_dt
        && !(dt.is_finite() && dt >= 0.0)
    {
        anyhow::bail!("--fixed-dt must be a non-negative number of seconds, got {dt}");
    }

    let config = PlayerConfig {
        frames: args.frames,
        config_path: args.config,
        script_path: args.script,
        fixed_dt: args.fixed_dt,
        screenshot: args.screenshot,
    };

    tracing::info!("Starting {} player", skyfly_dome::console::skyfly_specs().name);
    run(&config)?;
    Ok(())
}
