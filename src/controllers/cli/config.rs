use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::controllers::dispatch::DispatchOptions;
use crate::core::data::niter::integral_value;

pub const DEFAULT_SINGLE_NITER: i64 = 500_000_000;
pub const DEFAULT_SWEEP_MIN: i64 = 100_000_000;
pub const DEFAULT_SWEEP_MAX: i64 = 10_000_000_000;
pub const DEFAULT_SWEEP_STEP: i64 = 100_000_000;
pub const DEFAULT_TERMINATION_GRACE_MS: u64 = 2_000;

pub const TIMEOUT_ENV: &str = "PI_OFFLOAD_TIMEOUT_MS";
pub const GRACE_ENV: &str = "PI_OFFLOAD_GRACE_MS";

/// Estimate pi on a dedicated worker thread
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "pi_offload", version)]
#[command(about = "Estimate pi once, in a batch or as a sweep over iteration counts")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Print wire-format JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Give up on a computation after this many milliseconds
    #[arg(long, global = true, value_name = "MS", env = "PI_OFFLOAD_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// How long to wait for a kernel to stop before detaching it
    #[arg(
        long,
        global = true,
        value_name = "MS",
        env = "PI_OFFLOAD_GRACE_MS",
        default_value_t = DEFAULT_TERMINATION_GRACE_MS
    )]
    pub grace_ms: u64,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Estimate pi once per NITER; several values run in parallel
    Single {
        #[arg(
            value_name = "NITER",
            value_parser = parse_integer,
            allow_negative_numbers = true,
            default_values_t = [DEFAULT_SINGLE_NITER]
        )]
        niters: Vec<i64>,
    },
    /// Estimate pi for every NITER from MIN to MAX in STEP increments
    Sweep {
        #[arg(value_parser = parse_integer, allow_negative_numbers = true, default_value_t = DEFAULT_SWEEP_MIN)]
        min: i64,
        #[arg(value_parser = parse_integer, allow_negative_numbers = true, default_value_t = DEFAULT_SWEEP_MAX)]
        max: i64,
        #[arg(value_parser = parse_integer, allow_negative_numbers = true, default_value_t = DEFAULT_SWEEP_STEP)]
        step: i64,
        /// Also write the series to this CSV file
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },
    /// Answer one JSON CALCULATE message per stdin line
    Serve,
}

impl Default for Command {
    fn default() -> Self {
        Self::Single {
            niters: vec![DEFAULT_SINGLE_NITER],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl CliConfig {
    /// The subcommand to run; no subcommand means a default single estimate.
    #[must_use]
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }

    #[must_use]
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            timeout: self.timeout_ms.map(Duration::from_millis),
            termination_grace: Duration::from_millis(self.grace_ms),
            ..DispatchOptions::default()
        }
    }
}

/// Accepts plain integers and integral floats such as `5e8`.
fn parse_integer(value: &str) -> Result<i64, String> {
    value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().and_then(integral_value))
        .ok_or_else(|| format!("expected an integer, got '{}'", value))
}
