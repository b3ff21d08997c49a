//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config path used when `--config` is not given. A missing file at this path
/// means built-in defaults; a missing explicit path is an error.
pub const DEFAULT_CONFIG: &str = "etc/wodtimer.toml";

#[derive(Parser, Debug)]
#[command(name = "wodtimer", version, about = "Workout interval timer")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Optional templates CSV (strict header: name,duration_secs)
    #[arg(long, value_name = "FILE")]
    pub templates: Option<PathBuf>,

    /// Emit JSON lines instead of plain text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count down from a duration to zero
    Countdown {
        /// Duration in seconds (1..=3599); overrides the config
        #[arg(long, value_name = "SECS", conflicts_with = "template")]
        secs: Option<i64>,
        /// Use the duration of a named template
        #[arg(long, value_name = "NAME")]
        template: Option<String>,
        /// Starting repetition count
        #[arg(long, value_name = "N")]
        reps: Option<i64>,
        /// Announce each elapsed second
        #[arg(long, action = ArgAction::SetTrue)]
        voice_count: bool,
        /// Stop after this many milliseconds of wall time
        #[arg(long, value_name = "MS")]
        max_run_ms: Option<u64>,
    },
    /// Count up until stopped
    Stopwatch {
        /// Stop after this many milliseconds of wall time
        #[arg(long, value_name = "MS")]
        max_run_ms: Option<u64>,
        /// Announce each elapsed second
        #[arg(long, action = ArgAction::SetTrue)]
        voice_count: bool,
    },
    /// Drive the timer with commands read from stdin
    Interactive {
        /// Stop after this many milliseconds of wall time
        #[arg(long, value_name = "MS")]
        max_run_ms: Option<u64>,
    },
    /// Report which notification collaborators are usable
    SelfCheck,
    /// List configured templates
    Templates,
}
