//! aptsnap — keep aptly mirrors of Debian repositories fresh.
//!
//! # Usage
//!
//! ```text
//! aptsnap [-c|--config config.json] [-l|--logging info|debug|warn|error] [-p|--passphrase <value>]
//! ```
//!
//! One invocation runs one update cycle; an external scheduler re-invokes it.
//! Exit codes: 0 on success, 100 when an upstream release check answered with
//! a non-200 HTTP status, 1 for any other fatal error.

use std::fmt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use aptsnap_check::{CheckError, HttpProbe};
use aptsnap_core::config;
use aptsnap_sync::{cycle, CycleError, CycleSummary, Subprocess};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "aptsnap",
    version,
    about = "Update aptly mirrors, snapshot them, and republish on upstream changes",
    long_about = None,
)]
struct Cli {
    /// Configuration file to use.
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Logging level to use (info, debug, warn, error).
    #[arg(short, long, default_value_t = LogLevelArg::Info)]
    logging: LogLevelArg,

    /// Passphrase to unlock the repo signing key; required for any run that
    /// needs to publish.
    #[arg(short, long)]
    passphrase: Option<String>,
}

// ---------------------------------------------------------------------------
// Log level argument — parsed from CLI strings, converts to a tracing filter
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse the logging level from CLI args.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum LogLevelArg {
    #[default]
    Info,
    Debug,
    Warn,
    Error,
}

impl LogLevelArg {
    fn filter(self) -> &'static str {
        match self {
            LogLevelArg::Info => "info",
            LogLevelArg::Debug => "debug",
            LogLevelArg::Warn => "warn",
            LogLevelArg::Error => "error",
        }
    }
}

impl FromStr for LogLevelArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown logging level '{other}'; expected: info, debug, warn, error"
            )),
        }
    }
}

impl fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.filter())
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(summary) => print_summary(&summary),
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("{} {err:#}", "error:".red());
            std::process::exit(exit_code_for(&err));
        }
    }
}

fn run(cli: Cli) -> Result<CycleSummary> {
    let config = config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    init_logging(&config.log_path, cli.logging);

    let probe = HttpProbe::new(config.repo_base_url.clone());
    let summary = cycle::run(&config, cli.passphrase.as_deref(), &probe, &Subprocess)?;
    Ok(summary)
}

/// Exit code 100 is reserved for a non-200 answer from a release check.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<CycleError>() {
        Some(CycleError::Check(CheckError::Status { .. })) => 100,
        _ => 1,
    }
}

fn print_summary(summary: &CycleSummary) {
    for (name, updated) in &summary.updated {
        if *updated {
            println!("{} '{name}' republished", "✓".green());
        } else {
            println!("{} '{name}' already current", "·".dimmed());
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Log to the configured file (append), falling back to stderr when the file
/// cannot be opened. `RUST_LOG` overrides the `-l` flag when set.
fn init_logging(log_path: &Path, level: LogLevelArg) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.filter()));

    let file = OpenOptions::new().append(true).create(true).open(log_path);
    match file {
        Ok(file) => {
            let _ = fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .try_init();
        }
        Err(err) => {
            let _ = fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
            tracing::warn!("cannot open log file {}: {err}", log_path.display());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!("DEBUG".parse::<LogLevelArg>().unwrap(), LogLevelArg::Debug);
        assert_eq!("warn".parse::<LogLevelArg>().unwrap(), LogLevelArg::Warn);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let err = "loud".parse::<LogLevelArg>().unwrap_err();
        assert!(err.contains("loud"));
    }

    #[test]
    fn log_level_display_roundtrip() {
        for level in [
            LogLevelArg::Info,
            LogLevelArg::Debug,
            LogLevelArg::Warn,
            LogLevelArg::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevelArg>().unwrap(), level);
        }
    }
}
