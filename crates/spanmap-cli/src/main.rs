//! spanmap: resolves a monitor calibration snapshot into a physical layout.
//!
//! Reads a snapshot file (monitors plus pairwise calibration measurements),
//! reconstructs the physical desk layout and prints one of:
//!
//! - `url`: the Spanright viewer link (default),
//! - `layout`: resolved densities and rectangles as JSON,
//! - `export`: the calibration export document,
//! - `plan`: the order in which monitor pairs should be calibrated.
//!
//! # Usage
//!
//! ```text
//! spanmap --snapshot <PATH> [OPTIONS] [COMMAND]
//!
//! Options:
//!   --snapshot      <PATH>  Snapshot file, .json or .toml      [env: SPANMAP_SNAPSHOT]
//!   --config        <PATH>  TOML settings file                 [env: SPANMAP_CONFIG]
//!   --log-level     <LEVEL> Log level when RUST_LOG is unset   [default: from config, else info]
//!   --canvas-width  <IN>    Override the canvas width
//!   --canvas-height <IN>    Override the canvas height
//!   --base-url      <URL>   Override the viewer base URL
//! ```
//!
//! Only the artifact goes to stdout; logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use spanmap_cli::application::{run_export, run_layout, run_plan, run_url};
use spanmap_cli::infrastructure::{load_config, AppConfig, SnapshotFile};
use spanmap_core::EngineConfig;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Multi-monitor calibration resolver.
#[derive(Debug, Parser)]
#[command(
    name = "spanmap",
    about = "Resolve monitor calibration measurements into a physical layout and Spanright URL",
    version
)]
struct Cli {
    /// Snapshot file with `monitors` and `measurements` (.json or .toml).
    #[arg(long, env = "SPANMAP_SNAPSHOT")]
    snapshot: PathBuf,

    /// TOML settings file.  Defaults apply when omitted.
    #[arg(long, env = "SPANMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is not set (overrides the config file).
    #[arg(long)]
    log_level: Option<String>,

    /// Canvas width in inches (overrides the config file).
    #[arg(long)]
    canvas_width: Option<f64>,

    /// Canvas height in inches (overrides the config file).
    #[arg(long)]
    canvas_height: Option<f64>,

    /// Viewer base URL (overrides the config file).
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// What to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Print the Spanright layout URL.
    Url,
    /// Print resolved densities and rectangles as JSON.
    Layout,
    /// Print the calibration export JSON.
    Export,
    /// Print the calibration pair order as JSON.
    Plan,
}

impl Cli {
    /// Applies command-line overrides on top of the file settings.
    fn apply_overrides(&self, mut file: AppConfig) -> AppConfig {
        if let Some(width) = self.canvas_width {
            file.canvas.width = width;
        }
        if let Some(height) = self.canvas_height {
            file.canvas.height = height;
        }
        if let Some(base_url) = &self.base_url {
            file.export.base_url = base_url.clone();
        }
        if let Some(level) = &self.log_level {
            file.logging.level = level.clone();
        }
        file
    }

    /// Loads the config file (if any) and merges the overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if `--config` names an unreadable or malformed file,
    /// or if the merged values are invalid.
    fn into_settings(self) -> anyhow::Result<Settings> {
        let file = load_config(self.config.as_deref()).with_context(|| match &self.config {
            Some(path) => format!("failed to load config file '{}'", path.display()),
            None => "failed to load default config".to_string(),
        })?;
        let app = self.apply_overrides(file);
        let engine = app.engine_config().context("invalid configuration")?;

        Ok(Settings {
            snapshot: self.snapshot,
            command: self.command.unwrap_or(Command::Url),
            log_level: app.logging.level,
            engine,
        })
    }
}

/// Everything `main` needs after argument and config parsing.
#[derive(Debug)]
struct Settings {
    snapshot: PathBuf,
    command: Command,
    log_level: String,
    engine: EngineConfig,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let settings = Cli::parse().into_settings()?;

    // `RUST_LOG` wins; otherwise the configured level.  stderr keeps stdout clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    info!(
        "spanmap {} starting: snapshot={}, command={:?}",
        env!("CARGO_PKG_VERSION"),
        settings.snapshot.display(),
        settings.command
    );
    debug!("engine config: {:?}", settings.engine);

    let output = run(&settings)?;
    println!("{output}");
    Ok(())
}

/// Runs the selected command and returns its stdout text.
fn run(settings: &Settings) -> anyhow::Result<String> {
    let source = SnapshotFile::new(&settings.snapshot);
    let context = || format!("snapshot '{}'", settings.snapshot.display());

    match settings.command {
        Command::Url => run_url(&source, &source, &settings.engine).with_context(context),
        Command::Layout => {
            to_json(&run_layout(&source, &source, &settings.engine).with_context(context)?)
        }
        Command::Export => run_export(&source, &source, &settings.engine, chrono::Utc::now())
            .with_context(context),
        Command::Plan => to_json(&run_plan(&source).with_context(context)?),
    }
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_only_snapshot() {
        // Arrange: parse with just the snapshot (all other defaults apply)
        let cli = Cli::parse_from(["spanmap", "--snapshot", "desk.json"]);

        // Assert
        assert_eq!(cli.snapshot, PathBuf::from("desk.json"));
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_missing_snapshot_is_rejected() {
        // Only valid when SPANMAP_SNAPSHOT is not set in the test environment
        if std::env::var_os("SPANMAP_SNAPSHOT").is_none() {
            assert!(Cli::try_parse_from(["spanmap"]).is_err());
        }
    }

    #[test]
    fn test_cli_parses_subcommands() {
        for (arg, expected) in [
            ("url", Command::Url),
            ("layout", Command::Layout),
            ("export", Command::Export),
            ("plan", Command::Plan),
        ] {
            let cli = Cli::parse_from(["spanmap", "--snapshot", "desk.json", arg]);
            assert_eq!(cli.command, Some(expected));
        }
    }

    #[test]
    fn test_into_settings_defaults_to_url_and_engine_defaults() {
        let cli = Cli::parse_from(["spanmap", "--snapshot", "desk.json"]);

        let settings = cli.into_settings().unwrap();

        assert_eq!(settings.command, Command::Url);
        assert_eq!(settings.engine, EngineConfig::default());
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_into_settings_applies_overrides() {
        let cli = Cli::parse_from([
            "spanmap",
            "--snapshot",
            "desk.json",
            "--canvas-width",
            "200",
            "--canvas-height",
            "100",
            "--base-url",
            "http://localhost:5173/",
            "--log-level",
            "debug",
        ]);

        let settings = cli.into_settings().unwrap();

        assert_eq!(settings.engine.canvas.center(), (100.0, 50.0));
        assert_eq!(settings.engine.base_url, "http://localhost:5173/");
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_into_settings_rejects_invalid_canvas() {
        let cli = Cli::parse_from(["spanmap", "--snapshot", "desk.json", "--canvas-width", "0"]);
        assert!(cli.into_settings().is_err());
    }

    #[test]
    fn test_into_settings_missing_config_file_is_error() {
        let cli = Cli::parse_from([
            "spanmap",
            "--snapshot",
            "desk.json",
            "--config",
            "/nonexistent/spanmap/config.toml",
        ]);

        let err = cli.into_settings().unwrap_err();

        assert!(err.to_string().contains("failed to load config file"));
    }
}
