//! TOML configuration file.
//!
//! Every key is optional; a missing section or field falls back to the
//! engine defaults.  Example:
//!
//! ```toml
//! [canvas]
//! width = 144.0
//! height = 96.0
//!
//! [export]
//! base_url = "https://spanright.com/"
//!
//! [logging]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use spanmap_core::domain::config::{DEFAULT_BASE_URL, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use spanmap_core::{CanvasSize, EngineConfig};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is unusable, e.g. a non-positive canvas side.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Canvas the layout is centred on, in inches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: f64,
    #[serde(default = "default_canvas_height")]
    pub height: f64,
}

/// URL generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// Base URL the `#layout=` fragment is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_canvas_width() -> f64 {
    DEFAULT_CANVAS_WIDTH
}
fn default_canvas_height() -> f64 {
    DEFAULT_CANVAS_HEIGHT
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Converts the file settings into the engine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a canvas side that is not a
    /// positive finite number or an empty base URL.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        for (name, value) in [("canvas.width", self.canvas.width), ("canvas.height", self.canvas.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.export.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("export.base_url must not be empty".to_string()));
        }

        Ok(EngineConfig {
            canvas: CanvasSize {
                width: self.canvas.width,
                height: self.canvas.height,
            },
            base_url: self.export.base_url.clone(),
        })
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Loads settings from `path`, or returns the defaults when no path is given.
///
/// A path that was explicitly requested must exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parses settings from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
