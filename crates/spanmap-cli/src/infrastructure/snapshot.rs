//! Snapshot files: a monitor list plus the measurements taken on it.
//!
//! The discovery and calibration collaborators normally hand their snapshots
//! to the engine in memory.  For the CLI they are stored together in one file,
//! either JSON or TOML, using the same camelCase field names:
//!
//! ```json
//! {
//!   "monitors": [
//!     { "id": 0, "resolutionX": 2560, "resolutionY": 1440, "ppi": 109.0 },
//!     { "id": 1, "resolutionX": 1920, "resolutionY": 1080, "positionX": 2560 }
//!   ],
//!   "measurements": [
//!     { "monitorId": 1, "boundTo": 0, "scale": 0.75, "gap": 5, "bindHorizontal": true }
//!   ]
//! }
//! ```
//!
//! Loading plays the discovery collaborator's last step: a monitor with no
//! physical size gets one guessed from a diagonal in its names (`"LG 27GL850"`
//! is a 27" panel), so it can seed the density resolver.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use spanmap_core::pipeline::ProviderError;
use spanmap_core::{CalibrationMeasurement, CalibrationProvider, Monitor, MonitorProvider};
use thiserror::Error;
use tracing::debug;

/// Error type for snapshot loading.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The file could not be read.
    #[error("I/O error reading snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid snapshot JSON.
    #[error("failed to parse snapshot JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file is not valid snapshot TOML.
    #[error("failed to parse snapshot TOML {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The extension is neither `.json` nor `.toml`.
    #[error("unsupported snapshot format {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),
}

/// Monitors and measurements stored together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub monitors: Vec<Monitor>,
    #[serde(default)]
    pub measurements: Vec<CalibrationMeasurement>,
}

impl MonitorProvider for Snapshot {
    fn monitors(&self) -> Result<Vec<Monitor>, ProviderError> {
        Ok(self.monitors.clone())
    }
}

impl CalibrationProvider for Snapshot {
    fn measurements(&self) -> Result<Vec<CalibrationMeasurement>, ProviderError> {
        Ok(self.measurements.clone())
    }
}

/// File formats a snapshot can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapshotFormat {
    Json,
    Toml,
}

impl SnapshotFormat {
    /// Picks the format from the extension; no extension means JSON.
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            None => Some(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Some(Self::Toml),
            Some(_) => None,
        }
    }
}

/// Reads and parses a snapshot file.
///
/// # Errors
///
/// See [`SnapshotError`].
pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let format = SnapshotFormat::from_path(path)
        .ok_or_else(|| SnapshotError::UnsupportedFormat(path.to_path_buf()))?;
    let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut snapshot: Snapshot = match format {
        SnapshotFormat::Json => serde_json::from_str(&content).map_err(|source| SnapshotError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        SnapshotFormat::Toml => toml::from_str(&content).map_err(|source| SnapshotError::Toml {
            path: path.to_path_buf(),
            source,
        })?,
    };

    for monitor in &mut snapshot.monitors {
        if monitor.guess_physical_size() {
            debug!(
                "monitor {}: size {} from name, {:?}",
                monitor.id,
                monitor.size_source.as_str(),
                monitor.physical_size_mm
            );
        }
    }

    debug!(
        "loaded snapshot {}: {} monitors, {} measurements",
        path.display(),
        snapshot.monitors.len(),
        snapshot.measurements.len()
    );
    Ok(snapshot)
}

/// A snapshot file acting as both discovery and calibration collaborator.
///
/// The file is read once, on first use, and the result (or the failure) is
/// kept: monitors and measurements always come from the same read.  Create a
/// new provider to pick up later edits.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
    loaded: OnceLock<Result<Snapshot, String>>,
}

impl SnapshotFile {
    /// Creates a provider for `path`.  The file is not touched until used.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: OnceLock::new(),
        }
    }

    /// Returns the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn snapshot(&self) -> Result<&Snapshot, ProviderError> {
        self.loaded
            .get_or_init(|| load_snapshot(&self.path).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|msg| ProviderError::Unavailable(msg.clone()))
    }
}

impl MonitorProvider for SnapshotFile {
    fn monitors(&self) -> Result<Vec<Monitor>, ProviderError> {
        Ok(self.snapshot()?.monitors.clone())
    }
}

impl CalibrationProvider for SnapshotFile {
    fn measurements(&self) -> Result<Vec<CalibrationMeasurement>, ProviderError> {
        Ok(self.snapshot()?.measurements.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
