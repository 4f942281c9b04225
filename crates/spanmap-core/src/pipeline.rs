//! End-to-end pipeline and the collaborator seams.
//!
//! Monitor discovery and the interactive calibration procedure live outside
//! this crate.  They plug in through [`MonitorProvider`] and
//! [`CalibrationProvider`]; everything after that is a chain of pure stages:
//!
//! ```text
//! MonitorProvider ──┐
//!                   ├─► MeasurementGraph ─► densities ─► physical layout
//! CalibrationProvider┘                                       │
//!                                                normalize_layout(canvas)
//!                                                            │
//!                                              build_record ─► build_url
//! ```

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::config::EngineConfig;
use crate::domain::density::{resolve_densities_in, DensityMap};
use crate::domain::graph::MeasurementGraph;
use crate::domain::layout::{resolve_layout_in, PhysicalLayout};
use crate::domain::monitor::{CalibrationMeasurement, Monitor};
use crate::domain::normalize::normalize_layout;
use crate::encoding::record::build_record;
use crate::encoding::url::build_url;

/// Error returned by a snapshot provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The collaborator could not produce a snapshot.
    ///
    /// The inner string is a human-readable reason, e.g. the path of a
    /// snapshot file that failed to parse.
    #[error("snapshot unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the current monitor snapshot.
#[cfg_attr(test, mockall::automock)]
pub trait MonitorProvider {
    /// Returns every connected monitor.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unavailable`] if discovery fails.
    fn monitors(&self) -> Result<Vec<Monitor>, ProviderError>;
}

/// Supplies the calibration measurements collected so far.
#[cfg_attr(test, mockall::automock)]
pub trait CalibrationProvider {
    /// Returns the measurements in the order they were taken.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unavailable`] if no session is available.
    fn measurements(&self) -> Result<Vec<CalibrationMeasurement>, ProviderError>;
}

/// Every intermediate result of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Monitor id → pixels per inch.
    pub densities: DensityMap,
    /// Resolved rectangles, root of each component at (0, 0).
    pub physical: PhysicalLayout,
    /// `physical` centred on the canvas with rounded positions.
    pub normalized: PhysicalLayout,
}

impl Resolution {
    /// Returns `true` when no monitor could be placed.
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Runs graph construction, density and layout resolution, and normalization.
pub fn resolve(
    monitors: &[Monitor],
    measurements: &[CalibrationMeasurement],
    config: &EngineConfig,
) -> Resolution {
    let graph = MeasurementGraph::build(monitors, measurements);
    let densities = resolve_densities_in(&graph);
    let physical = resolve_layout_in(&graph, &densities);
    let normalized = normalize_layout(&physical, config.canvas);

    Resolution {
        densities,
        physical,
        normalized,
    }
}

/// Resolves the snapshot and encodes it as a viewer URL.
///
/// Returns `None` when nothing could be placed.
pub fn build_layout_url(
    monitors: &[Monitor],
    measurements: &[CalibrationMeasurement],
    config: &EngineConfig,
) -> Option<String> {
    let resolution = resolve(monitors, measurements, config);
    if resolution.is_empty() {
        debug!("no monitor could be placed; no layout URL");
        return None;
    }

    let record = build_record(&resolution.normalized, monitors);
    match build_url(&config.base_url, &record) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("failed to encode layout: {e}");
            None
        }
    }
}

/// Pulls snapshots from the providers and runs [`build_layout_url`].
///
/// # Errors
///
/// Propagates the first [`ProviderError`]; an empty layout is `Ok(None)`.
pub fn build_layout_url_from(
    monitor_provider: &dyn MonitorProvider,
    calibration_provider: &dyn CalibrationProvider,
    config: &EngineConfig,
) -> Result<Option<String>, ProviderError> {
    let monitors = monitor_provider.monitors()?;
    let measurements = calibration_provider.measurements()?;
    debug!(
        "building layout URL from {} monitors and {} measurements",
        monitors.len(),
        measurements.len()
    );
    Ok(build_layout_url(&monitors, &measurements, config))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
