//! The four CLI use cases.
//!
//! Each command pulls its inputs through the provider traits, so the same
//! code runs against a snapshot file, an in-memory [`Snapshot`] in tests, or
//! live collaborators.
//!
//! [`Snapshot`]: crate::infrastructure::Snapshot

use chrono::{DateTime, Utc};
use serde::Serialize;
use spanmap_core::domain::plan::{bind_horizontal, calibration_order};
use spanmap_core::{
    build_layout_url_from, export_json, resolve, CalibrationProvider, EngineConfig, MonitorId,
    MonitorProvider, PhysicalRect, ProviderError,
};
use thiserror::Error;
use tracing::info;

/// Error type for command execution.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A snapshot could not be obtained.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Nothing could be placed: no monitor has a known density, or every
    /// component lacks a unique root.
    #[error("no layout could be resolved: no monitor has a known density and a unique root")]
    NoLayout,

    /// The output document could not be serialized.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// One placed monitor in the `layout` report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedMonitor {
    pub id: MonitorId,
    pub ppi: f64,
    /// Position relative to the component root, inches.
    pub physical: PhysicalRect,
    /// Position on the viewer canvas, inches.
    pub normalized: PhysicalRect,
}

/// Output of the `layout` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    pub placed: Vec<PlacedMonitor>,
    /// Monitors that could not be placed.
    pub unresolved: Vec<MonitorId>,
}

/// One step of the `plan` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    pub subject: MonitorId,
    pub bound: MonitorId,
    pub bind_horizontal: bool,
}

/// Resolves the snapshot into a viewer URL.
///
/// # Errors
///
/// [`CommandError::Provider`] if a snapshot is unavailable and
/// [`CommandError::NoLayout`] if nothing could be placed.
pub fn run_url(
    monitors: &dyn MonitorProvider,
    calibration: &dyn CalibrationProvider,
    config: &EngineConfig,
) -> Result<String, CommandError> {
    let url = build_layout_url_from(monitors, calibration, config)?.ok_or(CommandError::NoLayout)?;
    info!("layout URL generated ({} bytes)", url.len());
    Ok(url)
}

/// Resolves the snapshot and reports densities and both rectangle frames.
///
/// An empty placement is not an error here; every monitor is then listed as
/// unresolved.
///
/// # Errors
///
/// [`CommandError::Provider`] if a snapshot is unavailable.
pub fn run_layout(
    monitors: &dyn MonitorProvider,
    calibration: &dyn CalibrationProvider,
    config: &EngineConfig,
) -> Result<LayoutReport, CommandError> {
    let monitors = monitors.monitors()?;
    let measurements = calibration.measurements()?;
    let resolution = resolve(&monitors, &measurements, config);

    let mut placed = Vec::new();
    let mut unresolved = Vec::new();
    for monitor in &monitors {
        let entry = resolution.densities.get(monitor.id).zip(
            resolution
                .physical
                .get(monitor.id)
                .zip(resolution.normalized.get(monitor.id)),
        );
        match entry {
            Some((ppi, (physical, normalized))) => placed.push(PlacedMonitor {
                id: monitor.id,
                ppi,
                physical: *physical,
                normalized: *normalized,
            }),
            None => unresolved.push(monitor.id),
        }
    }
    placed.sort_by_key(|p| p.id);
    placed.dedup_by_key(|p| p.id);
    unresolved.sort_unstable();
    unresolved.dedup();

    Ok(LayoutReport { placed, unresolved })
}

/// Builds the pretty-printed calibration export.
///
/// # Errors
///
/// [`CommandError::Provider`] if a snapshot is unavailable and
/// [`CommandError::Json`] if serialization fails.
pub fn run_export(
    monitors: &dyn MonitorProvider,
    calibration: &dyn CalibrationProvider,
    config: &EngineConfig,
    calibrated_at: DateTime<Utc>,
) -> Result<String, CommandError> {
    let monitors = monitors.monitors()?;
    let measurements = calibration.measurements()?;
    let resolution = resolve(&monitors, &measurements, config);
    Ok(export_json(&monitors, &measurements, &resolution.densities, calibrated_at)?)
}

/// Computes the order in which monitor pairs should be calibrated.
///
/// # Errors
///
/// [`CommandError::Provider`] if the monitor snapshot is unavailable.
pub fn run_plan(monitors: &dyn MonitorProvider) -> Result<Vec<PlanStep>, CommandError> {
    let monitors = monitors.monitors()?;
    let steps = calibration_order(&monitors)
        .into_iter()
        .filter_map(|(subject, bound)| {
            let a = monitors.iter().find(|m| m.id == subject)?;
            let b = monitors.iter().find(|m| m.id == bound)?;
            Some(PlanStep {
                subject,
                bound,
                bind_horizontal: bind_horizontal(a, b),
            })
        })
        .collect();
    Ok(steps)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
