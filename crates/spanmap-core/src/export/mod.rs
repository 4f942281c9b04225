//! Human-readable calibration export.
//!
//! Unlike the compact URL record, this document keeps every input that went
//! into the layout so a calibration session can be inspected or archived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::density::DensityMap;
use crate::domain::monitor::{CalibrationMeasurement, Monitor, MonitorId};
use crate::domain::physical::SizeSource;

/// Current export format version.
pub const EXPORT_VERSION: u32 = 1;

/// `calibratedAt` timestamp format (UTC, second precision).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// The exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationExport {
    pub version: u32,
    pub calibrated_at: String,
    pub monitors: Vec<CalibratedMonitor>,
}

/// One monitor and the measurement that calibrated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibratedMonitor {
    pub id: MonitorId,
    pub display_name: String,
    pub resolution: [u32; 2],
    pub physical_size_mm: Option<[u32; 2]>,
    pub size_source: SizeSource,
    pub is_primary: bool,
    pub virtual_position: [i32; 2],
    /// Resolved density; `null` when the monitor is unreachable.
    pub ppi: Option<f64>,
    pub scale: f64,
    pub gap: i32,
    pub bound_to: Option<MonitorId>,
    pub bind_horizontal: Option<bool>,
    /// Alignment offset in the bound monitor's pixels.
    pub align_offset_bound: f64,
    /// Alignment offset in this monitor's pixels.
    pub align_offset_unbound: f64,
}

/// Assembles the export in snapshot order.
///
/// A monitor's measurement is the first one naming it as subject.  Monitors
/// that were never measured get scale 1, gap 0, zero alignment offsets and no
/// bound monitor.
pub fn build_export(
    monitors: &[Monitor],
    measurements: &[CalibrationMeasurement],
    densities: &DensityMap,
    calibrated_at: DateTime<Utc>,
) -> CalibrationExport {
    let monitors = monitors
        .iter()
        .map(|monitor| {
            let measurement = measurements.iter().find(|m| m.monitor_id == monitor.id);
            CalibratedMonitor {
                id: monitor.id,
                display_name: monitor.label(),
                resolution: [monitor.resolution_x, monitor.resolution_y],
                physical_size_mm: monitor
                    .physical_size_mm
                    .map(|size| [size.width_mm, size.height_mm]),
                size_source: monitor.size_source,
                is_primary: monitor.is_primary,
                virtual_position: [monitor.position_x, monitor.position_y],
                ppi: densities.get(monitor.id),
                scale: measurement.map_or(1.0, |m| m.scale),
                gap: measurement.map_or(0, |m| m.gap),
                bound_to: measurement.map(|m| m.bound_to),
                bind_horizontal: measurement.map(|m| m.bind_horizontal),
                align_offset_bound: measurement.map_or(0.0, |m| m.align_offset_bound),
                align_offset_unbound: measurement.map_or(0.0, |m| m.align_offset_unbound),
            }
        })
        .collect();

    CalibrationExport {
        version: EXPORT_VERSION,
        calibrated_at: calibrated_at.format(TIMESTAMP_FORMAT).to_string(),
        monitors,
    }
}

/// Builds the export and pretty-prints it as JSON.
///
/// # Errors
///
/// Returns the `serde_json` error if serialization fails.
pub fn export_json(
    monitors: &[Monitor],
    measurements: &[CalibrationMeasurement],
    densities: &DensityMap,
    calibrated_at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&build_export(monitors, measurements, densities, calibrated_at))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::density::resolve_densities;
    use crate::domain::physical::PhysicalSizeMm;
    use chrono::TimeZone;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    fn make_snapshot() -> (Vec<Monitor>, Vec<CalibrationMeasurement>) {
        let mut primary = Monitor::new(0, 2560, 1440).with_ppi(109.0).named("LG 27GL850");
        primary.is_primary = true;
        primary.physical_size_mm = Some(PhysicalSizeMm { width_mm: 597, height_mm: 336 });
        primary.size_source = SizeSource::Edid;
        let side = Monitor::new(1, 1920, 1080).at(2560, 0);
        let measurements = vec![CalibrationMeasurement::horizontal(1, 0, 0.75, 5).aligned(120.0, -40.0)];
        (vec![primary, side], measurements)
    }

    #[test]
    fn test_build_export_formats_timestamp_as_utc_seconds() {
        let (monitors, measurements) = make_snapshot();
        let densities = resolve_densities(&monitors, &measurements);

        let export = build_export(&monitors, &measurements, &densities, timestamp());

        assert_eq!(export.version, 1);
        assert_eq!(export.calibrated_at, "2024-03-09T07:05:01Z");
    }

    #[test]
    fn test_build_export_carries_measurement_and_resolved_density() {
        // Arrange
        let (monitors, measurements) = make_snapshot();
        let densities = resolve_densities(&monitors, &measurements);

        // Act
        let export = build_export(&monitors, &measurements, &densities, timestamp());

        // Assert
        let side = &export.monitors[1];
        assert_eq!(side.display_name, "Display 2");
        assert_eq!(side.scale, 0.75);
        assert_eq!(side.gap, 5);
        assert_eq!(side.bound_to, Some(0));
        assert_eq!(side.bind_horizontal, Some(true));
        assert!((side.ppi.unwrap() - 81.75).abs() < 1e-9);
    }

    #[test]
    fn test_build_export_defaults_uncalibrated_monitor() {
        let (monitors, measurements) = make_snapshot();
        let densities = resolve_densities(&monitors, &measurements);

        let export = build_export(&monitors, &measurements, &densities, timestamp());

        let primary = &export.monitors[0];
        assert_eq!(primary.display_name, "LG 27GL850");
        assert_eq!((primary.scale, primary.gap, primary.bound_to), (1.0, 0, None));
        assert_eq!((primary.align_offset_bound, primary.align_offset_unbound), (0.0, 0.0));
        assert_eq!(primary.physical_size_mm, Some([597, 336]));
        assert_eq!(primary.size_source, SizeSource::Edid);
    }

    #[test]
    fn test_build_export_keeps_alignment_offsets() {
        // Arrange: the side monitor was aligned against the reference
        let (monitors, measurements) = make_snapshot();
        let densities = resolve_densities(&monitors, &measurements);

        // Act
        let export = build_export(&monitors, &measurements, &densities, timestamp());

        // Assert: the archived offsets match the measurement exactly
        let side = &export.monitors[1];
        assert_eq!(side.align_offset_bound, 120.0);
        assert_eq!(side.align_offset_unbound, -40.0);
    }

    #[test]
    fn test_export_json_uses_camel_case_keys() {
        let (monitors, measurements) = make_snapshot();
        let densities = resolve_densities(&monitors, &measurements);

        let json = export_json(&monitors, &measurements, &densities, timestamp()).unwrap();

        assert!(json.contains("\"calibratedAt\": \"2024-03-09T07:05:01Z\""));
        assert!(json.contains("\"boundTo\": 0"));
        assert!(json.contains("\"sizeSource\": \"edid\""));
        assert!(json.contains("\"virtualPosition\""));
        assert!(json.contains("\"alignOffsetBound\": 120.0"));
        assert!(json.contains("\"alignOffsetUnbound\": -40.0"));
    }
}
