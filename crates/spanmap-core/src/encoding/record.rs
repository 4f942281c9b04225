//! The versioned layout record consumed by the viewer.
//!
//! Field names are deliberately one or two letters: the record travels in a
//! URL fragment, so every byte counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::alias::format_resolution;
use crate::domain::layout::PhysicalLayout;
use crate::domain::monitor::{Monitor, MonitorId};

/// Current record format version.
pub const LAYOUT_VERSION: u32 = 1;

/// Rotation written for monitors in portrait orientation.
const ROTATION_90: u16 = 90;

/// Fallback aspect ratio when a resolution has a zero dimension.
const DEFAULT_ASPECT_RATIO: [u32; 2] = [16, 9];

/// The `{v, m}` container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    /// Format version, always [`LAYOUT_VERSION`] when produced here.
    pub v: u32,
    /// One entry per placed monitor, in ascending monitor id order.
    pub m: Vec<MonitorRecord>,
}

/// One monitor on the viewer canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorRecord {
    /// Display label: `"{diagonal}\" {alias}"`, e.g. `27" QHD`.
    pub n: String,
    /// Diagonal in inches, 2 decimals.
    pub d: f64,
    /// Reduced aspect ratio.
    pub ar: [u32; 2],
    /// Horizontal resolution.
    pub rx: u32,
    /// Vertical resolution.
    pub ry: u32,
    /// Canvas X of the top-left corner (inches).
    pub x: f64,
    /// Canvas Y of the top-left corner (inches).
    pub y: f64,
    /// `90` for portrait monitors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rot: Option<u16>,
    /// OS display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dn: Option<String>,
}

/// Builds the record for a normalized layout.
///
/// Every rectangle must belong to a monitor in `monitors`; rectangles without
/// metadata are skipped.
pub fn build_record(layout: &PhysicalLayout, monitors: &[Monitor]) -> LayoutRecord {
    let mut by_id: BTreeMap<MonitorId, &Monitor> = BTreeMap::new();
    for monitor in monitors {
        by_id.entry(monitor.id).or_insert(monitor);
    }

    let m = layout
        .iter()
        .filter_map(|(id, rect)| {
            let monitor = by_id.get(&id)?;
            let diagonal = rect.diagonal();
            Some(MonitorRecord {
                n: format!(
                    "{}\" {}",
                    (diagonal + 0.5).floor() as i64,
                    format_resolution(monitor.resolution_x, monitor.resolution_y)
                ),
                d: round2(diagonal),
                ar: aspect_ratio(monitor.resolution_x, monitor.resolution_y),
                rx: monitor.resolution_x,
                ry: monitor.resolution_y,
                x: rect.x,
                y: rect.y,
                rot: monitor.is_rotated_90().then_some(ROTATION_90),
                dn: monitor.display_name().map(str::to_string),
            })
        })
        .collect();

    LayoutRecord { v: LAYOUT_VERSION, m }
}

/// Reduces a resolution to its aspect ratio; `[16, 9]` when a side is zero.
pub fn aspect_ratio(width: u32, height: u32) -> [u32; 2] {
    if width == 0 || height == 0 {
        return DEFAULT_ASPECT_RATIO;
    }
    let g = gcd(width, height);
    [width / g, height / g]
}

/// Greatest common divisor (Euclid).  `gcd(0, 0) == 0`.
pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::monitor::{PhysicalRect, ORIENTATION_ROTATED_90};

    fn single(monitor: Monitor, ppi: f64) -> LayoutRecord {
        let rect = PhysicalRect {
            x: 60.0,
            y: 40.0,
            width: monitor.resolution_x as f64 / ppi,
            height: monitor.resolution_y as f64 / ppi,
        };
        let layout = PhysicalLayout::from_rects([(monitor.id, rect)]);
        build_record(&layout, &[monitor])
    }

    // ── Aspect ratio ──────────────────────────────────────────────────────────

    #[test]
    fn test_aspect_ratio_reduces_by_gcd() {
        assert_eq!(aspect_ratio(2560, 1440), [16, 9]);
        assert_eq!(aspect_ratio(3440, 1440), [43, 18]);
        assert_eq!(aspect_ratio(1920, 1200), [8, 5]);
    }

    #[test]
    fn test_aspect_ratio_with_zero_dimension() {
        assert_eq!(aspect_ratio(0, 0), [16, 9]);
        assert_eq!(aspect_ratio(1920, 0), [16, 9]);
        assert_eq!(aspect_ratio(0, 1080), [16, 9]);
        assert_eq!(gcd(0, 0), 0);
    }

    // ── Monitor records ───────────────────────────────────────────────────────

    #[test]
    fn test_record_labels_monitor_with_rounded_diagonal_and_alias() {
        // Arrange: 27" QHD at ~108.79 ppi
        let monitor = Monitor::new(0, 2560, 1440);

        // Act
        let record = single(monitor, 108.79);

        // Assert
        assert_eq!(record.v, 1);
        let entry = &record.m[0];
        assert_eq!(entry.n, "27\" QHD");
        assert_eq!(entry.d, 27.0);
        assert_eq!(entry.ar, [16, 9]);
        assert_eq!((entry.rx, entry.ry), (2560, 1440));
        assert_eq!((entry.x, entry.y), (60.0, 40.0));
        assert_eq!(entry.rot, None);
        assert_eq!(entry.dn, None);
    }

    #[test]
    fn test_record_uses_literal_resolution_for_unknown_alias() {
        let record = single(Monitor::new(0, 1366, 768), 100.0);
        assert!(record.m[0].n.ends_with("\" 1366x768"), "got {}", record.m[0].n);
    }

    #[test]
    fn test_record_marks_only_rotated_90_orientation() {
        let mut portrait = Monitor::new(0, 1080, 1920);
        portrait.orientation = ORIENTATION_ROTATED_90;
        let mut flipped = Monitor::new(1, 1920, 1080);
        flipped.orientation = 2;

        assert_eq!(single(portrait, 92.0).m[0].rot, Some(90));
        assert_eq!(single(flipped, 92.0).m[0].rot, None);
    }

    #[test]
    fn test_record_prefers_friendly_name_then_monitor_name() {
        let mut generic = Monitor::new(0, 1920, 1080);
        generic.monitor_name = Some("Generic PnP Monitor".to_string());
        let named = Monitor::new(1, 1920, 1080).named("DELL U2720Q");

        assert_eq!(single(generic, 92.0).m[0].dn.as_deref(), Some("Generic PnP Monitor"));
        assert_eq!(single(named, 92.0).m[0].dn.as_deref(), Some("DELL U2720Q"));
    }

    #[test]
    fn test_record_lists_monitors_in_id_order_and_skips_unknown_rects() {
        let rect = PhysicalRect { x: 0.0, y: 0.0, width: 10.0, height: 5.0 };
        let layout = PhysicalLayout::from_rects([(2, rect), (0, rect), (9, rect)]);
        let monitors = vec![Monitor::new(2, 1920, 1080), Monitor::new(0, 2560, 1440)];

        let record = build_record(&layout, &monitors);

        let resolutions: Vec<u32> = record.m.iter().map(|m| m.rx).collect();
        assert_eq!(resolutions, vec![2560, 1920]);
    }

    #[test]
    fn test_record_json_omits_absent_optional_fields() {
        let record = single(Monitor::new(0, 1920, 1080), 96.0);

        let json = serde_json::to_string(&record).unwrap();

        assert!(json.starts_with("{\"v\":1,\"m\":[{\"n\":"), "got {json}");
        assert!(!json.contains("\"rot\""));
        assert!(!json.contains("\"dn\""));
    }
}
