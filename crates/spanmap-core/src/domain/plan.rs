//! Calibration planning.
//!
//! The interactive procedure measures one monitor against an already
//! calibrated neighbour at a time.  These helpers decide the pair order and
//! whether each pair sits side by side or stacked, using only the OS logical
//! rectangles.

use super::monitor::{Monitor, MonitorId};

/// Returns `true` when `a` and `b` are side by side rather than stacked.
///
/// Side by side means their vertical overlap is at least their horizontal
/// overlap in OS pixel space.  Disjoint diagonal neighbours count as side by
/// side.
pub fn bind_horizontal(a: &Monitor, b: &Monitor) -> bool {
    let (a_left, a_top, a_right, a_bottom) = os_edges(a);
    let (b_left, b_top, b_right, b_bottom) = os_edges(b);

    let vertical_overlap = (a_bottom.min(b_bottom) - a_top.max(b_top)).max(0);
    let horizontal_overlap = (a_right.min(b_right) - a_left.max(b_left)).max(0);
    vertical_overlap >= horizontal_overlap
}

/// Orders calibration pairs as `(subject, bound)` ids.
///
/// Starts from the primary monitor (the first one when none is primary) and
/// repeatedly picks the uncalibrated monitor whose OS centre is closest to the
/// centre of any calibrated one.  Ties keep the earliest pair in snapshot
/// order.  Fewer than two monitors need no calibration.
pub fn calibration_order(monitors: &[Monitor]) -> Vec<(MonitorId, MonitorId)> {
    if monitors.len() < 2 {
        return Vec::new();
    }

    let start = monitors.iter().position(|m| m.is_primary).unwrap_or(0);
    let mut calibrated = vec![false; monitors.len()];
    calibrated[start] = true;

    let mut pairs = Vec::with_capacity(monitors.len() - 1);
    while let Some((subject, bound)) = nearest_pair(monitors, &calibrated) {
        calibrated[subject] = true;
        pairs.push((monitors[subject].id, monitors[bound].id));
    }
    pairs
}

/// Finds the (uncalibrated, calibrated) index pair with the smallest centre
/// distance.
fn nearest_pair(monitors: &[Monitor], calibrated: &[bool]) -> Option<(usize, usize)> {
    let mut best: Option<(f64, usize, usize)> = None;

    for (i, subject) in monitors.iter().enumerate().filter(|(i, _)| !calibrated[*i]) {
        let (sx, sy) = os_center(subject);
        for (j, bound) in monitors.iter().enumerate().filter(|(j, _)| calibrated[*j]) {
            let (bx, by) = os_center(bound);
            let distance = (sx - bx).hypot(sy - by);
            if best.map_or(true, |(d, _, _)| distance < d) {
                best = Some((distance, i, j));
            }
        }
    }

    best.map(|(_, i, j)| (i, j))
}

fn os_edges(monitor: &Monitor) -> (i64, i64, i64, i64) {
    let left = i64::from(monitor.position_x);
    let top = i64::from(monitor.position_y);
    (
        left,
        top,
        left + i64::from(monitor.resolution_x),
        top + i64::from(monitor.resolution_y),
    )
}

fn os_center(monitor: &Monitor) -> (f64, f64) {
    (
        f64::from(monitor.position_x) + f64::from(monitor.resolution_x) / 2.0,
        f64::from(monitor.position_y) + f64::from(monitor.resolution_y) / 2.0,
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn primary(mut monitor: Monitor) -> Monitor {
        monitor.is_primary = true;
        monitor
    }

    #[test]
    fn test_bind_horizontal_for_side_by_side_monitors() {
        let a = Monitor::new(0, 2560, 1440);
        let b = Monitor::new(1, 1920, 1080).at(2560, 180);
        assert!(bind_horizontal(&a, &b));
    }

    #[test]
    fn test_bind_vertical_for_stacked_monitors() {
        let a = Monitor::new(0, 2560, 1440);
        let b = Monitor::new(1, 1920, 1080).at(320, -1080);
        assert!(!bind_horizontal(&a, &b));
    }

    #[test]
    fn test_bind_horizontal_when_neither_axis_overlaps() {
        let a = Monitor::new(0, 1920, 1080);
        let b = Monitor::new(1, 1920, 1080).at(1920, 1080);
        assert!(bind_horizontal(&a, &b));
    }

    #[test]
    fn test_order_is_empty_for_fewer_than_two_monitors() {
        assert!(calibration_order(&[]).is_empty());
        assert!(calibration_order(&[Monitor::new(0, 1920, 1080)]).is_empty());
    }

    #[test]
    fn test_order_starts_from_primary_and_grows_by_nearest_centre() {
        // Arrange: left | primary | right | far right
        let monitors = vec![
            Monitor::new(10, 1920, 1080).at(-1920, 0),
            primary(Monitor::new(11, 2560, 1440).at(0, 0)),
            Monitor::new(12, 1920, 1080).at(2560, 0),
            Monitor::new(13, 1920, 1080).at(4480, 0),
        ];

        // Act
        let order = calibration_order(&monitors);

        // Assert: both neighbours are equally far; the earlier one wins the tie
        assert_eq!(order, vec![(10, 11), (12, 11), (13, 12)]);
    }

    #[test]
    fn test_order_falls_back_to_first_monitor_without_primary() {
        let monitors = vec![Monitor::new(4, 1920, 1080), Monitor::new(2, 1920, 1080).at(1920, 0)];

        assert_eq!(calibration_order(&monitors), vec![(2, 4)]);
    }
}
