//! The measurement graph: monitors are nodes, calibration measurements are
//! edges from a subject monitor to its bound (reference) monitor.
//!
//! Building the graph is where malformed input is filtered out.  A measurement
//! that references itself, references an unknown monitor, or carries a scale
//! that cannot be a density ratio is skipped with a warning instead of
//! aborting the whole resolution.
//!
//! Valid measurements are kept in canonical order (subject id, bound id, then
//! the measured values), never input order: breadth-first walks over the
//! adjacency lists must not depend on how the measurements were listed.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use thiserror::Error;
use tracing::warn;

use super::monitor::{CalibrationMeasurement, Monitor, MonitorId};

/// Why a measurement was left out of the graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasurementDefect {
    /// `monitor_id == bound_to`.
    #[error("measurement binds monitor {0} to itself")]
    SelfReference(MonitorId),

    /// An endpoint is not part of the monitor snapshot.
    #[error("measurement references unknown monitor {0}")]
    UnknownMonitor(MonitorId),

    /// The scale is zero, negative, NaN or infinite.
    #[error("measurement scale {0} is not a positive finite ratio")]
    InvalidScale(f64),

    /// An alignment offset is NaN or infinite.
    #[error("measurement alignment offset is not finite")]
    NonFiniteOffset,
}

/// Validated, read-only view over one monitor/measurement snapshot.
#[derive(Debug)]
pub struct MeasurementGraph<'a> {
    monitors: BTreeMap<MonitorId, &'a Monitor>,
    /// Valid measurements in canonical order.
    edges: Vec<&'a CalibrationMeasurement>,
    /// Monitor id → indices into `edges` touching it, ascending.
    incident: BTreeMap<MonitorId, Vec<usize>>,
    subjects: BTreeSet<MonitorId>,
    skipped: Vec<(usize, MeasurementDefect)>,
}

impl<'a> MeasurementGraph<'a> {
    /// Builds the graph, dropping malformed measurements.
    ///
    /// When two monitors share an id the first one in the snapshot is kept.
    pub fn build(monitors: &'a [Monitor], measurements: &'a [CalibrationMeasurement]) -> Self {
        let mut by_id = BTreeMap::new();
        for monitor in monitors {
            match by_id.entry(monitor.id) {
                Entry::Vacant(slot) => {
                    slot.insert(monitor);
                }
                Entry::Occupied(_) => {
                    warn!("duplicate monitor id {} in snapshot; keeping the first entry", monitor.id);
                }
            }
        }

        let mut edges = Vec::with_capacity(measurements.len());
        let mut skipped = Vec::new();

        for (index, measurement) in measurements.iter().enumerate() {
            match validate(measurement, &by_id) {
                Ok(()) => edges.push(measurement),
                Err(defect) => {
                    warn!("skipping calibration measurement #{index}: {defect}");
                    skipped.push((index, defect));
                }
            }
        }
        edges.sort_by(|a, b| canonical_order(a, b));

        let mut incident: BTreeMap<MonitorId, Vec<usize>> = BTreeMap::new();
        let mut subjects = BTreeSet::new();
        for (edge, measurement) in edges.iter().enumerate() {
            incident.entry(measurement.monitor_id).or_default().push(edge);
            incident.entry(measurement.bound_to).or_default().push(edge);
            subjects.insert(measurement.monitor_id);
        }

        Self {
            monitors: by_id,
            edges,
            incident,
            subjects,
            skipped,
        }
    }

    /// Looks up a monitor by id.
    pub fn monitor(&self, id: MonitorId) -> Option<&'a Monitor> {
        self.monitors.get(&id).copied()
    }

    /// Returns every monitor in ascending id order.
    pub fn monitors(&self) -> impl Iterator<Item = &'a Monitor> + '_ {
        self.monitors.values().copied()
    }

    /// Returns the valid measurements in canonical order.
    pub fn edges(&self) -> &[&'a CalibrationMeasurement] {
        &self.edges
    }

    /// Returns the measurements touching `id` (as subject or bound), in canonical order.
    pub fn incident_edges(&self, id: MonitorId) -> impl Iterator<Item = &'a CalibrationMeasurement> + '_ {
        self.incident
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&edge| self.edges[edge])
    }

    /// Returns the measurements that use `id` as their reference monitor.
    pub fn edges_bound_to(&self, id: MonitorId) -> impl Iterator<Item = &'a CalibrationMeasurement> + '_ {
        self.incident_edges(id).filter(move |m| m.bound_to == id)
    }

    /// Returns `true` if `id` is the subject of at least one valid measurement.
    pub fn is_subject(&self, id: MonitorId) -> bool {
        self.subjects.contains(&id)
    }

    /// Returns the measurements that were dropped, with their input index.
    pub fn skipped(&self) -> &[(usize, MeasurementDefect)] {
        &self.skipped
    }

    /// Splits the monitors into connected components, treating measurements
    /// as undirected edges.
    ///
    /// Components are ordered by their smallest monitor id and each component's
    /// members are sorted, so the result does not depend on input order.
    pub fn components(&self) -> Vec<Vec<MonitorId>> {
        let mut visited = BTreeSet::new();
        let mut components = Vec::new();

        for &start in self.monitors.keys() {
            if !visited.insert(start) {
                continue;
            }
            let mut members = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(id) = queue.pop_front() {
                for edge in self.incident_edges(id) {
                    let other = if edge.monitor_id == id { edge.bound_to } else { edge.monitor_id };
                    if visited.insert(other) {
                        members.push(other);
                        queue.push_back(other);
                    }
                }
            }
            members.sort_unstable();
            components.push(members);
        }

        components
    }
}

/// Total order over measurements: endpoints first, then every measured value.
fn canonical_order(a: &CalibrationMeasurement, b: &CalibrationMeasurement) -> Ordering {
    (a.monitor_id, a.bound_to)
        .cmp(&(b.monitor_id, b.bound_to))
        .then_with(|| a.scale.total_cmp(&b.scale))
        .then_with(|| a.gap.cmp(&b.gap))
        .then_with(|| a.bind_horizontal.cmp(&b.bind_horizontal))
        .then_with(|| a.align_offset_bound.total_cmp(&b.align_offset_bound))
        .then_with(|| a.align_offset_unbound.total_cmp(&b.align_offset_unbound))
}

fn validate(
    measurement: &CalibrationMeasurement,
    monitors: &BTreeMap<MonitorId, &Monitor>,
) -> Result<(), MeasurementDefect> {
    if measurement.monitor_id == measurement.bound_to {
        return Err(MeasurementDefect::SelfReference(measurement.monitor_id));
    }
    for id in [measurement.monitor_id, measurement.bound_to] {
        if !monitors.contains_key(&id) {
            return Err(MeasurementDefect::UnknownMonitor(id));
        }
    }
    if !(measurement.scale.is_finite() && measurement.scale > 0.0) {
        return Err(MeasurementDefect::InvalidScale(measurement.scale));
    }
    if !(measurement.align_offset_bound.is_finite() && measurement.align_offset_unbound.is_finite()) {
        return Err(MeasurementDefect::NonFiniteOffset);
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn monitors(n: u32) -> Vec<Monitor> {
        (0..n).map(|id| Monitor::new(id, 1920, 1080)).collect()
    }

    #[test]
    fn test_build_skips_self_referencing_measurement() {
        let monitors = monitors(2);
        let measurements = vec![CalibrationMeasurement::horizontal(1, 1, 1.0, 0)];

        let graph = MeasurementGraph::build(&monitors, &measurements);

        assert!(graph.edges().is_empty());
        assert_eq!(graph.skipped(), &[(0, MeasurementDefect::SelfReference(1))]);
    }

    #[test]
    fn test_build_skips_non_positive_and_nan_scales() {
        let monitors = monitors(3);
        let measurements = vec![
            CalibrationMeasurement::horizontal(1, 0, 0.0, 0),
            CalibrationMeasurement::horizontal(2, 0, -1.0, 0),
            CalibrationMeasurement::horizontal(2, 0, f64::NAN, 0),
            CalibrationMeasurement::horizontal(2, 0, 1.0, 0),
        ];

        let graph = MeasurementGraph::build(&monitors, &measurements);

        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.skipped().len(), 3);
        assert!(!graph.is_subject(1));
        assert!(graph.is_subject(2));
    }

    #[test]
    fn test_build_skips_unknown_monitor_reference() {
        let monitors = monitors(1);
        let measurements = vec![CalibrationMeasurement::horizontal(7, 0, 1.0, 0)];

        let graph = MeasurementGraph::build(&monitors, &measurements);

        assert_eq!(graph.skipped(), &[(0, MeasurementDefect::UnknownMonitor(7))]);
    }

    #[test]
    fn test_build_skips_non_finite_alignment_offset() {
        let monitors = monitors(2);
        let measurements =
            vec![CalibrationMeasurement::horizontal(1, 0, 1.0, 0).aligned(f64::INFINITY, 0.0)];

        let graph = MeasurementGraph::build(&monitors, &measurements);

        assert_eq!(graph.skipped(), &[(0, MeasurementDefect::NonFiniteOffset)]);
    }

    #[test]
    fn test_build_keeps_first_monitor_for_duplicate_id() {
        let monitors = vec![Monitor::new(0, 1920, 1080), Monitor::new(0, 3840, 2160)];

        let graph = MeasurementGraph::build(&monitors, &[]);

        assert_eq!(graph.monitor(0).map(|m| m.resolution_x), Some(1920));
        assert_eq!(graph.monitors().count(), 1);
    }

    #[test]
    fn test_components_groups_connected_monitors_and_isolates_the_rest() {
        let monitors = monitors(5);
        let measurements = vec![
            CalibrationMeasurement::horizontal(3, 1, 1.0, 0),
            CalibrationMeasurement::horizontal(1, 0, 1.0, 0),
        ];

        let graph = MeasurementGraph::build(&monitors, &measurements);

        assert_eq!(graph.components(), vec![vec![0, 1, 3], vec![2], vec![4]]);
    }

    #[test]
    fn test_edges_bound_to_filters_by_reference_monitor() {
        let monitors = monitors(3);
        let measurements = vec![
            CalibrationMeasurement::horizontal(1, 0, 1.0, 0),
            CalibrationMeasurement::vertical(2, 1, 1.0, 0),
        ];

        let graph = MeasurementGraph::build(&monitors, &measurements);

        let bound_to_1: Vec<_> = graph.edges_bound_to(1).map(|m| m.monitor_id).collect();
        assert_eq!(bound_to_1, vec![2]);
        assert_eq!(graph.incident_edges(1).count(), 2);
    }

    #[test]
    fn test_edges_are_in_canonical_order_whatever_the_input_order() {
        // Arrange: the same four measurements, listed two different ways
        let monitors = monitors(4);
        let forward = vec![
            CalibrationMeasurement::horizontal(1, 0, 0.1, 0),
            CalibrationMeasurement::horizontal(2, 0, 0.3, 0),
            CalibrationMeasurement::vertical(3, 1, 0.3, 0),
            CalibrationMeasurement::vertical(3, 2, 0.1, 0),
        ];
        let shuffled = vec![forward[3].clone(), forward[1].clone(), forward[0].clone(), forward[2].clone()];

        // Act
        let a = MeasurementGraph::build(&monitors, &forward);
        let b = MeasurementGraph::build(&monitors, &shuffled);

        // Assert
        let pairs = |g: &MeasurementGraph<'_>| -> Vec<(MonitorId, MonitorId)> {
            g.edges().iter().map(|m| (m.monitor_id, m.bound_to)).collect()
        };
        assert_eq!(pairs(&a), vec![(1, 0), (2, 0), (3, 1), (3, 2)]);
        assert_eq!(pairs(&a), pairs(&b));
        let around_0 = |g: &MeasurementGraph<'_>| -> Vec<MonitorId> {
            g.incident_edges(0).map(|m| m.monitor_id).collect()
        };
        assert_eq!(around_0(&a), vec![1, 2]);
        assert_eq!(around_0(&b), vec![1, 2]);
    }

    #[test]
    fn test_duplicate_pair_measurements_order_by_value() {
        let monitors = monitors(2);
        let measurements = vec![
            CalibrationMeasurement::horizontal(1, 0, 0.9, 4),
            CalibrationMeasurement::horizontal(1, 0, 0.8, 4),
        ];

        let graph = MeasurementGraph::build(&monitors, &measurements);

        let scales: Vec<f64> = graph.edges().iter().map(|m| m.scale).collect();
        assert_eq!(scales, vec![0.8, 0.9]);
    }
}
