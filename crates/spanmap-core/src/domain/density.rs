//! Density resolver: propagates pixels-per-inch through the measurement graph.
//!
//! Every measurement states `scale = ppi(subject) / ppi(bound)`, so once one
//! endpoint's density is known the other follows:
//!
//! ```text
//! ppi(subject) = ppi(bound)   × scale
//! ppi(bound)   = ppi(subject) ÷ scale
//! ```
//!
//! Propagation runs as a worklist over the undirected adjacency lists: each
//! monitor is resolved at most once and each edge is looked at from both ends,
//! so the cost is O(V + E) no matter how the measurements are ordered.

use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, warn};

use super::graph::MeasurementGraph;
use super::monitor::{CalibrationMeasurement, Monitor, MonitorId};

/// Lowest density, in ppi, the resolver accepts.
pub const MIN_DENSITY: f64 = 1e-3;

/// Highest density, in ppi, the resolver accepts.
pub const MAX_DENSITY: f64 = 1e6;

/// Returns `true` if `ppi` keeps every derived width, height and gap finite.
pub fn is_usable_density(ppi: f64) -> bool {
    (MIN_DENSITY..=MAX_DENSITY).contains(&ppi)
}

/// Resolved densities, keyed by monitor id.
///
/// Only monitors reachable from a monitor with a known density appear here;
/// absence means "unresolved", not "error".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DensityMap {
    ppi: BTreeMap<MonitorId, f64>,
}

impl DensityMap {
    /// Returns the resolved density of `id`.
    pub fn get(&self, id: MonitorId) -> Option<f64> {
        self.ppi.get(&id).copied()
    }

    /// Returns `true` if `id` has a resolved density.
    pub fn contains(&self, id: MonitorId) -> bool {
        self.ppi.contains_key(&id)
    }

    /// Number of resolved monitors.
    pub fn len(&self) -> usize {
        self.ppi.len()
    }

    /// Returns `true` when nothing could be resolved.
    pub fn is_empty(&self) -> bool {
        self.ppi.is_empty()
    }

    /// Iterates `(id, ppi)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (MonitorId, f64)> + '_ {
        self.ppi.iter().map(|(&id, &ppi)| (id, ppi))
    }
}

/// Resolves the density of every monitor reachable from a seeded monitor.
///
/// Seeds are each monitor's [`Monitor::known_density`].  Seeded values are
/// never overwritten by propagation.  A seed or propagated value outside
/// [`MIN_DENSITY`]..=[`MAX_DENSITY`] is dropped, leaving that monitor
/// unresolved unless another path reaches it.
pub fn resolve_densities(monitors: &[Monitor], measurements: &[CalibrationMeasurement]) -> DensityMap {
    let graph = MeasurementGraph::build(monitors, measurements);
    resolve_densities_in(&graph)
}

/// Same as [`resolve_densities`] over an already built graph.
pub fn resolve_densities_in(graph: &MeasurementGraph<'_>) -> DensityMap {
    let mut ppi = BTreeMap::new();
    let mut queue = VecDeque::new();

    for monitor in graph.monitors() {
        match monitor.known_density() {
            Some(density) if is_usable_density(density) => {
                ppi.insert(monitor.id, density);
                queue.push_back(monitor.id);
            }
            Some(density) => warn!("ignoring density {density} of monitor {}", monitor.id),
            None => {}
        }
    }
    let seeded = queue.len();

    while let Some(id) = queue.pop_front() {
        let Some(&known) = ppi.get(&id) else {
            continue;
        };
        for edge in graph.incident_edges(id) {
            let (other, density) = if edge.bound_to == id {
                (edge.monitor_id, known * edge.scale)
            } else {
                (edge.bound_to, known / edge.scale)
            };
            if ppi.contains_key(&other) {
                continue;
            }
            if !is_usable_density(density) {
                warn!(
                    "measurement {} -> {} gives monitor {other} an unusable density {density}",
                    edge.monitor_id, edge.bound_to
                );
                continue;
            }
            ppi.insert(other, density);
            queue.push_back(other);
        }
    }

    debug!(
        "density resolution: {seeded} seeded, {} resolved of {} monitors",
        ppi.len(),
        graph.monitors().count()
    );
    DensityMap { ppi }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
