//! Layout resolver: places every reachable monitor in physical space.
//!
//! The physical coordinate space is measured in inches with the root monitor's
//! top-left corner at (0, 0).  Y grows downwards, matching OS screen space.
//!
//! # How placement works (for beginners)
//!
//! A calibration measurement says "monitor S sits next to monitor B, this far
//! away, shifted by this much".  Once B has a physical position and both
//! monitors have a density, S's rectangle follows:
//!
//! ```text
//!   horizontal binding (S right of B)        vertical binding (S below B)
//!   ┌──────┐ gap ┌────┐                      ┌──────┐
//!   │  B   │<--->│ S  │  y(S) = y(B) + align │  B   │
//!   └──────┘     └────┘                      └──────┘
//!                                               ↕ gap
//!                                            ┌────┐  x(S) = x(B) + align
//!                                            │ S  │
//!                                            └────┘
//! ```
//!
//! Whether S goes left/right (or above/below) is read from the OS logical
//! positions, which already encode the rough arrangement.  Placement starts
//! from the unique root of each connected component and spreads outwards
//! along bound → subject edges with a worklist, so the order of the
//! measurement list does not matter.

use std::collections::{BTreeMap, VecDeque};

use thiserror::Error;
use tracing::debug;

use super::density::DensityMap;
use super::graph::MeasurementGraph;
use super::monitor::{CalibrationMeasurement, Monitor, MonitorId, PhysicalRect};

/// Why a connected component could not be anchored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RootError {
    /// Every monitor with a density is the subject of some measurement, or no
    /// monitor has a density at all.
    #[error("no root candidate")]
    NoCandidate,

    /// More than one monitor with a density is never measured as a subject.
    #[error("ambiguous root: candidates {0:?}")]
    Ambiguous(Vec<MonitorId>),
}

/// Resolved physical rectangles, keyed by monitor id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhysicalLayout {
    rects: BTreeMap<MonitorId, PhysicalRect>,
}

impl PhysicalLayout {
    /// Builds a layout from explicit rectangles.
    pub fn from_rects(rects: impl IntoIterator<Item = (MonitorId, PhysicalRect)>) -> Self {
        Self {
            rects: rects.into_iter().collect(),
        }
    }

    /// Returns the rectangle of `id`.
    pub fn get(&self, id: MonitorId) -> Option<&PhysicalRect> {
        self.rects.get(&id)
    }

    /// Number of placed monitors.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns `true` when no monitor could be placed.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Iterates `(id, rect)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (MonitorId, &PhysicalRect)> + '_ {
        self.rects.iter().map(|(&id, rect)| (id, rect))
    }

    /// Returns the smallest rectangle containing every placed monitor.
    pub fn bounds(&self) -> Option<PhysicalRect> {
        let mut rects = self.rects.values();
        let first = rects.next()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.right(), first.bottom());
        for rect in rects {
            min_x = min_x.min(rect.x);
            min_y = min_y.min(rect.y);
            max_x = max_x.max(rect.right());
            max_y = max_y.max(rect.bottom());
        }
        Some(PhysicalRect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }
}

/// Places every monitor reachable from the root of its connected component.
///
/// Components without exactly one root are left out; the others still resolve
/// in their own frame anchored at (0, 0).  Monitors without a resolved density
/// never appear in the output.
pub fn resolve_layout(
    monitors: &[Monitor],
    densities: &DensityMap,
    measurements: &[CalibrationMeasurement],
) -> PhysicalLayout {
    let graph = MeasurementGraph::build(monitors, measurements);
    resolve_layout_in(&graph, densities)
}

/// Same as [`resolve_layout`] over an already built graph.
pub fn resolve_layout_in(graph: &MeasurementGraph<'_>, densities: &DensityMap) -> PhysicalLayout {
    let mut rects = BTreeMap::new();

    for members in graph.components() {
        let root = match select_root(graph, densities, &members) {
            Ok(root) => root,
            Err(reason) => {
                debug!("component {members:?} left unresolved: {reason}");
                continue;
            }
        };
        place_component(graph, densities, root, &mut rects);
    }

    debug!("layout resolution: placed {} of {} monitors", rects.len(), graph.monitors().count());
    PhysicalLayout { rects }
}

/// Picks the root of one connected component: the only member with a resolved
/// density that is never the subject of a measurement.
///
/// # Errors
///
/// Returns [`RootError::NoCandidate`] when no member qualifies and
/// [`RootError::Ambiguous`] when several do.
pub fn select_root(
    graph: &MeasurementGraph<'_>,
    densities: &DensityMap,
    members: &[MonitorId],
) -> Result<MonitorId, RootError> {
    let candidates: Vec<MonitorId> = members
        .iter()
        .copied()
        .filter(|&id| densities.contains(id) && !graph.is_subject(id))
        .collect();

    match candidates.as_slice() {
        [] => Err(RootError::NoCandidate),
        [root] => Ok(*root),
        _ => Err(RootError::Ambiguous(candidates)),
    }
}

fn place_component(
    graph: &MeasurementGraph<'_>,
    densities: &DensityMap,
    root: MonitorId,
    rects: &mut BTreeMap<MonitorId, PhysicalRect>,
) {
    let Some(root_rect) = graph
        .monitor(root)
        .and_then(|monitor| sized_rect(monitor, densities, 0.0, 0.0))
    else {
        return;
    };
    rects.insert(root, root_rect);

    let mut queue = VecDeque::from([root]);
    while let Some(bound_id) = queue.pop_front() {
        let Some(bound_rect) = rects.get(&bound_id).copied() else {
            continue;
        };
        for measurement in graph.edges_bound_to(bound_id) {
            if rects.contains_key(&measurement.monitor_id) {
                continue;
            }
            if let Some(rect) = place_subject(graph, densities, measurement, &bound_rect) {
                rects.insert(measurement.monitor_id, rect);
                queue.push_back(measurement.monitor_id);
            }
        }
    }
}

/// Computes the subject's rectangle from a placed bound monitor.
fn place_subject(
    graph: &MeasurementGraph<'_>,
    densities: &DensityMap,
    measurement: &CalibrationMeasurement,
    bound_rect: &PhysicalRect,
) -> Option<PhysicalRect> {
    let subject = graph.monitor(measurement.monitor_id)?;
    let bound = graph.monitor(measurement.bound_to)?;
    let ppi_subject = densities.get(subject.id)?;
    let ppi_bound = densities.get(bound.id)?;

    let gap = f64::from(measurement.gap.unsigned_abs()) / ppi_bound;
    let align =
        measurement.align_offset_bound / ppi_bound - measurement.align_offset_unbound / ppi_subject;
    let mut rect = sized_rect(subject, densities, 0.0, 0.0)?;

    if measurement.bind_horizontal {
        rect.x = if subject.position_x < bound.position_x {
            bound_rect.x - rect.width - gap
        } else {
            bound_rect.right() + gap
        };
        rect.y = bound_rect.y + align;
    } else {
        rect.y = if subject.position_y < bound.position_y {
            bound_rect.y - rect.height - gap
        } else {
            bound_rect.bottom() + gap
        };
        rect.x = bound_rect.x + align;
    }
    Some(rect)
}

fn sized_rect(monitor: &Monitor, densities: &DensityMap, x: f64, y: f64) -> Option<PhysicalRect> {
    let ppi = densities.get(monitor.id)?;
    Some(PhysicalRect {
        x,
        y,
        width: monitor.resolution_x as f64 / ppi,
        height: monitor.resolution_y as f64 / ppi,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
