//! Domain entities and the pure resolution stages.
//!
//! Nothing in here performs I/O.  Every stage takes immutable snapshots and
//! returns a freshly built value; no state survives between calls.
//!
//! # Stage order
//!
//! ```text
//! Monitor + CalibrationMeasurement snapshots
//!        │
//!        ▼
//!   graph::MeasurementGraph      (validated adjacency, components, roots)
//!        │
//!        ▼
//!   density::resolve_densities   (monitor id → PPI)
//!        │
//!        ▼
//!   layout::resolve_layout       (monitor id → physical rectangle, inches)
//!        │
//!        ▼
//!   normalize::normalize_layout  (centred on the canvas, 4-decimal rounding)
//! ```

/// Engine configuration (canvas size, base URL).
pub mod config;

/// PPI propagation through the measurement graph.
pub mod density;

/// Validated measurement graph: adjacency lists and connected components.
pub mod graph;

/// Physical placement of every reachable monitor.
pub mod layout;

/// Monitor, measurement and rectangle value types.
pub mod monitor;

/// Re-centering and rounding onto the external canvas.
pub mod normalize;

/// Helpers for physical panel sizes (EDID millimetres, guessed diagonals).
pub mod physical;

/// Calibration pair ordering used by the interactive procedure.
pub mod plan;
