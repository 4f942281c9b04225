//! # spanmap-core
//!
//! Calibration graph resolution and physical layout reconstruction for
//! multi-monitor desks, plus the compact layout encoding consumed by the
//! Spanright layout viewer.
//!
//! This crate has zero dependencies on OS APIs, UI frameworks, or the file
//! system.  Monitor discovery and the interactive calibration procedure are
//! external collaborators that hand us immutable snapshots.
//!
//! # Architecture overview (for beginners)
//!
//! Operating systems lay monitors out in *pixel* space: a 27" 1440p panel and
//! a 24" 1080p panel sitting side by side look like two rectangles of very
//! different sizes.  A calibration session measures, pair by pair, how big one
//! monitor's pixels are compared to its neighbour's and how far apart the
//! panels physically sit.  From those pairwise measurements this crate
//! rebuilds the desk in *physical* space (inches):
//!
//! - **`domain`** – The data model and the pure resolution stages:
//!   measurement graph → density (PPI) resolver → layout resolver →
//!   normalizer.  Calibration planning and physical-size helpers live here
//!   as well.
//!
//! - **`encoding`** – Turns a normalized layout into the versioned `{v, m}`
//!   record, compresses it for a URL fragment and decodes it back.
//!
//! - **`export`** – The human-readable calibration JSON document.
//!
//! - **`pipeline`** – Wires the stages together and defines the provider
//!   traits through which the discovery and calibration collaborators plug in.

pub mod domain;
pub mod encoding;
pub mod export;
pub mod pipeline;

// Re-export the most-used types at the crate root so callers can write
// `spanmap_core::Monitor` instead of `spanmap_core::domain::monitor::Monitor`.
pub use domain::config::{CanvasSize, EngineConfig};
pub use domain::density::{resolve_densities, DensityMap};
pub use domain::layout::{resolve_layout, PhysicalLayout};
pub use domain::monitor::{CalibrationMeasurement, Monitor, MonitorId, PhysicalRect};
pub use domain::normalize::normalize_layout;
pub use encoding::url::{build_url, decode_layout_url, encode_payload, EncodingError};
pub use encoding::record::{LayoutRecord, MonitorRecord};
pub use export::{build_export, export_json, CalibrationExport};
pub use pipeline::{
    build_layout_url, build_layout_url_from, resolve, CalibrationProvider, MonitorProvider,
    ProviderError, Resolution,
};
