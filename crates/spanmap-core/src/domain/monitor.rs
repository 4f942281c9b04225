//! Monitor, calibration measurement and physical rectangle value types.
//!
//! These are the snapshot records handed to the engine by the discovery and
//! calibration collaborators.  Field names serialize in camelCase so the same
//! records can be exchanged with the web front end unchanged.

use serde::{Deserialize, Serialize};

use super::physical::{
    density_from_physical_size, guess_diagonal_from_names, size_from_diagonal, PhysicalSizeMm, SizeSource,
};

/// Stable integer identifier of a monitor within one snapshot.
pub type MonitorId = u32;

/// Orientation code the OS reports for a panel rotated by 90°.
pub const ORIENTATION_ROTATED_90: u32 = 1;

/// A display monitor as reported by the discovery collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    /// Identifier referenced by calibration measurements.
    pub id: MonitorId,
    /// Horizontal resolution in pixels.
    pub resolution_x: u32,
    /// Vertical resolution in pixels.
    pub resolution_y: u32,
    /// OS logical X position in pixels.  Only used to infer placement direction.
    #[serde(default)]
    pub position_x: i32,
    /// OS logical Y position in pixels.  Only used to infer placement direction.
    #[serde(default)]
    pub position_y: i32,
    /// Orientation code: 0 = landscape, 1 = rotated 90°, 2/3 = flipped variants.
    #[serde(default)]
    pub orientation: u32,
    /// Known pixel density in pixels per inch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ppi: Option<f64>,
    /// Friendly name from the OS display configuration (e.g. "DELL U2720Q").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// Generic monitor device string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_name: Option<String>,
    /// Whether the OS considers this the primary display.
    #[serde(default)]
    pub is_primary: bool,
    /// Physical panel size, usually read from EDID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_size_mm: Option<PhysicalSizeMm>,
    /// Where `physical_size_mm` came from.
    #[serde(default)]
    pub size_source: SizeSource,
}

impl Monitor {
    /// Creates a landscape monitor at the OS origin with no density information.
    pub fn new(id: MonitorId, resolution_x: u32, resolution_y: u32) -> Self {
        Self {
            id,
            resolution_x,
            resolution_y,
            position_x: 0,
            position_y: 0,
            orientation: 0,
            ppi: None,
            friendly_name: None,
            monitor_name: None,
            is_primary: false,
            physical_size_mm: None,
            size_source: SizeSource::None,
        }
    }

    /// Sets the OS logical position.
    pub fn at(mut self, position_x: i32, position_y: i32) -> Self {
        self.position_x = position_x;
        self.position_y = position_y;
        self
    }

    /// Sets a known pixel density.
    pub fn with_ppi(mut self, ppi: f64) -> Self {
        self.ppi = Some(ppi);
        self
    }

    /// Sets the friendly name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Returns the density the engine may seed propagation with.
    ///
    /// An explicit positive `ppi` wins.  Otherwise the density is derived from
    /// the physical panel size when both sides are known.
    pub fn known_density(&self) -> Option<f64> {
        match self.ppi {
            Some(ppi) if ppi.is_finite() && ppi > 0.0 => Some(ppi),
            _ => self.physical_size_mm.and_then(|size| {
                density_from_physical_size(self.resolution_x, self.resolution_y, size)
            }),
        }
    }

    /// Fills in a physical size from a diagonal found in the monitor names,
    /// marking it [`SizeSource::Guessed`].
    ///
    /// Does nothing when a size is already known.  Returns `true` if a size
    /// was guessed.
    pub fn guess_physical_size(&mut self) -> bool {
        if self.physical_size_mm.is_some() {
            return false;
        }
        let names = [&self.friendly_name, &self.monitor_name]
            .into_iter()
            .filter_map(|name| name.as_deref());
        let Some(diagonal) = guess_diagonal_from_names(names) else {
            return false;
        };
        self.physical_size_mm = Some(size_from_diagonal(self.resolution_x, self.resolution_y, diagonal));
        self.size_source = SizeSource::Guessed;
        true
    }

    /// Returns `true` when the OS reports the panel as rotated by 90°.
    pub fn is_rotated_90(&self) -> bool {
        self.orientation == ORIENTATION_ROTATED_90
    }

    /// Returns the first non-empty of friendly name and monitor name.
    pub fn display_name(&self) -> Option<&str> {
        [&self.friendly_name, &self.monitor_name]
            .into_iter()
            .filter_map(|name| name.as_deref())
            .find(|name| !name.trim().is_empty())
    }

    /// Returns a label suitable for listings: the display name, or `Display N`
    /// (1-based) when the monitor has no name.
    pub fn label(&self) -> String {
        match self.display_name() {
            Some(name) => name.to_string(),
            None => format!("Display {}", self.id + 1),
        }
    }
}

/// One pairwise calibration result: how the *subject* monitor relates to the
/// *bound* (reference) monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationMeasurement {
    /// The subject monitor being placed.
    pub monitor_id: MonitorId,
    /// The reference monitor the subject was measured against.
    pub bound_to: MonitorId,
    /// Subject density ÷ bound density.
    pub scale: f64,
    /// Signed gap between the panels in the bound monitor's pixels.
    #[serde(default)]
    pub gap: i32,
    /// `true` when the pair sits side by side, `false` when stacked.
    pub bind_horizontal: bool,
    /// Perpendicular offset of the alignment line in the subject's pixels.
    #[serde(default)]
    pub align_offset_unbound: f64,
    /// Perpendicular offset of the alignment line in the bound monitor's pixels.
    #[serde(default)]
    pub align_offset_bound: f64,
}

impl CalibrationMeasurement {
    /// Creates a side-by-side measurement with zero alignment offsets.
    pub fn horizontal(subject: MonitorId, bound: MonitorId, scale: f64, gap: i32) -> Self {
        Self {
            monitor_id: subject,
            bound_to: bound,
            scale,
            gap,
            bind_horizontal: true,
            align_offset_unbound: 0.0,
            align_offset_bound: 0.0,
        }
    }

    /// Creates a stacked measurement with zero alignment offsets.
    pub fn vertical(subject: MonitorId, bound: MonitorId, scale: f64, gap: i32) -> Self {
        Self {
            bind_horizontal: false,
            ..Self::horizontal(subject, bound, scale, gap)
        }
    }

    /// Sets the alignment offsets (bound monitor pixels, subject pixels).
    pub fn aligned(mut self, offset_bound: f64, offset_unbound: f64) -> Self {
        self.align_offset_bound = offset_bound;
        self.align_offset_unbound = offset_unbound;
        self
    }
}

/// An axis-aligned rectangle in physical space.  All values are inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl PhysicalRect {
    /// Returns the right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns the panel diagonal.
    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    /// Returns a copy moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
