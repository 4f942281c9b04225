//! Physical panel size helpers.
//!
//! The discovery collaborator may know a panel's size in millimetres (from
//! EDID), may only have a marketing name such as `"LG 27GL850"`, or may know
//! nothing at all.  These helpers turn whatever is available into a seed
//! density for the resolver.

use serde::{Deserialize, Serialize};

/// Millimetres per inch.
const MM_PER_INCH: f64 = 25.4;

/// Smallest diagonal (inches) accepted when guessing from a name.
const MIN_GUESSED_DIAGONAL: u32 = 10;

/// Largest diagonal (inches) accepted when guessing from a name.
const MAX_GUESSED_DIAGONAL: u32 = 65;

/// Physical panel dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalSizeMm {
    pub width_mm: u32,
    pub height_mm: u32,
}

/// Provenance of a monitor's physical size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeSource {
    /// Read from the panel's EDID block.
    Edid,
    /// Inferred from a diagonal found in the monitor name.
    Guessed,
    /// Entered by the user.
    Manual,
    /// Unknown.
    #[default]
    None,
}

impl SizeSource {
    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeSource::Edid => "edid",
            SizeSource::Guessed => "guessed",
            SizeSource::Manual => "manual",
            SizeSource::None => "none",
        }
    }
}

/// Derives pixels per inch from a resolution and a physical size.
///
/// Returns `None` when either physical side or the resolution is zero.
pub fn density_from_physical_size(
    resolution_x: u32,
    resolution_y: u32,
    size: PhysicalSizeMm,
) -> Option<f64> {
    if size.width_mm == 0 || size.height_mm == 0 || resolution_x == 0 || resolution_y == 0 {
        return None;
    }
    let diagonal_in =
        (size.width_mm as f64 / MM_PER_INCH).hypot(size.height_mm as f64 / MM_PER_INCH);
    let diagonal_px = (resolution_x as f64).hypot(resolution_y as f64);
    Some(diagonal_px / diagonal_in)
}

/// Computes a physical size from a diagonal, using the pixel aspect ratio of
/// the resolution (16:9 when either dimension is zero).
pub fn size_from_diagonal(resolution_x: u32, resolution_y: u32, diagonal_in: f64) -> PhysicalSizeMm {
    let aspect = if resolution_x > 0 && resolution_y > 0 {
        resolution_x as f64 / resolution_y as f64
    } else {
        16.0 / 9.0
    };
    let height_in = diagonal_in / (1.0 + aspect * aspect).sqrt();
    let width_in = height_in * aspect;
    PhysicalSizeMm {
        width_mm: (width_in * MM_PER_INCH).round() as u32,
        height_mm: (height_in * MM_PER_INCH).round() as u32,
    }
}

/// Looks for a plausible diagonal in a list of monitor names.
///
/// The first standalone number between 10 and 65 (inclusive) wins.  Numbers
/// embedded in longer digit runs (`"1920"`, `"2720"`) are ignored.
pub fn guess_diagonal_from_names<'a, I>(names: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().find_map(|name| {
        name.split(|c: char| !c.is_ascii_digit())
            .filter(|run| !run.is_empty())
            .filter_map(|run| run.parse::<u32>().ok())
            .find(|n| (MIN_GUESSED_DIAGONAL..=MAX_GUESSED_DIAGONAL).contains(n))
            .map(f64::from)
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_from_physical_size_returns_none_for_zero_side() {
        let size = PhysicalSizeMm { width_mm: 0, height_mm: 300 };
        assert_eq!(density_from_physical_size(1920, 1080, size), None);
    }

    #[test]
    fn test_size_from_diagonal_round_trips_through_density() {
        // Arrange: a 27" QHD panel is ~108.8 ppi
        let size = size_from_diagonal(2560, 1440, 27.0);

        // Act
        let ppi = density_from_physical_size(2560, 1440, size).expect("non-zero size");

        // Assert (mm rounding costs a little precision)
        assert_eq!(size, PhysicalSizeMm { width_mm: 598, height_mm: 336 });
        assert!((ppi - 108.8).abs() < 0.2, "got {ppi}");
    }

    #[test]
    fn test_size_from_diagonal_uses_16_9_for_zero_resolution() {
        let from_zero = size_from_diagonal(0, 0, 24.0);
        let from_fhd = size_from_diagonal(1920, 1080, 24.0);
        assert_eq!(from_zero, from_fhd);
    }

    #[test]
    fn test_guess_diagonal_finds_model_number_prefix() {
        assert_eq!(guess_diagonal_from_names(["LG 27GL850"]), Some(27.0));
    }

    #[test]
    fn test_guess_diagonal_skips_resolution_like_numbers() {
        assert_eq!(guess_diagonal_from_names(["DELL U2720Q", "1920x1080"]), None);
    }

    #[test]
    fn test_guess_diagonal_searches_names_in_order() {
        let names = ["Generic PnP Monitor", "ASUS VG24VQ", "Samsung 32"];
        assert_eq!(guess_diagonal_from_names(names), Some(24.0));
    }

    #[test]
    fn test_size_source_serializes_lowercase() {
        let json = serde_json::to_string(&SizeSource::Edid).unwrap();
        assert_eq!(json, "\"edid\"");
        assert_eq!(SizeSource::Guessed.as_str(), "guessed");
    }
}
