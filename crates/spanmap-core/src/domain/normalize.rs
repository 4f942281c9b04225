//! Layout normalizer: moves the resolved layout onto the viewer's canvas.
//!
//! The resolver anchors each component's root at (0, 0), which the viewer
//! would draw in its top-left corner.  Normalization translates the whole
//! layout so the centre of its bounding box lands on the canvas centre, then
//! rounds positions to 4 decimals.  Sizes are left untouched; the encoder
//! recomputes them from resolution and diagonal.

use tracing::debug;

use super::config::CanvasSize;
use super::layout::PhysicalLayout;

/// Decimal places kept for normalized positions.
const POSITION_SCALE: f64 = 10_000.0;

/// Centres `layout` on `canvas` and rounds every `x`/`y` to 4 decimals.
///
/// Rounding happens after translation so the translation itself is exact.
/// An empty layout stays empty.
pub fn normalize_layout(layout: &PhysicalLayout, canvas: CanvasSize) -> PhysicalLayout {
    let Some(bounds) = layout.bounds() else {
        return PhysicalLayout::default();
    };

    let (canvas_cx, canvas_cy) = canvas.center();
    let dx = canvas_cx - (bounds.x + bounds.width / 2.0);
    let dy = canvas_cy - (bounds.y + bounds.height / 2.0);
    debug!("normalizing {} rects: translate by ({dx:.4}, {dy:.4})", layout.len());

    PhysicalLayout::from_rects(layout.iter().map(|(id, rect)| {
        let mut moved = rect.translated(dx, dy);
        moved.x = round4(moved.x);
        moved.y = round4(moved.y);
        (id, moved)
    }))
}

/// Rounds half-up to 4 decimals, the way the viewer rounds (`-1.5e-5 → 0.0`).
pub(crate) fn round4(value: f64) -> f64 {
    (value * POSITION_SCALE + 0.5).floor() / POSITION_SCALE
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::monitor::PhysicalRect;

    fn rect(x: f64, y: f64, width: f64, height: f64) -> PhysicalRect {
        PhysicalRect { x, y, width, height }
    }

    #[test]
    fn test_normalize_empty_layout_is_empty() {
        let normalized = normalize_layout(&PhysicalLayout::default(), CanvasSize::default());
        assert!(normalized.is_empty());
    }

    #[test]
    fn test_normalize_single_rect_is_centred_on_canvas() {
        // Arrange
        let layout = PhysicalLayout::from_rects([(0, rect(0.0, 0.0, 20.0, 10.0))]);

        // Act
        let normalized = normalize_layout(&layout, CanvasSize::default());

        // Assert: (72 - 10, 48 - 5)
        assert_eq!(normalized.get(0), Some(&rect(62.0, 43.0, 20.0, 10.0)));
    }

    #[test]
    fn test_normalize_centres_bounding_box_of_several_rects() {
        let layout = PhysicalLayout::from_rects([
            (0, rect(0.0, 0.0, 23.4862, 13.2110)),
            (1, rect(23.5321, 0.0, 23.4862, 13.2110)),
        ]);

        let normalized = normalize_layout(&layout, CanvasSize::default());

        let bounds = normalized.bounds().expect("two rects");
        let (cx, cy) = (bounds.x + bounds.width / 2.0, bounds.y + bounds.height / 2.0);
        assert!((cx - 72.0).abs() <= 1e-4, "cx = {cx}");
        assert!((cy - 48.0).abs() <= 1e-4, "cy = {cy}");
    }

    #[test]
    fn test_normalize_honours_custom_canvas() {
        let layout = PhysicalLayout::from_rects([(3, rect(-5.0, -5.0, 10.0, 10.0))]);
        let canvas = CanvasSize { width: 40.0, height: 20.0 };

        let normalized = normalize_layout(&layout, canvas);

        assert_eq!(normalized.get(3).map(|r| (r.x, r.y)), Some((15.0, 5.0)));
    }

    #[test]
    fn test_normalize_rounds_positions_to_four_decimals() {
        let layout = PhysicalLayout::from_rects([(0, rect(0.0, 0.0, 1.0 / 3.0, 1.0 / 7.0))]);

        let normalized = normalize_layout(&layout, CanvasSize::default());

        let r = normalized.get(0).expect("placed");
        assert_eq!(r.x, round4(72.0 - 1.0 / 6.0));
        assert_eq!(r.x, 71.8333);
    }

    #[test]
    fn test_round4_rounds_half_up_like_the_viewer() {
        assert_eq!(round4(1.23456), 1.2346);
        assert_eq!(round4(-1.23456), -1.2346);
        assert_eq!(round4(2.5e-5), 0.0);
        assert_eq!(round4(10.0), 10.0);
    }
}
