//! Engine configuration.
//!
//! [`EngineConfig`] is a plain value: no global state and no environment reads.
//! The CLI layer is responsible for populating it from a TOML file or flags.

/// Width of the Spanright canvas in inches.
pub const DEFAULT_CANVAS_WIDTH: f64 = 144.0;

/// Height of the Spanright canvas in inches.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 96.0;

/// Base URL of the layout viewer.  The encoded layout is appended as a fragment.
pub const DEFAULT_BASE_URL: &str = "https://spanright.com/";

/// Size of the external canvas the normalized layout is centred on (inches).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    /// Returns the canvas centre point.
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

/// All runtime settings of the resolution pipeline.
///
/// # Example
///
/// ```rust
/// use spanmap_core::EngineConfig;
///
/// let cfg = EngineConfig::default();
/// assert_eq!(cfg.canvas.center(), (72.0, 48.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Canvas the layout is centred on.
    pub canvas: CanvasSize,
    /// Base URL the `#layout=` fragment is appended to.
    pub base_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
