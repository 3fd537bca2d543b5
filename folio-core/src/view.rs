//! On-screen view: zoom, pan, grid and guide visibility.

use serde::{Deserialize, Serialize};

use crate::config::{EditorConfig, ZoomSettings};
use crate::geometry::Point;
use crate::grid::{GridSettings, Guide};
use crate::handle::HandleStyle;

/// Maps between screen and canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current zoom level (1.0 = 100%).
    pub zoom: f32,
    /// Pan offset X in screen pixels.
    pub pan_x: f32,
    /// Pan offset Y in screen pixels.
    pub pan_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    /// A viewport at the given zoom with no pan.
    #[must_use]
    pub const fn with_zoom(zoom: f32) -> Self {
        Self {
            zoom,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }

    /// Transform screen coordinates to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.zoom,
            (screen.y - self.pan_y) / self.zoom,
        )
    }

    /// Transform canvas coordinates to screen coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.zoom + self.pan_x,
            canvas.y * self.zoom + self.pan_y,
        )
    }

    /// Zoom in by one step, clamped to the maximum.
    pub fn zoom_in(&mut self, limits: &ZoomSettings) {
        self.set_zoom(self.zoom + limits.step, limits);
    }

    /// Zoom out by one step, clamped to the minimum.
    pub fn zoom_out(&mut self, limits: &ZoomSettings) {
        self.set_zoom(self.zoom - limits.step, limits);
    }

    /// Set the zoom, clamped to the limits and rounded to the step grid so
    /// repeated steps do not accumulate float drift.
    pub fn set_zoom(&mut self, zoom: f32, limits: &ZoomSettings) {
        let stepped = (zoom / limits.step).round() * limits.step;
        self.zoom = stepped.clamp(limits.min, limits.max);
    }

    /// Zoom as a whole percentage, for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn percent(&self) -> i32 {
        (self.zoom * 100.0).round() as i32
    }
}

/// Everything besides the document that affects what is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Zoom and pan.
    pub viewport: Viewport,
    /// Draw grid lines.
    pub show_grid: bool,
    /// Grid spacing and line style.
    #[serde(default)]
    pub grid: GridSettings,
    /// Draw guide lines.
    pub show_guides: bool,
    /// Guides used for drawing and snapping.
    pub guides: Vec<Guide>,
    /// Selection handle dimensions.
    #[serde(default)]
    pub handles: HandleStyle,
}

impl ViewState {
    /// A view configured from the editor config: initial zoom, grid
    /// visibility, the page's fold guides and, if enabled, thirds guides.
    ///
    /// A thirds line that lands on a fold is only added once.
    #[must_use]
    pub fn from_config(config: &EditorConfig) -> Self {
        let mut guides = config.paper.fold_guides();
        if config.thirds_guides {
            for guide in Guide::thirds(config.paper.pixels()) {
                let duplicate = guides.iter().any(|g| {
                    g.orientation == guide.orientation && (g.position - guide.position).abs() < 0.5
                });
                if !duplicate {
                    guides.push(guide);
                }
            }
        }
        Self {
            viewport: Viewport::with_zoom(config.zoom.initial),
            show_grid: config.grid.visible,
            grid: config.grid.clone(),
            show_guides: true,
            guides,
            handles: HandleStyle::from_config(config),
        }
    }

    /// Toggle grid visibility.
    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    /// Enable or disable snapping to the grid on drag commit.
    pub fn set_snap(&mut self, snap: bool) {
        self.grid.snap = snap;
    }

    /// Add a guide line.
    pub fn add_guide(&mut self, guide: Guide) {
        self.guides.push(guide);
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            show_grid: false,
            grid: GridSettings::default(),
            show_guides: true,
            guides: Vec::new(),
            handles: HandleStyle::default(),
        }
    }
}
