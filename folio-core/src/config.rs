//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};
use crate::grid::GridSettings;
use crate::history::MIN_BOUNDED_LIMIT;
use crate::page::PaperSize;

/// Zoom limits for the on-screen view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    /// Smallest zoom factor.
    pub min: f32,
    /// Largest zoom factor.
    pub max: f32,
    /// Increment applied by zoom in/out.
    pub step: f32,
    /// Zoom factor a new view starts at.
    pub initial: f32,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 2.0,
            step: 0.1,
            initial: 0.2,
        }
    }
}

/// Settings shared by the element store, the transform controller and the view.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid display and snapping.
    pub grid: GridSettings,
    /// Smallest width/height a resize may produce.
    pub min_element_size: f32,
    /// Offset applied on both axes to duplicated elements.
    pub duplicate_offset: f32,
    /// Maximum undo snapshots kept (`0` = unbounded, otherwise at least 2).
    pub history_limit: usize,
    /// Side length of the resize handles in screen pixels.
    pub handle_size: f32,
    /// Distance of the rotation handle above the element in screen pixels.
    pub rotation_handle_offset: f32,
    /// Angle increment for rotation while shift is held.
    pub rotation_snap_degrees: f32,
    /// Distance moved by an arrow key press without shift.
    pub nudge: f32,
    /// Zoom limits.
    pub zoom: ZoomSettings,
    /// Page size of new documents.
    pub paper: PaperSize,
    /// Start new views with rule-of-thirds guides.
    pub thirds_guides: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid: GridSettings::default(),
            min_element_size: 5.0,
            duplicate_offset: 20.0,
            history_limit: 200,
            handle_size: 10.0,
            rotation_handle_offset: 30.0,
            rotation_snap_degrees: 15.0,
            nudge: 1.0,
            zoom: ZoomSettings::default(),
            paper: PaperSize::Letter,
            thirds_guides: false,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every size is positive and the zoom bounds are ordered.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Config`] naming the offending field.
    pub fn validate(&self) -> EditorResult<()> {
        let positive = [
            ("grid.size", self.grid.size),
            ("min_element_size", self.min_element_size),
            ("handle_size", self.handle_size),
            ("zoom.min", self.zoom.min),
            ("zoom.step", self.zoom.step),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(EditorError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.duplicate_offset < 0.0 || self.nudge < 0.0 || self.grid.snap_threshold < 0.0 {
            return Err(EditorError::Config(
                "offsets and thresholds must not be negative".to_string(),
            ));
        }
        if self.history_limit != 0 && self.history_limit < MIN_BOUNDED_LIMIT {
            return Err(EditorError::Config(format!(
                "history_limit must be 0 (unbounded) or at least {MIN_BOUNDED_LIMIT}, got {}",
                self.history_limit
            )));
        }
        if self.zoom.min > self.zoom.max {
            return Err(EditorError::Config(format!(
                "zoom.min {} exceeds zoom.max {}",
                self.zoom.min, self.zoom.max
            )));
        }
        if !(self.zoom.min..=self.zoom.max).contains(&self.zoom.initial) {
            return Err(EditorError::Config(format!(
                "zoom.initial {} outside {}..={}",
                self.zoom.initial, self.zoom.min, self.zoom.max
            )));
        }
        let page = self.paper.pixels();
        if page.width <= 0.0 || page.height <= 0.0 {
            return Err(EditorError::Config("paper must have a positive size".to_string()));
        }
        Ok(())
    }
}
