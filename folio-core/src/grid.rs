//! Grid and guide snapping.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size};

/// Grid display and snapping settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Grid cell size in canvas pixels.
    pub size: f32,
    /// Whether grid lines are drawn.
    pub visible: bool,
    /// Whether committed positions snap to the grid.
    pub snap: bool,
    /// Distance within which a committed coordinate snaps to a guide.
    pub snap_threshold: f32,
    /// Grid line color as hex.
    pub color: String,
    /// Grid line opacity.
    pub opacity: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: 20.0,
            visible: true,
            snap: true,
            snap_threshold: 10.0,
            color: "#cccccc".to_string(),
            opacity: 0.5,
        }
    }
}

impl GridSettings {
    /// Snap a point to the nearest grid intersection if snapping is on.
    #[must_use]
    pub fn snap_point(&self, point: Point) -> Point {
        if !self.snap || self.size <= 0.0 {
            return point;
        }
        Point::new(snap_value(point.x, self.size), snap_value(point.y, self.size))
    }
}

/// Round `value` to the nearest multiple of `step`, with halves rounding up
/// (toward positive infinity).
#[must_use]
pub fn snap_value(value: f32, step: f32) -> f32 {
    (value / step + 0.5).floor() * step
}

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// A horizontal line at a fixed y.
    Horizontal,
    /// A vertical line at a fixed x.
    Vertical,
}

/// A layout guide line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    /// Line orientation.
    pub orientation: Orientation,
    /// Position along the perpendicular axis.
    pub position: f32,
    /// Line color as hex.
    pub color: String,
}

impl Guide {
    /// A vertical guide at `x`.
    #[must_use]
    pub fn vertical(x: f32) -> Self {
        Self {
            orientation: Orientation::Vertical,
            position: x,
            color: "#ff0000".to_string(),
        }
    }

    /// A horizontal guide at `y`.
    #[must_use]
    pub fn horizontal(y: f32) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            position: y,
            color: "#ff0000".to_string(),
        }
    }

    /// Rule-of-thirds guides for a page.
    #[must_use]
    pub fn thirds(page: Size) -> Vec<Self> {
        vec![
            Self::vertical(page.width / 3.0),
            Self::vertical(page.width / 3.0 * 2.0),
            Self::horizontal(page.height / 3.0),
            Self::horizontal(page.height / 3.0 * 2.0),
        ]
    }
}

/// Snap a committed position: grid first, then any guide within
/// `grid.snap_threshold` of the raw coordinate overrides the grid on its axis.
#[must_use]
pub fn snap_position(raw: Point, grid: &GridSettings, guides: &[Guide]) -> Point {
    if !grid.snap {
        return raw;
    }
    let mut snapped = grid.snap_point(raw);

    if let Some(x) = nearest_guide(raw.x, Orientation::Vertical, guides, grid.snap_threshold) {
        snapped.x = x;
    }
    if let Some(y) = nearest_guide(raw.y, Orientation::Horizontal, guides, grid.snap_threshold) {
        snapped.y = y;
    }
    snapped
}

fn nearest_guide(
    value: f32,
    orientation: Orientation,
    guides: &[Guide],
    threshold: f32,
) -> Option<f32> {
    guides
        .iter()
        .filter(|g| g.orientation == orientation)
        .map(|g| (g.position, (g.position - value).abs()))
        .filter(|(_, distance)| *distance < threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(position, _)| position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_value_rounds_to_nearest_multiple() {
        assert!((snap_value(29.0, 20.0) - 20.0).abs() < f32::EPSILON);
        assert!((snap_value(31.0, 20.0) - 40.0).abs() < f32::EPSILON);
        assert!((snap_value(30.0, 20.0) - 40.0).abs() < f32::EPSILON);
        assert!((snap_value(-30.0, 20.0) - -20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_snap_disabled_returns_raw() {
        let grid = GridSettings {
            snap: false,
            ..GridSettings::default()
        };
        let raw = Point::new(13.0, 27.0);
        assert_eq!(snap_position(raw, &grid, &[]), raw);
    }

    #[test]
    fn test_guide_overrides_grid_within_threshold() {
        let grid = GridSettings::default();
        let guides = [Guide::vertical(33.0), Guide::horizontal(500.0)];
        let snapped = snap_position(Point::new(36.0, 47.0), &grid, &guides);
        assert!((snapped.x - 33.0).abs() < f32::EPSILON);
        assert!((snapped.y - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_thirds() {
        let guides = Guide::thirds(Size::new(300.0, 600.0));
        assert_eq!(guides.len(), 4);
        assert!((guides[1].position - 200.0).abs() < f32::EPSILON);
        assert_eq!(guides[2].orientation, Orientation::Horizontal);
    }
}
