//! Manipulation handles drawn around the selected element.
//!
//! Handle rectangles are expressed in the element's unrotated frame: the
//! renderer draws them under the element's rotation and the controller
//! inverse-rotates the pointer before hit-testing.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::element::Element;
use crate::geometry::{Point, Rect};

/// One of the eight resize handles or the rotation handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handle {
    /// Top-left corner.
    TopLeft,
    /// Top edge midpoint.
    Top,
    /// Top-right corner.
    TopRight,
    /// Right edge midpoint.
    Right,
    /// Bottom-right corner.
    BottomRight,
    /// Bottom edge midpoint.
    Bottom,
    /// Bottom-left corner.
    BottomLeft,
    /// Left edge midpoint.
    Left,
    /// Rotation knob above the top edge.
    Rotation,
}

impl Handle {
    /// The eight resize handles, clockwise from top-left.
    pub const RESIZE: [Self; 8] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Right,
        Self::BottomRight,
        Self::Bottom,
        Self::BottomLeft,
        Self::Left,
    ];

    /// Horizontal edge this handle drags: `-1` left, `1` right, `0` neither.
    #[must_use]
    pub const fn horizontal(self) -> i8 {
        match self {
            Self::TopLeft | Self::Left | Self::BottomLeft => -1,
            Self::TopRight | Self::Right | Self::BottomRight => 1,
            Self::Top | Self::Bottom | Self::Rotation => 0,
        }
    }

    /// Vertical edge this handle drags: `-1` top, `1` bottom, `0` neither.
    #[must_use]
    pub const fn vertical(self) -> i8 {
        match self {
            Self::TopLeft | Self::Top | Self::TopRight => -1,
            Self::BottomLeft | Self::Bottom | Self::BottomRight => 1,
            Self::Left | Self::Right | Self::Rotation => 0,
        }
    }

    /// The handle across the element that stays put while this one drags.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::Top => Self::Bottom,
            Self::TopRight => Self::BottomLeft,
            Self::Right => Self::Left,
            Self::BottomRight => Self::TopLeft,
            Self::Bottom => Self::Top,
            Self::BottomLeft => Self::TopRight,
            Self::Left => Self::Right,
            Self::Rotation => Self::Rotation,
        }
    }
}

/// Screen-space handle dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleStyle {
    /// Side length of a handle in screen pixels.
    pub size: f32,
    /// Distance of the rotation knob above the top edge in screen pixels.
    pub rotation_offset: f32,
}

impl Default for HandleStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            rotation_offset: 30.0,
        }
    }
}

impl HandleStyle {
    /// Handle dimensions from the editor config.
    #[must_use]
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            size: config.handle_size,
            rotation_offset: config.rotation_handle_offset,
        }
    }

    /// Handle rectangles for `element` at `zoom`, in unrotated canvas space.
    ///
    /// Sizes are divided by the zoom so handles keep a constant on-screen size.
    #[must_use]
    pub fn rects(&self, element: &Element, zoom: f32) -> Vec<(Handle, Rect)> {
        let bounds = element.bounds();
        let side = self.size / zoom;
        let centered = |p: Point| Rect::new(p.x - side / 2.0, p.y - side / 2.0, side, side);

        let mut rects: Vec<(Handle, Rect)> = Handle::RESIZE
            .iter()
            .map(|&handle| (handle, centered(anchor(&bounds, handle))))
            .collect();
        rects.push((Handle::Rotation, centered(self.rotation_anchor(&bounds, zoom))));
        rects
    }

    /// Centre of the rotation knob.
    #[must_use]
    pub fn rotation_anchor(&self, bounds: &Rect, zoom: f32) -> Point {
        Point::new(bounds.center().x, bounds.y - self.rotation_offset / zoom)
    }

    /// Handle under `point` (canvas space), accounting for rotation.
    #[must_use]
    pub fn hit(&self, element: &Element, point: Point, zoom: f32) -> Option<Handle> {
        let local = point.rotate_around(element.bounds().center(), -element.rotation);
        self.rects(element, zoom)
            .into_iter()
            .find(|(_, rect)| rect.contains(local))
            .map(|(handle, _)| handle)
    }
}

/// Where a resize handle sits on `bounds`.
#[must_use]
pub fn anchor(bounds: &Rect, handle: Handle) -> Point {
    let x = match handle.horizontal() {
        -1 => bounds.x,
        1 => bounds.right(),
        _ => bounds.center().x,
    };
    let y = match handle.vertical() {
        -1 => bounds.y,
        1 => bounds.bottom(),
        _ => bounds.center().y,
    };
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;

    fn square() -> Element {
        Element::shape(ShapeKind::Rect, "#000", Rect::new(100.0, 100.0, 100.0, 100.0))
    }

    #[test]
    fn test_nine_handles_scaled_by_zoom() {
        let rects = HandleStyle::default().rects(&square(), 0.5);
        assert_eq!(rects.len(), 9);
        let (handle, rect) = rects[0];
        assert_eq!(handle, Handle::TopLeft);
        assert_eq!(rect, Rect::new(90.0, 90.0, 20.0, 20.0));
    }

    #[test]
    fn test_hit_bottom_right_and_rotation() {
        let style = HandleStyle::default();
        let element = square();
        assert_eq!(style.hit(&element, Point::new(201.0, 199.0), 1.0), Some(Handle::BottomRight));
        assert_eq!(style.hit(&element, Point::new(150.0, 70.0), 1.0), Some(Handle::Rotation));
        assert_eq!(style.hit(&element, Point::new(150.0, 150.0), 1.0), None);
    }

    #[test]
    fn test_hit_follows_rotation() {
        let style = HandleStyle::default();
        let element = square().with_rotation(90.0);
        // Rotating 90° clockwise moves the top edge midpoint to the right side.
        assert_eq!(style.hit(&element, Point::new(200.0, 150.0), 1.0), Some(Handle::Top));
    }

    #[test]
    fn test_opposite_handles_pair_up() {
        for handle in Handle::RESIZE {
            assert_eq!(handle.opposite().opposite(), handle);
            assert_eq!(handle.opposite().horizontal(), -handle.horizontal());
            assert_eq!(handle.opposite().vertical(), -handle.vertical());
        }
    }
}
