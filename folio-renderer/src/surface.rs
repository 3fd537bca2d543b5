//! Render surface: derives a drawable scene from document and view state.
//!
//! [`render`] is a pure function of its inputs. Items are listed back to
//! front, in canvas coordinates; [`RenderScene::scale`] maps them to output
//! pixels.

use folio_core::{DocumentState, Element, Handle, Orientation, Point, Rect, Size, ViewState};

/// Color of the selection box and handles.
pub const SELECTION_COLOR: &str = "#2563eb";

/// One drawable item.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem {
    /// Page background.
    Background {
        /// Page rectangle.
        rect: Rect,
        /// Fill color.
        fill: String,
    },
    /// One grid line.
    GridLine {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke color.
        color: String,
        /// Stroke opacity.
        opacity: f32,
    },
    /// A guide line spanning the page.
    Guide {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke color.
        color: String,
    },
    /// A document element.
    Element(Element),
    /// Outline of the selected element.
    SelectionBox {
        /// Unrotated bounds.
        bounds: Rect,
        /// Rotation in degrees about the bounds centre.
        rotation: f32,
    },
    /// A manipulation handle of the selected element.
    Handle {
        /// Which handle.
        handle: Handle,
        /// Handle rectangle in the element's unrotated frame.
        rect: Rect,
        /// Rotation in degrees about `pivot`.
        rotation: f32,
        /// The selected element's centre.
        pivot: Point,
    },
}

/// A back-to-front list of items ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderScene {
    /// Page size in canvas pixels.
    pub page: Size,
    /// Output pixels per canvas pixel.
    pub scale: f32,
    /// Items in paint order.
    pub items: Vec<RenderItem>,
}

impl RenderScene {
    /// Output width in pixels.
    #[must_use]
    pub fn output_width(&self) -> f32 {
        self.page.width * self.scale
    }

    /// Output height in pixels.
    #[must_use]
    pub fn output_height(&self) -> f32 {
        self.page.height * self.scale
    }

    /// Scene for export: page and elements only, at the given scale.
    #[must_use]
    pub fn for_export(document: &DocumentState, page: Size, scale: f32) -> Self {
        let mut items = vec![background(page)];
        items.extend(
            document
                .paint_order()
                .into_iter()
                .map(|e| RenderItem::Element(e.clone())),
        );
        Self { page, scale, items }
    }

    /// Elements in the scene, in paint order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.items.iter().filter_map(|item| match item {
            RenderItem::Element(element) => Some(element),
            _ => None,
        })
    }
}

/// Derive the on-screen scene: background, grid, guides, elements in
/// ascending z order, then the selection overlay. Scaled by the view zoom.
#[must_use]
pub fn render(document: &DocumentState, view: &ViewState, page: Size) -> RenderScene {
    let zoom = view.viewport.zoom;
    let mut scene = RenderScene::for_export(document, page, zoom);
    let elements = scene.items.split_off(1);

    if view.show_grid {
        scene.items.extend(grid_lines(view, page));
    }
    if view.show_guides {
        scene.items.extend(view.guides.iter().map(|guide| {
            let (from, to) = match guide.orientation {
                Orientation::Vertical => (
                    Point::new(guide.position, 0.0),
                    Point::new(guide.position, page.height),
                ),
                Orientation::Horizontal => (
                    Point::new(0.0, guide.position),
                    Point::new(page.width, guide.position),
                ),
            };
            RenderItem::Guide {
                from,
                to,
                color: guide.color.clone(),
            }
        }));
    }
    scene.items.extend(elements);

    if let Some(selected) = document.selected() {
        let bounds = selected.bounds();
        scene.items.push(RenderItem::SelectionBox {
            bounds,
            rotation: selected.rotation,
        });
        let pivot = bounds.center();
        scene.items.extend(
            view.handles
                .rects(selected, zoom)
                .into_iter()
                .map(|(handle, rect)| RenderItem::Handle {
                    handle,
                    rect,
                    rotation: selected.rotation,
                    pivot,
                }),
        );
    }
    scene
}

fn background(page: Size) -> RenderItem {
    RenderItem::Background {
        rect: Rect::new(0.0, 0.0, page.width, page.height),
        fill: "#ffffff".to_string(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn grid_lines(view: &ViewState, page: Size) -> Vec<RenderItem> {
    let step = view.grid.size;
    if step <= 0.0 {
        return Vec::new();
    }
    let line = |from: Point, to: Point| RenderItem::GridLine {
        from,
        to,
        color: view.grid.color.clone(),
        opacity: view.grid.opacity,
    };
    let mut lines = Vec::new();
    let mut i = 1u32;
    loop {
        let x = step * i as f32;
        if x >= page.width {
            break;
        }
        lines.push(line(Point::new(x, 0.0), Point::new(x, page.height)));
        i += 1;
    }
    let mut i = 1u32;
    loop {
        let y = step * i as f32;
        if y >= page.height {
            break;
        }
        lines.push(line(Point::new(0.0, y), Point::new(page.width, y)));
        i += 1;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ElementStore, Guide, ShapeKind, Viewport};

    fn page() -> Size {
        Size::new(200.0, 100.0)
    }

    fn store_with_two() -> (ElementStore, folio_core::ElementId, folio_core::ElementId) {
        let mut store = ElementStore::default();
        let a = store.add_element(Element::shape(ShapeKind::Rect, "#f00", Rect::new(0.0, 0.0, 50.0, 50.0)));
        let b = store.add_element(Element::shape(ShapeKind::Rect, "#0f0", Rect::new(10.0, 10.0, 50.0, 50.0)));
        store.send_to_back(b);
        (store, a, b)
    }

    #[test]
    fn test_elements_in_ascending_z() {
        let (store, a, b) = store_with_two();
        let scene = render(store.document(), &ViewState::default(), page());
        let order: Vec<_> = scene.elements().map(|e| e.id).collect();
        assert_eq!(order, vec![b, a]);
    }

    #[test]
    fn test_layer_order_and_zoom() {
        let (mut store, a, _) = store_with_two();
        store.select(Some(a));
        let mut view = ViewState {
            viewport: Viewport::with_zoom(0.5),
            show_grid: true,
            ..ViewState::default()
        };
        view.add_guide(Guide::vertical(100.0));

        let scene = render(store.document(), &view, page());
        assert!((scene.output_width() - 100.0).abs() < f32::EPSILON);

        let rank = |item: &RenderItem| match item {
            RenderItem::Background { .. } => 0,
            RenderItem::GridLine { .. } => 1,
            RenderItem::Guide { .. } => 2,
            RenderItem::Element(_) => 3,
            RenderItem::SelectionBox { .. } => 4,
            RenderItem::Handle { .. } => 5,
        };
        let ranks: Vec<_> = scene.items.iter().map(rank).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        // 9 vertical and 4 horizontal lines at the default 20px grid.
        assert_eq!(ranks.iter().filter(|r| **r == 1).count(), 13);
        assert_eq!(ranks.iter().filter(|r| **r == 5).count(), 9);
    }

    #[test]
    fn test_export_scene_has_no_overlay() {
        let (mut store, a, _) = store_with_two();
        store.select(Some(a));
        let scene = RenderScene::for_export(store.document(), page(), 1.0);
        assert_eq!(scene.items.len(), 3);
        assert!(scene
            .items
            .iter()
            .all(|i| matches!(i, RenderItem::Background { .. } | RenderItem::Element(_))));
    }

    #[test]
    fn test_render_does_not_mutate_document() {
        let (mut store, a, _) = store_with_two();
        store.select(Some(a));
        let before = store.document().clone();
        let _ = render(store.document(), &ViewState::default(), page());
        assert_eq!(store.document(), &before);
    }
}
