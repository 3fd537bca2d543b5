//! Selection and transform controller.
//!
//! Turns pointer and keyboard events into selection changes and committed
//! store edits. While a drag, resize or rotate gesture is in flight the
//! controller only keeps an uncommitted preview; the store sees a single
//! `update_element` when the pointer is released.
//!
//! ```text
//!  Down ──► hit handle? ──yes──► Resize / Rotate ─┐
//!    │                                            │ Move: preview only
//!    └──no──► element_at ──► select ──► Drag ─────┤
//!                                                 ▼
//!                                Up: snap + commit │ Cancel: drop preview
//! ```

use std::borrow::Cow;

use crate::config::EditorConfig;
use crate::document::DocumentState;
use crate::element::{Element, ElementId, ElementPatch};
use crate::event::{InputEvent, Key, KeyModifiers, PointerPhase};
use crate::geometry::{Point, Rect, Size};
use crate::grid;
use crate::handle::{self, Handle};
use crate::store::ElementStore;
use crate::view::ViewState;

/// What handling an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed.
    Ignored,
    /// The selection changed (not an undoable edit).
    SelectionChanged,
    /// A gesture started on the selected element.
    GestureStarted,
    /// The live preview changed.
    Preview,
    /// A snapshot was committed to the store (or undo/redo moved the cursor).
    Committed,
    /// An in-flight gesture was dropped without committing.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureKind {
    Drag,
    Resize(Handle),
    Rotate,
}

#[derive(Debug, Clone)]
struct Gesture {
    kind: GestureKind,
    id: ElementId,
    start: Point,
    original: Element,
    moved: bool,
}

/// Converts input events into selection changes and committed transforms.
#[derive(Debug, Clone)]
pub struct TransformController {
    min_element_size: f32,
    rotation_snap_degrees: f32,
    nudge: f32,
    gesture: Option<Gesture>,
    preview: Option<Element>,
}

impl Default for TransformController {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl TransformController {
    /// Create a controller using the sizing and rotation rules in `config`.
    /// Grid snapping follows the `ViewState` passed to [`Self::handle`].
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            min_element_size: config.min_element_size,
            rotation_snap_degrees: config.rotation_snap_degrees,
            nudge: config.nudge,
            gesture: None,
            preview: None,
        }
    }

    /// The element as it would look if the current gesture were committed.
    #[must_use]
    pub fn preview(&self) -> Option<&Element> {
        self.preview.as_ref()
    }

    /// Whether a drag, resize or rotate is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// The store's document with the live preview substituted in.
    #[must_use]
    pub fn display_document<'a>(&self, store: &'a ElementStore) -> Cow<'a, DocumentState> {
        let Some(preview) = &self.preview else {
            return Cow::Borrowed(store.document());
        };
        let mut document = store.document().clone();
        if let Some(element) = document.get_mut(preview.id) {
            *element = preview.clone();
        }
        Cow::Owned(document)
    }

    /// Handle one input event.
    pub fn handle(
        &mut self,
        store: &mut ElementStore,
        view: &ViewState,
        event: &InputEvent,
    ) -> Outcome {
        match *event {
            InputEvent::Pointer {
                phase,
                x,
                y,
                modifiers,
            } => {
                let canvas = view.viewport.screen_to_canvas(Point::new(x, y));
                match phase {
                    PointerPhase::Down => self.pointer_down(store, view, canvas),
                    PointerPhase::Move => self.pointer_move(canvas, modifiers),
                    PointerPhase::Up => self.pointer_up(store, view, canvas, modifiers),
                    PointerPhase::Cancel => self.cancel(),
                }
            }
            InputEvent::Key { key, modifiers } => self.key(store, view, key, modifiers),
        }
    }

    /// Drop any in-flight gesture without committing.
    pub fn cancel(&mut self) -> Outcome {
        self.preview = None;
        if self.gesture.take().is_some() {
            tracing::trace!("Gesture cancelled");
            Outcome::Cancelled
        } else {
            Outcome::Ignored
        }
    }

    fn pointer_down(&mut self, store: &mut ElementStore, view: &ViewState, canvas: Point) -> Outcome {
        self.cancel();
        let zoom = view.viewport.zoom;

        if let Some(selected) = store.selected() {
            if let Some(handle) = view.handles.hit(selected, canvas, zoom) {
                if !selected.is_movable() {
                    return Outcome::Ignored;
                }
                let kind = match handle {
                    Handle::Rotation => GestureKind::Rotate,
                    other => GestureKind::Resize(other),
                };
                self.begin(kind, selected, canvas);
                return Outcome::GestureStarted;
            }
        }

        let Some(id) = store.document().element_at(canvas) else {
            let had_selection = store.selected_id().is_some();
            store.select(None);
            return if had_selection {
                Outcome::SelectionChanged
            } else {
                Outcome::Ignored
            };
        };

        let changed = store.selected_id() != Some(id);
        store.select(Some(id));
        if let Some(element) = store.get(id).filter(|e| e.is_movable()) {
            let element = element.clone();
            self.begin(GestureKind::Drag, &element, canvas);
        }
        if changed {
            Outcome::SelectionChanged
        } else if self.is_active() {
            Outcome::GestureStarted
        } else {
            Outcome::Ignored
        }
    }

    fn begin(&mut self, kind: GestureKind, element: &Element, start: Point) {
        tracing::trace!("Starting {kind:?} on {}", element.id);
        self.gesture = Some(Gesture {
            kind,
            id: element.id,
            start,
            original: element.clone(),
            moved: false,
        });
    }

    fn pointer_move(&mut self, canvas: Point, modifiers: KeyModifiers) -> Outcome {
        let Some(gesture) = self.gesture.as_mut() else {
            return Outcome::Ignored;
        };
        if canvas != gesture.start {
            gesture.moved = true;
        }
        let gesture = gesture.clone();
        self.preview = Some(self.transformed(&gesture, canvas, modifiers));
        Outcome::Preview
    }

    fn pointer_up(
        &mut self,
        store: &mut ElementStore,
        view: &ViewState,
        canvas: Point,
        modifiers: KeyModifiers,
    ) -> Outcome {
        self.preview = None;
        let Some(gesture) = self.gesture.take() else {
            return Outcome::Ignored;
        };
        if !gesture.moved && canvas == gesture.start {
            return Outcome::Ignored;
        }

        let result = self.transformed(&gesture, canvas, modifiers);
        let patch = match gesture.kind {
            GestureKind::Drag => {
                let guides = if view.show_guides {
                    view.guides.as_slice()
                } else {
                    &[]
                };
                ElementPatch::position(grid::snap_position(result.position, &view.grid, guides))
            }
            GestureKind::Resize(_) => ElementPatch {
                position: Some(result.position),
                size: result.size,
                ..ElementPatch::default()
            },
            GestureKind::Rotate => ElementPatch::rotation(result.rotation),
        };

        if store.update_element(gesture.id, &patch) {
            Outcome::Committed
        } else {
            Outcome::Ignored
        }
    }

    /// The gesture's element with the pointer at `canvas`. Snapping to the
    /// grid happens only at commit.
    fn transformed(&self, gesture: &Gesture, canvas: Point, modifiers: KeyModifiers) -> Element {
        let mut element = gesture.original.clone();
        match gesture.kind {
            GestureKind::Drag => {
                element.position = gesture
                    .original
                    .position
                    .offset(canvas.x - gesture.start.x, canvas.y - gesture.start.y);
            }
            GestureKind::Resize(dragged) => {
                let delta = Point::new(canvas.x - gesture.start.x, canvas.y - gesture.start.y)
                    .rotate_around(Point::default(), -gesture.original.rotation);
                let original = gesture.original.bounds();
                let bounds = resize_bounds(original, dragged, delta, self.min_element_size);
                // Keep the opposite handle where it was on the canvas.
                let rotation = gesture.original.rotation;
                let fixed = dragged.opposite();
                let before =
                    handle::anchor(&original, fixed).rotate_around(original.center(), rotation);
                let after =
                    handle::anchor(&bounds, fixed).rotate_around(bounds.center(), rotation);
                element.position = bounds.origin().offset(before.x - after.x, before.y - after.y);
                element.size = Some(bounds.size());
            }
            GestureKind::Rotate => {
                let center = gesture.original.bounds().center();
                let mut angle = (canvas.y - center.y).atan2(canvas.x - center.x).to_degrees() + 90.0;
                if angle > 180.0 {
                    angle -= 360.0;
                }
                if modifiers.shift {
                    angle = grid::snap_value(angle, self.rotation_snap_degrees);
                }
                element.rotation = angle;
            }
        }
        element
    }

    fn key(
        &mut self,
        store: &mut ElementStore,
        view: &ViewState,
        key: Key,
        modifiers: KeyModifiers,
    ) -> Outcome {
        if key == Key::Escape {
            let cancelled = self.cancel();
            if store.selected_id().is_some() {
                store.select(None);
                return Outcome::SelectionChanged;
            }
            return cancelled;
        }
        if self.is_active() {
            return Outcome::Ignored;
        }

        let committed = match key {
            Key::Delete | Key::Backspace => store
                .selected_id()
                .is_some_and(|id| store.delete_element(id)),
            Key::ArrowLeft | Key::ArrowRight | Key::ArrowUp | Key::ArrowDown => {
                self.nudge(store, view, key, modifiers.shift)
            }
            Key::Char('z') if modifiers.command() => {
                if modifiers.shift {
                    store.redo()
                } else {
                    store.undo()
                }
            }
            Key::Char('y') if modifiers.command() => store.redo(),
            Key::Char('d') if modifiers.command() => {
                let duplicate = store
                    .selected_id()
                    .and_then(|id| store.duplicate_element(id));
                if let Some(id) = duplicate {
                    store.select(Some(id));
                }
                duplicate.is_some()
            }
            _ => false,
        };

        if committed {
            Outcome::Committed
        } else {
            Outcome::Ignored
        }
    }

    fn nudge(&self, store: &mut ElementStore, view: &ViewState, key: Key, coarse: bool) -> bool {
        let Some(element) = store.selected().filter(|e| e.is_movable()) else {
            return false;
        };
        let step = if coarse { view.grid.size } else { self.nudge };
        let (dx, dy) = match key {
            Key::ArrowLeft => (-step, 0.0),
            Key::ArrowRight => (step, 0.0),
            Key::ArrowUp => (0.0, -step),
            _ => (0.0, step),
        };
        let id = element.id;
        let position = element.position.offset(dx, dy);
        store.update_element(id, &ElementPatch::position(position))
    }
}

/// Resize `bounds` by dragging `handle` by `delta` (in the element's own
/// frame). Each axis is clamped to `floor` with the opposite edge held fixed.
#[must_use]
pub fn resize_bounds(bounds: Rect, handle: Handle, delta: Point, floor: f32) -> Rect {
    let (x, width) = resize_axis(bounds.x, bounds.width, handle.horizontal(), delta.x, floor);
    let (y, height) = resize_axis(bounds.y, bounds.height, handle.vertical(), delta.y, floor);
    Rect::from_origin_size(Point::new(x, y), Size::new(width, height))
}

fn resize_axis(start: f32, length: f32, edge: i8, delta: f32, floor: f32) -> (f32, f32) {
    match edge {
        -1 => {
            let end = start + length;
            let length = (length - delta).max(floor);
            (end - length, length)
        }
        1 => (start, (length + delta).max(floor)),
        _ => (start, length.max(floor)),
    }
}
