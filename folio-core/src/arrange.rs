//! Alignment, distribution and stacking calculations.
//!
//! These functions only compute new geometry; the element store applies the
//! result as a single committed edit.

use serde::{Deserialize, Serialize};

use crate::document::DocumentState;
use crate::element::{Element, ElementId};
use crate::geometry::Point;

/// Edge or centre line to align elements on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left edges.
    Left,
    /// Horizontal centres.
    Center,
    /// Right edges.
    Right,
    /// Top edges.
    Top,
    /// Vertical centres.
    Middle,
    /// Bottom edges.
    Bottom,
}

/// Axis to distribute elements along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Along x.
    Horizontal,
    /// Along y.
    Vertical,
}

/// Where to move an element in the stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackMove {
    /// Above every other element.
    ToFront,
    /// Below every other element.
    ToBack,
    /// One step up.
    Forward,
    /// One step down.
    Backward,
}

/// Distinct, existing, movable elements among `ids`, in the order given.
fn movable<'a>(doc: &'a DocumentState, ids: &[ElementId]) -> Vec<&'a Element> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(element) = doc.get(*id) {
            if element.is_movable() && !seen.iter().any(|e: &&Element| e.id == *id) {
                seen.push(element);
            }
        }
    }
    seen
}

/// New positions aligning the movable elements among `ids` against their
/// joint bounding box. Empty if fewer than two elements qualify.
#[must_use]
pub fn align_positions(
    doc: &DocumentState,
    ids: &[ElementId],
    alignment: Alignment,
) -> Vec<(ElementId, Point)> {
    let elements = movable(doc, ids);
    if elements.len() < 2 {
        return Vec::new();
    }
    let Some(bounds) = elements
        .iter()
        .map(|e| e.bounds())
        .reduce(|acc, b| acc.union(&b))
    else {
        return Vec::new();
    };

    elements
        .iter()
        .map(|element| {
            let size = element.effective_size();
            let Point { x, y } = element.position;
            let target = match alignment {
                Alignment::Left => Point::new(bounds.x, y),
                Alignment::Center => Point::new(bounds.center().x - size.width / 2.0, y),
                Alignment::Right => Point::new(bounds.right() - size.width, y),
                Alignment::Top => Point::new(x, bounds.y),
                Alignment::Middle => Point::new(x, bounds.center().y - size.height / 2.0),
                Alignment::Bottom => Point::new(x, bounds.bottom() - size.height),
            };
            (element.id, target)
        })
        .collect()
}

/// New positions spacing the movable elements among `ids` evenly between the
/// two outermost ones along `axis`. Empty if fewer than three qualify.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn distribute_positions(
    doc: &DocumentState,
    ids: &[ElementId],
    axis: Axis,
) -> Vec<(ElementId, Point)> {
    let mut elements = movable(doc, ids);
    if elements.len() < 3 {
        return Vec::new();
    }
    let coord = |e: &Element| match axis {
        Axis::Horizontal => e.position.x,
        Axis::Vertical => e.position.y,
    };
    elements.sort_by(|a, b| coord(a).total_cmp(&coord(b)));

    let first = coord(elements[0]);
    let last = coord(elements[elements.len() - 1]);
    let spacing = (last - first) / (elements.len() - 1) as f32;

    elements
        .iter()
        .enumerate()
        .skip(1)
        .take(elements.len() - 2)
        .map(|(i, element)| {
            let value = first + spacing * i as f32;
            let target = match axis {
                Axis::Horizontal => Point::new(value, element.position.y),
                Axis::Vertical => Point::new(element.position.x, value),
            };
            (element.id, target)
        })
        .collect()
}

/// Paint order after moving `id`, or `None` if the move changes nothing
/// (unknown id, locked element, already at the target slot).
#[must_use]
pub fn restack(doc: &DocumentState, id: ElementId, stack_move: StackMove) -> Option<Vec<ElementId>> {
    if doc.get(id)?.locked {
        return None;
    }
    let mut order: Vec<ElementId> = doc.paint_order().iter().map(|e| e.id).collect();
    let from = order.iter().position(|e| *e == id)?;
    let last = order.len() - 1;
    let to = match stack_move {
        StackMove::ToFront => last,
        StackMove::ToBack => 0,
        StackMove::Forward => (from + 1).min(last),
        StackMove::Backward => from.saturating_sub(1),
    };
    if to == from {
        return None;
    }
    order.remove(from);
    order.insert(to, id);
    Some(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;
    use crate::geometry::Rect;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Element {
        Element::shape(ShapeKind::Rect, "#000000", Rect::new(x, y, w, h))
    }

    #[test]
    fn test_align_right_uses_joint_bounds() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(50.0, 40.0, 30.0, 10.0);
        let ids = [a.id, b.id];
        let doc = DocumentState::from_elements(vec![a, b]).expect("valid");

        let moves = align_positions(&doc, &ids, Alignment::Right);
        assert_eq!(moves, vec![(ids[0], Point::new(70.0, 0.0)), (ids[1], Point::new(50.0, 40.0))]);
    }

    #[test]
    fn test_align_needs_two_movable_elements() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(50.0, 40.0, 30.0, 10.0).with_locked(true);
        let ids = [a.id, b.id];
        let doc = DocumentState::from_elements(vec![a, b]).expect("valid");
        assert!(align_positions(&doc, &ids, Alignment::Left).is_empty());
    }

    #[test]
    fn test_distribute_spaces_interior_elements() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(10.0, 5.0, 10.0, 10.0);
        let c = boxed(90.0, 0.0, 10.0, 10.0);
        let d = boxed(15.0, 7.0, 10.0, 10.0);
        let ids = [a.id, b.id, c.id, d.id];
        let doc = DocumentState::from_elements(vec![a, b, c, d]).expect("valid");

        let moves = distribute_positions(&doc, &ids, Axis::Horizontal);
        assert_eq!(
            moves,
            vec![(ids[1], Point::new(30.0, 5.0)), (ids[3], Point::new(60.0, 7.0))]
        );
    }

    #[test]
    fn test_restack_forward_and_noop_at_top() {
        let a = boxed(0.0, 0.0, 10.0, 10.0).with_z_index(0);
        let b = boxed(0.0, 0.0, 10.0, 10.0).with_z_index(1);
        let (a_id, b_id) = (a.id, b.id);
        let doc = DocumentState::from_elements(vec![a, b]).expect("valid");

        assert_eq!(restack(&doc, a_id, StackMove::Forward), Some(vec![b_id, a_id]));
        assert_eq!(restack(&doc, b_id, StackMove::ToFront), None);
        assert_eq!(restack(&doc, a_id, StackMove::Backward), None);
    }
}
