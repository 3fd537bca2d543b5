//! Document state: the ordered element list plus the current selection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId};
use crate::error::{EditorError, EditorResult};
use crate::geometry::{Point, Rect};

/// All elements of a layout and the current selection, at one point in time.
///
/// `elements` keeps insertion order, which breaks ties between equal
/// `z_index` values (later insertions paint on top).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentState {
    elements: Vec<Element>,
    selected: Option<ElementId>,
}

impl DocumentState {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from a list of elements.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidDocument`] if two elements share an id.
    pub fn from_elements(elements: Vec<Element>) -> EditorResult<Self> {
        let doc = Self {
            elements,
            selected: None,
        };
        doc.validate()?;
        Ok(doc)
    }

    /// All elements in insertion order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Take the element list out of the document.
    #[must_use]
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub(crate) fn elements_mut(&mut self) -> &mut Vec<Element> {
        &mut self.elements
    }

    /// Insertion index of an element.
    #[must_use]
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Whether an element with this id exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Get the number of elements in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Currently selected element id.
    #[must_use]
    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected
    }

    /// Currently selected element.
    #[must_use]
    pub fn selected(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Set the selection. Ids that do not exist clear it instead.
    pub(crate) fn set_selected(&mut self, id: Option<ElementId>) {
        self.selected = id.filter(|id| self.contains(*id));
    }

    /// Elements in paint order: ascending `z_index`, ties by insertion order.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<_> = self.elements.iter().collect();
        // sort_by_key is stable, so insertion order survives among equal z
        ordered.sort_by_key(|e| e.z_index);
        ordered
    }

    /// Find the element at the given canvas coordinates.
    ///
    /// Returns the topmost hit: highest `z_index`, and among equal `z_index`
    /// the later insertion, matching what is painted on top.
    #[must_use]
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|e| e.contains_point(point))
            .map(|e| e.id)
    }

    /// Joint bounding box of the given elements, ignoring unknown ids.
    #[must_use]
    pub fn bounds_of(&self, ids: &[ElementId]) -> Option<Rect> {
        ids.iter()
            .filter_map(|id| self.get(*id))
            .map(Element::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Lowest and highest `z_index` in the document.
    #[must_use]
    pub fn z_range(&self) -> Option<(i32, i32)> {
        let min = self.elements.iter().map(|e| e.z_index).min()?;
        let max = self.elements.iter().map(|e| e.z_index).max()?;
        Some((min, max))
    }

    /// Check the document invariants: unique ids and a selection that
    /// references an existing element.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidDocument`] describing the first violation.
    pub fn validate(&self) -> EditorResult<()> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !seen.insert(element.id) {
                return Err(EditorError::InvalidDocument(format!(
                    "duplicate element id {}",
                    element.id
                )));
            }
        }
        if let Some(id) = self.selected {
            if !seen.contains(&id) {
                return Err(EditorError::InvalidDocument(format!(
                    "selection references missing element {id}"
                )));
            }
        }
        Ok(())
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> EditorResult<String> {
        serde_json::to_string(self).map_err(EditorError::Serialization)
    }

    /// Deserialize a document from JSON and check its invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the document is invalid.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let doc: Self = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;
    use crate::geometry::Size;

    fn square(x: f32, y: f32, z: i32) -> Element {
        Element::shape(ShapeKind::Rect, "#cccccc", Rect::new(x, y, 50.0, 50.0)).with_z_index(z)
    }

    #[test]
    fn test_paint_order_breaks_ties_by_insertion() {
        let a = square(0.0, 0.0, 1);
        let b = square(0.0, 0.0, 0);
        let c = square(0.0, 0.0, 1);
        let ids = [a.id, b.id, c.id];
        let doc = DocumentState::from_elements(vec![a, b, c]).expect("valid");

        let order: Vec<_> = doc.paint_order().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn test_element_at_prefers_highest_z() {
        let low = square(0.0, 0.0, 1);
        let high = square(25.0, 25.0, 2);
        let high_id = high.id;
        let low_id = low.id;
        // Insert the high one first so insertion order alone would pick `low`
        let doc = DocumentState::from_elements(vec![high, low]).expect("valid");

        assert_eq!(doc.element_at(Point::new(30.0, 30.0)), Some(high_id));
        assert_eq!(doc.element_at(Point::new(5.0, 5.0)), Some(low_id));
        assert_eq!(doc.element_at(Point::new(200.0, 200.0)), None);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let a = square(0.0, 0.0, 0);
        let mut b = square(10.0, 10.0, 1);
        b.id = a.id;
        assert!(matches!(
            DocumentState::from_elements(vec![a, b]),
            Err(EditorError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_set_selected_ignores_unknown_id() {
        let a = square(0.0, 0.0, 0);
        let id = a.id;
        let mut doc = DocumentState::from_elements(vec![a]).expect("valid");

        doc.set_selected(Some(id));
        assert_eq!(doc.selected_id(), Some(id));

        doc.set_selected(Some(ElementId::new()));
        assert_eq!(doc.selected_id(), None);
    }

    #[test]
    fn test_json_round_trip_rejects_dangling_selection() {
        let a = Element::image("logo.png", Point::new(1.0, 1.0), Size::new(10.0, 10.0));
        let mut doc = DocumentState::from_elements(vec![a]).expect("valid");
        let json = doc.to_json().expect("json");
        assert_eq!(DocumentState::from_json(&json).expect("parse"), doc);

        doc.selected = Some(ElementId::new());
        let json = doc.to_json().expect("json");
        assert!(DocumentState::from_json(&json).is_err());
    }
}
