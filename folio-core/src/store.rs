//! Element store: the canonical document plus its undo/redo history.
//!
//! Every committed edit clones the current snapshot, mutates the clone and
//! pushes it onto the [`History`]. Operations that target a missing element
//! are silent no-ops and never commit.
//!
//! # Example
//!
//! ```
//! use folio_core::{EditorConfig, Element, ElementStore, Point};
//!
//! let mut store = ElementStore::new(&EditorConfig::default());
//! let id = store.add_element(Element::text("Hello", Point::new(10.0, 10.0)));
//!
//! assert!(store.get(id).is_some());
//! assert!(store.undo());
//! assert!(store.get(id).is_none());
//! ```

use std::collections::HashSet;

use crate::arrange::{self, Alignment, Axis, StackMove};
use crate::brochure::BrochureTemplate;
use crate::config::EditorConfig;
use crate::document::DocumentState;
use crate::element::{Element, ElementId, ElementPatch};
use crate::error::EditorResult;
use crate::geometry::{Point, Size};
use crate::history::History;
use crate::study::StudyDetails;
use crate::template::Template;

/// Owns the element list and the linear history of document snapshots.
#[derive(Debug, Clone)]
pub struct ElementStore {
    history: History,
    min_element_size: f32,
    duplicate_offset: f32,
}

impl ElementStore {
    /// Create a store holding an empty document.
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            history: History::with_limit(DocumentState::new(), config.history_limit),
            min_element_size: config.min_element_size,
            duplicate_offset: config.duplicate_offset,
        }
    }

    /// Create a store whose initial snapshot is `document`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document violates its invariants.
    pub fn with_document(document: DocumentState, config: &EditorConfig) -> EditorResult<Self> {
        document.validate()?;
        Ok(Self {
            history: History::with_limit(document, config.history_limit),
            ..Self::new(config)
        })
    }

    /// The current document state.
    #[must_use]
    pub fn document(&self) -> &DocumentState {
        self.history.current()
    }

    /// Elements of the current document in insertion order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        self.document().elements()
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.document().get(id)
    }

    /// Currently selected element id.
    #[must_use]
    pub fn selected_id(&self) -> Option<ElementId> {
        self.document().selected_id()
    }

    /// Currently selected element.
    #[must_use]
    pub fn selected(&self) -> Option<&Element> {
        self.document().selected()
    }

    /// Change the selection without creating an undo snapshot.
    ///
    /// `None` clears the selection. Returns `false` (and clears nothing) if
    /// `id` does not exist.
    pub fn select(&mut self, id: Option<ElementId>) -> bool {
        if let Some(id) = id {
            if !self.document().contains(id) {
                tracing::trace!("Ignoring selection of missing element {id}");
                return false;
            }
        }
        self.history.current_mut().set_selected(id);
        true
    }

    /// Append an element with a fresh id and `z_index` equal to the current
    /// element count. Commits a snapshot.
    pub fn add_element(&mut self, mut element: Element) -> ElementId {
        let id = ElementId::new();
        element.id = id;
        self.clamp_size(&mut element);
        self.commit("add", |doc| {
            element.z_index = z_for_count(doc.len());
            doc.elements_mut().push(element);
            true
        });
        id
    }

    /// Merge `patch` into the element with this id.
    ///
    /// Returns `true` if a snapshot was committed; missing ids and patches
    /// that change nothing are no-ops.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let floor = self.min_element_size;
        self.commit("update", |doc| {
            let Some(element) = doc.get_mut(id) else {
                tracing::trace!("Update of missing element {id} ignored");
                return false;
            };
            let changed = patch.apply_to(element);
            if let Some(size) = element.size {
                element.size = Some(size.at_least(floor));
            }
            changed
        })
    }

    /// Remove an element, clearing the selection if it pointed at it.
    ///
    /// Locked and missing elements are left alone. Returns `true` if a
    /// snapshot was committed.
    pub fn delete_element(&mut self, id: ElementId) -> bool {
        self.commit("delete", |doc| {
            let Some(index) = doc.index_of(id) else {
                return false;
            };
            if doc.elements()[index].locked {
                tracing::trace!("Delete of locked element {id} ignored");
                return false;
            }
            doc.elements_mut().remove(index);
            if doc.selected_id() == Some(id) {
                doc.set_selected(None);
            }
            true
        })
    }

    /// Clone an element under a new id, offset by the configured duplicate
    /// offset and placed on top. Returns the new id.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let source = self.get(id)?.clone();
        let new_id = ElementId::new();
        let offset = self.duplicate_offset;
        self.commit("duplicate", |doc| {
            let mut copy = source;
            copy.id = new_id;
            copy.position = copy.position.offset(offset, offset);
            copy.z_index = z_for_count(doc.len());
            doc.elements_mut().push(copy);
            true
        });
        Some(new_id)
    }

    /// Replace the whole element list (template, generated content).
    ///
    /// Always commits, so the replacement is undoable. Repeated ids are
    /// re-keyed, and a selection that no longer exists is cleared.
    pub fn replace_elements(&mut self, elements: Vec<Element>) {
        let floor = self.min_element_size;
        self.commit("replace", |doc| {
            let previous_selection = doc.selected_id();
            let mut seen = HashSet::with_capacity(elements.len());
            let rekeyed: Vec<Element> = elements
                .into_iter()
                .map(|mut element| {
                    if !seen.insert(element.id) {
                        element.id = ElementId::new();
                        seen.insert(element.id);
                    }
                    if let Some(size) = element.size {
                        element.size = Some(size.at_least(floor));
                    }
                    element
                })
                .collect();
            *doc.elements_mut() = rekeyed;
            doc.set_selected(previous_selection);
            true
        });
    }

    /// Replace the document with a template laid out on `page`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is invalid; the document is untouched.
    pub fn apply_template(
        &mut self,
        template: &Template,
        page: Size,
        study: &StudyDetails,
    ) -> EditorResult<()> {
        let elements = template.instantiate(page, study)?;
        tracing::debug!("Applying template {}", template.id);
        self.replace_elements(elements);
        Ok(())
    }

    /// Replace the document with a brochure template laid out on `page`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is invalid; the document is untouched.
    pub fn apply_brochure_template(
        &mut self,
        template: &BrochureTemplate,
        page: Size,
        study: &StudyDetails,
    ) -> EditorResult<()> {
        let elements = template.instantiate(page, study)?;
        tracing::debug!("Applying brochure template {}", template.id);
        self.replace_elements(elements);
        Ok(())
    }

    /// Remove every element. Commits unless the document is already empty.
    pub fn clear(&mut self) -> bool {
        self.commit("clear", |doc| {
            if doc.is_empty() {
                return false;
            }
            doc.elements_mut().clear();
            doc.set_selected(None);
            true
        })
    }

    /// Move an element in the stacking order. Returns `true` if committed.
    pub fn restack(&mut self, id: ElementId, stack_move: StackMove) -> bool {
        let Some(order) = arrange::restack(self.document(), id, stack_move) else {
            return false;
        };
        self.commit("restack", |doc| {
            for (z, element_id) in order.iter().enumerate() {
                if let Some(element) = doc.get_mut(*element_id) {
                    element.z_index = z_for_count(z);
                }
            }
            true
        })
    }

    /// Place an element above all others.
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        self.restack(id, StackMove::ToFront)
    }

    /// Place an element below all others.
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        self.restack(id, StackMove::ToBack)
    }

    /// Move an element one step up the stacking order.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        self.restack(id, StackMove::Forward)
    }

    /// Move an element one step down the stacking order.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        self.restack(id, StackMove::Backward)
    }

    /// Align the movable elements among `ids`. Needs at least two.
    pub fn align(&mut self, ids: &[ElementId], alignment: Alignment) -> bool {
        let moves = arrange::align_positions(self.document(), ids, alignment);
        self.apply_moves("align", &moves)
    }

    /// Evenly distribute the movable elements among `ids`. Needs at least three.
    pub fn distribute(&mut self, ids: &[ElementId], axis: Axis) -> bool {
        let moves = arrange::distribute_positions(self.document(), ids, axis);
        self.apply_moves("distribute", &moves)
    }

    /// Step back one snapshot. No-op at the oldest snapshot.
    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            tracing::debug!("Undo to snapshot {}", self.history.cursor());
        }
        moved
    }

    /// Step forward one snapshot. No-op at the newest snapshot.
    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            tracing::debug!("Redo to snapshot {}", self.history.cursor());
        }
        moved
    }

    /// Returns true if there are snapshots that can be undone.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there are snapshots that can be redone.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of snapshots in the history.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Smallest width/height elements may have.
    #[must_use]
    pub fn min_element_size(&self) -> f32 {
        self.min_element_size
    }

    fn apply_moves(&mut self, label: &str, moves: &[(ElementId, Point)]) -> bool {
        if moves.is_empty() {
            return false;
        }
        self.commit(label, |doc| {
            let mut changed = false;
            for (id, position) in moves {
                if let Some(element) = doc.get_mut(*id) {
                    changed |= ElementPatch::position(*position).apply_to(element);
                }
            }
            changed
        })
    }

    fn clamp_size(&self, element: &mut Element) {
        if let Some(size) = element.size {
            element.size = Some(size.at_least(self.min_element_size));
        }
    }

    /// Apply `edit` to a copy of the current snapshot and push it if the
    /// closure reports a change.
    fn commit<F>(&mut self, label: &str, edit: F) -> bool
    where
        F: FnOnce(&mut DocumentState) -> bool,
    {
        let mut next = self.history.current().clone();
        if !edit(&mut next) {
            return false;
        }
        debug_assert!(next.validate().is_ok(), "{label} broke document invariants");
        self.history.push(next);
        tracing::debug!(
            "Committed {label}: {} element(s), snapshot {}",
            self.document().len(),
            self.history.cursor()
        );
        true
    }
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

/// `z_index` for an element placed after `count` others.
fn z_for_count(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
