//! Draft document state: the authoritative field collection.

use crate::field::{Field, FieldId, FieldPatch, FieldType};
use crate::geometry::FieldRect;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// A snapshot of draft state for undo/redo.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DraftSnapshot {
    fields: HashMap<FieldId, Field>,
    order: Vec<FieldId>,
}

/// An editable document draft holding the authoritative field list.
///
/// Templates are a `DocumentDraft` on their own; packages embed one and
/// layer assignments on top. All mutation is synchronous and in-memory;
/// persistence happens elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDraft {
    /// Unique draft identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// All fields, keyed by id.
    fields: HashMap<FieldId, Field>,
    /// Placement order (creation order, stable across updates).
    order: Vec<FieldId>,
    /// Currently selected field. Editor state, not part of any entity,
    /// and not persisted.
    #[serde(skip)]
    selected: Option<FieldId>,
    #[serde(skip)]
    undo_stack: Vec<DraftSnapshot>,
    #[serde(skip)]
    redo_stack: Vec<DraftSnapshot>,
}

impl DocumentDraft {
    /// Create a new empty draft.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            fields: HashMap::new(),
            order: Vec::new(),
            selected: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Add a field of the given type, merging in its type defaults.
    /// Returns the freshly allocated id.
    pub fn add_field(&mut self, ty: FieldType, page: u32, rect: FieldRect) -> FieldId {
        let field = Field::new(ty, page, rect);
        let id = field.id;
        self.order.push(id);
        self.fields.insert(id, field);
        id
    }

    /// Merge a typed patch into a field.
    ///
    /// An unknown id is a silent no-op: in an editing session the field
    /// may already have been removed by another action, which is benign.
    pub fn update_field(&mut self, id: FieldId, patch: FieldPatch) {
        match self.fields.get_mut(&id) {
            Some(field) => field.apply(patch),
            None => trace!("update for unknown field {id} ignored"),
        }
    }

    /// Remove a field. Idempotent; clears the selection when the deleted
    /// field was selected.
    pub fn delete_field(&mut self, id: FieldId) {
        if self.fields.remove(&id).is_none() {
            trace!("delete for unknown field {id} ignored");
            return;
        }
        self.order.retain(|&fid| fid != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Get a field by id.
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(&id)
    }

    /// Fields in placement order.
    pub fn fields_ordered(&self) -> impl Iterator<Item = &Field> {
        self.order.iter().filter_map(|id| self.fields.get(id))
    }

    /// Fields on one page, in placement order.
    pub fn fields_on_page(&self, page: u32) -> impl Iterator<Item = &Field> {
        self.fields_ordered().filter(move |f| f.page == page)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the draft has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Select a field. Selecting an unknown id clears the selection.
    pub fn select(&mut self, id: FieldId) {
        self.selected = self.fields.contains_key(&id).then_some(id);
    }

    /// The currently selected field, if any.
    pub fn selected_field(&self) -> Option<FieldId> {
        self.selected
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            fields: self.fields.clone(),
            order: self.order.clone(),
        }
    }

    fn restore(&mut self, snapshot: DraftSnapshot) {
        self.fields = snapshot.fields;
        self.order = snapshot.order;
        if let Some(id) = self.selected {
            if !self.fields.contains_key(&id) {
                self.selected = None;
            }
        }
    }

    /// Push current state to the undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(snapshot) = self.undo_stack.pop() {
            let current = self.snapshot();
            self.redo_stack.push(current);
            self.restore(snapshot);
            true
        } else {
            false
        }
    }

    /// Redo the last undone change. Returns false when there is nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(snapshot) = self.redo_stack.pop() {
            let current = self.snapshot();
            self.undo_stack.push(current);
            self.restore(snapshot);
            true
        } else {
            false
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Serialize the draft to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a draft from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
