//! Editor session: the one in-memory model instance plus UI-facing state.
//!
//! The session owns the [`OrgTree`] and applies [`TreeMutation`]s produced
//! by the gesture layer. The original page kept the model as a global next
//! to the diagram; here its lifecycle is tied to the enclosing application
//! session and the host borrows it for rendering.
//!
//! A refused mutation (unknown key, disallowed reparent) is logged and
//! leaves the model untouched; between mutations no partial state is ever
//! observable.

use log::{debug, warn};
use oc_core::{Field, OrgTree, PersonDraft, PersonKey, PersonRecord};

/// A mutation the gesture layer can ask the session to apply.
///
/// Gesture callbacks only construct these; the model logic lives in
/// `oc-core` behind the named operations.
#[derive(Debug, Clone)]
pub enum TreeMutation {
    /// Insert a new record; the model assigns the key.
    AddPerson { draft: Box<PersonDraft> },
    /// Set one editable field (inspector, inline edit).
    SetField {
        key: PersonKey,
        field: Field,
        value: String,
    },
    /// Clear identity fields, keep title and dept.
    Vacate { key: PersonKey },
    /// Move a record under a new superior (drag-to-reparent).
    SetParent {
        key: PersonKey,
        new_parent: Option<PersonKey>,
    },
    /// Move all direct children of `of` under `to`.
    ReparentChildren {
        of: PersonKey,
        to: Option<PersonKey>,
    },
    /// Delete one record, no cascade.
    RemoveRecord { key: PersonKey },
    /// Delete a record and its whole subtree.
    RemoveSubtree { key: PersonKey },
    /// Overwrite a record in place. Inverse of field-level mutations.
    Replace { record: Box<PersonRecord> },
}

/// Owns the model, the current selection, and the modified flag that drives
/// the host page's save button and title marker.
#[derive(Debug, Default)]
pub struct EditorSession {
    pub tree: OrgTree,
    selection: Option<PersonKey>,
    modified: bool,
}

impl EditorSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, oc_core::ModelError> {
        Ok(Self {
            tree: OrgTree::from_json(text)?,
            selection: None,
            modified: false,
        })
    }

    /// Load, falling back to an empty model when the text does not parse.
    pub fn from_json_or_empty(text: &str) -> Self {
        match Self::from_json(text) {
            Ok(session) => session,
            Err(err) => {
                warn!("model load failed: {err}; starting with an empty model");
                Self::new()
            }
        }
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Serialize for persistence and clear the modified flag.
    pub fn save(&mut self) -> String {
        let text = self.tree.to_json();
        self.modified = false;
        text
    }

    /// Serialize without touching the modified flag (undo snapshots).
    pub fn snapshot(&self) -> String {
        self.tree.to_json()
    }

    /// Replace the whole model from a snapshot. Undo/redo path; a snapshot
    /// the session itself produced always parses.
    pub fn restore(&mut self, text: &str) {
        match OrgTree::from_json(text) {
            Ok(tree) => {
                self.tree = tree;
                self.modified = true;
                self.fix_selection();
            }
            Err(err) => warn!("snapshot restore failed: {err}"),
        }
    }

    pub fn selection(&self) -> Option<PersonKey> {
        self.selection
    }

    pub fn select(&mut self, key: Option<PersonKey>) {
        self.selection = match key {
            Some(k) if self.tree.contains_key(k) => Some(k),
            _ => None,
        };
    }

    /// Apply one mutation as one atomic edit and report whether it took.
    /// On success the modified flag is set; on refusal the model is
    /// untouched and nothing should be recorded for undo.
    pub fn apply_mutation(&mut self, mutation: TreeMutation) -> bool {
        let result = match mutation {
            TreeMutation::AddPerson { draft } => {
                let key = self.tree.add_record(*draft);
                debug!("added record {key}");
                self.selection = Some(key);
                Ok(())
            }
            TreeMutation::SetField { key, field, value } => self.tree.set_field(key, field, value),
            TreeMutation::Vacate { key } => self.tree.vacate(key),
            TreeMutation::SetParent { key, new_parent } => self.tree.set_parent(key, new_parent),
            TreeMutation::ReparentChildren { of, to } => self
                .tree
                .reparent_children(of, to)
                .map(|moved| debug!("reparented {moved} children of {of}")),
            TreeMutation::RemoveRecord { key } => self.tree.remove_record(key).map(|_| ()),
            TreeMutation::RemoveSubtree { key } => self
                .tree
                .remove_subtree(key)
                .map(|removed| debug!("removed subtree of {key}: {} records", removed.len())),
            TreeMutation::Replace { record } => self.tree.replace_record(*record),
        };
        match result {
            Ok(()) => {
                self.modified = true;
                self.fix_selection();
                true
            }
            // disallowed gestures are refused quietly, not surfaced as errors
            Err(err) => {
                debug!("mutation refused: {err}");
                false
            }
        }
    }

    fn fix_selection(&mut self) {
        if let Some(k) = self.selection
            && !self.tree.contains_key(k)
        {
            self.selection = None;
        }
    }
}
