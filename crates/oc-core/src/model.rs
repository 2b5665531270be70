//! Org-chart tree model.
//!
//! Records form a tree through their `parent` key; edges are implicit, there
//! is no separate edge list. Insertion order is preserved and is also the
//! serialization order. The host diagram renders this model and reports user
//! gestures back as callbacks; every mutation those callbacks need is one of
//! the named operations here, so invariants hold after each callback returns.

use crate::error::ModelError;
use crate::key::PersonKey;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Name a record gets when its position is vacated.
pub const VACANT_NAME: &str = "(Vacant)";
/// Contact placeholder for a vacated position.
pub const VACANT_CONTACT: &str = "none";

/// One person's attributes in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub key: PersonKey,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub dept: String,
    /// Key of the direct superior; roots omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<PersonKey>,
    /// Head-shot image identifier, resolved to a URL by the host page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Partial record for [`OrgTree::add_record`]. The key is optional; the
/// model assigns a fresh one (honoring a requested key when it is free).
#[derive(Debug, Clone, Default)]
pub struct PersonDraft {
    pub key: Option<PersonKey>,
    pub name: String,
    pub title: String,
    pub dept: String,
    pub parent: Option<PersonKey>,
    pub pic: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Editable fields of a record. `key` is deliberately absent: keys are
/// assigned once and shown read-only by the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Title,
    Dept,
    Pic,
    Email,
    Phone,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Title => "title",
            Field::Dept => "dept",
            Field::Pic => "pic",
            Field::Email => "email",
            Field::Phone => "phone",
        }
    }

    /// Map an inspector property name to a field; `None` for anything that
    /// is not editable (including "key").
    pub fn from_name(name: &str) -> Option<Field> {
        match name {
            "name" => Some(Field::Name),
            "title" => Some(Field::Title),
            "dept" => Some(Field::Dept),
            "pic" => Some(Field::Pic),
            "email" => Some(Field::Email),
            "phone" => Some(Field::Phone),
            _ => None,
        }
    }
}

/// The editable hierarchical model: an insertion-ordered collection of
/// [`PersonRecord`] plus a key-generation counter.
///
/// Keys are unique positive integers handed out by linear probing upward
/// from a running counter seeded at 1, so a key is never reused even when
/// the document already contains arbitrary keys.
#[derive(Debug, Clone)]
pub struct OrgTree {
    records: Vec<PersonRecord>,
    key_index: HashMap<PersonKey, usize>,
    /// The key most recently assigned; probing for the next key starts here.
    last_key: PersonKey,
}

impl Default for OrgTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Equality is over the record set in insertion order. The key counter is
/// excluded: a freshly loaded model compares equal to the model it was
/// saved from.
impl PartialEq for OrgTree {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for OrgTree {}

impl OrgTree {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            key_index: HashMap::new(),
            last_key: PersonKey::MIN,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_key(&self, key: PersonKey) -> bool {
        self.key_index.contains_key(&key)
    }

    pub fn get(&self, key: PersonKey) -> Option<&PersonRecord> {
        self.key_index.get(&key).map(|&i| &self.records[i])
    }

    fn get_mut(&mut self, key: PersonKey) -> Option<&mut PersonRecord> {
        self.key_index.get(&key).map(|&i| &mut self.records[i])
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[PersonRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonRecord> {
        self.records.iter()
    }

    /// Keys of records without a parent, in insertion order.
    pub fn roots(&self) -> SmallVec<[PersonKey; 2]> {
        self.records
            .iter()
            .filter(|r| r.parent.is_none())
            .map(|r| r.key)
            .collect()
    }

    /// Direct reports of `key`, in insertion order.
    pub fn children(&self, key: PersonKey) -> SmallVec<[PersonKey; 8]> {
        self.records
            .iter()
            .filter(|r| r.parent == Some(key))
            .map(|r| r.key)
            .collect()
    }

    /// Tree level of a record: 0 for roots, 1 for their reports, and so on.
    /// `None` for unknown keys. Hosts use this to pick a level color.
    pub fn level(&self, key: PersonKey) -> Option<usize> {
        self.get(key)?;
        let mut level = 0;
        let mut current = self.get(key).and_then(|r| r.parent);
        // step budget guards against malformed documents with parent cycles
        let mut budget = self.records.len();
        while let Some(k) = current {
            if budget == 0 {
                break;
            }
            budget -= 1;
            level += 1;
            current = self.get(k).and_then(|r| r.parent);
        }
        Some(level)
    }

    /// Whether `key` lies in the subtree rooted at `root` (a record counts
    /// as being in its own subtree).
    pub fn is_in_tree_of(&self, key: PersonKey, root: PersonKey) -> bool {
        if key == root {
            return self.contains_key(key);
        }
        let mut current = self.get(key).and_then(|r| r.parent);
        let mut budget = self.records.len();
        while let Some(k) = current {
            if k == root {
                return true;
            }
            if budget == 0 {
                break;
            }
            budget -= 1;
            current = self.get(k).and_then(|r| r.parent);
        }
        false
    }

    /// Drag-to-reparent admissibility: `worker` and `boss` must both exist,
    /// a record may not work for itself, and may not work for somebody
    /// inside its own subtree.
    pub fn may_work_for(&self, worker: PersonKey, boss: PersonKey) -> bool {
        if !self.contains_key(worker) || !self.contains_key(boss) {
            return false;
        }
        if worker == boss {
            return false;
        }
        !self.is_in_tree_of(boss, worker)
    }

    // ─── Key assignment ──────────────────────────────────────────────────

    /// The key [`OrgTree::add_record`] would assign for `requested`, with no
    /// side effect: the requested key (or the running counter) probed upward
    /// past every collision.
    pub fn peek_key(&self, requested: Option<PersonKey>) -> PersonKey {
        let mut k = requested.unwrap_or(self.last_key);
        while self.contains_key(k) {
            k = k.succ();
        }
        k
    }

    /// Smallest unused positive integer at or above the running counter.
    /// Advances the counter to the returned key, so the key is never handed
    /// out twice once a record claims it.
    pub fn next_key(&mut self) -> PersonKey {
        let k = self.peek_key(None);
        self.last_key = k;
        k
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Insert a new record with a fresh unique key and return the key.
    pub fn add_record(&mut self, draft: PersonDraft) -> PersonKey {
        let key = self.peek_key(draft.key);
        self.last_key = key;
        let record = PersonRecord {
            key,
            name: draft.name,
            title: draft.title,
            dept: draft.dept,
            parent: draft.parent,
            pic: draft.pic,
            email: draft.email,
            phone: draft.phone,
        };
        self.key_index.insert(key, self.records.len());
        self.records.push(record);
        key
    }

    /// Set one editable field of a record.
    pub fn set_field(
        &mut self,
        key: PersonKey,
        field: Field,
        value: impl Into<String>,
    ) -> Result<(), ModelError> {
        let record = self.get_mut(key).ok_or(ModelError::NotFound(key))?;
        let value = value.into();
        match field {
            Field::Name => record.name = value,
            Field::Title => record.title = value,
            Field::Dept => record.dept = value,
            Field::Pic => record.pic = Some(value),
            Field::Email => record.email = Some(value),
            Field::Phone => record.phone = Some(value),
        }
        Ok(())
    }

    /// Clear the personally-identifying fields, keeping title and dept.
    pub fn vacate(&mut self, key: PersonKey) -> Result<(), ModelError> {
        let record = self.get_mut(key).ok_or(ModelError::NotFound(key))?;
        record.name = VACANT_NAME.to_string();
        record.pic = Some(String::new());
        record.email = Some(VACANT_CONTACT.to_string());
        record.phone = Some(VACANT_CONTACT.to_string());
        Ok(())
    }

    /// Move a record under a new superior (`None` makes it a root).
    /// Self-parenting and cycles are rejected before any mutation.
    pub fn set_parent(
        &mut self,
        key: PersonKey,
        new_parent: Option<PersonKey>,
    ) -> Result<(), ModelError> {
        if !self.contains_key(key) {
            return Err(ModelError::NotFound(key));
        }
        if let Some(parent) = new_parent {
            if !self.contains_key(parent) {
                return Err(ModelError::NotFound(parent));
            }
            if !self.may_work_for(key, parent) {
                return Err(ModelError::InvalidParent { key, parent });
            }
        }
        if let Some(record) = self.get_mut(key) {
            record.parent = new_parent;
        }
        Ok(())
    }

    /// Reassign `parent` for all direct children of `of` to `to` (`None`
    /// makes them roots). Returns how many records moved. Callers removing
    /// `of` afterwards use this to avoid dangling parent references.
    pub fn reparent_children(
        &mut self,
        of: PersonKey,
        to: Option<PersonKey>,
    ) -> Result<usize, ModelError> {
        if !self.contains_key(of) {
            return Err(ModelError::NotFound(of));
        }
        if let Some(parent) = to
            && !self.contains_key(parent)
        {
            return Err(ModelError::NotFound(parent));
        }
        let mut moved = 0;
        for record in &mut self.records {
            if record.parent == Some(of) {
                record.parent = to;
                moved += 1;
            }
        }
        Ok(moved)
    }

    /// Delete one record, no cascade. Children are left pointing at the
    /// removed key; reparent them first when that matters.
    pub fn remove_record(&mut self, key: PersonKey) -> Result<PersonRecord, ModelError> {
        let idx = *self.key_index.get(&key).ok_or(ModelError::NotFound(key))?;
        let record = self.records.remove(idx);
        self.rebuild_index();
        Ok(record)
    }

    /// Delete `key` and every transitive descendant. Removed records come
    /// back in insertion order.
    pub fn remove_subtree(&mut self, key: PersonKey) -> Result<Vec<PersonRecord>, ModelError> {
        if !self.contains_key(key) {
            return Err(ModelError::NotFound(key));
        }
        let mut doomed: HashSet<PersonKey> = HashSet::new();
        let mut stack: Vec<PersonKey> = vec![key];
        while let Some(k) = stack.pop() {
            if doomed.insert(k) {
                stack.extend(self.children(k));
            }
        }
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .records
            .drain(..)
            .partition(|r| doomed.contains(&r.key));
        self.records = kept;
        self.rebuild_index();
        Ok(removed)
    }

    /// Overwrite the record with the same key in place, keeping its position
    /// in insertion order. Used to undo field-level edits.
    pub fn replace_record(&mut self, record: PersonRecord) -> Result<(), ModelError> {
        let idx = *self
            .key_index
            .get(&record.key)
            .ok_or(ModelError::NotFound(record.key))?;
        self.records[idx] = record;
        Ok(())
    }

    /// Bulk-append records that already carry keys, for hosts restoring
    /// removed records or merging documents. Nothing is inserted when any
    /// key collides, within the batch included.
    pub fn insert_records(&mut self, records: Vec<PersonRecord>) -> Result<(), ModelError> {
        let mut incoming = HashSet::new();
        for record in &records {
            if self.contains_key(record.key) || !incoming.insert(record.key) {
                return Err(ModelError::DuplicateKey(record.key));
            }
        }
        for record in records {
            self.key_index.insert(record.key, self.records.len());
            self.records.push(record);
        }
        Ok(())
    }

    /// Append a record parsed from a document without touching the key
    /// counter; the loader keeps the counter seeded at 1 and relies on
    /// probing to step past existing keys.
    pub(crate) fn push_parsed(&mut self, record: PersonRecord) {
        self.key_index.insert(record.key, self.records.len());
        self.records.push(record);
    }

    fn rebuild_index(&mut self) {
        self.key_index.clear();
        for (i, record) in self.records.iter().enumerate() {
            self.key_index.insert(record.key, i);
        }
    }
}
