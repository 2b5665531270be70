//! Undo/Redo command stack.
//!
//! Every edit is one atomic undo unit. Mutations with a cheap inverse
//! (field edits, vacate, reparent, add) are stored as forward/inverse
//! pairs; structural edits use **model-snapshot batching**: the serialized
//! model is captured before and after, and undo/redo swaps the whole
//! document in a single step. "Remove role" relies on this to bundle its
//! reparent-then-delete sequence into one undoable commit.

use crate::session::{EditorSession, TreeMutation};
use log::debug;

/// A command that can be undone.
#[derive(Debug, Clone)]
pub enum Command {
    /// Single mutation with its precomputed inverse.
    Single {
        forward: Box<TreeMutation>,
        inverse: Box<TreeMutation>,
        description: String,
    },
    /// Snapshot-based commit: the full serialized model before and after.
    Snapshot {
        model_before: String,
        model_after: String,
        description: String,
    },
}

impl Command {
    pub fn description(&self) -> &str {
        match self {
            Command::Single { description, .. } | Command::Snapshot { description, .. } => {
                description
            }
        }
    }
}

/// Manages undo/redo stacks with batch grouping for composite edits.
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Model snapshot captured at the start of a batch.
    batch_snapshot: Option<String>,
    /// Whether any mutations were applied during the current batch.
    batch_dirty: bool,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_dirty: false,
        }
    }

    /// Start a batch. Captures the current model as the undo snapshot; all
    /// mutations until `end_batch` are applied live but tracked as one
    /// atomic undo step.
    pub fn begin_batch(&mut self, session: &EditorSession) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(session.snapshot());
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// End a batch. When the outermost batch closes and something actually
    /// changed, push one snapshot command under `description`.
    pub fn end_batch(&mut self, session: &EditorSession, description: &str) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            if self.batch_dirty {
                let model_after = session.snapshot();
                let model_before = self.batch_snapshot.take().unwrap_or_default();
                if model_before != model_after {
                    self.push(Command::Snapshot {
                        model_before,
                        model_after,
                        description: description.to_string(),
                    });
                }
            }
            self.batch_snapshot = None;
            self.batch_dirty = false;
        }
    }

    /// Apply a mutation through the session and record it for undo.
    ///
    /// Inside a batch the mutation is applied live and the batch snapshot
    /// captures the cumulative effect. Outside a batch, mutations without a
    /// single-mutation inverse fall back to their own snapshot command.
    pub fn execute(
        &mut self,
        session: &mut EditorSession,
        mutation: TreeMutation,
        description: &str,
    ) {
        if self.batch_depth > 0 {
            if session.apply_mutation(mutation) {
                self.batch_dirty = true;
            }
            return;
        }

        match compute_inverse(session, &mutation) {
            Some(inverse) => {
                // a refused mutation is a no-op and must not become a commit
                if !session.apply_mutation(mutation.clone()) {
                    return;
                }
                self.push(Command::Single {
                    forward: Box::new(mutation),
                    inverse: Box::new(inverse),
                    description: description.to_string(),
                });
            }
            None => {
                let model_before = session.snapshot();
                session.apply_mutation(mutation);
                let model_after = session.snapshot();
                if model_before == model_after {
                    debug!("no-op structural edit, nothing to undo");
                    return;
                }
                self.push(Command::Snapshot {
                    model_before,
                    model_after,
                    description: description.to_string(),
                });
            }
        }
    }

    /// Undo the last commit. Returns its description.
    pub fn undo(&mut self, session: &mut EditorSession) -> Option<String> {
        let cmd = self.undo_stack.pop()?;
        let desc = match &cmd {
            Command::Single {
                inverse,
                description,
                ..
            } => {
                session.apply_mutation(*inverse.clone());
                description.clone()
            }
            Command::Snapshot {
                model_before,
                description,
                ..
            } => {
                session.restore(model_before);
                description.clone()
            }
        };
        self.redo_stack.push(cmd);
        Some(desc)
    }

    /// Redo the last undone commit. Returns its description.
    pub fn redo(&mut self, session: &mut EditorSession) -> Option<String> {
        let cmd = self.redo_stack.pop()?;
        let desc = match &cmd {
            Command::Single {
                forward,
                description,
                ..
            } => {
                session.apply_mutation(*forward.clone());
                description.clone()
            }
            Command::Snapshot {
                model_after,
                description,
                ..
            } => {
                session.restore(model_after);
                description.clone()
            }
        };
        self.undo_stack.push(cmd);
        Some(desc)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn push(&mut self, cmd: Command) {
        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        // a new commit invalidates the redo history
        self.redo_stack.clear();
    }
}

/// Compute the inverse needed to undo `mutation`, or `None` when only a
/// model snapshot can represent it (removals, bulk reparenting: their undo
/// must restore exact insertion order).
fn compute_inverse(session: &EditorSession, mutation: &TreeMutation) -> Option<TreeMutation> {
    match mutation {
        TreeMutation::AddPerson { draft } => Some(TreeMutation::RemoveRecord {
            key: session.tree.peek_key(draft.key),
        }),
        TreeMutation::SetField { key, .. } | TreeMutation::Vacate { key } => {
            let inverse = match session.tree.get(*key) {
                Some(record) => TreeMutation::Replace {
                    record: Box::new(record.clone()),
                },
                // unknown key: forward is a no-op, so is this
                None => mutation.clone(),
            };
            Some(inverse)
        }
        TreeMutation::Replace { record } => {
            let inverse = match session.tree.get(record.key) {
                Some(current) => TreeMutation::Replace {
                    record: Box::new(current.clone()),
                },
                None => mutation.clone(),
            };
            Some(inverse)
        }
        TreeMutation::SetParent { key, .. } => {
            let inverse = match session.tree.get(*key) {
                Some(record) => TreeMutation::SetParent {
                    key: *key,
                    new_parent: record.parent,
                },
                None => mutation.clone(),
            };
            Some(inverse)
        }
        // removals and bulk reparenting must restore exact insertion order
        TreeMutation::ReparentChildren { .. }
        | TreeMutation::RemoveRecord { .. }
        | TreeMutation::RemoveSubtree { .. } => None,
    }
}
