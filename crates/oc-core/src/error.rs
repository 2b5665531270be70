use crate::key::PersonKey;
use thiserror::Error;

/// Errors from model operations.
///
/// All of these are recoverable: the editor refuses the offending edit and
/// the session continues. Invalid reparenting in particular is a disallowed
/// user gesture, not a fault, and callers typically treat it as a no-op.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Persisted model JSON could not be parsed.
    #[error("invalid model JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document or an insert repeats an already-assigned key.
    #[error("duplicate key {0} in model data")]
    DuplicateKey(PersonKey),

    /// An operation referenced a key with no record.
    #[error("no record with key {0}")]
    NotFound(PersonKey),

    /// Self-parenting or a would-be cycle, rejected before mutation.
    #[error("record {key} may not report to {parent}")]
    InvalidParent { key: PersonKey, parent: PersonKey },
}
