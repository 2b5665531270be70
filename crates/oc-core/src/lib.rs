pub mod codec;
pub mod error;
pub mod key;
pub mod model;
pub mod validate;

pub use codec::{emit_model, parse_model};
pub use error::ModelError;
pub use key::PersonKey;
pub use model::{Field, OrgTree, PersonDraft, PersonRecord, VACANT_CONTACT, VACANT_NAME};
pub use validate::{Diagnostic, Severity, validate_tree};
