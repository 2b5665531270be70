//! JSON persistence for the org-chart model.
//!
//! Documents use the host diagram's tree-model shape so previously saved
//! blobs keep loading:
//!
//! ```json
//! { "class": "go.TreeModel", "nodeDataArray": [ { "key": 1, ... } ] }
//! ```
//!
//! The `class` marker is optional on input and always written on output.
//! `nodeDataArray` order is insertion order and is preserved exactly, so
//! emitting is deterministic and parse/emit round-trips are identity on the
//! record set.

use crate::error::ModelError;
use crate::model::{OrgTree, PersonRecord};
use log::debug;
use serde::{Deserialize, Serialize};

const MODEL_CLASS: &str = "go.TreeModel";

#[derive(Deserialize)]
struct ModelDoc {
    #[serde(default, rename = "class")]
    _class: Option<String>,
    #[serde(default, rename = "nodeDataArray")]
    node_data_array: Vec<PersonRecord>,
}

#[derive(Serialize)]
struct ModelDocRef<'a> {
    class: &'static str,
    #[serde(rename = "nodeDataArray")]
    node_data_array: &'a [PersonRecord],
}

/// Build a model from persisted JSON text.
///
/// Fails on malformed JSON and on documents that repeat a key. Dangling
/// parents and cycles do not fail the load; [`crate::validate_tree`]
/// reports them as diagnostics.
pub fn parse_model(text: &str) -> Result<OrgTree, ModelError> {
    let doc: ModelDoc = serde_json::from_str(text)?;
    let mut tree = OrgTree::new();
    for record in doc.node_data_array {
        if tree.contains_key(record.key) {
            return Err(ModelError::DuplicateKey(record.key));
        }
        tree.push_parsed(record);
    }
    debug!("parsed model: {} records", tree.len());
    Ok(tree)
}

/// Serialize the model, preserving insertion order.
pub fn emit_model(tree: &OrgTree) -> String {
    let doc = ModelDocRef {
        class: MODEL_CLASS,
        node_data_array: tree.records(),
    };
    // plain structs, strings, and integers cannot fail to serialize
    serde_json::to_string_pretty(&doc).unwrap_or_default()
}

impl OrgTree {
    /// See [`parse_model`].
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        parse_model(text)
    }

    /// See [`emit_model`].
    pub fn to_json(&self) -> String {
        emit_model(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::PersonKey;
    use crate::model::{Field, PersonDraft};
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"{
        "class": "go.TreeModel",
        "nodeDataArray": [
            { "key": 1, "name": "Alice", "title": "CEO", "dept": "Corporate" },
            { "key": 2, "name": "Bob", "title": "CTO", "dept": "Eng", "parent": 1,
              "pic": "2.jpg", "email": "bob@example.com", "phone": "(555) 123" },
            { "key": 3, "name": "Carl", "title": "Engineer", "dept": "Eng", "parent": 2 }
        ]
    }"#;

    #[test]
    fn roundtrip_is_identity() {
        let tree = parse_model(DOC).unwrap();
        let emitted = emit_model(&tree);
        let again = parse_model(&emitted).unwrap();
        assert_eq!(tree, again);
    }

    #[test]
    fn emit_is_deterministic_and_ordered() {
        let tree = parse_model(DOC).unwrap();
        assert_eq!(emit_model(&tree), emit_model(&tree));
        let names: Vec<&str> = tree.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carl"]);
        assert!(emit_model(&tree).contains("\"class\": \"go.TreeModel\""));
    }

    #[test]
    fn class_marker_is_optional() {
        let tree = parse_model(r#"{ "nodeDataArray": [ { "key": 1, "name": "A" } ] }"#).unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_model("{ not json").unwrap_err();
        assert!(matches!(err, ModelError::Parse(_)));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let doc = r#"{ "nodeDataArray": [
            { "key": 1, "name": "A" },
            { "key": 1, "name": "B" }
        ] }"#;
        let err = parse_model(doc).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateKey(k) if k.get() == 1));
    }

    #[test]
    fn loaded_model_keeps_counter_seeded_at_one() {
        // keys 10/20 in the document; a new record still gets the smallest
        // free positive integer, not 21
        let doc = r#"{ "nodeDataArray": [
            { "key": 10, "name": "A" },
            { "key": 20, "name": "B", "parent": 10 }
        ] }"#;
        let mut tree = parse_model(doc).unwrap();
        let k = tree.add_record(PersonDraft::default());
        assert_eq!(k.get(), 1);
    }

    #[test]
    fn omitted_optionals_stay_omitted() {
        let tree = parse_model(DOC).unwrap();
        let emitted = emit_model(&tree);
        // only Bob and Carl carry a parent, only Bob carries pic/email/phone
        assert_eq!(emitted.matches("\"parent\"").count(), 2);
        assert_eq!(emitted.matches("\"pic\"").count(), 1);
        assert_eq!(emitted.matches("\"email\"").count(), 1);
    }

    #[test]
    fn edits_survive_roundtrip() {
        let mut tree = parse_model(DOC).unwrap();
        tree.set_field(PersonKey::new(3).unwrap(), Field::Email, "carl@example.com")
            .unwrap();
        let again = parse_model(&emit_model(&tree)).unwrap();
        assert_eq!(
            again
                .get(PersonKey::new(3).unwrap())
                .unwrap()
                .email
                .as_deref(),
            Some("carl@example.com")
        );
    }
}
