//! Property inspector backing data.
//!
//! Produces the rows the host shell renders for the selected record and
//! turns edits back into undoable field mutations. The key row is shown
//! but never editable; parent changes go through drag-drop, not here.

use log::debug;
use oc_core::Field;

use crate::commands::CommandStack;
use crate::session::{EditorSession, TreeMutation};

/// One row of the inspector panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRow {
    pub name: &'static str,
    pub value: String,
    pub editable: bool,
}

/// Rows for the current selection, empty when nothing is selected.
#[must_use]
pub fn rows(session: &EditorSession) -> Vec<PropertyRow> {
    let Some(record) = session.selection().and_then(|k| session.tree.get(k)) else {
        return Vec::new();
    };
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    vec![
        PropertyRow {
            name: "key",
            value: record.key.to_string(),
            editable: false,
        },
        PropertyRow {
            name: "name",
            value: record.name.clone(),
            editable: true,
        },
        PropertyRow {
            name: "title",
            value: record.title.clone(),
            editable: true,
        },
        PropertyRow {
            name: "dept",
            value: record.dept.clone(),
            editable: true,
        },
        PropertyRow {
            name: "pic",
            value: opt(&record.pic),
            editable: true,
        },
        PropertyRow {
            name: "email",
            value: opt(&record.email),
            editable: true,
        },
        PropertyRow {
            name: "phone",
            value: opt(&record.phone),
            editable: true,
        },
    ]
}

/// Commit an inspector edit on the selected record. Returns whether a
/// commit was made; unknown and read-only property names are refused.
pub fn set_property(
    stack: &mut CommandStack,
    session: &mut EditorSession,
    name: &str,
    value: &str,
) -> bool {
    let Some(key) = session.selection() else {
        debug!("inspector edit with no selection");
        return false;
    };
    let Some(field) = Field::from_name(name) else {
        debug!("inspector edit refused for property {name:?}");
        return false;
    };
    stack.execute(
        session,
        TreeMutation::SetField {
            key,
            field,
            value: value.to_string(),
        },
        &format!("edit {}", field.as_str()),
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_core::PersonKey;

    fn key(raw: u32) -> PersonKey {
        PersonKey::new(raw).unwrap()
    }

    fn setup() -> (CommandStack, EditorSession) {
        let doc = r#"{ "nodeDataArray": [
            { "key": 1, "name": "Alice", "title": "CEO", "dept": "HQ",
              "email": "alice@example.com" }
        ] }"#;
        let mut s = EditorSession::from_json(doc).unwrap();
        s.select(Some(key(1)));
        (CommandStack::new(100), s)
    }

    #[test]
    fn rows_reflect_the_selected_record() {
        let (_, s) = setup();
        let rows = rows(&s);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].name, "key");
        assert_eq!(rows[0].value, "1");
        assert!(!rows[0].editable);
        assert_eq!(rows[1].value, "Alice");
        assert_eq!(rows[5].value, "alice@example.com");
        // unset optionals render as empty strings
        assert_eq!(rows[4].value, "");
    }

    #[test]
    fn no_selection_means_no_rows() {
        let (_, mut s) = setup();
        s.select(None);
        assert!(rows(&s).is_empty());
    }

    #[test]
    fn edits_are_undoable_field_commits() {
        let (mut stack, mut s) = setup();
        assert!(set_property(&mut stack, &mut s, "title", "Chairwoman"));
        assert_eq!(s.tree.get(key(1)).unwrap().title, "Chairwoman");

        let desc = stack.undo(&mut s);
        assert_eq!(desc.as_deref(), Some("edit title"));
        assert_eq!(s.tree.get(key(1)).unwrap().title, "CEO");
    }

    #[test]
    fn key_is_read_only() {
        let (mut stack, mut s) = setup();
        assert!(!set_property(&mut stack, &mut s, "key", "9"));
        assert!(!set_property(&mut stack, &mut s, "salary", "1"));
        assert!(s.tree.contains_key(key(1)));
        assert!(!stack.can_undo());
    }
}
