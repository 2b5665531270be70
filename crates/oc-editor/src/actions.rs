//! Gesture layer: named edit actions and the dispatch that maps UI
//! gestures (context menu picks, drag-drop, double-click) onto them.
//!
//! Each action is one undoable commit on the [`CommandStack`]. The host
//! shell decides *when* these fire; this module decides *what* they mean.

use log::debug;
use oc_core::{PersonDraft, PersonKey};

use crate::commands::CommandStack;
use crate::session::{EditorSession, TreeMutation};

/// Placeholder values for freshly created records, to be replaced through
/// the inspector or inline editing.
pub const NEW_PERSON_NAME: &str = "(New person)";
pub const NEW_PERSON_TITLE: &str = "(Title)";
pub const NEW_PERSON_DEPT: &str = "(Dept)";

/// Add a direct report under `boss`. The new record inherits the boss's
/// department and starts out with placeholder name and title. Returns the
/// assigned key, or `None` when `boss` does not exist.
pub fn add_employee(
    stack: &mut CommandStack,
    session: &mut EditorSession,
    boss: PersonKey,
) -> Option<PersonKey> {
    let dept = session.tree.get(boss)?.dept.clone();
    let assigned = session.tree.peek_key(None);
    stack.execute(
        session,
        TreeMutation::AddPerson {
            draft: Box::new(PersonDraft {
                name: NEW_PERSON_NAME.into(),
                title: NEW_PERSON_TITLE.into(),
                dept,
                parent: Some(boss),
                ..Default::default()
            }),
        },
        "add employee",
    );
    Some(assigned)
}

/// Create a new top-level person (background double-click). Returns the
/// assigned key.
pub fn create_person(stack: &mut CommandStack, session: &mut EditorSession) -> PersonKey {
    let assigned = session.tree.peek_key(None);
    stack.execute(
        session,
        TreeMutation::AddPerson {
            draft: Box::new(PersonDraft {
                name: NEW_PERSON_NAME.into(),
                title: NEW_PERSON_TITLE.into(),
                dept: NEW_PERSON_DEPT.into(),
                ..Default::default()
            }),
        },
        "create person",
    );
    assigned
}

/// Mark a position vacant: the role stays, the person leaves.
pub fn vacate_position(stack: &mut CommandStack, session: &mut EditorSession, key: PersonKey) {
    stack.execute(session, TreeMutation::Vacate { key }, "vacate");
}

/// Remove a role but keep its reports: the record's direct children move
/// up to its own superior, then the record is deleted. One undo step.
pub fn remove_role(stack: &mut CommandStack, session: &mut EditorSession, key: PersonKey) {
    let Some(boss) = session.tree.get(key).map(|r| r.parent) else {
        debug!("remove role: no record {key}");
        return;
    };
    stack.begin_batch(session);
    stack.execute(
        session,
        TreeMutation::ReparentChildren { of: key, to: boss },
        "reparent",
    );
    stack.execute(session, TreeMutation::RemoveRecord { key }, "remove");
    stack.end_batch(session, "reparent remove");
}

/// Remove a record together with everyone under it.
pub fn remove_department(stack: &mut CommandStack, session: &mut EditorSession, key: PersonKey) {
    stack.execute(session, TreeMutation::RemoveSubtree { key }, "remove dept");
}

/// Whether dropping `dragged` onto `target` is a legal reparent. Mirrors
/// the drop highlight in the host shell.
#[must_use]
pub fn can_drop(session: &EditorSession, dragged: PersonKey, target: PersonKey) -> bool {
    session.tree.may_work_for(dragged, target)
}

/// Drag-drop reparent. Returns whether the move was committed.
pub fn drop_reparent(
    stack: &mut CommandStack,
    session: &mut EditorSession,
    dragged: PersonKey,
    target: PersonKey,
) -> bool {
    if !can_drop(session, dragged, target) {
        debug!("drop refused: {dragged} may not report to {target}");
        return false;
    }
    stack.execute(
        session,
        TreeMutation::SetParent {
            key: dragged,
            new_parent: Some(target),
        },
        "reparent",
    );
    true
}

/// A UI gesture as the host shell reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Click on a node (or the background when `key` is `None`).
    Select { key: Option<PersonKey> },
    /// Double-click on empty canvas.
    BackgroundDoubleClick,
    /// Node dropped onto another node.
    Drop {
        dragged: PersonKey,
        target: PersonKey,
    },
    /// Context menu pick on a node.
    Menu { key: PersonKey, item: MenuItem },
}

/// Entries of the per-node context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    AddEmployee,
    VacatePosition,
    RemoveRole,
    RemoveDepartment,
}

/// Route one gesture to its action.
pub fn dispatch(stack: &mut CommandStack, session: &mut EditorSession, gesture: Gesture) {
    match gesture {
        Gesture::Select { key } => session.select(key),
        Gesture::BackgroundDoubleClick => {
            create_person(stack, session);
        }
        Gesture::Drop { dragged, target } => {
            drop_reparent(stack, session, dragged, target);
        }
        Gesture::Menu { key, item } => match item {
            MenuItem::AddEmployee => {
                add_employee(stack, session, key);
            }
            MenuItem::VacatePosition => vacate_position(stack, session, key),
            MenuItem::RemoveRole => remove_role(stack, session, key),
            MenuItem::RemoveDepartment => remove_department(stack, session, key),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: u32) -> PersonKey {
        PersonKey::new(raw).unwrap()
    }

    fn setup() -> (CommandStack, EditorSession) {
        let doc = r#"{ "nodeDataArray": [
            { "key": 1, "name": "Alice", "dept": "HQ" },
            { "key": 2, "name": "Bob", "dept": "Eng", "parent": 1 },
            { "key": 3, "name": "Carl", "dept": "Eng", "parent": 2 }
        ] }"#;
        (CommandStack::new(100), EditorSession::from_json(doc).unwrap())
    }

    #[test]
    fn add_employee_inherits_dept_and_reports_to_boss() {
        let (mut stack, mut s) = setup();
        let k = add_employee(&mut stack, &mut s, key(2)).unwrap();
        let r = s.tree.get(k).unwrap();
        assert_eq!(r.dept, "Eng");
        assert_eq!(r.parent, Some(key(2)));
        assert_eq!(r.name, NEW_PERSON_NAME);
        assert_eq!(s.selection(), Some(k));
    }

    #[test]
    fn add_employee_under_unknown_boss_is_refused() {
        let (mut stack, mut s) = setup();
        assert!(add_employee(&mut stack, &mut s, key(99)).is_none());
        assert_eq!(s.tree.len(), 3);
        assert!(!stack.can_undo());
    }

    #[test]
    fn background_double_click_creates_a_root() {
        let (mut stack, mut s) = setup();
        let k = create_person(&mut stack, &mut s);
        let r = s.tree.get(k).unwrap();
        assert_eq!(r.parent, None);
        assert_eq!(r.dept, NEW_PERSON_DEPT);
    }

    #[test]
    fn remove_role_promotes_reports_in_one_undo_step() {
        let (mut stack, mut s) = setup();
        remove_role(&mut stack, &mut s, key(2));
        assert!(!s.tree.contains_key(key(2)));
        assert_eq!(s.tree.get(key(3)).unwrap().parent, Some(key(1)));

        let desc = stack.undo(&mut s);
        assert_eq!(desc.as_deref(), Some("reparent remove"));
        assert!(s.tree.contains_key(key(2)));
        assert_eq!(s.tree.get(key(3)).unwrap().parent, Some(key(2)));
    }

    #[test]
    fn drop_onto_own_subtree_is_refused() {
        let (mut stack, mut s) = setup();
        assert!(!can_drop(&s, key(1), key(3)));
        assert!(!drop_reparent(&mut stack, &mut s, key(1), key(3)));
        assert_eq!(s.tree.get(key(1)).unwrap().parent, None);
        assert!(!stack.can_undo());
    }

    #[test]
    fn drop_onto_unknown_target_is_refused() {
        let (mut stack, mut s) = setup();
        assert!(!can_drop(&s, key(2), key(99)));
        assert!(!drop_reparent(&mut stack, &mut s, key(2), key(99)));
        assert_eq!(s.tree.get(key(2)).unwrap().parent, Some(key(1)));
        assert!(!stack.can_undo());
    }

    #[test]
    fn dispatch_routes_menu_items() {
        let (mut stack, mut s) = setup();
        dispatch(
            &mut stack,
            &mut s,
            Gesture::Menu {
                key: key(3),
                item: MenuItem::VacatePosition,
            },
        );
        assert_eq!(s.tree.get(key(3)).unwrap().name, "(Vacant)");

        dispatch(
            &mut stack,
            &mut s,
            Gesture::Menu {
                key: key(2),
                item: MenuItem::RemoveDepartment,
            },
        );
        assert_eq!(s.tree.len(), 1);
    }

    #[test]
    fn dispatch_select_and_background_click() {
        let (mut stack, mut s) = setup();
        dispatch(&mut stack, &mut s, Gesture::Select { key: Some(key(2)) });
        assert_eq!(s.selection(), Some(key(2)));
        dispatch(&mut stack, &mut s, Gesture::Select { key: None });
        assert_eq!(s.selection(), None);

        dispatch(&mut stack, &mut s, Gesture::BackgroundDoubleClick);
        assert_eq!(s.tree.len(), 4);
    }
}
