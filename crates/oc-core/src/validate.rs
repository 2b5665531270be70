//! Structural diagnostics for org-chart models.
//!
//! Reports invariant violations without repairing them. Tree shape is
//! normally enforced by the host diagram's cycle validation, so a healthy
//! session never produces these; the rules exist to catch hand-edited or
//! merged documents at load time.

use crate::key::PersonKey;
use crate::model::{OrgTree, VACANT_NAME};
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Should be fixed; the host will not render this subtree sensibly.
    Warning,
    /// Informational.
    Info,
}

/// A single diagnostic for a record.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The record this diagnostic refers to.
    pub key: PersonKey,
    /// Human-readable message.
    pub message: String,
    pub severity: Severity,
    /// Short rule identifier (e.g. "dangling-parent").
    pub rule: &'static str,
}

// ─── Public API ──────────────────────────────────────────────────────────

/// Run all rules over the model and return diagnostics.
#[must_use]
pub fn validate_tree(tree: &OrgTree) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    check_dangling_parents(tree, &mut diags);
    check_parent_cycles(tree, &mut diags);
    check_vacant_positions(tree, &mut diags);
    diags
}

// ─── Rules ───────────────────────────────────────────────────────────────

/// Warn on any record whose `parent` references no existing key.
fn check_dangling_parents(tree: &OrgTree, diags: &mut Vec<Diagnostic>) {
    for record in tree.iter() {
        if let Some(parent) = record.parent
            && tree.get(parent).is_none()
        {
            diags.push(Diagnostic {
                key: record.key,
                message: format!(
                    "Record {} reports to {}, which does not exist.",
                    record.key, parent
                ),
                severity: Severity::Warning,
                rule: "dangling-parent",
            });
        }
    }
}

/// Warn on records whose parent chain loops back on itself.
fn check_parent_cycles(tree: &OrgTree, diags: &mut Vec<Diagnostic>) {
    for record in tree.iter() {
        let mut seen: HashSet<PersonKey> = HashSet::from([record.key]);
        let mut current = record.parent;
        while let Some(k) = current {
            if !seen.insert(k) {
                diags.push(Diagnostic {
                    key: record.key,
                    message: format!("Record {} sits inside a parent cycle.", record.key),
                    severity: Severity::Warning,
                    rule: "parent-cycle",
                });
                break;
            }
            current = tree.get(k).and_then(|r| r.parent);
        }
    }
}

/// Info for positions left vacant, so the host can surface them.
fn check_vacant_positions(tree: &OrgTree, diags: &mut Vec<Diagnostic>) {
    for record in tree.iter() {
        if record.name == VACANT_NAME {
            diags.push(Diagnostic {
                key: record.key,
                message: format!(
                    "Position \"{}\" ({}) is vacant.",
                    record.title, record.dept
                ),
                severity: Severity::Info,
                rule: "vacant-position",
            });
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_model;

    #[test]
    fn dangling_parent_is_reported() {
        let doc = r#"{ "nodeDataArray": [
            { "key": 1, "name": "A" },
            { "key": 2, "name": "B", "parent": 99 }
        ] }"#;
        let tree = parse_model(doc).unwrap();
        let diags = validate_tree(&tree);
        assert!(
            diags.iter().any(|d| d.rule == "dangling-parent"),
            "expected dangling-parent diagnostic"
        );
    }

    #[test]
    fn parent_cycle_is_reported() {
        let doc = r#"{ "nodeDataArray": [
            { "key": 1, "name": "A", "parent": 2 },
            { "key": 2, "name": "B", "parent": 1 }
        ] }"#;
        let tree = parse_model(doc).unwrap();
        let diags = validate_tree(&tree);
        assert!(
            diags.iter().any(|d| d.rule == "parent-cycle"),
            "expected parent-cycle diagnostic"
        );
    }

    #[test]
    fn vacant_position_is_informational() {
        let doc = r#"{ "nodeDataArray": [
            { "key": 1, "name": "(Vacant)", "title": "CTO", "dept": "Eng" }
        ] }"#;
        let tree = parse_model(doc).unwrap();
        let diags = validate_tree(&tree);
        let vacant = diags.iter().find(|d| d.rule == "vacant-position").unwrap();
        assert_eq!(vacant.severity, Severity::Info);
    }

    #[test]
    fn clean_model_has_no_diagnostics() {
        let doc = r#"{ "nodeDataArray": [
            { "key": 1, "name": "A" },
            { "key": 2, "name": "B", "parent": 1 }
        ] }"#;
        let tree = parse_model(doc).unwrap();
        assert!(validate_tree(&tree).is_empty());
    }
}
