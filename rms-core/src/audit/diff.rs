//! Changed-field computation for audit entries
//!
//! A diff is a plain comparison of two field-name → value maps captured via
//! [`crate::audit::Auditable::audit_fields`]; there is no reflection and no
//! recursion into nested values - a nested object (room list, payment method
//! summary) counts as one field.

use serde_json::{Map, Value};

/// System-managed fields that always change on update and never appear in
/// `changed_fields`
const META_FIELDS: &[&str] = &["id", "createdAt", "updatedAt", "createdBy", "updatedBy"];

fn is_meta(field: &str) -> bool {
    META_FIELDS.contains(&field)
}

/// Field names whose value differs between the two snapshots, sorted for
/// deterministic storage. Fields present on only one side count as changed.
pub fn changed_fields(old: &Map<String, Value>, new: &Map<String, Value>) -> Vec<String> {
    let mut changed: Vec<String> = Vec::new();

    for (key, new_value) in new {
        if is_meta(key) {
            continue;
        }
        match old.get(key) {
            Some(old_value) if old_value == new_value => {}
            _ => changed.push(key.clone()),
        }
    }

    for key in old.keys() {
        if !is_meta(key) && !new.contains_key(key) {
            changed.push(key.clone());
        }
    }

    changed.sort();
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn detects_scalar_changes() {
        let old = map(json!({"name": "A", "price": 100, "note": ""}));
        let new = map(json!({"name": "B", "price": 100, "note": "late checkin"}));

        assert_eq!(changed_fields(&old, &new), vec!["name", "note"]);
    }

    #[test]
    fn nested_values_count_as_one_field() {
        let old = map(json!({"rooms": [{"id": 1, "number": "101"}]}));
        let new = map(json!({"rooms": [{"id": 2, "number": "102"}]}));

        assert_eq!(changed_fields(&old, &new), vec!["rooms"]);
    }

    #[test]
    fn identical_snapshots_yield_empty_diff() {
        let snapshot = map(json!({"name": "A", "status": "NORMAL"}));
        assert!(changed_fields(&snapshot, &snapshot).is_empty());
    }

    #[test]
    fn meta_fields_are_never_reported() {
        let old = map(json!({"id": 1, "updatedAt": "2026-01-01T00:00:00Z", "updatedBy": 1, "name": "A"}));
        let new = map(json!({"id": 1, "updatedAt": "2026-01-02T00:00:00Z", "updatedBy": 2, "name": "A"}));

        assert!(changed_fields(&old, &new).is_empty());
    }

    #[test]
    fn added_and_removed_fields_count_as_changed() {
        let old = map(json!({"name": "A", "legacy": true}));
        let new = map(json!({"name": "A", "phone": "010"}));

        assert_eq!(changed_fields(&old, &new), vec!["legacy", "phone"]);
    }
}
