//! Page document trees and module-reference extraction.
//!
//! A page document is a tree of typed components (wrapper, text,
//! textnode, ...) carried as `serde_json::Value`: mappings, sequences and
//! scalars, exactly the three shapes the traversal distinguishes. A
//! component whose `id` starts with `module__` references a shared,
//! externally defined module; every such reference must be collected no
//! matter how deep it sits.

use serde_json::Value;
use std::collections::BTreeSet;

/// Prefix marking a component id as a shared-module reference.
pub const MODULE_PREFIX: &str = "module__";

/// Collect every shared-module id referenced anywhere in a document tree.
///
/// Depth-first over the whole tree; set semantics, so duplicates collapse
/// and discovery order is irrelevant. Pure function of the structure.
pub fn extract_module_ids(node: &Value) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    collect(node, &mut ids);
    ids
}

fn collect(node: &Value, ids: &mut BTreeSet<String>) {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(id)) = map.get("id")
                && id.starts_with(MODULE_PREFIX)
            {
                ids.insert(id.clone());
            }
            for value in map.values() {
                collect(value, ids);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect(item, ids);
            }
        }
        // Scalars carry no references
        _ => {}
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_tree_yields_empty_set() {
        assert!(extract_module_ids(&json!({})).is_empty());
        assert!(extract_module_ids(&json!([])).is_empty());
        assert!(extract_module_ids(&json!(null)).is_empty());
        assert!(extract_module_ids(&json!("module__loose-string")).is_empty());
    }

    #[test]
    fn test_top_level_module_id() {
        let doc = json!({"id": "module__header", "type": "wrapper"});
        let ids = extract_module_ids(&doc);
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("module__header"));
    }

    #[test]
    fn test_non_module_ids_ignored() {
        let doc = json!({
            "id": "section-1",
            "components": [{"id": "text-2", "type": "text"}],
        });
        assert!(extract_module_ids(&doc).is_empty());
    }

    #[test]
    fn test_deep_nesting() {
        let doc = json!({
            "type": "wrapper",
            "components": [{
                "type": "wrapper",
                "components": [{
                    "type": "text",
                    "components": [{"type": "textnode", "id": "module__cta"}],
                }],
            }],
        });
        let ids = extract_module_ids(&doc);
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("module__cta"));
    }

    #[test]
    fn test_same_module_under_three_branches_dedupes() {
        let doc = json!({
            "components": [
                {"id": "module__gallery"},
                {"children": [{"id": "module__gallery"}]},
                {"styles": {"inner": {"id": "module__gallery"}}},
            ],
        });
        let ids = extract_module_ids(&doc);
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn test_recurses_into_every_mapping_value() {
        // References hide under arbitrary keys, not just `components`
        let doc = json!({
            "attributes": {"id": "module__nav"},
            "meta": [{"id": "module__footer"}],
        });
        let ids = extract_module_ids(&doc);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("module__nav"));
        assert!(ids.contains("module__footer"));
    }

    #[test]
    fn test_non_string_id_is_ignored() {
        let doc = json!({"id": 42, "components": [{"id": ["module__x"]}]});
        assert!(extract_module_ids(&doc).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let doc = json!({
            "components": [
                {"id": "module__a"},
                {"id": "module__b", "components": [{"id": "module__a"}]},
            ],
        });
        let first = extract_module_ids(&doc);
        let second = extract_module_ids(&doc);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
