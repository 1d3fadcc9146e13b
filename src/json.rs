//! JSON helpers and the structural predicates from the value model.

use serde_json::{Map as JsonMap, Value};

pub(crate) use self::nullable::Nullable;
use crate::keyword::Keyword;

mod nullable;

/// Returns a map with a single key-value entry.
pub(crate) fn single_entry_map(
    id: impl Into<String>,
    value: impl Into<Value>,
) -> JsonMap<String, Value> {
    let mut map = JsonMap::new();
    map.insert(id.into(), value.into());
    map
}

/// Wraps `v` in a one-element array unless it already is an array.
pub(crate) fn as_array(v: Value) -> Vec<Value> {
    match v {
        Value::Array(arr) => arr,
        other => vec![other],
    }
}

/// Deep-clones `value`, rebuilding every map with its keys sorted alphabetically.
///
/// See `spec.md` §3 "Lifecycle" and §9 "Map key order": the façade clones its input
/// this way before handing it to the rewrite core, so two documents that differ only in
/// key order produce byte-identical output.
pub(crate) fn clone_sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let mut sorted = JsonMap::with_capacity(entries.len());
            for (key, v) in entries {
                sorted.insert(key.clone(), clone_sorted(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(clone_sorted).collect()),
        other => other.clone(),
    }
}

/// A map is a *value object* if it has a `@value` entry.
///
/// See `spec.md` §3 "Subject".
pub(crate) fn is_value_object(map: &JsonMap<String, Value>) -> bool {
    map.contains_key(Keyword::Value.as_str())
}

/// A map is a *list object* if it has a `@list` entry.
pub(crate) fn is_list_object(map: &JsonMap<String, Value>) -> bool {
    map.contains_key(Keyword::List.as_str())
}

/// A map is a *set object* if it has a `@set` entry.
pub(crate) fn is_set_object(map: &JsonMap<String, Value>) -> bool {
    map.contains_key(Keyword::Set.as_str())
}

/// A map is a *subject* (node object) if it is none of value/list/set object and either
/// carries more than one key or has no `@id`.
///
/// See `spec.md` §3 "Subject".
pub(crate) fn is_subject(map: &JsonMap<String, Value>) -> bool {
    if is_value_object(map) || is_set_object(map) || is_list_object(map) {
        return false;
    }
    map.len() > 1 || !map.contains_key(Keyword::Id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clone_sorted_reorders_top_level_keys() {
        let value = json!({"b": 1, "a": 2});
        let sorted = clone_sorted(&value);
        let keys: Vec<&String> = sorted.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn clone_sorted_recurses_into_nested_maps_and_arrays() {
        let value = json!({"z": [{"y": 1, "x": 2}], "a": {"d": 1, "c": 2}});
        let sorted = clone_sorted(&value);
        assert_eq!(
            sorted.as_object().unwrap().keys().collect::<Vec<_>>(),
            vec!["a", "z"]
        );
        let nested = &sorted["z"][0];
        assert_eq!(nested.as_object().unwrap().keys().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn clone_sorted_serializes_identically_regardless_of_input_order() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(
            serde_json::to_string(&clone_sorted(&a)).unwrap(),
            serde_json::to_string(&clone_sorted(&b)).unwrap()
        );
    }
}
