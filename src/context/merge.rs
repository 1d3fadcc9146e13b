//! Context merger: the IRI-replacement rule for combining two context values.
//!
//! See `spec.md` §4.2 "Context Merger".

use serde_json::{Map as JsonMap, Value};
use tracing::trace;

use super::Context;
use crate::error::{Error, ErrorCode, Result, ResultExt};

impl Context {
    /// Extends `self` with a local context value, folding it onto the existing entries.
    ///
    /// Used when a subject carries its own `@context` during expansion or compaction.
    pub(crate) fn merge(&self, local: &Value) -> Result<Context> {
        let folded = fold_to_map(local)?;
        let merged = merge_maps(self.entries.clone(), folded);
        Ok(Context::from_map(merged))
    }
}

/// The façade-level `merge_contexts(ctx1, ctx2)` operation: combines two raw JSON
/// context values (each possibly a sequence) into one merged context map, without
/// building a [`Context`]. This is what `Processor::merge_contexts` exposes directly.
pub(crate) fn merge_values(ctx1: &Value, ctx2: &Value) -> Result<Value> {
    let left = fold_to_map(ctx1)?;
    let right = fold_to_map(ctx2)?;
    Ok(Value::Object(merge_maps(left, right)))
}

/// Normalizes a context value to a single map: a sequence folds left with an empty-map
/// seed (each element merged in turn via [`merge_maps`]); a single map is returned as
/// is; `null` is the empty map.
fn fold_to_map(value: &Value) -> Result<JsonMap<String, Value>> {
    match value {
        Value::Null => Ok(JsonMap::new()),
        Value::Object(map) => Ok(map.clone()),
        Value::Array(items) => {
            let mut acc = JsonMap::new();
            for (i, item) in items.iter().enumerate() {
                let item_map = fold_to_map(item).context(format!("while folding context element {}", i))?;
                acc = merge_maps(acc, item_map);
            }
            Ok(acc)
        }
        _ => Err(Error::with_message(
            ErrorCode::InvalidContext,
            "a context value must be a map, an array of context values, or null",
        )),
    }
}

/// Overlays `ctx2` onto `ctx1`, applying the IRI-replacement rule first: for each key in
/// `ctx2` that defines an `@id`, any existing key in `ctx1` whose resolved `@id` equals
/// that new `@id` is removed before the overlay, so a term redefined under a new name
/// does not leave its old name still pointing at the same IRI.
fn merge_maps(mut ctx1: JsonMap<String, Value>, ctx2: JsonMap<String, Value>) -> JsonMap<String, Value> {
    for (key, value) in &ctx2 {
        let Some(new_id) = entry_id(value) else { continue };
        let stale: Vec<String> = ctx1
            .iter()
            .filter(|(k, v)| *k != key && entry_id(v).as_deref() == Some(new_id.as_str()))
            .map(|(k, _)| k.clone())
            .collect();
        for k in &stale {
            trace!(key = %k, new_id, "removing stale term definition with replaced @id");
            ctx1.remove(k);
        }
    }
    for (key, value) in ctx2 {
        ctx1.insert(key, value);
    }
    ctx1
}

/// The `@id` a term-definition entry resolves to: itself if a bare string, `map["@id"]`
/// if a map, or none.
fn entry_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("@id").and_then(Value::as_str).map(String::from),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlay_adds_new_keys() {
        let merged = merge_values(&json!({"a": "http://x/a"}), &json!({"b": "http://x/b"})).unwrap();
        assert_eq!(merged, json!({"a": "http://x/a", "b": "http://x/b"}));
    }

    #[test]
    fn later_key_wins_on_collision() {
        let merged = merge_values(&json!({"a": "http://x/a"}), &json!({"a": "http://x/a2"})).unwrap();
        assert_eq!(merged, json!({"a": "http://x/a2"}));
    }

    #[test]
    fn replacing_an_id_drops_the_stale_alias() {
        let ctx1 = json!({"old": "http://x/same", "other": "http://x/other"});
        let ctx2 = json!({"new": "http://x/same"});
        let merged = merge_values(&ctx1, &ctx2).unwrap();
        assert_eq!(
            merged,
            json!({"other": "http://x/other", "new": "http://x/same"})
        );
    }

    #[test]
    fn sequences_fold_left() {
        let ctx1 = json!([{"a": "http://x/a"}, {"b": "http://x/b"}]);
        let merged = merge_values(&ctx1, &Value::Null).unwrap();
        assert_eq!(merged, json!({"a": "http://x/a", "b": "http://x/b"}));
    }

    #[test]
    fn rejects_non_map_context_values() {
        let err = merge_values(&json!("http://x/ctx"), &Value::Null).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidContext);
    }
}
