//! Compactor: recursive rewrite turning long forms into short forms under a target
//! context.
//!
//! See `spec.md` §4.5 "Compactor".

use serde_json::{Map as JsonMap, Value};

use crate::{
    coerce,
    context::Context,
    error::{Error, ErrorCode, Result, ResultExt},
    json,
    keyword::Keyword,
};

/// Compacts `value` under `ctx` in the context of `property`.
///
/// `optimize` is accepted and threaded through but otherwise unused: the source's
/// context-pruning pass is a stub that returns its input unchanged, and this
/// re-implementation matches that behavior rather than inventing a pruning algorithm.
pub fn compact(ctx: &Context, property: Option<&str>, value: &Value, optimize: bool) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Array(items) => compact_sequence(ctx, property, items, optimize),
        Value::Object(map) if json::is_list_object(map) => {
            let items = match map.get(Keyword::List.as_str()) {
                Some(Value::Array(items)) => items.clone(),
                Some(Value::Null) | None => vec![],
                Some(_) => {
                    return Err(Error::with_message(
                        ErrorCode::SyntaxError,
                        "`@list` value must be a sequence or null",
                    ))
                }
            };
            compact_sequence(ctx, property, &items, optimize)
        }
        Value::Object(map) if map.len() == 1 && map.contains_key(Keyword::Graph.as_str()) => {
            let inner = map.get(Keyword::Graph.as_str()).unwrap();
            let mut out = JsonMap::new();
            out.insert(
                ctx.keywords().alias_of(Keyword::Graph).to_string(),
                compact(ctx, property, inner, optimize)?,
            );
            Ok(Value::Object(out))
        }
        Value::Object(map) if json::is_subject(map) => compact_subject(ctx, map, optimize),
        Value::Object(map) if map.contains_key(Keyword::Set.as_str()) => {
            compact(ctx, property, map.get(Keyword::Set.as_str()).unwrap(), optimize)
        }
        scalar => coerce::compact_value(ctx, property, scalar),
    }
}

fn compact_sequence(ctx: &Context, property: Option<&str>, items: &[Value], optimize: bool) -> Result<Value> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if matches!(item, Value::Array(_)) {
            return Err(Error::with_message(
                ErrorCode::SyntaxError,
                "arrays must not directly contain arrays",
            ));
        }
        out.push(compact(ctx, property, item, optimize)?);
    }
    Ok(Value::Array(out))
}

fn compact_subject(ctx: &Context, map: &JsonMap<String, Value>, optimize: bool) -> Result<Value> {
    let mut out = JsonMap::new();
    for (key, value) in map {
        if key == Keyword::Context.as_str() {
            continue;
        }
        if !ctx.is_defined(key) && !crate::iri::is_absolute_iri(key) {
            continue;
        }

        let term = ctx.compact_iri(key);
        let container = ctx.container_mapping(&term);
        let compacted_values = compact_property_values(ctx, &term, value, container, optimize)
            .context(format!("while compacting property `{}`", key))?;
        out.insert(term.clone(), compacted_values);
    }
    Ok(Value::Object(out))
}

/// Compacts a subject's property value, honoring the container-driven array semantics
/// from `spec.md` §4.5 step 4: always-array for `@list`/`@set` containers, a bare
/// scalar for a singleton otherwise. A value whose elements carry a `@list` wrapper but
/// whose property has no list container keeps the wrapper explicit, so a later
/// re-expansion still recognizes it as a list.
fn compact_property_values(
    ctx: &Context,
    term: &str,
    value: &Value,
    container: Option<&str>,
    optimize: bool,
) -> Result<Value> {
    let container_is_list = container == Some(Keyword::List.as_str());
    let container_is_set = container == Some(Keyword::Set.as_str());
    let items = json::as_array(value.clone());

    let mut out_items = Vec::with_capacity(items.len());
    for item in items {
        if let Value::Object(item_map) = &item {
            if json::is_list_object(item_map) {
                let inner = match item_map.get(Keyword::List.as_str()) {
                    Some(Value::Array(inner)) => inner.clone(),
                    Some(Value::Null) | None => vec![],
                    Some(_) => {
                        return Err(Error::with_message(
                            ErrorCode::SyntaxError,
                            "`@list` value must be a sequence or null",
                        ))
                    }
                };
                let compacted_inner = inner
                    .into_iter()
                    .map(|v| compact(ctx, Some(term), &v, optimize))
                    .collect::<Result<Vec<_>>>()?;
                if container_is_list {
                    out_items.extend(compacted_inner);
                } else {
                    let mut wrapper = JsonMap::new();
                    wrapper.insert(ctx.keywords().alias_of(Keyword::List).to_string(), Value::Array(compacted_inner));
                    out_items.push(Value::Object(wrapper));
                }
                continue;
            }
        }
        out_items.push(compact(ctx, Some(term), &item, optimize)?);
    }

    Ok(if container_is_list || container_is_set {
        Value::Array(out_items)
    } else if out_items.len() == 1 {
        out_items.into_iter().next().unwrap()
    } else {
        Value::Array(out_items)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::expand;
    use serde_json::json;

    fn ctx(entries: Value) -> Context {
        Context::from_map(entries.as_object().unwrap().clone())
    }

    #[test]
    fn e1_round_trips_a_plain_term() {
        let ctx = ctx(json!({"name": "http://x/name"}));
        let input = json!({"name": "Bob"});
        let expanded = expand(&ctx, None, &input).unwrap();
        let compacted = compact(&ctx, None, &expanded, false).unwrap();
        assert_eq!(compacted, json!({"name": "Bob"}));
    }

    #[test]
    fn e3_round_trips_an_id_coercion() {
        let ctx = ctx(json!({"knows": {"@id": "http://x/k", "@type": "@id"}}));
        let input = json!({"knows": "http://x/Alice"});
        let expanded = expand(&ctx, None, &input).unwrap();
        let compacted = compact(&ctx, None, &expanded, false).unwrap();
        assert_eq!(compacted, json!({"knows": "http://x/Alice"}));
    }

    #[test]
    fn e4_round_trips_a_list_container() {
        let ctx = ctx(json!({"items": {"@id": "http://x/i", "@container": "@list"}}));
        let input = json!({"items": [1, 2]});
        let expanded = expand(&ctx, None, &input).unwrap();
        let compacted = compact(&ctx, None, &expanded, false).unwrap();
        assert_eq!(compacted, json!({"items": [1, 2]}));
    }

    #[test]
    fn keeps_a_list_wrapper_explicit_without_a_list_container() {
        let ctx = ctx(json!({"items": "http://x/i"}));
        let expanded = json!({"http://x/i": [{"@list": [{"@value": 1}]}]});
        let compacted = compact(&ctx, None, &expanded, false).unwrap();
        assert_eq!(compacted, json!({"items": {"@list": [1]}}));
    }

    #[test]
    fn keyword_aliasing_round_trips() {
        let ctx = ctx(json!({"id": "@id", "name": "http://x/name"}));
        let input = json!({"id": "http://x/Alice", "name": "Bob"});
        let expanded = expand(&ctx, None, &input).unwrap();
        assert_eq!(expanded["@id"], json!(["http://x/Alice"]));
        let compacted = compact(&ctx, None, &expanded, false).unwrap();
        assert_eq!(compacted["id"], json!("http://x/Alice"));
    }

    #[test]
    fn rejects_directly_nested_arrays() {
        let ctx = Context::new();
        let err = compact(&ctx, None, &json!([[1]]), false).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SyntaxError);
    }

    #[test]
    fn compacts_a_named_graph_wrapper() {
        let ctx = ctx(json!({"name": "http://x/name"}));
        let expanded = json!({"@graph": [{"http://x/name": [{"@value": "Bob"}]}]});
        let compacted = compact(&ctx, None, &expanded, false).unwrap();
        assert_eq!(compacted, json!({"@graph": [{"name": "Bob"}]}));
    }
}
