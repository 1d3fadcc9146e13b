//! Value coercer: expands or compacts a single scalar in light of its property's
//! declared `@type`/`@language`.
//!
//! See `spec.md` §4.6 "Value Coercer".

use serde_json::{Map as JsonMap, Value};

use crate::{
    context::Context,
    double,
    error::{Error, ErrorCode, Result},
    json::{self, Nullable},
    keyword::Keyword,
};

/// Expansion direction: wraps a scalar (or `@id`/`@type` IRI) into its long form.
///
/// `property` is the term name as written in the document (which may itself be an
/// alias of `@id`/`@type`); the keyword check below resolves it first so an alias is
/// recognized the same way the literal keyword would be.
pub(crate) fn expand_value(ctx: &Context, property: Option<&str>, value: &Value) -> Result<Value> {
    let resolved = property.map(|p| ctx.expand_term(p)).transpose()?;

    if resolved.as_deref() == Some(Keyword::Id.as_str()) {
        let s = value
            .as_str()
            .ok_or_else(|| Error::with_message(ErrorCode::SyntaxError, "`@id` value must be a string"))?;
        return Ok(Value::String(ctx.expand_term(s)?));
    }
    if resolved.as_deref() == Some(Keyword::Type.as_str()) {
        let items = json::as_array(value.clone());
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let s = item.as_str().ok_or_else(|| {
                Error::with_message(ErrorCode::SyntaxError, "`@type` value must be a string or array of strings")
            })?;
            out.push(Value::String(ctx.expand_term(s)?));
        }
        return Ok(Value::Array(out));
    }

    match property.and_then(|p| ctx.type_mapping(p)) {
        Some("@id") => {
            let s = value.as_str().ok_or_else(|| {
                Error::with_message(ErrorCode::SyntaxError, "value coerced to `@id` must be a string")
            })?;
            let id = ctx.expand_term(s)?;
            Ok(Value::Object(json::single_entry_map(Keyword::Id.as_str(), Value::String(id))))
        }
        Some(ty) => {
            let literal = stringify_scalar(value)?;
            let mut map = JsonMap::new();
            map.insert(Keyword::Type.as_str().to_string(), Value::String(ty.to_string()));
            map.insert(Keyword::Value.as_str().to_string(), literal);
            Ok(Value::Object(map))
        }
        None => {
            let literal = match value {
                Value::Number(n) if n.is_f64() => Value::String(double::format_canonical(n.as_f64().unwrap())),
                other => other.clone(),
            };
            let mut map = JsonMap::new();
            if let Some(Nullable::Value(lang)) = property.and_then(|p| ctx.language_mapping(p)) {
                if matches!(literal, Value::String(_)) {
                    map.insert(Keyword::Language.as_str().to_string(), Value::String(lang.to_string()));
                }
            }
            map.insert(Keyword::Value.as_str().to_string(), literal);
            Ok(Value::Object(map))
        }
    }
}

/// Renders a scalar as the string form required of a typed literal's `@value`.
fn stringify_scalar(value: &Value) -> Result<Value> {
    let s = match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if n.is_f64() => double::format_canonical(n.as_f64().unwrap()),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(Error::with_message(
                ErrorCode::SyntaxError,
                format!("cannot coerce a non-scalar value to a typed literal: {}", other),
            ))
        }
    };
    Ok(Value::String(s))
}

/// Compaction direction: the inverse of [`expand_value`].
pub(crate) fn compact_value(ctx: &Context, property: Option<&str>, value: &Value) -> Result<Value> {
    let resolved = property.map(|p| ctx.expand_term(p)).transpose()?;
    if resolved.as_deref() == Some(Keyword::Id.as_str()) || resolved.as_deref() == Some(Keyword::Type.as_str()) {
        return Ok(match value {
            Value::String(s) => Value::String(ctx.compact_iri(s)),
            other => other.clone(),
        });
    }

    let map = match value {
        Value::Object(map) => map,
        other => return Ok(other.clone()),
    };

    let type_mapping = property.and_then(|p| ctx.type_mapping(p));
    let has_language = map.contains_key(Keyword::Language.as_str());

    if let Some(ty) = type_mapping {
        if has_language {
            return Err(Error::with_message(
                ErrorCode::CompactError,
                "typed value also carries `@language`; language information would be lost",
            ));
        }
        return if ty == "@id" {
            let inner = map.get(Keyword::Id.as_str()).cloned().unwrap_or(Value::Null);
            Ok(match inner {
                Value::String(s) => Value::String(ctx.compact_iri(&s)),
                other => other,
            })
        } else {
            Ok(map.get(Keyword::Value.as_str()).cloned().unwrap_or(Value::Null))
        };
    }

    // A plain literal with no `@type` or `@language` collapses to its bare `@value`:
    // the map-rebuild below only matters once there is another keyword to preserve.
    if !has_language && map.len() == 1 {
        if let Some(v) = map.get(Keyword::Value.as_str()) {
            return Ok(v.clone());
        }
    }

    let mut out = JsonMap::new();
    for (key, v) in map {
        if let Some(kw) = Keyword::parse(key) {
            let alias = ctx.keywords().alias_of(kw);
            let compacted_v = match kw {
                Keyword::Id | Keyword::Type => compact_value(ctx, Some(kw.as_str()), v)?,
                _ => v.clone(),
            };
            out.insert(alias.to_string(), compacted_v);
        } else {
            out.insert(key.clone(), v.clone());
        }
    }
    Ok(Value::Object(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(entries: Value) -> Context {
        Context::from_map(entries.as_object().unwrap().clone())
    }

    #[test]
    fn expands_type_coerced_scalars() {
        let ctx = ctx(json!({"n": {"@id": "http://x/n", "@type": "http://w/int"}}));
        let expanded = expand_value(&ctx, Some("n"), &json!("42")).unwrap();
        assert_eq!(expanded, json!({"@type": "http://w/int", "@value": "42"}));
    }

    #[test]
    fn expands_id_coerced_scalars() {
        let ctx = ctx(json!({"knows": {"@id": "http://x/k", "@type": "@id"}}));
        let expanded = expand_value(&ctx, Some("knows"), &json!("http://x/Alice")).unwrap();
        assert_eq!(expanded, json!({"@id": "http://x/Alice"}));
    }

    #[test]
    fn expands_untyped_strings_as_plain_values() {
        let ctx = Context::new();
        let expanded = expand_value(&ctx, Some("name"), &json!("Bob")).unwrap();
        assert_eq!(expanded, json!({"@value": "Bob"}));
    }

    #[test]
    fn expands_untyped_doubles_in_canonical_form() {
        let ctx = Context::new();
        let expanded = expand_value(&ctx, Some("weight"), &json!(1.5)).unwrap();
        assert_eq!(expanded, json!({"@value": "1.500000000000000e+00"}));
    }

    #[test]
    fn applies_default_language_to_untyped_strings() {
        let ctx = ctx(json!({"name": {"@id": "http://x/name", "@language": "en"}}));
        let expanded = expand_value(&ctx, Some("name"), &json!("Bob")).unwrap();
        assert_eq!(expanded, json!({"@value": "Bob", "@language": "en"}));
    }

    #[test]
    fn compacts_typed_literal_to_bare_value() {
        let ctx = ctx(json!({"n": {"@id": "http://x/n", "@type": "http://w/int"}}));
        let compacted = compact_value(&ctx, Some("n"), &json!({"@type": "http://w/int", "@value": "42"})).unwrap();
        assert_eq!(compacted, json!("42"));
    }

    #[test]
    fn compacts_id_typed_value_through_compact_iri() {
        let ctx = ctx(json!({
            "ex": "http://example.com/",
            "knows": {"@id": "http://x/k", "@type": "@id"}
        }));
        let compacted = compact_value(&ctx, Some("knows"), &json!({"@id": "http://example.com/Alice"})).unwrap();
        assert_eq!(compacted, json!("ex:Alice"));
    }

    #[test]
    fn rejects_typed_value_with_language() {
        let ctx = Context::new();
        let err = compact_value(&ctx, Some("n"), &json!({"@type": "http://w/int", "@value": "1", "@language": "en"}))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CompactError);
    }
}
