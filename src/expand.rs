//! Expander: recursive rewrite turning short forms into long forms under an effective
//! context.
//!
//! See `spec.md` §4.4 "Expander".

use serde_json::{Map as JsonMap, Value};

use crate::{
    coerce,
    context::Context,
    error::{Error, ErrorCode, Result, ResultExt},
    json,
    keyword::FRAMING_KEYWORDS,
};

/// Expands `value` under `ctx` in the context of `property` (`None` at the document
/// root, where a bare string names a property rather than a literal).
pub fn expand(ctx: &Context, property: Option<&str>, value: &Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(s) if property.is_none() => Ok(Value::String(
            ctx.expand_term(s).context(format!("while expanding term `{}`", s))?,
        )),
        Value::Array(items) => expand_sequence(ctx, property, items, false),
        Value::Object(map) if json::is_list_object(map) => {
            let items = list_items(map)?;
            expand_sequence(ctx, property, &items, true)
        }
        Value::Object(map) if json::is_subject(map) => expand_subject(ctx, map),
        Value::Object(map) if map.contains_key(crate::keyword::Keyword::Set.as_str()) => {
            expand(ctx, property, map.get(crate::keyword::Keyword::Set.as_str()).unwrap())
        }
        // Already an expanded value object or `@id` reference: expansion is idempotent.
        Value::Object(map) if json::is_value_object(map) || map.contains_key(crate::keyword::Keyword::Id.as_str()) => {
            Ok(value.clone())
        }
        scalar => coerce::expand_value(ctx, property, scalar),
    }
}

fn list_items(map: &JsonMap<String, Value>) -> Result<Vec<Value>> {
    match map.get(crate::keyword::Keyword::List.as_str()) {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(Value::Null) | None => Ok(vec![]),
        Some(_) => Err(Error::with_message(
            ErrorCode::SyntaxError,
            "`@list` value must be a sequence or null",
        )),
    }
}

fn expand_sequence(ctx: &Context, property: Option<&str>, items: &[Value], used_list_wrapper: bool) -> Result<Value> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if matches!(item, Value::Array(_)) {
            return Err(Error::with_message(
                ErrorCode::SyntaxError,
                "arrays must not directly contain arrays",
            ));
        }
        let expanded = expand(ctx, property, item)?;
        if !expanded.is_null() {
            out.push(expanded);
        }
    }

    let container_is_list = property
        .and_then(|p| ctx.container_mapping(p))
        .map(|c| c == crate::keyword::Keyword::List.as_str())
        .unwrap_or(false);

    if container_is_list || used_list_wrapper {
        Ok(Value::Object(json::single_entry_map(
            crate::keyword::Keyword::List.as_str(),
            Value::Array(out),
        )))
    } else {
        Ok(Value::Array(out))
    }
}

fn expand_subject(ctx: &Context, map: &JsonMap<String, Value>) -> Result<Value> {
    let merged;
    let active = match map.get(crate::keyword::Keyword::Context.as_str()) {
        Some(local) => {
            merged = ctx.merge(local).context("while merging an inline `@context`")?;
            &merged
        }
        None => ctx,
    };

    let mut out = JsonMap::new();
    for (key, value) in map {
        if key == crate::keyword::Keyword::Context.as_str() {
            continue;
        }
        if FRAMING_KEYWORDS.contains(&key.as_str()) {
            out.insert(key.clone(), Value::Array(json::as_array(value.clone())));
            continue;
        }

        let property_iri = active
            .expand_term(key)
            .context(format!("while expanding property `{}`", key))?;
        if !crate::iri::is_absolute_iri(&property_iri) && !active.is_defined(key) {
            continue;
        }

        let expanded_value = expand(active, Some(key), value)
            .context(format!("while expanding the value of `{}`", key))?;
        append_expanded(&mut out, &property_iri, expanded_value);
    }
    Ok(Value::Object(out))
}

/// Appends an expanded value to the always-array value set for `key`, flattening one
/// level when the expansion itself produced a sequence (so a document property that was
/// itself an array does not end up doubly wrapped).
fn append_expanded(out: &mut JsonMap<String, Value>, key: &str, expanded: Value) {
    let entry = out
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(arr) = entry {
        match expanded {
            Value::Array(items) => arr.extend(items),
            other => arr.push(other),
        }
    }
}
