//! Public value helpers for working with a subject's property values.
//!
//! See `spec.md` §4.7 "Public Façade" — "Helper predicates on values".

use serde_json::{Map as JsonMap, Value};

/// True iff `subject[property]` exists at all.
pub fn has_property(subject: &JsonMap<String, Value>, property: &str) -> bool {
    subject.contains_key(property)
}

/// True iff `subject[property]` exists and either is a sequence containing `value`, or
/// (when `value` is not a sequence) equals `value`.
pub fn has_value(subject: &JsonMap<String, Value>, property: &str, value: &Value) -> bool {
    match subject.get(property) {
        Some(Value::Array(items)) => items.contains(value),
        Some(existing) => existing == value,
        None => false,
    }
}

/// Adds `value` to `subject[property]`.
///
/// If the property is absent, it is set to `value` (or `[value]` when `always_array` is
/// set). If present and `value` is not already there, the property is coerced to an
/// array as needed and `value` appended. Duplicates (by equality) are not added.
pub fn add_value(subject: &mut JsonMap<String, Value>, property: &str, value: Value, always_array: bool) {
    match subject.remove(property) {
        None => {
            subject.insert(property.to_string(), if always_array { Value::Array(vec![value]) } else { value });
        }
        Some(Value::Array(mut items)) => {
            if !items.contains(&value) {
                items.push(value);
            }
            subject.insert(property.to_string(), Value::Array(items));
        }
        Some(existing) => {
            let items = if existing == value {
                vec![existing]
            } else {
                vec![existing, value]
            };
            subject.insert(property.to_string(), Value::Array(items));
        }
    }
}

/// Returns `subject[property]`'s values as a slice-friendly vector: empty if absent, a
/// single-element vector if scalar, or the sequence itself.
pub fn get_values(subject: &JsonMap<String, Value>, property: &str) -> Vec<Value> {
    match subject.get(property) {
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
        None => vec![],
    }
}

/// Removes `property` from `subject` entirely.
pub fn remove_property(subject: &mut JsonMap<String, Value>, property: &str) {
    subject.remove(property);
}

/// Removes `value` from `subject[property]`'s value set.
///
/// The sequence is rebuilt excluding `value`; a length-0 result removes the key
/// entirely, a length-1 result collapses to a bare scalar unless `always_array` is set
/// (mirroring [`add_value`]'s `always_array`, so a caller preserving a `@list`/`@set`
/// container's array shape through a removal can keep it).
pub fn remove_value(subject: &mut JsonMap<String, Value>, property: &str, value: &Value, always_array: bool) {
    let remaining: Vec<Value> = match subject.get(property) {
        Some(Value::Array(items)) => items.iter().filter(|v| *v != value).cloned().collect(),
        Some(existing) if existing == value => vec![],
        Some(existing) => vec![existing.clone()],
        None => return,
    };

    match remaining.len() {
        0 => {
            subject.remove(property);
        }
        1 if !always_array => {
            subject.insert(property.to_string(), remaining.into_iter().next().unwrap());
        }
        _ => {
            subject.insert(property.to_string(), Value::Array(remaining));
        }
    }
}

/// Returns the raw `@context` value a document or subject carries, if any.
pub fn get_context_value(value: &Value) -> Option<&Value> {
    value.as_object()?.get("@context")
}
