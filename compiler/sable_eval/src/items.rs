//! Item access: `target[index]` over lists, tuples, strings and blobs.
//!
//! A negative index counts from the end and wraps modulo the length, so
//! `-1` is the last item. Indices at or past the length are out of range.
//! Only lists accept item assignment; lists are shared, so assignment
//! builds a new list that the caller stores back into the target.

use sable_diagnostic::ScriptResult;
use sable_value::errors::{immutable_item, index_out_of_range, type_mismatch};
use sable_value::Value;

const INDEXABLE: &str = "list, tuple, string or blob";

fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let signed_len = i64::try_from(len).ok().filter(|&l| l > 0)?;
    if index < 0 {
        usize::try_from(index.rem_euclid(signed_len)).ok()
    } else {
        usize::try_from(index).ok().filter(|&i| i < len)
    }
}

fn index_of(index: &Value) -> ScriptResult<i64> {
    index
        .as_int()
        .ok_or_else(|| type_mismatch("int", index.type_name()))
}

fn position(index: i64, len: usize) -> ScriptResult<usize> {
    resolve_index(index, len).ok_or_else(|| index_out_of_range(index, len))
}

/// Read `container[index]`.
pub fn item(container: &Value, index: &Value) -> ScriptResult<Value> {
    let raw = index_of(index)?;
    match container {
        Value::List(items) | Value::Tuple(items) => {
            Ok(items[position(raw, items.len())?].clone())
        }
        Value::Str(s) => {
            let len = s.chars().count();
            let at = position(raw, len)?;
            s.chars()
                .nth(at)
                .map(|c| Value::string(c.to_string()))
                .ok_or_else(|| index_out_of_range(raw, len))
        }
        Value::Blob(bytes) => Ok(Value::Int(i64::from(bytes[position(raw, bytes.len())?]))),
        other => Err(type_mismatch(INDEXABLE, other.type_name())),
    }
}

/// A copy of `container` with `container[index]` replaced by `value`.
pub fn with_item(container: &Value, index: &Value, value: Value) -> ScriptResult<Value> {
    let raw = index_of(index)?;
    match container {
        Value::List(items) => {
            let at = position(raw, items.len())?;
            let mut updated = items.as_ref().clone();
            updated[at] = value;
            Ok(Value::list(updated))
        }
        Value::Tuple(_) | Value::Str(_) | Value::Blob(_) => Err(immutable_item(container)),
        other => Err(type_mismatch("list", other.type_name())),
    }
}
