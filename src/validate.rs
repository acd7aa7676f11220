//! Value classification predicates.
//!
//! Option bags (JSON documents describing an environment or a strategy) are
//! dynamically typed, so every option is classified before it is trusted.
//! The predicates never panic and have no side effects.
//!
//! | predicate      | accepts                                              |
//! |----------------|------------------------------------------------------|
//! | [`is_defined`] | anything but a missing value or `null`               |
//! | [`is_boolean`] | `true` / `false`                                     |
//! | [`is_string`]  | strings                                              |
//! | [`is_number`]  | finite numbers                                       |
//! | [`is_integer`] | finite, whole numbers (`2.0` counts, `2.5` does not) |
//! | [`is_array`]   | arrays                                               |
//! | [`is_object`]  | key/value records only (not arrays, not scalars)     |
//!
//! [`is_finite`] and [`is_whole`] apply the same number rules to typed `f64`
//! options, where `NaN` and infinities can still sneak in.

use crate::error::{EvolutionError, Result};
use serde_json::{Map, Value};

/// `false` for a missing value or `null`, `true` otherwise.
pub fn is_defined(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

pub fn is_boolean(value: &Value) -> bool {
    value.is_boolean()
}

pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// A real number: not `NaN`, not infinite.
pub fn is_number(value: &Value) -> bool {
    value.as_f64().is_some_and(is_finite)
}

/// A number with no fractional part.
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(is_whole),
        _ => false,
    }
}

pub fn is_array(value: &Value) -> bool {
    value.is_array()
}

/// A plain key/value record. Arrays and scalars are rejected.
pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

/// Finite `f64`: not `NaN`, not `±∞`.
pub fn is_finite(x: f64) -> bool {
    x.is_finite()
}

/// Finite `f64` with no fractional part.
pub fn is_whole(x: f64) -> bool {
    is_finite(x) && x.fract() == 0.0
}

// ============================================================================
// Option bag readers
// ============================================================================

/// Views `options` as a record. `null` reads as an empty record.
pub(crate) fn options_object<'a>(options: &'a Value, what: &str) -> Result<Option<&'a Map<String, Value>>> {
    if !is_defined(Some(options)) {
        return Ok(None);
    }
    match options.as_object() {
        Some(map) => Ok(Some(map)),
        None => Err(EvolutionError::illegal_argument(format!(
            "{what} options must be an object; actual: {options}"
        ))),
    }
}

fn lookup<'a>(options: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a Value> {
    options
        .and_then(|map| map.get(key))
        .filter(|value| is_defined(Some(value)))
}

/// Reads an optional non-negative integer option.
pub(crate) fn read_count(options: Option<&Map<String, Value>>, key: &str) -> Result<Option<usize>> {
    let Some(value) = lookup(options, key) else {
        return Ok(None);
    };
    if !is_integer(value) {
        return Err(EvolutionError::illegal_argument(format!(
            "{key} must be an integer; actual: {value}"
        )));
    }
    let n = value.as_f64().unwrap_or(-1.0);
    if n < 0.0 {
        return Err(EvolutionError::illegal_argument(format!(
            "{key} must not be negative; actual: {value}"
        )));
    }
    let count = match value.as_u64() {
        Some(n) => usize::try_from(n).ok(),
        None if n < usize::MAX as f64 => Some(n as usize),
        None => None,
    };
    count.map(Some).ok_or_else(|| {
        EvolutionError::illegal_argument(format!("{key} is too large; actual: {value}"))
    })
}

/// Reads an optional finite number option.
pub(crate) fn read_number(options: Option<&Map<String, Value>>, key: &str) -> Result<Option<f64>> {
    let Some(value) = lookup(options, key) else {
        return Ok(None);
    };
    match value.as_f64() {
        Some(x) if is_number(value) => Ok(Some(x)),
        _ => Err(EvolutionError::illegal_argument(format!(
            "{key} must be a number; actual: {value}"
        ))),
    }
}

/// Reads an optional boolean option.
pub(crate) fn read_bool(options: Option<&Map<String, Value>>, key: &str) -> Result<Option<bool>> {
    let Some(value) = lookup(options, key) else {
        return Ok(None);
    };
    value.as_bool().map(Some).ok_or_else(|| {
        EvolutionError::illegal_argument(format!("{key} must be a boolean; actual: {value}"))
    })
}

/// Reads an optional string option.
pub(crate) fn read_str<'a>(options: Option<&'a Map<String, Value>>, key: &str) -> Result<Option<&'a str>> {
    let Some(value) = lookup(options, key) else {
        return Ok(None);
    };
    value.as_str().map(Some).ok_or_else(|| {
        EvolutionError::illegal_argument(format!("{key} must be a string; actual: {value}"))
    })
}
