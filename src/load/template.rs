use std::collections::BTreeMap;

use serde_json::Value;

use crate::foundation::error::{PosterError, PosterResult};
use crate::value::{ParamMap, ParamValue, parse_color, parse_point};

/// Variable bindings for `--${name}--` placeholders.
pub type Variables = BTreeMap<String, Value>;

/// Keys whose values are normalized to colors.
pub const COLOR_KEYS: &[&str] = &["background", "fill", "outline", "color"];

/// Keys whose values are normalized to points.
pub const POINT_KEYS: &[&str] = &["anchor", "position", "offset"];

const OPEN: &str = "--${";
const CLOSE: &str = "}--";

/// Join a dotted field path.
pub(crate) fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{path}.{key}")
    }
}

/// Name of the placeholder when `s` is exactly one placeholder.
fn whole_placeholder(s: &str) -> Option<&str> {
    let name = s.strip_prefix(OPEN)?.strip_suffix(CLOSE)?;
    (!name.is_empty() && !name.contains('}')).then_some(name)
}

fn lookup<'v>(vars: &'v Variables, name: &str, path: &str) -> PosterResult<&'v Value> {
    vars.get(name).ok_or_else(|| PosterError::UndefinedVariable {
        name: name.to_owned(),
        path: path.to_owned(),
    })
}

fn display(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Substitute placeholders inside one string.
///
/// A string that is exactly one placeholder takes the bound value with its own type. Embedded
/// placeholders are interpolated as text.
pub fn substitute_str(s: &str, vars: &Variables, path: &str) -> PosterResult<Value> {
    if let Some(name) = whole_placeholder(s) {
        return lookup(vars, name, path).cloned();
    }
    if !s.contains(OPEN) {
        return Ok(Value::String(s.to_owned()));
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = &after[..end];
        if name.is_empty() || !after[end..].starts_with(CLOSE) {
            out.push_str(&rest[..start + OPEN.len()]);
            rest = after;
            continue;
        }
        out.push_str(&rest[..start]);
        out.push_str(&display(lookup(vars, name, path)?));
        rest = &after[end + CLOSE.len()..];
    }
    out.push_str(rest);
    Ok(Value::String(out))
}

/// Substitute placeholders throughout `value`.
pub fn substitute(value: &Value, vars: &Variables, path: &str) -> PosterResult<Value> {
    match value {
        Value::String(s) => substitute_str(s, vars, path),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| substitute(item, vars, &child_path(path, &i.to_string())))
            .collect::<PosterResult<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), substitute(v, vars, &child_path(path, k))?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

/// Substitute, then normalize `value` according to the key it sits under.
///
/// Color keys become [`ParamValue::Color`] (`null` stays null), point keys become
/// [`ParamValue::Point`] with missing axes at zero, maps are descended key by key and list
/// items are only substituted. Substitution runs once, so bound values are never expanded
/// again.
pub fn normalize(
    key: Option<&str>,
    value: &Value,
    vars: &Variables,
    path: &str,
) -> PosterResult<ParamValue> {
    let value = substitute(value, vars, path)?;
    normalize_value(key, &value, path)
}

/// [`normalize`] every entry of a map under its own key.
pub fn normalize_map(value: &Value, vars: &Variables, path: &str) -> PosterResult<ParamMap> {
    match value {
        Value::Null => Ok(ParamMap::new()),
        Value::Object(_) | Value::String(_) => match substitute(value, vars, path)? {
            Value::Null => Ok(ParamMap::new()),
            Value::Object(map) => normalize_entries(&map, path),
            other => Err(expected_map(path, &other)),
        },
        other => Err(expected_map(path, other)),
    }
}

fn normalize_value(key: Option<&str>, value: &Value, path: &str) -> PosterResult<ParamValue> {
    let Some(key) = key else {
        return Ok(ParamValue::from_json(value));
    };

    if value.is_null() {
        return Ok(ParamValue::Null);
    }
    if COLOR_KEYS.contains(&key) {
        return parse_color(value)
            .map(ParamValue::Color)
            .map_err(|e| PosterError::invalid_color(path, e));
    }
    if POINT_KEYS.contains(&key) {
        return parse_point(value)
            .map(|p| ParamValue::Point(p.or_zero()))
            .map_err(|e| PosterError::invalid_point(path, e));
    }
    match value {
        Value::Object(map) => normalize_entries(map, path).map(ParamValue::Map),
        other => Ok(ParamValue::from_json(other)),
    }
}

/// Entries must already be substituted.
fn normalize_entries(map: &serde_json::Map<String, Value>, path: &str) -> PosterResult<ParamMap> {
    map.iter()
        .map(|(k, v)| Ok((k.clone(), normalize_value(Some(k), v, &child_path(path, k))?)))
        .collect()
}

pub(crate) fn expected_map(path: &str, found: &Value) -> PosterError {
    PosterError::validation(format!("{path}: expected a map, got {}", kind_of(found)))
}

pub(crate) fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/load/template.rs"]
mod tests;
