use std::collections::BTreeMap;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{PosterError, PosterResult};

/// A config value after variable substitution and field-semantic normalization.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<ParamValue>),
    Map(ParamMap),
    Color(Rgba8),
    Point(Point),
}

pub type ParamMap = BTreeMap<String, ParamValue>;

/// Largest pixel dimension accepted from a document.
pub const MAX_DIMENSION: u32 = 16_384;

impl ParamValue {
    /// Plain conversion without any key-aware coercion.
    pub fn from_json(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::Str(s.clone()),
            serde_json::Value::Array(items) => {
                Self::List(items.iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numbers, and strings that parse as numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgba8> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Color(_) => "color",
            Self::Point(_) => "point",
        }
    }
}

/// Typed, path-aware view over a [`ParamMap`].
///
/// Every accessor treats a missing key and an explicit `null` alike. Errors name the full field
/// path, e.g. `layers.main.elements.title.values.font_size`.
#[derive(Clone, Copy, Debug)]
pub struct Params<'a> {
    map: &'a ParamMap,
    path: &'a str,
}

impl<'a> Params<'a> {
    pub fn new(map: &'a ParamMap, path: &'a str) -> Self {
        Self { map, path }
    }

    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn field_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_owned()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a ParamValue> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// First present key among `keys` (aliases).
    pub fn get_any(&self, keys: &[&str]) -> Option<(&'a ParamValue, String)> {
        keys.iter()
            .find_map(|k| self.get(k).map(|v| (v, self.field_path(k))))
    }

    pub fn number(&self, key: &str) -> PosterResult<Option<f64>> {
        self.get(key)
            .map(|v| {
                v.as_f64().ok_or_else(|| {
                    PosterError::validation(format!(
                        "{}: expected a number, got {}",
                        self.field_path(key),
                        v.type_name()
                    ))
                })
            })
            .transpose()
    }

    pub fn required_number(&self, key: &str) -> PosterResult<f64> {
        self.number(key)?.ok_or_else(|| {
            PosterError::validation(format!("{}: missing required number", self.field_path(key)))
        })
    }

    /// Non-negative integer pixel dimension, at most [`MAX_DIMENSION`].
    pub fn dimension(&self, key: &str) -> PosterResult<Option<u32>> {
        self.number(key)?
            .map(|n| {
                if n.is_finite() && n >= 0.0 && n.round() <= f64::from(MAX_DIMENSION) {
                    Ok(n.round() as u32)
                } else {
                    Err(PosterError::validation(format!(
                        "{}: expected a size between 0 and {MAX_DIMENSION}, got {n}",
                        self.field_path(key)
                    )))
                }
            })
            .transpose()
    }

    pub fn string(&self, key: &str) -> PosterResult<Option<&'a str>> {
        self.string_any(&[key])
    }

    /// Like [`Params::string`] but numbers are rendered to text, since variables often bind
    /// numeric values into text content.
    pub fn text(&self, keys: &[&str]) -> PosterResult<Option<String>> {
        let Some((v, path)) = self.get_any(keys) else {
            return Ok(None);
        };
        match v {
            ParamValue::Str(s) => Ok(Some(s.clone())),
            ParamValue::Number(n) => Ok(Some(format_number(*n))),
            ParamValue::Bool(b) => Ok(Some(b.to_string())),
            other => Err(PosterError::validation(format!(
                "{path}: expected text, got {}",
                other.type_name()
            ))),
        }
    }

    pub fn string_any(&self, keys: &[&str]) -> PosterResult<Option<&'a str>> {
        let Some((v, path)) = self.get_any(keys) else {
            return Ok(None);
        };
        v.as_str().map(Some).ok_or_else(|| {
            PosterError::validation(format!("{path}: expected a string, got {}", v.type_name()))
        })
    }

    pub fn color_any(&self, keys: &[&str]) -> PosterResult<Option<Rgba8>> {
        let Some((v, path)) = self.get_any(keys) else {
            return Ok(None);
        };
        match v {
            ParamValue::Color(c) => Ok(Some(*c)),
            // Operation params are not key-normalized as colors unless named like one.
            ParamValue::Str(s) => crate::value::color::parse_hex(s)
                .map(Some)
                .map_err(|e| PosterError::invalid_color(path, e)),
            other => Err(PosterError::invalid_color(
                path,
                format!("expected a color, got {}", other.type_name()),
            )),
        }
    }

    pub fn color(&self, key: &str) -> PosterResult<Option<Rgba8>> {
        self.color_any(&[key])
    }

    /// Reject keys outside `allowed`.
    pub fn expect_keys(&self, allowed: &[&str]) -> PosterResult<()> {
        match self.map.keys().find(|k| !allowed.contains(&k.as_str())) {
            Some(k) => Err(PosterError::validation(format!(
                "{}: unknown field (expected one of: {})",
                self.field_path(k),
                allowed.join(", ")
            ))),
            None => Ok(()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
