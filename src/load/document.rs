use kurbo::{Point, Vec2};
use serde_json::{Map, Value};

use crate::canvas::{CanvasSettings, DEFAULT_HEIGHT, DEFAULT_WIDTH, LayerSettings};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};
use crate::layout::PositionSpec;
use crate::load::template::{
    Variables, child_path, expected_map, kind_of, normalize, normalize_map, substitute,
};
use crate::registry::OperationSpec;
use crate::value::{ParamValue, Params, parse_point, parse_point_with_keys};

/// The only document schema this crate reads.
pub const SCHEMA_VERSION: &str = "1.0";

static NULL: Value = Value::Null;

const TOP_LEVEL_KEYS: &[&str] = &["schema", "settings", "anchors", "layers"];
const ELEMENT_KEYS: &[&str] = &[
    "type",
    "groups",
    "values",
    "operations",
    "position",
    "rel_position",
];

/// A parsed but unbuilt poster description. Variables are already substituted and values
/// normalized.
#[derive(Clone, Debug, PartialEq)]
pub struct PosterSpec {
    pub settings: CanvasSettings,
    pub anchors: Vec<(String, Point)>,
    pub layers: Vec<LayerSpec>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    pub name: String,
    pub settings: LayerSettings,
    pub elements: Vec<ElementSpec>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElementSpec {
    pub id: String,
    pub kind: String,
    pub groups: Vec<String>,
    pub values: crate::value::ParamMap,
    /// In declaration order.
    pub operations: Vec<OperationSpec>,
    pub position: PositionSpec,
    /// Dotted path of the element in the document, e.g. `layers.main.elements.title`.
    pub path: String,
}

impl ElementSpec {
    pub fn values_path(&self) -> String {
        child_path(&self.path, "values")
    }
}

/// Reject any schema other than [`SCHEMA_VERSION`]. A missing schema is accepted.
pub fn check_schema(doc: &Value) -> PosterResult<()> {
    let found = match doc.get("schema") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::String(s)) if s.trim() == SCHEMA_VERSION => return Ok(()),
        Some(Value::Number(n)) if n.as_f64() == SCHEMA_VERSION.parse::<f64>().ok() => {
            return Ok(());
        }
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    Err(PosterError::UnsupportedSchema {
        found,
        supported: SCHEMA_VERSION,
    })
}

fn as_object<'v>(value: &'v Value, path: &str) -> PosterResult<Option<&'v Map<String, Value>>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(m) => Ok(Some(m)),
        other => Err(expected_map(path, other)),
    }
}

/// Turn a raw document into a [`PosterSpec`].
pub fn parse_spec(doc: &Value, vars: &Variables) -> PosterResult<PosterSpec> {
    check_schema(doc)?;
    let Some(root) = as_object(doc, "document")? else {
        return Err(PosterError::validation("document is empty"));
    };
    for key in root.keys().filter(|k| !TOP_LEVEL_KEYS.contains(&k.as_str())) {
        tracing::warn!(key = key.as_str(), "ignoring unknown top-level key");
    }

    let settings = parse_settings(root.get("settings").unwrap_or(&NULL), vars)?;

    let mut anchors = Vec::new();
    if let Some(map) = as_object(root.get("anchors").unwrap_or(&NULL), "anchors")? {
        for (name, raw) in map {
            let path = child_path("anchors", name);
            let value = substitute(raw, vars, &path)?;
            let point = parse_point(&value).map_err(|e| PosterError::invalid_point(&path, e))?;
            anchors.push((name.clone(), point.or_zero()));
        }
    }

    let mut layers = Vec::new();
    if let Some(map) = as_object(root.get("layers").unwrap_or(&NULL), "layers")? {
        for (name, raw) in map {
            layers.push(parse_layer(name, raw, vars)?);
        }
    }

    tracing::debug!(
        width = settings.width,
        height = settings.height,
        anchors = anchors.len(),
        layers = layers.len(),
        "parsed poster document"
    );
    Ok(PosterSpec {
        settings,
        anchors,
        layers,
    })
}

fn parse_settings(raw: &Value, vars: &Variables) -> PosterResult<CanvasSettings> {
    let values = normalize_map(raw, vars, "settings")?;
    let params = Params::new(&values, "settings");
    params.expect_keys(&["width", "height", "background"])?;
    Ok(CanvasSettings {
        width: params.dimension("width")?.unwrap_or(DEFAULT_WIDTH),
        height: params.dimension("height")?.unwrap_or(DEFAULT_HEIGHT),
        background: params.color("background")?.unwrap_or(Rgba8::WHITE),
    })
}

fn parse_layer(name: &str, raw: &Value, vars: &Variables) -> PosterResult<LayerSpec> {
    let path = child_path("layers", name);
    let body = as_object(raw, &path)?;
    let get = |key: &str| body.and_then(|b| b.get(key)).unwrap_or(&NULL);

    let settings_path = child_path(&path, "settings");
    let settings = normalize_map(get("settings"), vars, &settings_path)?;
    let params = Params::new(&settings, &settings_path);
    params.expect_keys(&["opacity"])?;
    let opacity = params.number("opacity")?.unwrap_or(1.0);

    let mut elements = Vec::new();
    let elements_path = child_path(&path, "elements");
    if let Some(map) = as_object(get("elements"), &elements_path)? {
        for (id, raw) in map {
            elements.push(parse_element(id, raw, vars, &child_path(&elements_path, id))?);
        }
    }

    Ok(LayerSpec {
        name: name.to_owned(),
        settings: LayerSettings::with_opacity(opacity as f32),
        elements,
    })
}

fn parse_element(id: &str, raw: &Value, vars: &Variables, path: &str) -> PosterResult<ElementSpec> {
    let Some(body) = as_object(raw, path)? else {
        return Err(PosterError::validation(format!("{path}: element body is empty")));
    };
    if let Some(k) = body.keys().find(|k| !ELEMENT_KEYS.contains(&k.as_str())) {
        return Err(PosterError::validation(format!(
            "{}: unknown field (expected one of: {})",
            child_path(path, k),
            ELEMENT_KEYS.join(", ")
        )));
    }
    let get = |key: &str| body.get(key).unwrap_or(&NULL);

    let type_path = child_path(path, "type");
    let kind = match substitute(get("type"), vars, &type_path)? {
        Value::String(s) if !s.trim().is_empty() => s,
        Value::Null => {
            return Err(PosterError::validation(format!("{type_path}: missing element type")));
        }
        other => {
            return Err(PosterError::validation(format!(
                "{type_path}: expected a string, got {}",
                kind_of(&other)
            )));
        }
    };

    let groups = parse_groups(get("groups"), vars, &child_path(path, "groups"))?;
    let values = normalize_map(get("values"), vars, &child_path(path, "values"))?;

    let mut operations = Vec::new();
    let ops_path = child_path(path, "operations");
    if let Some(map) = as_object(get("operations"), &ops_path)? {
        for (name, params) in map {
            let op_path = child_path(&ops_path, name);
            let params = normalize_map(params, vars, &op_path)?;
            operations.push(OperationSpec::new(name.clone(), params).with_path(op_path));
        }
    }

    let position = if !get("position").is_null() {
        let pos_path = child_path(path, "position");
        match normalize(Some("position"), get("position"), vars, &pos_path)? {
            ParamValue::Point(p) => PositionSpec::Absolute(p),
            _ => PositionSpec::default(),
        }
    } else if !get("rel_position").is_null() {
        parse_rel_position(get("rel_position"), vars, &child_path(path, "rel_position"))?
    } else {
        PositionSpec::default()
    };

    Ok(ElementSpec {
        id: id.to_owned(),
        kind,
        groups,
        values,
        operations,
        position,
        path: path.to_owned(),
    })
}

fn parse_groups(raw: &Value, vars: &Variables, path: &str) -> PosterResult<Vec<String>> {
    match substitute(raw, vars, path)? {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s),
                other => Err(PosterError::validation(format!(
                    "{path}.{i}: expected a group name, got {}",
                    kind_of(&other)
                ))),
            })
            .collect(),
        other => Err(PosterError::validation(format!(
            "{path}: expected a list of group names, got {}",
            kind_of(&other)
        ))),
    }
}

fn parse_rel_position(raw: &Value, vars: &Variables, path: &str) -> PosterResult<PositionSpec> {
    let Value::Object(rel) = substitute(raw, vars, path)? else {
        return Err(expected_map(path, raw));
    };
    let field = |key: &str| rel.get(key).filter(|v| !v.is_null());
    let string_field = |key: &str| -> PosterResult<Option<String>> {
        match field(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(PosterError::validation(format!(
                "{}: expected a string, got {}",
                child_path(path, key),
                kind_of(other)
            ))),
        }
    };

    let offset = match field("offset") {
        None => Vec2::ZERO,
        Some(v) => parse_point(v)
            .map(|p| p.or_zero().to_vec2())
            .map_err(|e| PosterError::invalid_point(child_path(path, "offset"), e))?,
    };
    let parent = string_field("parent")?;
    let value_key = if rel.contains_key("value") { "value" } else { "id" };
    let value_path = child_path(path, value_key);

    let source = string_field("source")?.ok_or_else(|| {
        PosterError::validation(format!("{}: missing position source", child_path(path, "source")))
    })?;
    match source.as_str() {
        "anchor" | "element" => {
            let target = string_field(value_key)?.ok_or_else(|| {
                PosterError::validation(format!("{value_path}: missing {source} name"))
            })?;
            Ok(if source == "anchor" {
                PositionSpec::AnchorRef {
                    anchor: target,
                    offset,
                }
            } else {
                PositionSpec::ElementRef { target, offset }
            })
        }
        "alignment" => {
            let align = match field(value_key) {
                Some(v @ (Value::String(_) | Value::Array(_) | Value::Object(_))) => {
                    parse_point_with_keys(v, "x_align", "y_align")
                        .map_err(|e| PosterError::invalid_alignment(&value_path, e))?
                }
                Some(other) => {
                    return Err(PosterError::invalid_alignment(
                        &value_path,
                        format!("expected a point, got {}", kind_of(other)),
                    ));
                }
                None => {
                    return Err(PosterError::invalid_alignment(
                        &value_path,
                        "missing alignment value",
                    ));
                }
            };
            Ok(PositionSpec::Alignment {
                align,
                parent,
                offset,
            })
        }
        other => Err(PosterError::validation(format!(
            "{}: unsupported position source '{other}' (expected anchor, element or alignment)",
            child_path(path, "source")
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/load/document.rs"]
mod tests;
