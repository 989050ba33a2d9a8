use serde_json::Value;

/// A point whose axes may be left unset (`None`).
///
/// Plain coordinates fold unset axes to `0.0`; alignment factors keep them unset so the
/// resolver can pass the element's own coordinate through.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PartialPoint {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl PartialPoint {
    pub fn or_zero(self) -> kurbo::Point {
        kurbo::Point::new(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }
}

/// Coerce a loosely typed config value into a point.
///
/// Accepted forms: `"x,y"` strings, `[x, y]` lists and `{x, y}` maps. `x_key`/`y_key` name
/// additional map keys that are tried when `x`/`y` are absent (alignment uses
/// `x_align`/`y_align`).
pub fn parse_point_with_keys(value: &Value, x_key: &str, y_key: &str) -> Result<PartialPoint, String> {
    match value {
        Value::String(s) => {
            let parts: Vec<&str> = s.split(',').collect();
            if parts.len() != 2 {
                return Err(format!("point string must be in 'x,y' format, got \"{s}\""));
            }
            Ok(PartialPoint {
                x: parse_axis_str(parts[0])?,
                y: parse_axis_str(parts[1])?,
            })
        }
        Value::Array(items) => {
            if items.len() != 2 {
                return Err(format!(
                    "point list must contain exactly 2 elements, got {}",
                    items.len()
                ));
            }
            Ok(PartialPoint {
                x: parse_axis(&items[0])?,
                y: parse_axis(&items[1])?,
            })
        }
        Value::Object(map) => {
            let x = map.get("x").or_else(|| map.get(x_key));
            let y = map.get("y").or_else(|| map.get(y_key));
            Ok(PartialPoint {
                x: x.map(parse_axis).transpose()?.flatten(),
                y: y.map(parse_axis).transpose()?.flatten(),
            })
        }
        other => Err(format!("unsupported point value {other}")),
    }
}

pub fn parse_point(value: &Value) -> Result<PartialPoint, String> {
    parse_point_with_keys(value, "x", "y")
}

/// Coerce one coordinate. `null` is unset.
pub fn parse_axis(value: &Value) -> Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("invalid coordinate {n}")),
        Value::String(s) => parse_axis_str(s),
        other => Err(format!("invalid coordinate {other}")),
    }
}

fn parse_axis_str(s: &str) -> Result<Option<f64>, String> {
    let token = s.trim().to_ascii_lowercase();
    if let Some(v) = symbolic_axis(&token) {
        return Ok(Some(v));
    }
    if let Some(pct) = token.strip_suffix('%') {
        return pct
            .trim()
            .parse::<f64>()
            .map(|p| Some(p / 100.0))
            .map_err(|_| format!("invalid percentage \"{s}\""));
    }
    token
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("invalid coordinate \"{s}\""))
}

/// Named positions along an axis.
pub fn symbolic_axis(token: &str) -> Option<f64> {
    match token {
        "left" | "top" => Some(0.0),
        "center" | "middle" => Some(0.5),
        "right" | "bottom" => Some(1.0),
        _ => None,
    }
}
