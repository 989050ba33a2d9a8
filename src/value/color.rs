use serde_json::Value;

use crate::foundation::core::Rgba8;

/// Coerce a loosely typed config value into a straight RGBA8 color.
///
/// Accepted forms: hex strings (`#rgb`, `#rrggbb`, `#rrggbbaa`, the `#` is optional), numeric
/// lists of 3 or 4 channels, and `{r,g,b[,a]}` / `{red,green,blue[,alpha]}` maps. Channels are
/// 0..=255; a missing alpha is opaque.
pub fn parse_color(value: &Value) -> Result<Rgba8, String> {
    match value {
        Value::String(s) => parse_hex(s),
        Value::Array(items) => match items.len() {
            3 | 4 => {
                let mut px = [255u8; 4];
                for (i, item) in items.iter().enumerate() {
                    px[i] = channel(item).map_err(|e| format!("channel {i}: {e}"))?;
                }
                Ok(Rgba8::from_array(px))
            }
            n => Err(format!(
                "color list must have 3 ([r,g,b]) or 4 ([r,g,b,a]) channels, got {n}"
            )),
        },
        Value::Object(map) => {
            let pick = |short: &str, long: &str| map.get(short).or_else(|| map.get(long));
            let (Some(r), Some(g), Some(b)) = (
                pick("r", "red"),
                pick("g", "green"),
                pick("b", "blue"),
            ) else {
                return Err("color map needs r/g/b (or red/green/blue) keys".to_owned());
            };
            let a = match pick("a", "alpha") {
                Some(a) => channel(a).map_err(|e| format!("alpha: {e}"))?,
                None => 255,
            };
            Ok(Rgba8::rgba(
                channel(r).map_err(|e| format!("red: {e}"))?,
                channel(g).map_err(|e| format!("green: {e}"))?,
                channel(b).map_err(|e| format!("blue: {e}"))?,
                a,
            ))
        }
        other => Err(format!("unsupported color value {other}")),
    }
}

pub(crate) fn parse_hex(s: &str) -> Result<Rgba8, String> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() {
        return Err(format!("invalid hex color \"{s}\""));
    }

    let byte = |pair: &str| {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex color \"{s}\""))
    };

    match hex.len() {
        3 => {
            let mut px = [255u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let doubled: String = [c, c].iter().collect();
                px[i] = byte(&doubled)?;
            }
            Ok(Rgba8::from_array(px))
        }
        6 => Ok(Rgba8::rgb(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
        )),
        8 => Ok(Rgba8::rgba(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        )),
        _ => Err(format!(
            "hex color must be #rgb, #rrggbb or #rrggbbaa, got \"{s}\""
        )),
    }
}

fn channel(v: &Value) -> Result<u8, String> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| format!("expected a number, got {v}"))?;

    if !n.is_finite() || !(0.0..=255.0).contains(&n) {
        return Err(format!("{n} is outside 0..=255"));
    }
    Ok(n.round() as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/value/color.rs"]
mod tests;
