use std::path::Path;

use serde_json::Value;

use crate::foundation::error::{PosterError, PosterResult};
use crate::load::template::{Variables, kind_of};

/// On-disk document syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.json` is JSON; everything else is read as YAML, which also accepts JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

pub fn parse_document(text: &str, format: DocumentFormat) -> PosterResult<Value> {
    match format {
        DocumentFormat::Json => serde_json::from_str(text)
            .map_err(|e| PosterError::validation(format!("invalid JSON document: {e}"))),
        DocumentFormat::Yaml => serde_yaml::from_str::<Value>(text)
            .map_err(|e| PosterError::validation(format!("invalid YAML document: {e}"))),
    }
}

pub fn read_document(path: &Path) -> PosterResult<Value> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| PosterError::asset(format!("read document '{}': {e}", path.display())))?;
    parse_document(&text, DocumentFormat::from_path(path))
}

/// Read a flat `name: value` variables file (JSON or YAML).
pub fn read_variables(path: &Path) -> PosterResult<Variables> {
    match read_document(path)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Null => Ok(Variables::new()),
        other => Err(PosterError::validation(format!(
            "variables file '{}' must be a map, got {}",
            path.display(),
            kind_of(&other)
        ))),
    }
}
