use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::foundation::error::{PosterError, PosterResult};

const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "ttc", "otc"];

/// One registered font file. Bytes registered by path are read on first use.
pub struct FontFace {
    family: String,
    path: Option<PathBuf>,
    data: OnceLock<Arc<Vec<u8>>>,
}

impl FontFace {
    pub fn from_bytes(family: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            family: family.into(),
            path: None,
            data: OnceLock::from(Arc::new(bytes)),
        }
    }

    pub fn from_path(family: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            family: family.into(),
            path: Some(path.into()),
            data: OnceLock::new(),
        }
    }

    /// Family name as registered (original case).
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn bytes(&self) -> PosterResult<Arc<Vec<u8>>> {
        if let Some(b) = self.data.get() {
            return Ok(b.clone());
        }
        let Some(path) = &self.path else {
            return Err(PosterError::asset(format!(
                "font '{}' has no data",
                self.family
            )));
        };
        let bytes = std::fs::read(path).map_err(|e| {
            PosterError::asset(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Ok(self.data.get_or_init(|| Arc::new(bytes)).clone())
    }
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("path", &self.path)
            .field("loaded", &self.data.get().is_some())
            .finish()
    }
}

/// Family-name keyed font registry with aliases and a default family.
///
/// Lookups are case-insensitive. An unknown family resolves to the default face (with a
/// warning); without a default it resolves to nothing and text using it is not drawable.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: BTreeMap<String, Arc<FontFace>>,
    default_family: Option<String>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, face: Arc<FontFace>, aliases: &[&str]) {
        let family = face.family().to_lowercase();
        if self.default_family.is_none() {
            self.default_family = Some(family.clone());
        }
        for alias in aliases {
            self.faces.insert(alias.to_lowercase(), face.clone());
        }
        self.faces.insert(family, face);
    }

    /// Register font bytes under `family` and every alias. The first registered family becomes
    /// the default until [`FontBook::set_default`] says otherwise.
    pub fn register_bytes(&mut self, family: &str, bytes: Vec<u8>, aliases: &[&str]) {
        self.insert(Arc::new(FontFace::from_bytes(family, bytes)), aliases);
    }

    /// Register a font file. The file is read immediately so a bad path fails here.
    pub fn register_file(
        &mut self,
        family: &str,
        path: impl AsRef<Path>,
        aliases: &[&str],
    ) -> PosterResult<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            PosterError::asset(format!("failed to read font '{}': {e}", path.display()))
        })?;
        let face = FontFace {
            family: family.to_owned(),
            path: Some(path.to_path_buf()),
            data: OnceLock::from(Arc::new(bytes)),
        };
        self.insert(Arc::new(face), aliases);
        Ok(())
    }

    /// Recursively register every font file under `dir`, family named after the file stem.
    /// Returns the number of files registered.
    pub fn register_dir(&mut self, dir: impl AsRef<Path>) -> PosterResult<usize> {
        let dir = dir.as_ref();
        let mut stack = vec![dir.to_path_buf()];
        let mut count = 0;
        while let Some(d) = stack.pop() {
            let entries = std::fs::read_dir(&d).map_err(|e| {
                PosterError::asset(format!("failed to read font dir '{}': {e}", d.display()))
            })?;
            let mut paths: Vec<PathBuf> = entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .collect();
            paths.sort();
            for p in paths {
                if p.is_dir() {
                    stack.push(p);
                    continue;
                }
                let is_font = p
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
                let Some(stem) = p.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if is_font {
                    let face = Arc::new(FontFace::from_path(stem, &p));
                    self.insert(face, &[]);
                    count += 1;
                }
            }
        }
        tracing::debug!(dir = %dir.display(), count, "registered font directory");
        Ok(count)
    }

    /// Make `family` the fallback for unknown names.
    pub fn set_default(&mut self, family: &str) -> PosterResult<()> {
        let key = family.to_lowercase();
        if !self.faces.contains_key(&key) {
            return Err(PosterError::validation(format!(
                "cannot use unregistered font family '{family}' as default"
            )));
        }
        self.default_family = Some(key);
        Ok(())
    }

    pub fn default_face(&self) -> Option<Arc<FontFace>> {
        self.default_face_ref().cloned()
    }

    pub fn default_family(&self) -> Option<&str> {
        self.default_face_ref().map(|f| f.family())
    }

    fn default_face_ref(&self) -> Option<&Arc<FontFace>> {
        self.default_family.as_ref().and_then(|k| self.faces.get(k))
    }

    pub fn contains(&self, family: &str) -> bool {
        self.faces.contains_key(&family.to_lowercase())
    }

    /// Face for `family`, falling back to the default.
    pub fn resolve(&self, family: &str) -> Option<Arc<FontFace>> {
        if let Some(face) = self.faces.get(&family.to_lowercase()) {
            return Some(face.clone());
        }
        let fallback = self.default_face();
        match &fallback {
            Some(face) => tracing::warn!(
                family,
                fallback = face.family(),
                "font family not found, using default font"
            ),
            None => tracing::warn!(family, "font family not found and no default font registered"),
        }
        fallback
    }

    /// Registered names (lowercase, aliases included).
    pub fn families(&self) -> Vec<&str> {
        self.faces.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
