use std::path::{Path, PathBuf};

use crate::registry::Registry;
use crate::text::FontBook;

/// Everything a load needs besides the document itself.
///
/// Built once per job and handed to the [`crate::load::Loader`] by reference; nothing in the
/// crate keeps global registries.
#[derive(Clone, Debug)]
pub struct PosterContext {
    registry: Registry,
    fonts: FontBook,
    assets_root: Option<PathBuf>,
}

impl Default for PosterContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PosterContext {
    /// Built-in element types and operations, no fonts, no assets root.
    pub fn new() -> Self {
        Self {
            registry: Registry::with_builtins(),
            fonts: FontBook::new(),
            assets_root: None,
        }
    }

    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn with_assets_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets_root = Some(root.into());
        self
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn assets_root(&self) -> Option<&Path> {
        self.assets_root.as_deref()
    }
}
