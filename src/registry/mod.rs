//! Named element builders and named element operations.

pub mod elements;
pub mod operations;

use std::path::{Path, PathBuf};

use crate::text::FontBook;

pub use elements::{ElementBuilder, ElementFactory};
pub use operations::{OperationFn, OperationRegistry, OperationSpec};

/// Resources available to element builders and operations.
#[derive(Clone, Copy, Debug)]
pub struct BuildContext<'a> {
    /// Id of the element being built or operated on.
    pub element: &'a str,
    pub fonts: &'a FontBook,
    pub assets_root: Option<&'a Path>,
}

pub type OperationContext<'a> = BuildContext<'a>;

impl BuildContext<'_> {
    /// Relative asset paths are taken from the assets root when one is set.
    pub fn resolve_asset(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        match self.assets_root {
            Some(root) if p.is_relative() => root.join(p),
            _ => p.to_path_buf(),
        }
    }
}

/// Element factory plus operation table.
#[derive(Clone, Default)]
pub struct Registry {
    pub elements: ElementFactory,
    pub operations: OperationRegistry,
}

impl Registry {
    pub fn with_builtins() -> Self {
        Self {
            elements: ElementFactory::with_builtins(),
            operations: OperationRegistry::with_builtins(),
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("elements", &self.elements.registered_types())
            .field("operations", &self.operations.registered_names())
            .finish()
    }
}
