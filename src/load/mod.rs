//! Declarative poster documents: reading, variable substitution, normalization and the build
//! into a resolved [`Canvas`].

pub mod document;
pub mod source;
pub mod template;

use std::path::{Path, PathBuf};

use kurbo::Vec2;
use serde_json::Value;

use crate::canvas::Canvas;
use crate::context::PosterContext;
use crate::element::Drawable as _;
use crate::foundation::error::PosterResult;
use crate::registry::BuildContext;
use crate::value::Params;

pub use document::{ElementSpec, LayerSpec, PosterSpec, SCHEMA_VERSION, check_schema, parse_spec};
pub use source::{DocumentFormat, parse_document, read_document, read_variables};
pub use template::Variables;

/// Builds canvases from documents against one [`PosterContext`].
#[derive(Clone, Copy, Debug)]
pub struct Loader<'a> {
    ctx: &'a PosterContext,
}

impl<'a> Loader<'a> {
    pub fn new(ctx: &'a PosterContext) -> Self {
        Self { ctx }
    }

    /// Parse and build an in-memory document.
    #[tracing::instrument(skip_all)]
    pub fn load(&self, doc: &Value, vars: &Variables) -> PosterResult<Canvas> {
        let spec = self.parse(doc, vars)?;
        self.build(spec)
    }

    /// Read a JSON or YAML document and build it. Relative asset paths resolve against the
    /// document's directory unless the context sets an assets root.
    #[tracing::instrument(skip(self, vars), fields(path = %path.as_ref().display()))]
    pub fn load_path(&self, path: impl AsRef<Path>, vars: &Variables) -> PosterResult<Canvas> {
        let path = path.as_ref();
        let doc = read_document(path)?;
        let spec = self.parse(&doc, vars)?;
        let root = match self.ctx.assets_root() {
            Some(root) => Some(root.to_path_buf()),
            None => path.parent().map(PathBuf::from),
        };
        self.build_in(spec, root.as_deref())
    }

    pub fn parse(&self, doc: &Value, vars: &Variables) -> PosterResult<PosterSpec> {
        parse_spec(doc, vars)
    }

    /// Build every element, apply its operations, register it, then resolve positions.
    pub fn build(&self, spec: PosterSpec) -> PosterResult<Canvas> {
        self.build_in(spec, self.ctx.assets_root())
    }

    fn build_in(&self, spec: PosterSpec, assets_root: Option<&Path>) -> PosterResult<Canvas> {
        let registry = self.ctx.registry();
        let mut canvas = Canvas::new(spec.settings);
        for (name, point) in spec.anchors {
            canvas.set_anchor(&name, point);
        }

        for layer in spec.layers {
            canvas.add_layer(&layer.name, layer.settings);
            for element in layer.elements {
                let values_path = element.values_path();
                let params = Params::new(&element.values, &values_path);
                let ctx = BuildContext {
                    element: &element.id,
                    fonts: self.ctx.fonts(),
                    assets_root,
                };
                let mut built = registry.elements.create(&element.kind, &params, &ctx)?;
                let (x0, y0) = built.position();
                for op in &element.operations {
                    registry.operations.apply(&mut built, op, &ctx)?;
                }
                // Moves made by operations ride on the position spec so resolution keeps them.
                let (x1, y1) = built.position();
                built.set_position(x0, y0);
                let moved = Vec2::new(f64::from(x1) - f64::from(x0), f64::from(y1) - f64::from(y0));
                tracing::debug!(
                    element = element.id.as_str(),
                    kind = element.kind.as_str(),
                    layer = layer.name.as_str(),
                    operations = element.operations.len(),
                    "built element"
                );
                canvas.add_element(&element.id, built, &layer.name, &element.groups)?;
                canvas.attach_position(&element.id, element.position.shifted(moved))?;
            }
        }

        canvas.resolve_positions()?;
        Ok(canvas)
    }
}
