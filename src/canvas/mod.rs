//! The canvas registry: elements, layers, groups, anchors and attached position specs.

pub mod query;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use kurbo::{Point, Vec2};

use crate::context::PosterContext;
use crate::element::{Drawable, Element};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};
use crate::layout::PositionSpec;
use crate::registry::{BuildContext, OperationSpec};
use crate::render::Surface;

pub use query::ElementQuery;

pub const DEFAULT_WIDTH: u32 = 1080;
pub const DEFAULT_HEIGHT: u32 = 1350;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    pub background: Rgba8,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: Rgba8::WHITE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerSettings {
    /// Alpha cap in `[0, 1]` applied to everything drawn on the layer.
    pub opacity: f32,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self { opacity: 1.0 }
    }
}

impl LayerSettings {
    pub fn with_opacity(opacity: f32) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

/// Ordered list of element ids drawn with shared settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub name: String,
    pub settings: LayerSettings,
    pub elements: Vec<String>,
}

/// Owner of every element of a poster.
///
/// Every id referenced by a layer or a group exists exactly once in the element map.
#[derive(Clone, Debug)]
pub struct Canvas {
    settings: CanvasSettings,
    elements: HashMap<String, Element>,
    order: Vec<String>,
    layers: Vec<Layer>,
    groups: BTreeMap<String, BTreeSet<String>>,
    anchors: BTreeMap<String, Point>,
    pending: HashMap<String, PositionSpec>,
    backing: Surface,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasSettings::default())
    }
}

impl Canvas {
    pub fn new(settings: CanvasSettings) -> Self {
        Self {
            settings,
            elements: HashMap::new(),
            order: Vec::new(),
            layers: Vec::new(),
            groups: BTreeMap::new(),
            anchors: BTreeMap::new(),
            pending: HashMap::new(),
            backing: Surface::new(settings.width, settings.height, settings.background),
        }
    }

    pub fn settings(&self) -> CanvasSettings {
        self.settings
    }

    pub fn width(&self) -> u32 {
        self.settings.width
    }

    pub fn height(&self) -> u32 {
        self.settings.height
    }

    pub fn background(&self) -> Rgba8 {
        self.settings.background
    }

    /// Background surface every render starts from.
    pub fn backing(&self) -> &Surface {
        &self.backing
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    /// Ids in insertion order.
    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn get_element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// Append a layer, or update the settings of an existing one in place.
    pub fn add_layer(&mut self, name: &str, settings: LayerSettings) {
        match self.layers.iter_mut().find(|l| l.name == name) {
            Some(layer) => layer.settings = settings,
            None => self.layers.push(Layer {
                name: name.to_owned(),
                settings,
                elements: Vec::new(),
            }),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn groups(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(name)
    }

    /// Register `element` under `id` on `layer` (created with default settings when absent)
    /// and in every named group.
    pub fn add_element<I>(
        &mut self,
        id: &str,
        element: Element,
        layer: &str,
        groups: I,
    ) -> PosterResult<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if self.elements.contains_key(id) {
            return Err(PosterError::DuplicateIdentifier(id.to_owned()));
        }
        self.elements.insert(id.to_owned(), element);
        self.order.push(id.to_owned());

        if self.layer(layer).is_none() {
            self.add_layer(layer, LayerSettings::default());
        }
        if let Some(l) = self.layers.iter_mut().find(|l| l.name == layer) {
            l.elements.push(id.to_owned());
        }
        for g in groups {
            self.groups
                .entry(g.as_ref().to_owned())
                .or_default()
                .insert(id.to_owned());
        }
        tracing::debug!(element = id, layer, "registered element");
        Ok(())
    }

    /// Remove elements everywhere they are referenced. Unknown ids are ignored.
    pub fn remove_elements<I>(&mut self, ids: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let doomed: HashSet<String> = ids
            .into_iter()
            .map(|id| id.as_ref().to_owned())
            .filter(|id| self.elements.contains_key(id))
            .collect();
        if doomed.is_empty() {
            return;
        }
        for id in &doomed {
            self.elements.remove(id);
            self.pending.remove(id);
        }
        self.order.retain(|id| !doomed.contains(id));
        for layer in &mut self.layers {
            layer.elements.retain(|id| !doomed.contains(id));
        }
        for members in self.groups.values_mut() {
            members.retain(|id| !doomed.contains(id));
        }
    }

    /// Remove a layer and every element on it.
    pub fn clear_layer(&mut self, name: &str) {
        let Some(layer) = self.layer(name) else {
            return;
        };
        let ids = layer.elements.clone();
        self.remove_elements(ids);
        self.layers.retain(|l| l.name != name);
    }

    /// Remove a group and every element in it.
    pub fn clear_group(&mut self, name: &str) {
        let Some(members) = self.groups.get(name) else {
            return;
        };
        let ids: Vec<String> = members.iter().cloned().collect();
        self.remove_elements(ids);
        self.groups.remove(name);
    }

    fn matching_ids(&self, query: &ElementQuery) -> Vec<&str> {
        if query.is_unfiltered() {
            return self.element_ids().collect();
        }

        let mut sets: Vec<HashSet<&str>> = Vec::new();
        if let Some(ids) = &query.identifiers {
            sets.push(ids.iter().map(String::as_str).collect());
        }
        if let Some(groups) = &query.groups {
            sets.push(
                groups
                    .iter()
                    .filter_map(|g| self.groups.get(g))
                    .flatten()
                    .map(String::as_str)
                    .collect(),
            );
        }
        if let Some(layers) = &query.layers {
            sets.push(
                layers
                    .iter()
                    .filter_map(|name| self.layer(name))
                    .flat_map(|l| l.elements.iter())
                    .map(String::as_str)
                    .collect(),
            );
        }

        let selected = |id: &str| {
            if query.require_all {
                sets.iter().all(|s| s.contains(id))
            } else {
                sets.iter().any(|s| s.contains(id))
            }
        };
        self.element_ids().filter(|id| selected(*id)).collect()
    }

    /// Elements matching `query`, in insertion order.
    pub fn get_elements(&self, query: &ElementQuery) -> Vec<(&str, &Element)> {
        self.matching_ids(query)
            .into_iter()
            .filter_map(|id| self.elements.get(id).map(|e| (id, e)))
            .collect()
    }

    pub fn first_element(&self, query: &ElementQuery) -> Option<(&str, &Element)> {
        self.get_elements(query).into_iter().next()
    }

    pub fn anchors(&self) -> &BTreeMap<String, Point> {
        &self.anchors
    }

    pub fn anchor(&self, name: &str) -> Option<Point> {
        self.anchors.get(name).copied()
    }

    pub fn set_anchor(&mut self, name: &str, point: Point) {
        self.anchors.insert(name.to_owned(), point);
    }

    /// Attach an unresolved position to a registered element, replacing any earlier one.
    pub fn attach_position(&mut self, id: &str, spec: PositionSpec) -> PosterResult<()> {
        if !self.elements.contains_key(id) {
            return Err(PosterError::unknown_element(id, id));
        }
        self.pending.insert(id.to_owned(), spec);
        Ok(())
    }

    pub fn pending_position(&self, id: &str) -> Option<&PositionSpec> {
        self.pending.get(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Pending specs in element insertion order.
    pub fn pending_positions(&self) -> impl Iterator<Item = (&str, &PositionSpec)> {
        self.order
            .iter()
            .filter_map(|id| self.pending.get(id).map(|s| (id.as_str(), s)))
    }

    /// Resolve and apply every pending position spec. Nothing moves when resolution fails.
    pub fn resolve_positions(&mut self) -> PosterResult<()> {
        let resolved = crate::layout::resolve(self)?;
        for (id, (x, y)) in resolved {
            if let Some(e) = self.elements.get_mut(&id) {
                e.set_position(x, y);
            }
        }
        self.pending.clear();
        Ok(())
    }

    /// Run one named operation on a registered element. Returns whether it was applied.
    pub fn apply_operation(
        &mut self,
        id: &str,
        spec: &OperationSpec,
        ctx: &PosterContext,
    ) -> PosterResult<bool> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| PosterError::unknown_element(id, id))?;
        let op_ctx = BuildContext {
            element: id,
            fonts: ctx.fonts(),
            assets_root: ctx.assets_root(),
        };
        ctx.registry().operations.apply(element, spec, &op_ctx)
    }

    /// Crop to the `[x1, x2) x [y1, y2)` box.
    ///
    /// Elements whose bounds miss the box are dropped; the rest, the anchors and any absolute
    /// pending positions shift by `(-x1, -y1)` so the cropped render matches the same region of
    /// the uncropped one.
    pub fn crop(&mut self, x1: u32, y1: u32, x2: u32, y2: u32) -> PosterResult<()> {
        let backing = self.backing.cropped(x1, y1, x2, y2)?;

        let (fx1, fy1, fx2, fy2) = (
            f64::from(x1),
            f64::from(y1),
            f64::from(x2),
            f64::from(y2),
        );
        let outside: Vec<String> = self
            .order
            .iter()
            .filter(|id| {
                self.elements
                    .get(*id)
                    .is_some_and(|e| !e.overlaps_region(fx1, fy1, fx2, fy2))
            })
            .cloned()
            .collect();
        tracing::debug!(dropped = outside.len(), "cropping canvas");
        self.remove_elements(outside);

        let (dx, dy) = (
            i32::try_from(x1).unwrap_or(i32::MAX),
            i32::try_from(y1).unwrap_or(i32::MAX),
        );
        for e in self.elements.values_mut() {
            e.translate(-dx, -dy);
        }
        let shift = Vec2::new(-fx1, -fy1);
        for p in self.anchors.values_mut() {
            *p += shift;
        }
        for spec in self.pending.values_mut() {
            if let PositionSpec::Absolute(p) = spec {
                *p += shift;
            }
        }

        self.backing = backing;
        self.settings.width = x2 - x1;
        self.settings.height = y2 - y1;
        Ok(())
    }

    /// Drop everything and repaint the background.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.order.clear();
        self.layers.clear();
        self.groups.clear();
        self.anchors.clear();
        self.pending.clear();
        self.backing.fill(self.settings.background);
    }

    /// Draw every layer onto a copy of the background.
    pub fn render(&self) -> PosterResult<Surface> {
        crate::render::render(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/mod.rs"]
mod tests;
