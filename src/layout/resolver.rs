use std::collections::HashMap;

use kurbo::{Point, Rect};
use petgraph::algo::toposort;
use petgraph::graph::DiGraph;

use crate::canvas::Canvas;
use crate::element::Drawable;
use crate::foundation::core::round_px;
use crate::foundation::error::{PosterError, PosterResult};
use crate::layout::position::{PositionSpec, align_position};

/// Resolve every pending position spec of `canvas` without mutating it.
///
/// Specs that depend on another pending element are ordered after it by a topological sort, so
/// forward references are fine and cycles fail. Returns `(id, position)` pairs in resolution
/// order.
#[tracing::instrument(skip_all, fields(pending = canvas.pending_count()))]
pub fn resolve(canvas: &Canvas) -> PosterResult<Vec<(String, (i32, i32))>> {
    let pending: Vec<(&str, &PositionSpec)> = canvas.pending_positions().collect();

    let mut graph = DiGraph::<&str, ()>::new();
    let mut nodes = HashMap::new();
    for (id, _) in &pending {
        nodes.insert(*id, graph.add_node(*id));
    }

    for (id, spec) in &pending {
        let Some(dep) = spec.dependency() else {
            continue;
        };
        if dep == *id {
            return Err(PosterError::CyclicPositionDependency((*id).to_owned()));
        }
        if !canvas.contains(dep) {
            return Err(PosterError::unknown_element(*id, dep));
        }
        if let (Some(&from), Some(&to)) = (nodes.get(dep), nodes.get(id)) {
            graph.add_edge(from, to, ());
        }
    }

    let order = toposort(&graph, None).map_err(|cycle| {
        let id = graph
            .node_weight(cycle.node_id())
            .copied()
            .unwrap_or_default();
        PosterError::CyclicPositionDependency(id.to_owned())
    })?;

    let specs: HashMap<&str, &PositionSpec> = pending.iter().copied().collect();
    let mut resolved: HashMap<&str, (i32, i32)> = HashMap::new();
    let mut out = Vec::with_capacity(order.len());
    for ix in order {
        let Some(&id) = graph.node_weight(ix) else {
            continue;
        };
        let Some(spec) = specs.get(id) else {
            continue;
        };
        let pos = resolve_one(canvas, id, spec, &resolved)?;
        tracing::debug!(element = id, x = pos.0, y = pos.1, "resolved position");
        resolved.insert(id, pos);
        out.push((id.to_owned(), pos));
    }
    Ok(out)
}

fn resolve_one(
    canvas: &Canvas,
    id: &str,
    spec: &PositionSpec,
    resolved: &HashMap<&str, (i32, i32)>,
) -> PosterResult<(i32, i32)> {
    let position_of = |target: &str| -> PosterResult<(i32, i32)> {
        if let Some(p) = resolved.get(target) {
            return Ok(*p);
        }
        canvas
            .get_element(target)
            .map(|e| e.position())
            .ok_or_else(|| PosterError::unknown_element(id, target))
    };

    let p = match spec {
        PositionSpec::Absolute(p) => *p,
        PositionSpec::AnchorRef { anchor, offset } => {
            let a = canvas
                .anchor(anchor)
                .ok_or_else(|| PosterError::UnknownAnchor {
                    element: id.to_owned(),
                    anchor: anchor.clone(),
                })?;
            a + *offset
        }
        PositionSpec::ElementRef { target, offset } => {
            let (x, y) = position_of(target)?;
            Point::new(f64::from(x), f64::from(y)) + *offset
        }
        PositionSpec::Alignment {
            align,
            parent,
            offset,
        } => {
            let bounds = match parent {
                None => Rect::new(0.0, 0.0, f64::from(canvas.width()), f64::from(canvas.height())),
                Some(parent_id) => {
                    let (px, py) = position_of(parent_id)?;
                    let (pw, ph) = canvas
                        .get_element(parent_id)
                        .map(|e| e.size())
                        .ok_or_else(|| PosterError::unknown_element(id, parent_id.as_str()))?;
                    Rect::from_origin_size(
                        (f64::from(px), f64::from(py)),
                        (f64::from(pw), f64::from(ph)),
                    )
                }
            };
            let element = canvas
                .get_element(id)
                .ok_or_else(|| PosterError::unknown_element(id, id))?;
            let (w, h) = element.size();
            let (cx, cy) = element.position();
            align_position(
                *align,
                bounds,
                (f64::from(w), f64::from(h)),
                Point::new(f64::from(cx), f64::from(cy)),
            ) + *offset
        }
    };
    Ok((round_px(p.x), round_px(p.y)))
}
