//! Coordinate and scale resolution.
//!
//! A node's bounds are derived from its logical position and size and the
//! bounds and scale of its parent:
//!
//! ```text
//! screen_pos  = parent_origin + position * parent_scale
//! screen_size = size * effective_scale
//! ```
//!
//! where the effective scale is `parent_scale * widget_scale` for widgets and
//! `parent_scale` for elements. Top-level nodes use the origin and the canvas
//! scale. Results are cached on the node until the next pass.

use kurbo::{Point, Rect, Size, Vec2};

use crate::context::TextMetrics;
use crate::node::{NodeId, NodeKind, NodeTree, Parent};
use crate::widget::fit_to_canvas;

/// Inputs shared by every node in a layout pass.
#[derive(Clone, Copy)]
pub struct LayoutEnv<'a> {
    /// Screen resolution divided by the design size, per axis.
    pub canvas_scale: Vec2,
    pub design_size: Size,
    pub min_thumb_length: f64,
    pub metrics: &'a dyn TextMetrics,
}

fn scale_by(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x * b.x, a.y * b.y)
}

/// Recompute the bounds of `id` and its whole subtree.
///
/// Returns the number of nodes recomputed. A detached node logs a warning
/// and recomputes nothing.
pub fn update_bounds(tree: &mut NodeTree, id: NodeId, env: &LayoutEnv<'_>) -> usize {
    tree.epoch += 1;
    layout_node(tree, id, env)
}

/// Recompute every top-level widget, in registry order.
pub fn update_all(tree: &mut NodeTree, widgets: &[NodeId], env: &LayoutEnv<'_>) -> usize {
    tree.epoch += 1;
    let count = widgets.iter().map(|&id| layout_node(tree, id, env)).sum();
    log::debug!("layout pass {} recomputed {} nodes", tree.epoch, count);
    count
}

fn layout_node(tree: &mut NodeTree, id: NodeId, env: &LayoutEnv<'_>) -> usize {
    let Some(parent) = tree.get(id).map(|n| n.parent) else {
        log::warn!("cannot lay out missing node {:?}", id);
        return 0;
    };
    let (origin, parent_scale) = match parent {
        None => {
            log::warn!("node {:?} has no parent, skipping bounds update", id);
            return 0;
        }
        Some(Parent::Canvas) => (Point::ORIGIN, env.canvas_scale),
        Some(Parent::Node(parent_id)) => match tree.get(parent_id) {
            Some(p) => (p.bounds.origin(), p.scale),
            None => {
                log::warn!("parent {:?} of {:?} is gone, skipping bounds update", parent_id, id);
                return 0;
            }
        },
    };

    let epoch = tree.epoch;
    let Some(node) = tree.get_mut(id) else {
        return 0;
    };

    let (screen_pos, scale) = match &node.kind {
        NodeKind::Widget(w) if w.is_maximized() && parent == Some(Parent::Canvas) => {
            let (fit_origin, zoom) = fit_to_canvas(node.size, env.design_size);
            (
                Point::new(fit_origin.x * parent_scale.x, fit_origin.y * parent_scale.y),
                parent_scale * zoom,
            )
        }
        kind => {
            let pos = node.position;
            let scale = match kind {
                NodeKind::Widget(w) => parent_scale * w.widget_scale(),
                NodeKind::Element(_) => parent_scale,
            };
            (
                Point::new(origin.x + pos.x * parent_scale.x, origin.y + pos.y * parent_scale.y),
                scale,
            )
        }
    };

    let scaled = scale_by(node.size.to_vec2(), scale);
    let mut bounds = Rect::from_origin_size(screen_pos, Size::new(scaled.x, scaled.y));

    if let NodeKind::Element(element) = &mut node.kind {
        if let Some(measured) =
            element.refresh_layout(bounds, scale, env.metrics, env.min_thumb_length)
        {
            bounds = Rect::from_origin_size(screen_pos, measured);
            if scale.x > 0.0 && scale.y > 0.0 {
                node.size = Size::new(measured.width / scale.x, measured.height / scale.y);
            }
        }
    }

    node.bounds = bounds;
    node.scale = scale;
    node.layout_epoch = epoch;

    let children = node.children.clone();
    1 + children
        .into_iter()
        .map(|child| layout_node(tree, child, env))
        .sum::<usize>()
}
