//! Per-frame draw pass.
//!
//! Widgets are painted in registry order, each followed by its items in
//! insertion order, so later siblings and higher widgets land on top. The
//! pass only reads the canvas; bounds come from the last layout pass.

use kurbo::Rect;
use overlayui_core::{Canvas, Element, Fill, Node, NodeId, NodeKind};
use peniko::Color;

use crate::renderer::{RenderContext, RenderResult, Renderer};

/// Draw one frame of `ctx.canvas`.
pub fn draw_canvas<R: Renderer + ?Sized>(ctx: &RenderContext<'_>, renderer: &mut R) -> RenderResult<()> {
    let canvas = ctx.canvas;
    renderer.begin_frame(canvas.resolution())?;
    for &id in canvas.widgets() {
        draw_node(ctx, renderer, id);
    }
    if ctx.show_cursor && canvas.is_interactive() {
        let cursor = canvas.cursor();
        draw_texture(ctx, renderer, cursor.cursor_type().texture_name(), cursor.bounds());
    }
    renderer.end_frame()
}

fn draw_node<R: Renderer + ?Sized>(ctx: &RenderContext<'_>, renderer: &mut R, id: NodeId) {
    let Some(node) = ctx.canvas.node(id) else {
        log::warn!("skipping missing node {:?} while drawing", id);
        return;
    };
    if !node.visible {
        return;
    }
    match &node.kind {
        NodeKind::Widget(widget) => {
            draw_fill(ctx, renderer, &widget.background, node.bounds());
            for &child in node.children() {
                draw_node(ctx, renderer, child);
            }
        }
        NodeKind::Element(element) => draw_element(ctx, renderer, node, element),
    }
}

fn draw_fill<R: Renderer + ?Sized>(ctx: &RenderContext<'_>, renderer: &mut R, fill: &Fill, rect: Rect) {
    match fill {
        Fill::None => {}
        Fill::Color(color) => renderer.draw_rectangle(rect, *color),
        Fill::Texture(name) => draw_texture(ctx, renderer, name, rect),
    }
}

/// Draw a named texture, or a placeholder when the provider does not know it.
fn draw_texture<R: Renderer + ?Sized>(ctx: &RenderContext<'_>, renderer: &mut R, name: &str, rect: Rect) {
    let canvas = ctx.canvas;
    match canvas.context().textures.get(canvas.id(), name) {
        Some(handle) => renderer.draw_texture(handle, rect),
        None => {
            log::trace!("texture {} missing for {}, drawing placeholder", name, canvas.id());
            renderer.draw_rectangle(rect, ctx.placeholder_color);
        }
    }
}

fn draw_element<R: Renderer + ?Sized>(
    ctx: &RenderContext<'_>,
    renderer: &mut R,
    node: &Node,
    element: &Element,
) {
    let bounds = node.bounds();
    let style = &element.style;
    let layout = element.layout();

    if layout.border_width > 0.0 {
        renderer.draw_rectangle(
            bounds.inflate(layout.border_width, layout.border_width),
            style.border_color,
        );
    }
    match element.current_texture() {
        Some(name) => draw_texture(ctx, renderer, name, bounds),
        None => draw_fill(ctx, renderer, &element.fill, bounds),
    }

    let font_color = if element.enabled {
        style.font_color
    } else {
        style.disabled_font_color
    };

    if let Some(scroll) = &element.scroll {
        let selected = element.selection.as_ref().and_then(|s| s.selected_index());
        for (row, index) in scroll.visible_range().enumerate() {
            let line_bounds = scroll.line_bounds(row);
            let color = if selected == Some(index) {
                renderer.draw_rectangle(line_bounds, style.highlight_background);
                style.highlight_font_color
            } else {
                font_color
            };
            let Some(origin) = element.line_text_origin(row) else {
                continue;
            };
            renderer.draw_text(
                &scroll.lines()[index],
                &style.font_family,
                layout.font_size,
                origin,
                color,
                Some(line_bounds),
            );
        }
        if let (Some(track), Some(thumb)) = (scroll.track_bounds(), scroll.thumb_bounds()) {
            renderer.draw_rectangle(track, style.scrollbar_outer);
            renderer.draw_rectangle(thumb, style.scrollbar_inner);
        }
    } else if !element.text().is_empty() {
        let clip = (!element.auto_size).then_some(bounds);
        renderer.draw_text(
            element.text(),
            &style.font_family,
            layout.font_size,
            layout.origin,
            font_color,
            clip,
        );
    }

    if element.is_focused() && ctx.canvas.caret_visible() {
        draw_caret(ctx, renderer, element, style.caret_color);
    }
}

fn draw_caret<R: Renderer + ?Sized>(
    ctx: &RenderContext<'_>,
    renderer: &mut R,
    element: &Element,
    color: Color,
) {
    let Some(edit) = &element.edit else {
        return;
    };
    let layout = element.layout();
    let before: String = element.text().chars().take(edit.caret()).collect();
    let offset = renderer
        .measure_text(&before, &element.style.font_family, layout.font_size)
        .width;
    let x = layout.origin.x + offset;
    let rect = Rect::new(x, layout.origin.y, x + ctx.caret_width, layout.origin.y + layout.line_height);
    renderer.draw_rectangle(rect, color);
}
