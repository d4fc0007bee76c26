//! Widgets: movable, scalable containers of elements and nested widgets.
//!
//! Position and size live on the owning [`Node`](crate::node::Node); a
//! widget only carries what containers add on top: its own scale, the drag
//! gesture and the maximized state.

mod manager;

pub use manager::WidgetManager;

use kurbo::{Point, Rect, Size, Vec2};

use crate::config::CanvasConfig;
use crate::element::Fill;

/// Container payload of a node.
#[derive(Debug, Clone)]
pub struct Widget {
    /// Display name used in logs.
    pub name: String,
    pub background: Fill,
    /// Region (relative to the widget, logical units) that starts a drag on press.
    pub drag_area: Option<Rect>,
    /// Hidden when interactive mode is left.
    pub modal: bool,
    widget_scale: f64,
    is_dragging: bool,
    drag_offset: Vec2,
    pub(crate) is_hovered: bool,
    maximized: bool,
}

impl Default for Widget {
    fn default() -> Self {
        Self {
            name: String::new(),
            background: Fill::None,
            drag_area: None,
            modal: false,
            widget_scale: 1.0,
            is_dragging: false,
            drag_offset: Vec2::ZERO,
            is_hovered: false,
            maximized: false,
        }
    }
}

impl Widget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_background(mut self, background: Fill) -> Self {
        self.background = background;
        self
    }

    pub fn with_drag_area(mut self, area: Rect) -> Self {
        self.drag_area = Some(area);
        self
    }

    pub fn widget_scale(&self) -> f64 {
        self.widget_scale
    }

    /// Set the widget's own zoom, clamped into the configured range.
    ///
    /// Non-finite scales are ignored and return false.
    pub(crate) fn set_widget_scale(&mut self, scale: f64, config: &CanvasConfig) -> bool {
        if !scale.is_finite() {
            return false;
        }
        self.widget_scale = config.clamp_scale(scale);
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn drag_offset(&self) -> Vec2 {
        self.drag_offset
    }

    pub fn is_hovered(&self) -> bool {
        self.is_hovered
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub(crate) fn set_maximized(&mut self, maximized: bool) {
        self.maximized = maximized;
        if maximized {
            self.is_dragging = false;
        }
    }

    /// Capture the offset from the cursor to the widget origin.
    pub(crate) fn start_drag(&mut self, position: Point, cursor: Point) {
        self.is_dragging = true;
        self.drag_offset = position - cursor;
    }

    /// Position that keeps the captured offset under the cursor.
    pub(crate) fn drag_target(&self, cursor: Point) -> Point {
        (cursor + self.drag_offset).round()
    }

    pub(crate) fn stop_drag(&mut self) {
        self.is_dragging = false;
    }

    /// Whether a logical point lies in the drag area of a widget at `position`.
    ///
    /// The area scales with the widget.
    pub fn drag_area_contains(&self, position: Point, point: Point) -> bool {
        let Some(area) = self.drag_area else {
            return false;
        };
        if self.widget_scale <= 0.0 {
            return false;
        }
        let local = (point - position) / self.widget_scale;
        area.contains(local.to_point())
    }
}

/// Largest uniform fit of `size` inside `canvas`, centred.
///
/// Returns the logical origin and the zoom applied to the widget.
pub(crate) fn fit_to_canvas(size: Size, canvas: Size) -> (Point, f64) {
    if size.width <= 0.0 || size.height <= 0.0 {
        return (Point::ORIGIN, 1.0);
    }
    let zoom = (canvas.width / size.width).min(canvas.height / size.height);
    let origin = Point::new(
        (canvas.width - size.width * zoom) / 2.0,
        (canvas.height - size.height * zoom) / 2.0,
    );
    (origin, zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_is_clamped() {
        let config = CanvasConfig::default();
        let mut widget = Widget::new();
        assert!(widget.set_widget_scale(5.0, &config));
        assert!((widget.widget_scale() - 2.0).abs() < f64::EPSILON);
        assert!(widget.set_widget_scale(-1.0, &config));
        assert!((widget.widget_scale() - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_finite_scale_is_ignored() {
        let config = CanvasConfig::default();
        let mut widget = Widget::new();
        assert!(widget.set_widget_scale(1.5, &config));
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(!widget.set_widget_scale(bad, &config));
            assert!((widget.widget_scale() - 1.5).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_drag_keeps_offset() {
        let mut widget = Widget::new();
        widget.start_drag(Point::new(100.0, 100.0), Point::new(130.0, 110.0));
        assert!(widget.is_dragging());
        assert_eq!(widget.drag_target(Point::new(200.0, 300.0)), Point::new(170.0, 290.0));

        // Rescaling mid-drag does not touch the offset.
        widget.set_widget_scale(1.5, &CanvasConfig::default());
        assert_eq!(widget.drag_target(Point::new(200.4, 300.6)), Point::new(170.0, 291.0));

        widget.stop_drag();
        assert!(!widget.is_dragging());
    }

    #[test]
    fn test_drag_area_is_relative() {
        let widget = Widget::new().with_drag_area(Rect::new(0.0, 0.0, 200.0, 20.0));
        let position = Point::new(100.0, 100.0);
        assert!(widget.drag_area_contains(position, Point::new(150.0, 110.0)));
        assert!(!widget.drag_area_contains(position, Point::new(150.0, 130.0)));
        assert!(!Widget::new().drag_area_contains(position, Point::new(150.0, 110.0)));
    }

    #[test]
    fn test_drag_area_follows_scale() {
        let mut widget = Widget::new().with_drag_area(Rect::new(0.0, 0.0, 200.0, 20.0));
        widget.set_widget_scale(2.0, &CanvasConfig::default());
        let position = Point::new(100.0, 100.0);
        assert!(widget.drag_area_contains(position, Point::new(450.0, 135.0)));
        assert!(!widget.drag_area_contains(position, Point::new(450.0, 145.0)));
    }

    #[test]
    fn test_fit_to_canvas() {
        let (origin, zoom) = fit_to_canvas(Size::new(960.0, 270.0), Size::new(1920.0, 1080.0));
        assert!((zoom - 2.0).abs() < f64::EPSILON);
        assert_eq!(origin, Point::new(0.0, 270.0));
    }
}
