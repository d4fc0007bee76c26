//! Leaf drawables and their control capabilities.

use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;

use crate::context::TextMetrics;
use crate::control::{
    Button, Capabilities, EditOutcome, EditState, KeyInput, ScrollView, Selection,
};
use crate::error::UiResult;
use crate::input::ScrollWheelStatus;
use crate::observer::{
    ControlEvent, ControlEventKind, Observable, Observer, ObserverHandle, ObserverList,
};

/// How a node's background is painted.
#[derive(Debug, Clone, Default)]
pub enum Fill {
    #[default]
    None,
    Color(Color),
    /// Texture name, resolved through the canvas texture provider.
    Texture(String),
}

/// Horizontal placement of single-line text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// Visual properties of an element, all in logical units.
#[derive(Debug, Clone)]
pub struct ElementStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_color: Color,
    pub disabled_font_color: Color,
    pub border_color: Color,
    /// Zero disables the border.
    pub border_width: f64,
    pub left_padding: f64,
    /// Gap between lines as a fraction of the line height.
    pub line_gap: f64,
    pub highlight_background: Color,
    pub highlight_font_color: Color,
    pub scrollbar_inner: Color,
    pub scrollbar_outer: Color,
    /// Zero hides the scrollbar.
    pub scrollbar_width: f64,
    pub caret_color: Color,
    pub align: TextAlign,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            font_family: "Lucida Console".to_string(),
            font_size: 14.0,
            font_color: Color::BLACK,
            disabled_font_color: Color::from_rgba8(128, 128, 128, 255),
            border_color: Color::BLACK,
            border_width: 0.0,
            left_padding: 5.0,
            line_gap: 0.25,
            highlight_background: Color::from_rgba8(237, 237, 237, 255),
            highlight_font_color: Color::BLACK,
            scrollbar_inner: Color::from_rgba8(177, 177, 177, 255),
            scrollbar_outer: Color::from_rgba8(226, 226, 226, 255),
            scrollbar_width: 8.0,
            caret_color: Color::BLACK,
            align: TextAlign::Left,
        }
    }
}

/// Screen-space text placement computed by the last layout pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextLayout {
    /// Font size after scaling.
    pub font_size: f64,
    /// Measured size of the element's text.
    pub text_size: Size,
    /// Top-left of the first line of text.
    pub origin: Point,
    /// Height of one line of text.
    pub line_height: f64,
    /// Scaled left padding.
    pub padding: f64,
    /// Scaled border width.
    pub border_width: f64,
}

/// A leaf node: something drawn, optionally interactive.
#[derive(Debug)]
pub struct Element {
    /// User-facing id carried by control events.
    pub id: String,
    pub enabled: bool,
    pub fill: Fill,
    pub text: Option<String>,
    /// Size the node to its measured text at layout time.
    pub auto_size: bool,
    pub style: ElementStyle,
    pub button: Option<Button>,
    pub scroll: Option<ScrollView>,
    pub selection: Option<Selection>,
    pub edit: Option<EditState>,
    pub(crate) observers: ObserverList,
    pub(crate) layout: TextLayout,
}

impl Element {
    fn new(fill: Fill) -> Self {
        Self {
            id: String::new(),
            enabled: true,
            fill,
            text: None,
            auto_size: false,
            style: ElementStyle::default(),
            button: None,
            scroll: None,
            selection: None,
            edit: None,
            observers: ObserverList::new(),
            layout: TextLayout::default(),
        }
    }

    /// Solid rectangle.
    pub fn rectangle(color: Color) -> Self {
        Self::new(Fill::Color(color))
    }

    /// Textured rectangle.
    pub fn texture(name: impl Into<String>) -> Self {
        Self::new(Fill::Texture(name.into()))
    }

    /// Text sized by its measured extent.
    pub fn label(text: impl Into<String>) -> Self {
        let mut element = Self::new(Fill::None);
        element.text = Some(text.into());
        element.auto_size = true;
        element
    }

    /// Bordered box with a single line of text.
    pub fn text_box(text: impl Into<String>) -> Self {
        let mut element = Self::new(Fill::Color(Color::WHITE));
        element.text = Some(text.into());
        element.style.border_width = 1.0;
        element
    }

    /// Text box the user can focus and type into.
    pub fn editable(id: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::text_box(text);
        element.id = id.into();
        element.edit = Some(EditState::new());
        element
    }

    /// Plain clickable button with centred text.
    pub fn button(id: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(Fill::Color(Color::WHITE));
        element.id = id.into();
        element.text = Some(text.into());
        element.style.border_width = 1.0;
        element.style.align = TextAlign::Center;
        element.button = Some(Button::plain());
        element
    }

    /// Button that swaps to `pressed` while held.
    pub fn texture_button(
        id: impl Into<String>,
        normal: impl Into<String>,
        pressed: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let mut element = Self::new(Fill::None);
        element.id = id.into();
        element.text = Some(text.into());
        element.style.align = TextAlign::Center;
        element.button = Some(Button::textured(normal, pressed));
        element
    }

    /// Button that flips between two textures.
    pub fn toggle_button(
        id: impl Into<String>,
        active: impl Into<String>,
        inactive: impl Into<String>,
        text: impl Into<String>,
        activate_only: bool,
    ) -> Self {
        let mut element = Self::new(Fill::None);
        element.id = id.into();
        element.text = Some(text.into());
        element.style.align = TextAlign::Center;
        element.button = Some(Button::toggle(active, inactive, activate_only));
        element
    }

    /// Scrolling multi-line text.
    pub fn text_area() -> Self {
        let mut element = Self::new(Fill::Color(Color::WHITE));
        element.style.border_width = 1.0;
        element.scroll = Some(ScrollView::new());
        element
    }

    /// Scrolling list with a highlighted selection.
    pub fn list_view(id: impl Into<String>) -> Self {
        let mut element = Self::text_area();
        element.id = id.into();
        element.selection = Some(Selection::new());
        element
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            clickable: self.button.is_some(),
            scrollable: self.scroll.is_some(),
            selectable: self.selection.is_some(),
            editable: self.edit.is_some(),
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn layout(&self) -> &TextLayout {
        &self.layout
    }

    /// Texture to draw as the background right now.
    pub fn current_texture(&self) -> Option<&str> {
        self.button
            .as_ref()
            .and_then(Button::texture)
            .or(match &self.fill {
                Fill::Texture(name) => Some(name.as_str()),
                _ => None,
            })
    }

    pub fn is_focused(&self) -> bool {
        self.edit.as_ref().is_some_and(EditState::is_focused)
    }

    pub(crate) fn click(&mut self) -> Option<ControlEventKind> {
        self.button.as_mut()?.click()
    }

    pub(crate) fn release(&mut self) {
        if let Some(button) = &mut self.button {
            button.release();
        }
    }

    pub(crate) fn scroll_wheel(&mut self, status: ScrollWheelStatus) {
        if let Some(scroll) = &mut self.scroll {
            scroll.scroll(status);
        }
    }

    /// Select the line under a screen point.
    pub(crate) fn select_at(&mut self, point: Point) -> Option<ControlEventKind> {
        let index = self.scroll.as_ref()?.line_at(point)?;
        let len = self.scroll.as_ref().map_or(0, ScrollView::len);
        self.selection.as_mut()?.select_index(index, len).ok()?;
        Some(ControlEventKind::Selected(Some(index)))
    }

    pub(crate) fn select_index(&mut self, index: usize) -> UiResult<ControlEventKind> {
        let len = self.scroll.as_ref().map_or(0, ScrollView::len);
        if let Some(selection) = &mut self.selection {
            selection.select_index(index, len)?;
        }
        Ok(ControlEventKind::Selected(Some(index)))
    }

    /// Remove a line, fixing up the selection. Returns the events to raise.
    pub(crate) fn remove_line(&mut self, index: usize) -> UiResult<Vec<ControlEventKind>> {
        let Some(scroll) = &mut self.scroll else {
            return Ok(Vec::new());
        };
        scroll.remove_line(index)?;
        let mut events = Vec::new();
        if let Some(selection) = &mut self.selection {
            if selection.item_removed(index) {
                events.push(ControlEventKind::Selected(selection.selected_index()));
            }
        }
        events.push(ControlEventKind::LinesChanged);
        Ok(events)
    }

    pub(crate) fn set_focused(&mut self, focused: bool) -> Option<ControlEventKind> {
        let edit = self.edit.as_mut()?;
        let text = self.text.get_or_insert_with(String::new);
        if edit.is_focused() == focused {
            return None;
        }
        edit.set_focused(focused, text);
        Some(ControlEventKind::Focus(focused))
    }

    pub(crate) fn apply_key(&mut self, key: KeyInput) -> Option<ControlEventKind> {
        let text = self.text.get_or_insert_with(String::new);
        match self.edit.as_mut()?.apply(text, key) {
            EditOutcome::Edited => Some(ControlEventKind::Edited(text.clone())),
            EditOutcome::Submitted => Some(ControlEventKind::Submitted(text.clone())),
            EditOutcome::Unchanged | EditOutcome::CaretMoved => None,
        }
    }

    /// Recompute text placement and scroll geometry for new bounds.
    ///
    /// Returns the measured text size when the element sizes itself.
    pub(crate) fn refresh_layout(
        &mut self,
        bounds: Rect,
        scale: Vec2,
        metrics: &dyn TextMetrics,
        min_thumb_length: f64,
    ) -> Option<Size> {
        let font_size = self.style.font_size * scale.y;
        let text = self.text.as_deref().unwrap_or_default();
        let text_size = metrics.measure_text(text, &self.style.font_family, font_size);
        let line_height = metrics
            .measure_text("Ag", &self.style.font_family, font_size)
            .height;
        let padding = self.style.left_padding * scale.x;

        let origin = match self.style.align {
            _ if self.auto_size => bounds.origin(),
            TextAlign::Left => Point::new(
                bounds.x0 + padding,
                bounds.y0 + (bounds.height() - line_height) / 2.0,
            ),
            TextAlign::Center => Point::new(
                bounds.x0 + (bounds.width() - text_size.width) / 2.0,
                bounds.y0 + (bounds.height() - text_size.height) / 2.0,
            ),
        };

        self.layout = TextLayout {
            font_size,
            text_size,
            origin,
            line_height,
            padding,
            border_width: self.style.border_width * scale.x,
        };

        if let Some(scroll) = &mut self.scroll {
            let pitch = line_height * (1.0 + self.style.line_gap);
            scroll.set_geometry(
                bounds,
                pitch,
                self.style.scrollbar_width * scale.x,
                min_thumb_length,
            );
        }

        self.auto_size.then_some(text_size)
    }

    /// Screen position of the text of the `row`-th visible line.
    pub fn line_text_origin(&self, row: usize) -> Option<Point> {
        let scroll = self.scroll.as_ref()?;
        let line = scroll.line_bounds(row);
        let gap = scroll.line_pitch() - self.layout.line_height;
        Some(Point::new(line.x0 + self.layout.padding, line.y0 + gap / 2.0))
    }
}

impl Observable for Element {
    fn add_observer(&mut self, observer: Box<dyn Observer>) -> ObserverHandle {
        self.observers.add_observer(observer)
    }

    fn remove_observer(&mut self, handle: ObserverHandle) -> bool {
        self.observers.remove_observer(handle)
    }

    fn notify_observers(&mut self, event: &ControlEvent) {
        self.observers.notify_observers(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MonospaceMetrics;

    #[test]
    fn test_capabilities() {
        assert!(!Element::rectangle(Color::BLACK).capabilities().any());
        assert!(!Element::label("x").capabilities().any());

        let list = Element::list_view("players").capabilities();
        assert!(list.scrollable && list.selectable && !list.clickable);

        let edit = Element::editable("name", "").capabilities();
        assert!(edit.editable && !edit.clickable);

        assert!(Element::button("ok", "OK").capabilities().clickable);
    }

    #[test]
    fn test_label_measures_itself() {
        let mut label = Element::label("abcd");
        let metrics = MonospaceMetrics::default();
        let size = label.refresh_layout(
            Rect::new(10.0, 10.0, 10.0, 10.0),
            Vec2::new(2.0, 2.0),
            &metrics,
            10.0,
        );
        // 4 chars * 28px * 0.6
        let size = size.unwrap();
        assert!((size.width - 67.2).abs() < 1e-9);
        assert!((size.height - 28.0).abs() < 1e-9);
        assert!((label.layout().font_size - 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_centered_button_text() {
        let mut button = Element::button("ok", "OK");
        let metrics = MonospaceMetrics::default();
        button.style.font_size = 10.0;
        button.refresh_layout(Rect::new(0.0, 0.0, 100.0, 30.0), Vec2::new(1.0, 1.0), &metrics, 10.0);
        // "OK" is 12x10.
        assert_eq!(button.layout().origin, Point::new(44.0, 10.0));
    }

    #[test]
    fn test_list_geometry_from_font() {
        let mut list = Element::list_view("l");
        list.style.font_size = 20.0;
        list.style.line_gap = 0.25;
        let metrics = MonospaceMetrics::default();
        list.refresh_layout(Rect::new(0.0, 0.0, 200.0, 100.0), Vec2::new(1.0, 1.0), &metrics, 10.0);
        let scroll = list.scroll.as_ref().unwrap();
        assert!((scroll.line_pitch() - 25.0).abs() < 1e-9);
        assert_eq!(scroll.max_visible_lines(), 4);
    }

    #[test]
    fn test_select_and_remove_lines() {
        let mut list = Element::list_view("l");
        let metrics = MonospaceMetrics::default();
        list.style.font_size = 20.0;
        for name in ["a", "b", "c"] {
            list.scroll.as_mut().unwrap().push_line(name);
        }
        list.refresh_layout(Rect::new(0.0, 0.0, 200.0, 100.0), Vec2::new(1.0, 1.0), &metrics, 10.0);

        assert_eq!(
            list.select_at(Point::new(5.0, 30.0)),
            Some(ControlEventKind::Selected(Some(1)))
        );
        assert!(list.select_index(7).is_err());

        let events = list.remove_line(0).unwrap();
        assert_eq!(
            events,
            vec![ControlEventKind::Selected(Some(0)), ControlEventKind::LinesChanged]
        );
        assert!(list.remove_line(5).is_err());
    }

    #[test]
    fn test_typing_into_focused_editable() {
        let mut edit = Element::editable("name", "Jo");
        assert_eq!(edit.set_focused(true), Some(ControlEventKind::Focus(true)));
        assert_eq!(edit.set_focused(true), None);
        assert_eq!(edit.apply_key(KeyInput::Char('e')), Some(ControlEventKind::Edited("Joe".into())));
        assert_eq!(edit.apply_key(KeyInput::Backspace), Some(ControlEventKind::Edited("Jo".into())));
        assert_eq!(edit.apply_key(KeyInput::Enter), Some(ControlEventKind::Submitted("Jo".into())));
        assert_eq!(edit.text(), "Jo");
    }
}
