//! Tab strip switching between child widgets.

use kurbo::{Point, Size, Vec2};
use overlayui_core::{
    Canvas, ControlEvent, ControlEventKind, Element, Node, NodeId, UiError, UiResult, Widget,
};

#[derive(Debug, Clone)]
struct Tab {
    title: String,
    button: NodeId,
    content: NodeId,
}

/// A widget whose area below a row of tab buttons shows one child widget at a time.
#[derive(Debug, Clone)]
pub struct TabbedWidget {
    widget: NodeId,
    size: Size,
    tab_size: Size,
    tab_offset: Vec2,
    active_texture: String,
    inactive_texture: String,
    tabs: Vec<Tab>,
    active: Option<usize>,
}

impl TabbedWidget {
    pub fn create(
        canvas: &mut Canvas,
        position: Point,
        size: Size,
        tab_size: Size,
        active_texture: impl Into<String>,
        inactive_texture: impl Into<String>,
    ) -> UiResult<Self> {
        let widget = canvas.add_widget(Node::widget(position, size, Widget::named("tabs")))?;
        Ok(Self {
            widget,
            size,
            tab_size,
            tab_offset: Vec2::ZERO,
            active_texture: active_texture.into(),
            inactive_texture: inactive_texture.into(),
            tabs: Vec::new(),
            active: None,
        })
    }

    pub fn widget(&self) -> NodeId {
        self.widget
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_tab(&self) -> Option<usize> {
        self.active
    }

    pub fn title(&self, index: usize) -> Option<&str> {
        self.tabs.get(index).map(|t| t.title.as_str())
    }

    pub fn button(&self, index: usize) -> Option<NodeId> {
        self.tabs.get(index).map(|t| t.button)
    }

    /// The child widget shown under tab `index`.
    pub fn content(&self, index: usize) -> Option<NodeId> {
        self.tabs.get(index).map(|t| t.content)
    }

    /// Append a tab and return its content widget. The first tab starts active.
    pub fn add_tab(&mut self, canvas: &mut Canvas, title: &str) -> UiResult<NodeId> {
        let index = self.tabs.len();
        let first = index == 0;

        let content_size = Size::new(self.size.width, (self.size.height - self.tab_size.height).max(0.0));
        let content = canvas.add_child(
            self.widget,
            Node::widget(
                Point::new(0.0, self.tab_size.height),
                content_size,
                Widget::named(title),
            )
            .with_visible(first),
        )?;

        let element = Element::toggle_button(
            format!("tab-{}", index),
            self.active_texture.as_str(),
            self.inactive_texture.as_str(),
            title,
            true,
        );
        let button = canvas.add_child(
            self.widget,
            Node::element(self.tab_position(index), self.tab_size, element),
        )?;
        if first {
            canvas.set_active(button, true)?;
            self.active = Some(0);
        }

        self.tabs.push(Tab {
            title: title.to_string(),
            button,
            content,
        });
        Ok(content)
    }

    /// Move the tab strip, relative to the widget's top-left corner.
    pub fn set_tab_offset(&mut self, canvas: &mut Canvas, offset: Vec2) -> UiResult<()> {
        self.tab_offset = offset;
        for (index, tab) in self.tabs.iter().enumerate() {
            canvas.set_position(tab.button, self.tab_position(index))?;
        }
        Ok(())
    }

    /// Activate tab `index`, showing its content and hiding the rest.
    pub fn select_tab(&mut self, canvas: &mut Canvas, index: usize) -> UiResult<()> {
        if index >= self.tabs.len() {
            return Err(UiError::IndexOutOfRange {
                index,
                len: self.tabs.len(),
            });
        }
        for (i, tab) in self.tabs.iter().enumerate() {
            canvas.set_active(tab.button, i == index)?;
            canvas.set_visible(tab.content, i == index)?;
        }
        self.active = Some(index);
        log::debug!("tab {} ({}) selected", index, self.tabs[index].title);
        Ok(())
    }

    /// React to a drained control event. Returns true if it switched tabs.
    pub fn handle_event(&mut self, canvas: &mut Canvas, event: &ControlEvent) -> UiResult<bool> {
        if event.kind != ControlEventKind::Toggled(true) {
            return Ok(false);
        }
        match self.tabs.iter().position(|t| t.button == event.source) {
            Some(index) => {
                self.select_tab(canvas, index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn tab_position(&self, index: usize) -> Point {
        Point::new(
            self.tab_offset.x + index as f64 * self.tab_size.width,
            self.tab_offset.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlayui_core::{CanvasConfig, FrameInput};
    use std::time::{Duration, Instant};

    fn tabs(canvas: &mut Canvas) -> TabbedWidget {
        let mut tabs = TabbedWidget::create(
            canvas,
            Point::new(100.0, 100.0),
            Size::new(300.0, 200.0),
            Size::new(80.0, 20.0),
            "tab_on",
            "tab_off",
        )
        .unwrap();
        for title in ["General", "Video", "Audio"] {
            tabs.add_tab(canvas, title).unwrap();
        }
        tabs
    }

    fn is_active(canvas: &Canvas, button: NodeId) -> bool {
        canvas
            .element(button)
            .and_then(|e| e.button.as_ref())
            .and_then(|b| b.is_active())
            .unwrap_or(false)
    }

    fn visible(canvas: &Canvas, id: NodeId) -> bool {
        canvas.node(id).is_some_and(|n| n.visible)
    }

    #[test]
    fn test_tabs_laid_out_left_to_right() {
        let mut canvas = Canvas::new(CanvasConfig::default());
        let mut tabs = tabs(&mut canvas);
        assert_eq!(tabs.len(), 3);
        assert_eq!(tabs.active_tab(), Some(0));

        let positions: Vec<_> = (0..3)
            .map(|i| canvas.node(tabs.button(i).unwrap()).unwrap().position())
            .collect();
        assert_eq!(positions, vec![Point::new(0.0, 0.0), Point::new(80.0, 0.0), Point::new(160.0, 0.0)]);

        tabs.set_tab_offset(&mut canvas, Vec2::new(10.0, 2.0)).unwrap();
        assert_eq!(canvas.node(tabs.button(2).unwrap()).unwrap().position(), Point::new(170.0, 2.0));

        let content = canvas.node(tabs.content(1).unwrap()).unwrap();
        assert_eq!(content.position(), Point::new(0.0, 20.0));
        assert_eq!(content.size(), Size::new(300.0, 180.0));
    }

    #[test]
    fn test_only_first_tab_starts_visible() {
        let mut canvas = Canvas::new(CanvasConfig::default());
        let tabs = tabs(&mut canvas);
        assert!(visible(&canvas, tabs.content(0).unwrap()));
        assert!(!visible(&canvas, tabs.content(1).unwrap()));
        assert!(is_active(&canvas, tabs.button(0).unwrap()));
        assert!(!is_active(&canvas, tabs.button(2).unwrap()));
        assert_eq!(canvas.element(tabs.button(1).unwrap()).unwrap().current_texture(), Some("tab_off"));
    }

    #[test]
    fn test_select_tab_switches_content() {
        let mut canvas = Canvas::new(CanvasConfig::default());
        let mut tabs = tabs(&mut canvas);
        tabs.select_tab(&mut canvas, 2).unwrap();
        assert_eq!(tabs.active_tab(), Some(2));
        assert!(!visible(&canvas, tabs.content(0).unwrap()));
        assert!(visible(&canvas, tabs.content(2).unwrap()));
        assert!(!is_active(&canvas, tabs.button(0).unwrap()));
        assert!(is_active(&canvas, tabs.button(2).unwrap()));
        assert!(tabs.select_tab(&mut canvas, 3).is_err());
    }

    #[test]
    fn test_clicking_tab_selects_it() {
        let mut canvas = Canvas::new(CanvasConfig::default());
        canvas.set_interactive(true);
        let mut tabs = tabs(&mut canvas);

        // Second tab header spans x 180..260, y 100..120 on screen.
        let design = canvas.config().design_size;
        let start = Instant::now();
        let pointer = Point::new(200.0 / design.width, 110.0 / design.height);
        for (ms, down) in [(0, false), (16, true), (32, false)] {
            canvas.on_logic_frame(
                &FrameInput::new(design, start + Duration::from_millis(ms))
                    .with_pointer(pointer)
                    .with_button(down),
            );
        }

        let mut switched = false;
        for event in canvas.take_events() {
            switched |= tabs.handle_event(&mut canvas, &event).unwrap();
        }
        assert!(switched);
        assert_eq!(tabs.active_tab(), Some(1));
        assert!(visible(&canvas, tabs.content(1).unwrap()));
        assert!(!is_active(&canvas, tabs.button(0).unwrap()));
    }
}
