//! Pointer input state machine.
//!
//! Two states, `Up` and `Down`, driven once per logic frame by the cursor's
//! button status. Each frame takes exactly one of four transitions: press,
//! hover, release or hold.

use crate::config::CanvasConfig;
use crate::control::Capabilities;
use crate::input::{Cursor, CursorType, MouseStatus, ScrollWheelStatus};
use crate::layout::{self, LayoutEnv};
use crate::node::{NodeId, NodeTree, Parent};
use crate::widget::WidgetManager;

/// State of the pointer state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MouseState {
    #[default]
    Up,
    Down,
}

/// Everything one dispatch may touch.
pub(crate) struct Dispatch<'a> {
    pub tree: &'a mut NodeTree,
    pub manager: &'a mut WidgetManager,
    pub cursor: &'a mut Cursor,
    pub env: &'a LayoutEnv<'a>,
    pub config: &'a CanvasConfig,
}

impl Dispatch<'_> {
    /// Run one frame's transition.
    pub fn update_widgets(&mut self) {
        match (self.manager.mouse_state, self.cursor.mouse_status()) {
            (MouseState::Up, MouseStatus::Down) => self.press(),
            (MouseState::Up, MouseStatus::Up) => self.hover(),
            (MouseState::Down, MouseStatus::Up) => self.release(),
            (MouseState::Down, MouseStatus::Down) => self.hold(),
        }
    }

    fn capabilities(&self, id: Option<NodeId>) -> Capabilities {
        id.and_then(|id| self.tree.element(id))
            .map(|e| e.capabilities())
            .unwrap_or_default()
    }

    fn press(&mut self) {
        let point = self.cursor.screen_point();
        self.manager.update_hover(self.tree, point);
        self.manager.pressed_widget = self.manager.hovered_widget();

        let control = self.manager.hovered_control();
        let caps = self.capabilities(control);

        let focus = if caps.editable { control } else { None };
        self.manager.set_focus(self.tree, focus);

        self.manager.pressed_control = None;
        if let Some(id) = control.filter(|_| caps.clickable) {
            log::debug!("[{}] pressed clickable {:?}", self.config.name, id);
            if let Some(event) = self.tree.element_mut(id).and_then(|e| e.click()) {
                self.tree.notify(id, event);
            }
            self.manager.pressed_control = Some(id);
        } else if let Some(id) = control.filter(|&id| caps.scrollable && self.scrollbar_contains(id)) {
            log::debug!("[{}] pressed scrollbar of {:?}", self.config.name, id);
            if let Some(scroll) = self.tree.element_mut(id).and_then(|e| e.scroll.as_mut()) {
                scroll.scrollbar_click(point);
            }
            self.manager.pressed_control = Some(id);
        } else if let Some(id) = control.filter(|_| caps.selectable) {
            log::debug!("[{}] pressed selectable {:?}", self.config.name, id);
            if let Some(event) = self.tree.element_mut(id).and_then(|e| e.select_at(point)) {
                self.tree.notify(id, event);
            }
        } else if let Some(widget) = self.manager.pressed_widget {
            if self.in_drag_area(widget) {
                self.start_drag(widget);
            } else {
                log::debug!("[{}] pressed {:?} outside any control", self.config.name, widget);
            }
        }

        self.manager.mouse_state = MouseState::Down;
    }

    fn hover(&mut self) {
        let point = self.cursor.screen_point();
        self.manager.update_hover(self.tree, point);

        let control = self.manager.hovered_control();
        let caps = self.capabilities(control);
        if caps.clickable {
            self.cursor.set_cursor_type(CursorType::Pointing);
            return;
        }
        self.cursor.set_cursor_type(CursorType::Default);
        if caps.scrollable {
            let wheel = self.cursor.scroll_wheel_status();
            if let Some(element) = control.and_then(|id| self.tree.element_mut(id)) {
                element.scroll_wheel(wheel);
            }
        }
    }

    /// Unwind every in-progress gesture and return to `Up`.
    ///
    /// Removed nodes count as already released.
    pub fn release(&mut self) {
        if let Some(id) = self.manager.pressed_control.take() {
            if let Some(element) = self.tree.element_mut(id) {
                match &mut element.scroll {
                    Some(scroll) if scroll.is_drag_scrolling() => scroll.stop_drag_scrolling(),
                    _ => element.release(),
                }
            }
        }
        if let Some(id) = self.manager.pressed_widget.take() {
            if let Some(widget) = self.tree.widget_mut(id) {
                if widget.is_dragging() {
                    log::debug!("[{}] stopped dragging {:?}", self.config.name, id);
                    widget.stop_drag();
                }
            }
        }
        self.manager.mouse_state = MouseState::Up;
    }

    fn hold(&mut self) {
        let Some(widget_id) = self.manager.pressed_widget else {
            return;
        };
        let control = self.manager.pressed_control;
        let caps = self.capabilities(control);
        if caps.clickable {
            return;
        }
        if caps.scrollable {
            let point = self.cursor.screen_point();
            if let Some(scroll) = control
                .and_then(|id| self.tree.element_mut(id))
                .and_then(|e| e.scroll.as_mut())
            {
                if scroll.is_drag_scrolling() {
                    scroll.drag_scroll(point);
                }
            }
            return;
        }

        let Some(node) = self.tree.get(widget_id) else {
            self.manager.pressed_widget = None;
            return;
        };
        let is_dragging = node.as_widget().is_some_and(|w| w.is_dragging());
        let contains = node.contains(self.cursor.screen_point());

        if is_dragging {
            self.drag(widget_id);
        } else if contains {
            if self.cursor.is_long_click() {
                self.start_drag(widget_id);
            }
        } else {
            self.manager.pressed_widget = None;
        }
    }

    fn scrollbar_contains(&self, id: NodeId) -> bool {
        let point = self.cursor.screen_point();
        self.tree
            .element(id)
            .and_then(|e| e.scroll.as_ref())
            .is_some_and(|s| s.scrollbar_contains(point))
    }

    fn in_drag_area(&self, id: NodeId) -> bool {
        let Some(node) = self.tree.get(id) else {
            return false;
        };
        node.parent() == Some(Parent::Canvas)
            && node
                .as_widget()
                .is_some_and(|w| w.drag_area_contains(node.position(), self.cursor.position()))
    }

    fn start_drag(&mut self, id: NodeId) {
        let cursor = self.cursor.position();
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        if node.parent() != Some(Parent::Canvas) {
            return;
        }
        let position = node.position();
        let Some(widget) = node.as_widget_mut() else {
            return;
        };
        if widget.is_maximized() {
            return;
        }
        widget.start_drag(position, cursor);
        log::debug!("[{}] started dragging {:?}", self.config.name, id);
        self.manager.bring_to_front(id);
    }

    fn drag(&mut self, id: NodeId) {
        let cursor = self.cursor.position();
        let wheel = self.cursor.scroll_wheel_status();
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        let Some(target) = node.as_widget().map(|w| w.drag_target(cursor)) else {
            return;
        };
        node.position = target;

        let step = match wheel {
            ScrollWheelStatus::Up => self.config.rescale_increment,
            ScrollWheelStatus::Down => -self.config.rescale_increment,
            ScrollWheelStatus::None => 0.0,
        };
        if step != 0.0 {
            if let Some(widget) = node.as_widget_mut() {
                let scale = widget.widget_scale() + step;
                widget.set_widget_scale(scale, self.config);
            }
        }
        layout::update_bounds(self.tree, id, self.env);
    }
}
