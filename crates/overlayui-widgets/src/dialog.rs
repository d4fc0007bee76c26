//! Modal message box.

use kurbo::{Point, Size};
use overlayui_core::{
    Canvas, ControlEvent, ControlEventKind, Element, Fill, Node, NodeId, UiResult, Widget,
};
use peniko::Color;

use crate::theme;

/// Logical size of every dialog.
pub const DIALOG_SIZE: Size = Size::new(300.0, 150.0);

const OK_ID: &str = "ok";

/// A message with an OK button, centred on the canvas when shown.
///
/// Dialogs are modal widgets: leaving interactive mode hides them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialog {
    widget: NodeId,
    message: NodeId,
    ok: NodeId,
}

impl Dialog {
    /// Build a hidden dialog on `canvas`.
    pub fn create(canvas: &mut Canvas, message: &str) -> UiResult<Self> {
        let mut body = Widget::named("dialog").with_background(Fill::Color(theme::DIALOG_BG));
        body.modal = true;
        let widget = canvas.add_widget(Node::widget(Point::ZERO, DIALOG_SIZE, body).with_visible(false))?;

        let mut label = Element::label(message);
        label.style.font_size = 18.0;
        label.style.font_color = Color::BLACK;
        let message = canvas.add_child(widget, Node::element(Point::new(20.0, 65.0), Size::ZERO, label))?;

        let mut button = Element::button(OK_ID, "OK").with_fill(Fill::Color(theme::BUTTON_BG));
        button.style.font_color = theme::BUTTON_TEXT;
        let ok = canvas.add_child(
            widget,
            Node::element(Point::new(120.0, 115.0), Size::new(60.0, 30.0), button),
        )?;

        Ok(Self { widget, message, ok })
    }

    pub fn widget(&self) -> NodeId {
        self.widget
    }

    pub fn ok_button(&self) -> NodeId {
        self.ok
    }

    pub fn is_visible(&self, canvas: &Canvas) -> bool {
        canvas.node(self.widget).is_some_and(|n| n.visible)
    }

    /// Centre, raise and show the dialog.
    pub fn show(&self, canvas: &mut Canvas) -> UiResult<()> {
        let design = canvas.config().design_size;
        let position = Point::new(
            (design.width / 2.0 - DIALOG_SIZE.width / 2.0).floor(),
            (design.height / 2.0 - DIALOG_SIZE.height / 2.0).floor(),
        );
        canvas.set_position(self.widget, position)?;
        canvas.set_visible(self.widget, true)?;
        canvas.bring_to_front(self.widget);
        log::debug!("showing dialog {:?}", self.widget);
        Ok(())
    }

    pub fn hide(&self, canvas: &mut Canvas) -> UiResult<()> {
        canvas.set_visible(self.widget, false)
    }

    pub fn set_message(&self, canvas: &mut Canvas, message: &str) -> UiResult<()> {
        canvas.set_text(self.message, message)
    }

    /// React to a drained control event. Returns true if the event closed the dialog.
    pub fn handle_event(&self, canvas: &mut Canvas, event: &ControlEvent) -> UiResult<bool> {
        if event.source != self.ok || event.kind != ControlEventKind::Clicked {
            return Ok(false);
        }
        self.hide(canvas)?;
        Ok(true)
    }
}
