//! Widget registry: z-order plus hover, press and focus bookkeeping.

use kurbo::Point;

use crate::hit_test;
use crate::input::MouseState;
use crate::node::{NodeId, NodeTree};

/// Tracks the top-level widgets of a canvas and which nodes the pointer is
/// interacting with.
///
/// List order is paint order: the last widget is drawn last and hit first.
/// Pressed fields are only set while the button is held.
#[derive(Debug, Clone, Default)]
pub struct WidgetManager {
    widgets: Vec<NodeId>,
    hovered_widget: Option<NodeId>,
    hovered_control: Option<NodeId>,
    pub(crate) pressed_widget: Option<NodeId>,
    pub(crate) pressed_control: Option<NodeId>,
    focused_control: Option<NodeId>,
    pub(crate) mouse_state: MouseState,
}

impl WidgetManager {
    /// Create an empty registry in the `Up` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level widgets, bottom first.
    pub fn widgets(&self) -> &[NodeId] {
        &self.widgets
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.widgets.contains(&id)
    }

    pub fn hovered_widget(&self) -> Option<NodeId> {
        self.hovered_widget
    }

    pub fn hovered_control(&self) -> Option<NodeId> {
        self.hovered_control
    }

    pub fn pressed_widget(&self) -> Option<NodeId> {
        self.pressed_widget
    }

    pub fn pressed_control(&self) -> Option<NodeId> {
        self.pressed_control
    }

    pub fn focused_control(&self) -> Option<NodeId> {
        self.focused_control
    }

    pub fn mouse_state(&self) -> MouseState {
        self.mouse_state
    }

    /// Register a top-level widget on top of the stack.
    pub(crate) fn add(&mut self, id: NodeId) {
        if !self.widgets.contains(&id) {
            self.widgets.push(id);
        }
    }

    /// Move a widget to the top of the z-order.
    ///
    /// Returns false if the widget is not registered.
    pub(crate) fn bring_to_front(&mut self, id: NodeId) -> bool {
        let Some(index) = self.widgets.iter().position(|&w| w == id) else {
            return false;
        };
        if index + 1 != self.widgets.len() {
            let widget = self.widgets.remove(index);
            self.widgets.push(widget);
        }
        true
    }

    /// Drop every reference to removed nodes.
    pub(crate) fn forget(&mut self, removed: &[NodeId]) {
        self.widgets.retain(|id| !removed.contains(id));
        for slot in [
            &mut self.hovered_widget,
            &mut self.hovered_control,
            &mut self.pressed_widget,
            &mut self.pressed_control,
            &mut self.focused_control,
        ] {
            if slot.is_some_and(|id| removed.contains(&id)) {
                *slot = None;
            }
        }
    }

    /// Re-resolve the hovered widget and control under a screen point.
    pub(crate) fn update_hover(&mut self, tree: &mut NodeTree, point: Point) {
        let widget = hit_test::moused_over_widget(tree, &self.widgets, point);
        if widget != self.hovered_widget {
            for (id, hovered) in [(self.hovered_widget, false), (widget, true)] {
                if let Some(w) = id.and_then(|id| tree.widget_mut(id)) {
                    w.is_hovered = hovered;
                }
            }
        }
        self.hovered_widget = widget;
        self.hovered_control = widget.and_then(|w| hit_test::moused_over_control(tree, w, point));
    }

    /// Move keyboard focus, notifying both the old and the new control.
    pub(crate) fn set_focus(&mut self, tree: &mut NodeTree, id: Option<NodeId>) {
        if self.focused_control == id {
            return;
        }
        if let Some(old) = self.focused_control.take() {
            if let Some(event) = tree.element_mut(old).and_then(|e| e.set_focused(false)) {
                tree.notify(old, event);
            }
        }
        if let Some(new) = id {
            if let Some(event) = tree.element_mut(new).and_then(|e| e.set_focused(true)) {
                tree.notify(new, event);
                self.focused_control = Some(new);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::node::{Node, Parent};
    use crate::widget::Widget;
    use kurbo::{Rect, Size};

    fn tree_with_widgets(count: usize) -> (NodeTree, Vec<NodeId>) {
        let mut tree = NodeTree::new();
        let ids = (0..count)
            .map(|_| {
                let id = tree.insert(Node::widget(Point::ZERO, Size::new(10.0, 10.0), Widget::new()));
                tree.attach(Parent::Canvas, id).unwrap();
                id
            })
            .collect();
        (tree, ids)
    }

    #[test]
    fn test_bring_to_front() {
        let (_, ids) = tree_with_widgets(3);
        let mut manager = WidgetManager::new();
        for &id in &ids {
            manager.add(id);
        }

        assert!(manager.bring_to_front(ids[0]));
        assert_eq!(manager.widgets(), &[ids[1], ids[2], ids[0]]);
        assert!(manager.bring_to_front(ids[0]));
        assert_eq!(manager.widgets(), &[ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn test_forget_clears_references() {
        let (_, ids) = tree_with_widgets(2);
        let mut manager = WidgetManager::new();
        manager.add(ids[0]);
        manager.add(ids[1]);
        manager.pressed_widget = Some(ids[1]);

        manager.forget(&[ids[1]]);
        assert_eq!(manager.widgets(), &[ids[0]]);
        assert_eq!(manager.pressed_widget(), None);
    }

    #[test]
    fn test_focus_moves_between_controls() {
        let (mut tree, ids) = tree_with_widgets(1);
        let a = tree.insert(Node::element(Point::ZERO, Size::new(5.0, 5.0), Element::editable("a", "")));
        tree.attach(Parent::Node(ids[0]), a).unwrap();
        let b = tree.insert(Node::element(Point::ZERO, Size::new(5.0, 5.0), Element::editable("b", "")));
        tree.attach(Parent::Node(ids[0]), b).unwrap();
        let mut manager = WidgetManager::new();

        manager.set_focus(&mut tree, Some(a));
        manager.set_focus(&mut tree, Some(b));
        assert_eq!(manager.focused_control(), Some(b));
        assert!(!tree.element(a).unwrap().is_focused());
        assert!(tree.element(b).unwrap().is_focused());

        let events: Vec<_> = tree.take_events().into_iter().map(|e| (e.id, e.kind)).collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].0, "a");

        manager.set_focus(&mut tree, None);
        assert_eq!(manager.focused_control(), None);
    }

    #[test]
    fn test_hover_flags_follow_pointer() {
        let mut tree = NodeTree::new();
        let id = tree.insert(Node::widget(Point::ZERO, Size::new(10.0, 10.0), Widget::new()));
        tree.attach(Parent::Canvas, id).unwrap();
        tree.get_mut(id).unwrap().bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut manager = WidgetManager::new();
        manager.add(id);

        manager.update_hover(&mut tree, Point::new(5.0, 5.0));
        assert_eq!(manager.hovered_widget(), Some(id));
        assert!(tree.widget(id).unwrap().is_hovered());

        manager.update_hover(&mut tree, Point::new(50.0, 5.0));
        assert_eq!(manager.hovered_widget(), None);
        assert!(!tree.widget(id).unwrap().is_hovered());
    }
}
