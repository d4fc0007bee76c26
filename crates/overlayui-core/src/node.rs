//! Node arena.
//!
//! Ownership flows strictly from the canvas down: the canvas owns a
//! [`NodeTree`], the tree owns every node, and a node refers to its parent only
//! through a [`Parent`] key.

use kurbo::{Point, Rect, Size, Vec2};
use slotmap::SlotMap;

use crate::element::Element;
use crate::error::{UiError, UiResult};
use crate::observer::{ControlEvent, ControlEventKind, Observable};
use crate::widget::Widget;

slotmap::new_key_type! {
    /// Key of a node in its canvas's arena.
    pub struct NodeId;
}

/// Non-owning reference to a node's parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// The root canvas.
    Canvas,
    /// A containing widget.
    Node(NodeId),
}

/// Container or leaf payload of a node.
#[derive(Debug)]
pub enum NodeKind {
    Widget(Widget),
    Element(Element),
}

/// Anything with a position, a size and computed screen bounds.
#[derive(Debug)]
pub struct Node {
    pub(crate) parent: Option<Parent>,
    pub(crate) children: Vec<NodeId>,
    /// Logical position relative to the parent.
    pub(crate) position: Point,
    /// Logical size before scaling.
    pub(crate) size: Size,
    /// Absolute screen rectangle, cached by the last layout pass.
    pub(crate) bounds: Rect,
    /// Effective scale applied to this node's children.
    pub(crate) scale: Vec2,
    pub(crate) layout_epoch: u64,
    pub visible: bool,
    /// Name of the style applied from a stylesheet.
    pub style_name: String,
    pub kind: NodeKind,
}

impl Node {
    fn new(position: Point, size: Size, kind: NodeKind) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            position,
            size,
            bounds: Rect::ZERO,
            scale: Vec2::new(1.0, 1.0),
            layout_epoch: 0,
            visible: true,
            style_name: String::new(),
            kind,
        }
    }

    /// Create a widget node.
    pub fn widget(position: Point, size: Size, widget: Widget) -> Self {
        Self::new(position, size, NodeKind::Widget(widget))
    }

    /// Create an element node. A zero size lets text elements size themselves.
    pub fn element(position: Point, size: Size, element: Element) -> Self {
        Self::new(position, size, NodeKind::Element(element))
    }

    /// Set the stylesheet entry applied to this node.
    pub fn with_style(mut self, style_name: impl Into<String>) -> Self {
        self.style_name = style_name.into();
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn parent(&self) -> Option<Parent> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Layout pass that last recomputed this node's bounds.
    pub fn layout_epoch(&self) -> u64 {
        self.layout_epoch
    }

    pub fn is_widget(&self) -> bool {
        matches!(self.kind, NodeKind::Widget(_))
    }

    pub fn as_widget(&self) -> Option<&Widget> {
        match &self.kind {
            NodeKind::Widget(w) => Some(w),
            NodeKind::Element(_) => None,
        }
    }

    pub fn as_widget_mut(&mut self) -> Option<&mut Widget> {
        match &mut self.kind {
            NodeKind::Widget(w) => Some(w),
            NodeKind::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(e) => Some(e),
            NodeKind::Widget(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match &mut self.kind {
            NodeKind::Element(e) => Some(e),
            NodeKind::Widget(_) => None,
        }
    }

    /// Whether this node is an enabled interactive control.
    pub fn is_active_control(&self) -> bool {
        self.as_element()
            .is_some_and(|e| e.enabled && e.capabilities().any())
    }

    /// Whether the cursor's screen point lies within the cached bounds.
    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    pub fn has_zero_area(&self) -> bool {
        self.bounds.is_zero_area()
    }
}

/// Arena of all nodes belonging to one canvas.
#[derive(Debug, Default)]
pub struct NodeTree {
    nodes: SlotMap<NodeId, Node>,
    events: Vec<ControlEvent>,
    pub(crate) epoch: u64,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.get(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    pub fn widget(&self, id: NodeId) -> Option<&Widget> {
        self.get(id).and_then(Node::as_widget)
    }

    pub fn widget_mut(&mut self, id: NodeId) -> Option<&mut Widget> {
        self.get_mut(id).and_then(Node::as_widget_mut)
    }

    /// Insert a detached node.
    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        self.nodes.insert(node)
    }

    /// Attach a node under the canvas or a widget, appending it to the parent's items.
    pub(crate) fn attach(&mut self, parent: Parent, child: NodeId) -> UiResult<()> {
        if let Parent::Node(parent_id) = parent {
            let parent_node = self
                .nodes
                .get_mut(parent_id)
                .ok_or(UiError::NodeNotFound(parent_id))?;
            if !parent_node.is_widget() {
                return Err(UiError::NotAContainer(parent_id));
            }
            parent_node.children.push(child);
        }
        let node = self.nodes.get_mut(child).ok_or(UiError::NodeNotFound(child))?;
        node.parent = Some(parent);
        Ok(())
    }

    /// Remove a node and its whole subtree. Returns the removed ids.
    pub(crate) fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        if let Some(Parent::Node(parent_id)) = self.get(id).and_then(|n| n.parent) {
            if let Some(parent) = self.nodes.get_mut(parent_id) {
                parent.children.retain(|&c| c != id);
            }
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                removed.push(current);
            }
        }
        removed
    }

    /// Top-level widget that (transitively) contains `id`, or `id` itself.
    pub fn root_widget(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            match self.get(current)?.parent? {
                Parent::Canvas => return Some(current),
                Parent::Node(parent) => current = parent,
            }
        }
    }

    /// Whether every container from `id`'s parent up to its root widget is visible.
    pub fn container_chain_visible(&self, id: NodeId) -> bool {
        let mut current = self.get(id).and_then(|n| n.parent);
        while let Some(Parent::Node(parent_id)) = current {
            match self.get(parent_id) {
                Some(parent) if parent.visible => current = parent.parent,
                _ => return false,
            }
        }
        true
    }

    /// Pre-order depth-first list of every node under `id` (excluding `id`).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(node) = self.get(id) {
            for &child in &node.children {
                out.push(child);
                out.extend(self.descendants(child));
            }
        }
        out
    }

    /// Notify a control's observers and queue the event for the host.
    pub(crate) fn notify(&mut self, id: NodeId, kind: ControlEventKind) {
        let Some(element) = self.element_mut(id) else {
            return;
        };
        let event = ControlEvent {
            source: id,
            id: element.id.clone(),
            kind,
        };
        log::debug!("control {:?} ({}) raised {:?}", id, event.id, event.kind);
        element.observers.notify_observers(&event);
        self.events.push(event);
    }

    /// Drain queued control events.
    pub fn take_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use peniko::Color;

    fn widget_node() -> Node {
        Node::widget(Point::new(10.0, 10.0), Size::new(100.0, 100.0), Widget::new())
    }

    fn rect_node() -> Node {
        Node::element(Point::ZERO, Size::new(5.0, 5.0), Element::rectangle(Color::BLACK))
    }

    #[test]
    fn test_attach_and_root_widget() {
        let mut tree = NodeTree::new();
        let root = tree.insert(widget_node());
        tree.attach(Parent::Canvas, root).unwrap();
        let inner = tree.insert(widget_node());
        tree.attach(Parent::Node(root), inner).unwrap();
        let leaf = tree.insert(rect_node());
        tree.attach(Parent::Node(inner), leaf).unwrap();

        assert_eq!(tree.root_widget(leaf), Some(root));
        assert_eq!(tree.root_widget(root), Some(root));
        assert_eq!(tree.descendants(root), vec![inner, leaf]);
    }

    #[test]
    fn test_elements_cannot_hold_children() {
        let mut tree = NodeTree::new();
        let leaf = tree.insert(rect_node());
        let other = tree.insert(rect_node());
        assert!(matches!(
            tree.attach(Parent::Node(leaf), other),
            Err(UiError::NotAContainer(_))
        ));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut tree = NodeTree::new();
        let root = tree.insert(widget_node());
        tree.attach(Parent::Canvas, root).unwrap();
        let inner = tree.insert(widget_node());
        tree.attach(Parent::Node(root), inner).unwrap();
        let leaf = tree.insert(rect_node());
        tree.attach(Parent::Node(inner), leaf).unwrap();

        let removed = tree.remove(inner);
        assert_eq!(removed.len(), 2);
        assert!(tree.contains(root));
        assert!(!tree.contains(leaf));
        assert!(tree.get(root).unwrap().children().is_empty());
    }

    #[test]
    fn test_container_chain_visibility() {
        let mut tree = NodeTree::new();
        let root = tree.insert(widget_node());
        tree.attach(Parent::Canvas, root).unwrap();
        let inner = tree.insert(widget_node().with_visible(false));
        tree.attach(Parent::Node(root), inner).unwrap();
        let leaf = tree.insert(rect_node());
        tree.attach(Parent::Node(inner), leaf).unwrap();
        let sibling = tree.insert(rect_node());
        tree.attach(Parent::Node(root), sibling).unwrap();

        assert!(!tree.container_chain_visible(leaf));
        assert!(tree.container_chain_visible(sibling));
    }
}
