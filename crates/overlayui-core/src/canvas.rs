//! Root of a UI: owns the node arena, the widget registry and the cursor.

use kurbo::{Point, Size, Vec2};
use std::time::Duration;
use uuid::Uuid;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use crate::config::CanvasConfig;
use crate::context::CanvasContext;
use crate::element::{Element, Fill};
use crate::error::{UiError, UiResult};
use crate::input::{Cursor, Dispatch, FrameInput, KeyInput, MouseState};
use crate::layout::{self, LayoutEnv};
use crate::node::{Node, NodeId, NodeKind, NodeTree, Parent};
use crate::observer::{ControlEvent, ControlEventKind, Observable, Observer, ObserverHandle};
use crate::style::{self, PropertyRegistry, StyleProvider};
use crate::widget::{Widget, WidgetManager};

fn layout_env<'a>(config: &CanvasConfig, scale: Vec2, context: &'a CanvasContext) -> LayoutEnv<'a> {
    LayoutEnv {
        canvas_scale: scale,
        design_size: config.design_size,
        min_thumb_length: config.min_thumb_length,
        metrics: context.metrics.as_ref(),
    }
}

/// A UI canvas laid over the host's screen.
///
/// The canvas is always at the origin and spans the design size in logical
/// units; `scale` maps that onto the current resolution. Hosts call
/// [`Canvas::on_logic_frame`] once per frame and then draw.
pub struct Canvas {
    id: String,
    config: CanvasConfig,
    tree: NodeTree,
    manager: WidgetManager,
    cursor: Cursor,
    context: CanvasContext,
    resolution: Size,
    scale: Vec2,
    interactive: bool,
    was_interactive: bool,
    stylesheet: Option<Box<dyn StyleProvider>>,
    element_properties: PropertyRegistry<Element>,
    widget_properties: PropertyRegistry<Widget>,
    frame_time: Option<Instant>,
    /// Focused control and the frame time it gained focus, for caret blink.
    focus_started: Option<(NodeId, Instant)>,
}

impl Canvas {
    /// Create a canvas with default text metrics and an empty texture table.
    pub fn new(config: CanvasConfig) -> Self {
        Self::with_context(config, CanvasContext::default())
    }

    /// Invalid tunables in `config` are logged and replaced by their defaults.
    pub fn with_context(config: CanvasConfig, context: CanvasContext) -> Self {
        let config = config.repaired();
        if let Some(level) = config.log_level {
            log::set_max_level(level);
        }
        let id = format!("canvas-{}", Uuid::new_v4());
        log::info!("[{}] created canvas {}", config.name, id);
        let cursor = Cursor::new(config.cursor_size, config.long_click_duration());
        let resolution = config.design_size;
        Self {
            id,
            config,
            tree: NodeTree::new(),
            manager: WidgetManager::new(),
            cursor,
            context,
            resolution,
            scale: Vec2::new(1.0, 1.0),
            interactive: false,
            was_interactive: false,
            stylesheet: None,
            element_properties: style::element_properties(),
            widget_properties: style::widget_properties(),
            frame_time: None,
            focus_started: None,
        }
    }

    /// Unique id, also the owner id for texture lookups.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn manager(&self) -> &WidgetManager {
        &self.manager
    }

    /// Top-level widgets in paint order.
    pub fn widgets(&self) -> &[NodeId] {
        self.manager.widgets()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn context(&self) -> &CanvasContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut CanvasContext {
        &mut self.context
    }

    pub fn resolution(&self) -> Size {
        self.resolution
    }

    /// Resolution divided by design size, per axis.
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Always the origin.
    pub fn position(&self) -> Point {
        Point::ORIGIN
    }

    /// The canvas cannot move; logs and ignores the request.
    pub fn move_to(&mut self, position: Point) {
        log::warn!(
            "[{}] ignoring request to move canvas to {:?}, canvas position is fixed",
            self.config.name,
            position
        );
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Timestamp of the last logic frame.
    pub fn frame_time(&self) -> Option<Instant> {
        self.frame_time
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.tree.element(id)
    }

    pub fn widget(&self, id: NodeId) -> Option<&Widget> {
        self.tree.widget(id)
    }

    /// Add a top-level widget on top of the z-order.
    pub fn add_widget(&mut self, node: Node) -> UiResult<NodeId> {
        if !node.is_widget() {
            log::warn!("[{}] only widgets can be added to the canvas", self.config.name);
            return Err(UiError::NotAWidget);
        }
        let id = self.tree.insert(node);
        self.tree.attach(Parent::Canvas, id)?;
        self.manager.add(id);
        self.apply_style(id);
        self.update_bounds(id);
        log::debug!("[{}] added widget {:?}", self.config.name, id);
        Ok(id)
    }

    /// Add a widget or element as the last item of `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> UiResult<NodeId> {
        let id = self.tree.insert(node);
        if let Err(e) = self.tree.attach(Parent::Node(parent), id) {
            log::warn!("[{}] cannot add child to {:?}: {}", self.config.name, parent, e);
            self.tree.remove(id);
            return Err(e);
        }
        self.apply_style(id);
        self.update_bounds(id);
        Ok(id)
    }

    /// Remove a node with its subtree, dropping every reference to it.
    pub fn remove(&mut self, id: NodeId) -> UiResult<()> {
        if !self.tree.contains(id) {
            return Err(UiError::NodeNotFound(id));
        }
        let removed = self.tree.remove(id);
        self.manager.forget(&removed);
        if self.focus_started.is_some_and(|(f, _)| removed.contains(&f)) {
            self.focus_started = None;
        }
        log::debug!("[{}] removed {} nodes", self.config.name, removed.len());
        Ok(())
    }

    /// Move a node to a new logical position relative to its parent.
    pub fn set_position(&mut self, id: NodeId, position: Point) -> UiResult<()> {
        let node = self.tree.get_mut(id).ok_or(UiError::NodeNotFound(id))?;
        node.position = position;
        self.update_bounds(id);
        Ok(())
    }

    pub fn set_size(&mut self, id: NodeId, size: Size) -> UiResult<()> {
        let node = self.tree.get_mut(id).ok_or(UiError::NodeNotFound(id))?;
        node.size = size;
        self.update_bounds(id);
        Ok(())
    }

    /// Set a widget's own scale, clamped to the configured range.
    ///
    /// Non-finite scales are rejected and leave the widget unchanged.
    pub fn set_widget_scale(&mut self, id: NodeId, scale: f64) -> UiResult<()> {
        if !self.tree.contains(id) {
            return Err(UiError::NodeNotFound(id));
        }
        let widget = self
            .tree
            .widget_mut(id)
            .ok_or(UiError::MissingCapability(id, "widget"))?;
        if !widget.set_widget_scale(scale, &self.config) {
            log::warn!("[{}] ignoring widget scale {} for {:?}", self.config.name, scale, id);
            return Err(UiError::InvalidValue {
                property: "widget_scale".to_string(),
                value: scale.to_string(),
            });
        }
        self.update_bounds(id);
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> UiResult<()> {
        let node = self.tree.get_mut(id).ok_or(UiError::NodeNotFound(id))?;
        node.visible = visible;
        Ok(())
    }

    /// Fit a top-level widget to the canvas, or restore it.
    pub fn set_maximized(&mut self, id: NodeId, maximized: bool) -> UiResult<()> {
        let node = self.tree.get_mut(id).ok_or(UiError::NodeNotFound(id))?;
        if node.parent() != Some(Parent::Canvas) {
            log::warn!("[{}] only top-level widgets can be maximized", self.config.name);
            return Ok(());
        }
        let widget = node
            .as_widget_mut()
            .ok_or(UiError::MissingCapability(id, "widget"))?;
        widget.set_maximized(maximized);
        self.update_bounds(id);
        Ok(())
    }

    /// Raise a top-level widget above all others.
    pub fn bring_to_front(&mut self, id: NodeId) -> bool {
        self.manager.bring_to_front(id)
    }

    /// Use a stylesheet and apply it to every node.
    pub fn set_stylesheet(&mut self, stylesheet: impl StyleProvider + 'static) {
        self.stylesheet = Some(Box::new(stylesheet));
        let ids: Vec<_> = self.tree.ids().collect();
        for id in ids {
            self.apply_style(id);
        }
        self.relayout();
    }

    /// Apply the node's named style, if any.
    fn apply_style(&mut self, id: NodeId) {
        let Some(stylesheet) = &self.stylesheet else {
            return;
        };
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        if node.style_name.is_empty() {
            return;
        }
        let Some(properties) = stylesheet.style(&node.style_name) else {
            log::warn!("[{}] unknown style {}", self.config.name, node.style_name);
            return;
        };
        match &mut node.kind {
            NodeKind::Element(element) => {
                self.element_properties.apply(element, properties);
            }
            NodeKind::Widget(widget) => {
                self.widget_properties.apply(widget, properties);
            }
        }
    }

    /// Enter or leave interactive mode.
    ///
    /// Leaving takes effect on the next logic frame.
    pub fn set_interactive(&mut self, interactive: bool) {
        if self.interactive != interactive {
            log::info!("[{}] interactive: {}", self.config.name, interactive);
        }
        self.interactive = interactive;
    }

    /// Recompute every node's bounds. Returns the number of nodes touched.
    pub fn relayout(&mut self) -> usize {
        let env = layout_env(&self.config, self.scale, &self.context);
        layout::update_all(&mut self.tree, self.manager.widgets(), &env)
    }

    fn update_bounds(&mut self, id: NodeId) -> usize {
        let env = layout_env(&self.config, self.scale, &self.context);
        layout::update_bounds(&mut self.tree, id, &env)
    }

    /// Advance one logic frame.
    pub fn on_logic_frame(&mut self, input: &FrameInput) {
        self.frame_time = Some(input.timestamp);
        if input.resolution != self.resolution {
            self.resolution_changed(input.resolution);
        }

        if input.cancel && self.interactive {
            self.set_interactive(false);
        }
        if !self.interactive {
            if self.was_interactive {
                self.leave_interactive();
            }
            return;
        }
        self.was_interactive = true;

        self.cursor.update(input, self.config.design_size, self.scale);
        let env = layout_env(&self.config, self.scale, &self.context);
        Dispatch {
            tree: &mut self.tree,
            manager: &mut self.manager,
            cursor: &mut self.cursor,
            env: &env,
            config: &self.config,
        }
        .update_widgets();
        self.track_focus(input.timestamp);
    }

    fn resolution_changed(&mut self, resolution: Size) {
        let design = self.config.design_size;
        if resolution.width <= 0.0 || resolution.height <= 0.0 {
            log::warn!("[{}] ignoring invalid resolution {:?}", self.config.name, resolution);
            return;
        }
        self.resolution = resolution;
        self.scale = Vec2::new(resolution.width / design.width, resolution.height / design.height);
        self.cursor.update_bounds(self.scale);
        let count = self.relayout();
        log::info!(
            "[{}] resolution changed to {}x{}, relaid {} nodes",
            self.config.name,
            resolution.width,
            resolution.height,
            count
        );
    }

    /// Unwind input state after interactive mode ends.
    fn leave_interactive(&mut self) {
        self.was_interactive = false;
        self.cursor.force_release();
        if self.manager.mouse_state() == MouseState::Down {
            let env = layout_env(&self.config, self.scale, &self.context);
            Dispatch {
                tree: &mut self.tree,
                manager: &mut self.manager,
                cursor: &mut self.cursor,
                env: &env,
                config: &self.config,
            }
            .release();
        }
        for &id in self.manager.widgets() {
            if let Some(node) = self.tree.get_mut(id) {
                if node.as_widget().is_some_and(|w| w.modal) && node.visible {
                    log::debug!("[{}] closing modal widget {:?}", self.config.name, id);
                    node.visible = false;
                }
            }
        }
        self.manager.set_focus(&mut self.tree, None);
        self.focus_started = None;
    }

    fn track_focus(&mut self, now: Instant) {
        match (self.manager.focused_control(), self.focus_started) {
            (Some(id), Some((started, _))) if id == started => {}
            (Some(id), _) => self.focus_started = Some((id, now)),
            (None, _) => self.focus_started = None,
        }
    }

    /// Whether the caret of the focused control is in the visible half of its blink.
    pub fn caret_visible(&self) -> bool {
        let (Some((_, started)), Some(now)) = (self.focus_started, self.frame_time) else {
            return false;
        };
        let rate = self.config.caret_blink_rate();
        if rate.is_zero() {
            return true;
        }
        let elapsed: Duration = now.saturating_duration_since(started);
        (elapsed.as_millis() / rate.as_millis()) % 2 == 0
    }

    /// Give keyboard focus to an editable control, or clear it.
    pub fn set_focus(&mut self, id: Option<NodeId>) -> UiResult<()> {
        if let Some(id) = id {
            if !self.tree.contains(id) {
                return Err(UiError::NodeNotFound(id));
            }
            let editable = self
                .tree
                .element(id)
                .is_some_and(|element| element.capabilities().editable);
            if !editable {
                return Err(UiError::MissingCapability(id, "editable"));
            }
        }
        self.manager.set_focus(&mut self.tree, id);
        if let Some(now) = self.frame_time {
            self.track_focus(now);
        }
        Ok(())
    }

    /// Feed a translated key to the focused control.
    ///
    /// Returns false when nothing has focus.
    pub fn handle_key(&mut self, key: KeyInput) -> bool {
        let Some(id) = self.manager.focused_control() else {
            return false;
        };
        let Some(element) = self.tree.element_mut(id) else {
            return false;
        };
        if let Some(event) = element.apply_key(key) {
            self.tree.notify(id, event);
        }
        if let (Some(now), Some((_, started))) = (self.frame_time, self.focus_started.as_mut()) {
            // Typing restarts the blink so the caret stays visible.
            *started = now;
        }
        true
    }

    /// Drain the control events raised since the last call.
    pub fn take_events(&mut self) -> Vec<ControlEvent> {
        self.tree.take_events()
    }

    fn element_mut(&mut self, id: NodeId) -> UiResult<&mut Element> {
        if !self.tree.contains(id) {
            return Err(UiError::NodeNotFound(id));
        }
        self.tree
            .element_mut(id)
            .ok_or(UiError::MissingCapability(id, "element"))
    }

    /// Append a line to a scrollable control.
    pub fn push_line(&mut self, id: NodeId, line: impl Into<String>) -> UiResult<()> {
        let scroll = self
            .element_mut(id)?
            .scroll
            .as_mut()
            .ok_or(UiError::MissingCapability(id, "scrollable"))?;
        scroll.push_line(line);
        self.tree.notify(id, ControlEventKind::LinesChanged);
        Ok(())
    }

    /// Replace the text of an existing line.
    pub fn set_line(&mut self, id: NodeId, index: usize, line: impl Into<String>) -> UiResult<()> {
        let scroll = self
            .element_mut(id)?
            .scroll
            .as_mut()
            .ok_or(UiError::MissingCapability(id, "scrollable"))?;
        scroll.set_line(index, line)?;
        self.tree.notify(id, ControlEventKind::LinesChanged);
        Ok(())
    }

    /// Remove every line and any selection.
    pub fn clear_lines(&mut self, id: NodeId) -> UiResult<()> {
        let element = self.element_mut(id)?;
        let scroll = element
            .scroll
            .as_mut()
            .ok_or(UiError::MissingCapability(id, "scrollable"))?;
        scroll.clear();
        let mut had_selection = false;
        if let Some(selection) = &mut element.selection {
            had_selection = selection.selected_index().is_some();
            selection.clear();
        }
        if had_selection {
            self.tree.notify(id, ControlEventKind::Selected(None));
        }
        self.tree.notify(id, ControlEventKind::LinesChanged);
        Ok(())
    }

    /// Remove a line from a scrollable control, adjusting its selection.
    pub fn remove_line(&mut self, id: NodeId, index: usize) -> UiResult<()> {
        let element = self.element_mut(id)?;
        if element.scroll.is_none() {
            return Err(UiError::MissingCapability(id, "scrollable"));
        }
        for event in element.remove_line(index)? {
            self.tree.notify(id, event);
        }
        Ok(())
    }

    /// Select a line of a selectable control. Out-of-range indices change nothing.
    pub fn select_index(&mut self, id: NodeId, index: usize) -> UiResult<()> {
        let element = self.element_mut(id)?;
        if element.selection.is_none() {
            return Err(UiError::MissingCapability(id, "selectable"));
        }
        let event = element.select_index(index)?;
        self.tree.notify(id, event);
        Ok(())
    }

    /// Clear the selection of a selectable control.
    pub fn clear_selection(&mut self, id: NodeId) -> UiResult<()> {
        let selection = self
            .element_mut(id)?
            .selection
            .as_mut()
            .ok_or(UiError::MissingCapability(id, "selectable"))?;
        if selection.selected_index().is_some() {
            selection.clear();
            self.tree.notify(id, ControlEventKind::Selected(None));
        }
        Ok(())
    }

    /// Scroll so `line` is the first visible line, clamped to the valid range.
    pub fn scroll_to(&mut self, id: NodeId, line: i64) -> UiResult<()> {
        let scroll = self
            .element_mut(id)?
            .scroll
            .as_mut()
            .ok_or(UiError::MissingCapability(id, "scrollable"))?;
        scroll.scroll_to(line);
        Ok(())
    }

    /// Replace an element's text and re-measure it.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> UiResult<()> {
        self.element_mut(id)?.text = Some(text.into());
        self.update_bounds(id);
        Ok(())
    }

    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> UiResult<()> {
        self.element_mut(id)?.enabled = enabled;
        Ok(())
    }

    pub fn set_fill(&mut self, id: NodeId, fill: Fill) -> UiResult<()> {
        match self.tree.get_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Element(element)) => element.fill = fill,
            Some(NodeKind::Widget(widget)) => widget.background = fill,
            None => return Err(UiError::NodeNotFound(id)),
        }
        Ok(())
    }

    /// Set a toggle button's state without raising an event.
    pub fn set_active(&mut self, id: NodeId, active: bool) -> UiResult<()> {
        let button = self
            .element_mut(id)?
            .button
            .as_mut()
            .ok_or(UiError::MissingCapability(id, "clickable"))?;
        button.set_active(active);
        Ok(())
    }

    pub fn add_observer(&mut self, id: NodeId, observer: Box<dyn Observer>) -> UiResult<ObserverHandle> {
        Ok(self.element_mut(id)?.add_observer(observer))
    }

    pub fn remove_observer(&mut self, id: NodeId, handle: ObserverHandle) -> UiResult<bool> {
        Ok(self.element_mut(id)?.remove_observer(handle))
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("id", &self.id)
            .field("name", &self.config.name)
            .field("nodes", &self.tree.len())
            .field("widgets", &self.manager.widgets().len())
            .field("resolution", &self.resolution)
            .field("interactive", &self.interactive)
            .finish_non_exhaustive()
    }
}
