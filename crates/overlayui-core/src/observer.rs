//! Observer lists for control notifications.
//!
//! Controls keep a plain list of boxed callbacks. Every notification is also
//! queued on the node tree so hosts can poll events instead of registering
//! callbacks.

use crate::node::NodeId;

/// What happened to a control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEventKind {
    /// A clickable control was pressed.
    Clicked,
    /// A toggle button changed state.
    Toggled(bool),
    /// The selection of a selectable control changed.
    Selected(Option<usize>),
    /// Lines were added to or removed from a line view.
    LinesChanged,
    /// The text of an editable control changed.
    Edited(String),
    /// Enter was pressed in an editable control.
    Submitted(String),
    /// Keyboard focus entered or left a control.
    Focus(bool),
}

/// A notification raised by a control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlEvent {
    /// The node that raised the event.
    pub source: NodeId,
    /// User-facing id of the control (e.g. "ok").
    pub id: String,
    pub kind: ControlEventKind,
}

/// Receives control notifications.
pub trait Observer {
    fn on_updated(&mut self, event: &ControlEvent);
}

impl<F> Observer for F
where
    F: FnMut(&ControlEvent),
{
    fn on_updated(&mut self, event: &ControlEvent) {
        self(event)
    }
}

/// Handle returned by [`Observable::add_observer`], used to remove the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

/// Something observers can subscribe to.
pub trait Observable {
    fn add_observer(&mut self, observer: Box<dyn Observer>) -> ObserverHandle;

    /// Returns false if the handle was not registered.
    fn remove_observer(&mut self, handle: ObserverHandle) -> bool;

    fn notify_observers(&mut self, event: &ControlEvent);
}

/// A plain list of observers.
#[derive(Default)]
pub struct ObserverList {
    next_handle: u64,
    observers: Vec<(ObserverHandle, Box<dyn Observer>)>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Observable for ObserverList {
    fn add_observer(&mut self, observer: Box<dyn Observer>) -> ObserverHandle {
        let handle = ObserverHandle(self.next_handle);
        self.next_handle += 1;
        self.observers.push((handle, observer));
        handle
    }

    fn remove_observer(&mut self, handle: ObserverHandle) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(h, _)| *h != handle);
        self.observers.len() != before
    }

    fn notify_observers(&mut self, event: &ControlEvent) {
        for (_, observer) in &mut self.observers {
            observer.on_updated(event);
        }
    }
}

impl std::fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList")
            .field("observers", &self.observers.len())
            .finish()
    }
}
