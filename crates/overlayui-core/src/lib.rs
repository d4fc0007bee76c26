//! OverlayUI Core Library
//!
//! Retained-mode GUI overlay: a node tree of widgets and elements laid out in a
//! fixed design space, hit tested and driven by a small pointer state machine.

pub mod canvas;
pub mod config;
pub mod context;
pub mod control;
pub mod element;
pub mod error;
pub mod input;
pub mod layout;
pub mod node;
pub mod observer;
pub mod style;
pub mod widget;

pub use canvas::Canvas;
pub use config::CanvasConfig;
pub use context::{CanvasContext, MonospaceMetrics, TextMetrics, TextureHandle, TextureProvider, TextureTable};
pub use control::{Button, ButtonKind, Capabilities, EditState, KeyInput, ScrollView, Selection};
pub use element::{Element, ElementStyle, Fill, TextAlign, TextLayout};
pub use error::{UiError, UiResult};
pub use input::{Cursor, CursorType, FrameInput, MouseState, MouseStatus, ScrollWheelStatus};
pub use node::{Node, NodeId, NodeKind, NodeTree, Parent};
pub use observer::{ControlEvent, ControlEventKind, Observable, Observer, ObserverHandle};
pub use style::{PropertyRegistry, StyleProperties, StyleProvider, Stylesheet};
pub use widget::{Widget, WidgetManager};
