//! Composite widgets built on the OverlayUI core.
//!
//! - **Dialog**: modal message box with an OK button
//! - **Tabs**: tab buttons switching between child widgets
//! - **List**: typed list model bound to a list view

pub mod dialog;
pub mod list;
pub mod tabs;

pub use dialog::Dialog;
pub use list::{ListBinding, ListModel, ModelChange};
pub use tabs::TabbedWidget;

/// Standard colors used across widgets.
pub mod theme {
    use peniko::Color;

    /// Dialog body.
    pub const DIALOG_BG: Color = Color::from_rgba8(112, 112, 112, 255);
    /// Dialog button face.
    pub const BUTTON_BG: Color = Color::from_rgba8(64, 64, 64, 255);
    /// Dialog button text.
    pub const BUTTON_TEXT: Color = Color::from_rgba8(224, 224, 224, 255);
}
