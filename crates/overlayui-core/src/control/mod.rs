//! Interactive capabilities an element can carry.
//!
//! An element becomes a control by holding at least one of these. They are
//! composable: a list view is scrollable and selectable at the same time.

mod button;
mod edit;
mod scroll;
mod select;

pub use button::{Button, ButtonKind};
pub use edit::{EditOutcome, EditState, KeyInput};
pub use scroll::ScrollView;
pub use select::Selection;

/// Which capabilities an element carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub clickable: bool,
    pub scrollable: bool,
    pub selectable: bool,
    pub editable: bool,
}

impl Capabilities {
    /// True if the element is a control at all.
    pub fn any(&self) -> bool {
        self.clickable || self.scrollable || self.selectable || self.editable
    }
}
