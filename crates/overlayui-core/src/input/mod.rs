//! Pointer and keyboard input.

mod cursor;
mod mouse;

pub use cursor::{Cursor, CursorType, FrameInput, MouseStatus, ScrollWheelStatus};
pub use mouse::MouseState;
pub(crate) use mouse::Dispatch;

pub use crate::control::KeyInput;
