//! Pointer model.

use kurbo::{Point, Rect, Size, Vec2};
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Primary button state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MouseStatus {
    #[default]
    Up,
    Down,
}

/// Wheel movement seen this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollWheelStatus {
    Up,
    Down,
    #[default]
    None,
}

/// Which cursor glyph to draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorType {
    #[default]
    Default,
    Pointing,
}

impl CursorType {
    /// Texture name of the glyph.
    pub fn texture_name(self) -> &'static str {
        match self {
            CursorType::Default => "cursor/default.png",
            CursorType::Pointing => "cursor/pointing.png",
        }
    }
}

/// Hardware state supplied by the host once per logic frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Pointer position normalized to `[0, 1]` on both axes.
    pub pointer: Point,
    pub button_down: bool,
    pub wheel: ScrollWheelStatus,
    /// The host asked to leave interactive mode.
    pub cancel: bool,
    /// Current screen resolution in pixels.
    pub resolution: Size,
    pub timestamp: Instant,
}

impl FrameInput {
    pub fn new(resolution: Size, timestamp: Instant) -> Self {
        Self {
            pointer: Point::ORIGIN,
            button_down: false,
            wheel: ScrollWheelStatus::None,
            cancel: false,
            resolution,
            timestamp,
        }
    }

    pub fn with_pointer(mut self, pointer: Point) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_button(mut self, down: bool) -> Self {
        self.button_down = down;
        self
    }

    pub fn with_wheel(mut self, wheel: ScrollWheelStatus) -> Self {
        self.wheel = wheel;
        self
    }
}

/// Pointer position, button and wheel state as of the current logic frame.
#[derive(Debug, Clone)]
pub struct Cursor {
    /// Position in canvas logical space.
    position: Point,
    /// Glyph rectangle in screen space; its origin is the hot spot.
    bounds: Rect,
    size: Size,
    mouse_status: MouseStatus,
    scroll_wheel_status: ScrollWheelStatus,
    cursor_type: CursorType,
    pressed_at: Option<Instant>,
    click_duration: Duration,
    long_click_duration: Duration,
}

impl Cursor {
    pub fn new(size: Size, long_click_duration: Duration) -> Self {
        Self {
            position: Point::ORIGIN,
            bounds: Rect::ZERO,
            size,
            mouse_status: MouseStatus::Up,
            scroll_wheel_status: ScrollWheelStatus::None,
            cursor_type: CursorType::Default,
            pressed_at: None,
            click_duration: Duration::ZERO,
            long_click_duration,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Screen point used for hit testing.
    pub fn screen_point(&self) -> Point {
        self.bounds.origin()
    }

    pub fn mouse_status(&self) -> MouseStatus {
        self.mouse_status
    }

    pub fn scroll_wheel_status(&self) -> ScrollWheelStatus {
        self.scroll_wheel_status
    }

    pub fn cursor_type(&self) -> CursorType {
        self.cursor_type
    }

    pub fn set_cursor_type(&mut self, cursor_type: CursorType) {
        self.cursor_type = cursor_type;
    }

    /// Time since the button went down, zero while it is up.
    pub fn click_duration(&self) -> Duration {
        self.click_duration
    }

    pub fn long_click_duration(&self) -> Duration {
        self.long_click_duration
    }

    pub fn is_long_click(&self) -> bool {
        self.click_duration > self.long_click_duration
    }

    /// Refresh from this frame's hardware state.
    pub(crate) fn update(&mut self, input: &FrameInput, design_size: Size, scale: Vec2) {
        let x = input.pointer.x.clamp(0.0, 1.0);
        let y = input.pointer.y.clamp(0.0, 1.0);
        self.position = Point::new(x * design_size.width, y * design_size.height).round();
        self.update_bounds(scale);

        if input.button_down {
            if self.mouse_status == MouseStatus::Up {
                self.mouse_status = MouseStatus::Down;
                self.pressed_at = Some(input.timestamp);
            }
            self.click_duration = self
                .pressed_at
                .map_or(Duration::ZERO, |at| input.timestamp.saturating_duration_since(at));
        } else {
            self.release();
        }
        self.scroll_wheel_status = input.wheel;
    }

    pub(crate) fn update_bounds(&mut self, scale: Vec2) {
        let origin = Point::new(self.position.x * scale.x, self.position.y * scale.y);
        self.bounds = Rect::from_origin_size(
            origin,
            Size::new(self.size.width * scale.x, self.size.height * scale.y),
        );
    }

    /// Put the button back up without waiting for the hardware.
    pub(crate) fn force_release(&mut self) {
        if self.mouse_status != MouseStatus::Up {
            log::debug!("cursor forcing mouse release");
        }
        self.release();
        self.scroll_wheel_status = ScrollWheelStatus::None;
    }

    fn release(&mut self) {
        self.mouse_status = MouseStatus::Up;
        self.pressed_at = None;
        self.click_duration = Duration::ZERO;
    }
}
