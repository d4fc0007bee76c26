//! Renderer trait abstraction.

use kurbo::{Point, Rect, Size};
use overlayui_core::{Canvas, TextMetrics, TextureHandle};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Frame error: {0}")]
    Frame(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Drawing primitives supplied by the host.
///
/// Everything is in screen pixels. Text measurement comes from the same
/// backend so layout and drawing agree.
pub trait Renderer: TextMetrics {
    /// Called once before any draw call of a frame.
    fn begin_frame(&mut self, _resolution: Size) -> RenderResult<()> {
        Ok(())
    }

    fn draw_rectangle(&mut self, rect: Rect, color: Color);

    /// Draw one line of text with its top-left at `position`, optionally clipped.
    fn draw_text(
        &mut self,
        text: &str,
        font: &str,
        font_size: f64,
        position: Point,
        color: Color,
        clip: Option<Rect>,
    );

    fn draw_texture(&mut self, texture: TextureHandle, rect: Rect);

    /// Called once after the last draw call of a frame.
    fn end_frame(&mut self) -> RenderResult<()> {
        Ok(())
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Drawn in place of textures the provider does not know.
    pub placeholder_color: Color,
    /// Draw the cursor glyph while the canvas is interactive.
    pub show_cursor: bool,
    /// Caret width in screen pixels.
    pub caret_width: f64,
}

impl<'a> RenderContext<'a> {
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            placeholder_color: Color::from_rgba8(0, 255, 0, 255), // Lime
            show_cursor: true,
            caret_width: 1.0,
        }
    }

    pub fn with_placeholder(mut self, color: Color) -> Self {
        self.placeholder_color = color;
        self
    }

    /// Hide the cursor, for hosts that draw their own.
    pub fn without_cursor(mut self) -> Self {
        self.show_cursor = false;
        self
    }

    pub fn with_caret_width(mut self, width: f64) -> Self {
        self.caret_width = width;
        self
    }
}
