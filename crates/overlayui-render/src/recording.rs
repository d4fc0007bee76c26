//! A renderer that records draw calls instead of rasterizing them.

use kurbo::{Point, Rect, Size};
use overlayui_core::{MonospaceMetrics, TextMetrics, TextureHandle};
use peniko::Color;

use crate::renderer::{RenderResult, Renderer, RendererError};

/// One recorded draw call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Rectangle {
        rect: Rect,
        color: Color,
    },
    Text {
        text: String,
        font: String,
        font_size: f64,
        position: Point,
        color: Color,
        clip: Option<Rect>,
    },
    Texture {
        texture: TextureHandle,
        rect: Rect,
    },
}

/// Records each frame's draw calls, measuring text with monospace metrics.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    metrics: MonospaceMetrics,
    commands: Vec<DrawCommand>,
    in_frame: bool,
    frames: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: MonospaceMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    /// Commands of the current (or last finished) frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of completed frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Texts drawn this frame, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Rectangles drawn with exactly this color.
    pub fn rectangles_with(&self, color: Color) -> Vec<Rect> {
        let wanted = color.to_rgba8();
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rectangle { rect, color } if color.to_rgba8() == wanted => Some(*rect),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, command: DrawCommand) {
        if !self.in_frame {
            log::warn!("draw call outside of a frame: {:?}", command);
        }
        self.commands.push(command);
    }
}

impl TextMetrics for RecordingRenderer {
    fn measure_text(&self, text: &str, font: &str, font_size: f64) -> Size {
        self.metrics.measure_text(text, font, font_size)
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, _resolution: Size) -> RenderResult<()> {
        if self.in_frame {
            return Err(RendererError::Frame("frame already in progress".to_string()));
        }
        self.in_frame = true;
        self.commands.clear();
        Ok(())
    }

    fn draw_rectangle(&mut self, rect: Rect, color: Color) {
        self.record(DrawCommand::Rectangle { rect, color });
    }

    fn draw_text(
        &mut self,
        text: &str,
        font: &str,
        font_size: f64,
        position: Point,
        color: Color,
        clip: Option<Rect>,
    ) {
        self.record(DrawCommand::Text {
            text: text.to_string(),
            font: font.to_string(),
            font_size,
            position,
            color,
            clip,
        });
    }

    fn draw_texture(&mut self, texture: TextureHandle, rect: Rect) {
        self.record(DrawCommand::Texture { texture, rect });
    }

    fn end_frame(&mut self) -> RenderResult<()> {
        if !self.in_frame {
            return Err(RendererError::Frame("no frame in progress".to_string()));
        }
        self.in_frame = false;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_bracketing() {
        let mut renderer = RecordingRenderer::new();
        assert!(renderer.end_frame().is_err());

        renderer.begin_frame(Size::new(1920.0, 1080.0)).unwrap();
        assert!(renderer.begin_frame(Size::new(1920.0, 1080.0)).is_err());
        renderer.draw_rectangle(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        renderer.end_frame().unwrap();

        assert_eq!(renderer.frames(), 1);
        assert_eq!(renderer.rectangles_with(Color::BLACK).len(), 1);
        assert!(renderer.rectangles_with(Color::WHITE).is_empty());
    }

    #[test]
    fn test_new_frame_clears_commands() {
        let mut renderer = RecordingRenderer::new();
        for text in ["a", "b"] {
            renderer.begin_frame(Size::new(10.0, 10.0)).unwrap();
            renderer.draw_text(text, "Lucida Console", 14.0, Point::ZERO, Color::BLACK, None);
            renderer.end_frame().unwrap();
        }
        assert_eq!(renderer.texts(), vec!["b"]);
    }
}
