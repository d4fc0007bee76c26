//! OverlayUI Render Library
//!
//! Renderer abstraction and the per-frame draw pass. Hosts implement
//! [`Renderer`] on top of their own drawing primitives; [`RecordingRenderer`]
//! captures draw calls for headless hosts and tests.

mod draw;
mod recording;
mod renderer;

pub use draw::draw_canvas;
pub use recording::{DrawCommand, RecordingRenderer};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
