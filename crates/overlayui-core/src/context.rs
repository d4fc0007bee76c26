//! Per-canvas collaborator services.
//!
//! The core never rasterizes or loads assets itself. Text measurement and
//! texture lookup are supplied by the host through a [`CanvasContext`] that
//! lives and dies with its canvas.

use kurbo::Size;
use std::collections::HashMap;

/// Opaque host-side texture handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Measures text for layout.
pub trait TextMetrics {
    /// Size of `text` rendered with `font` at `font_size` screen pixels.
    fn measure_text(&self, text: &str, font: &str, font_size: f64) -> Size;
}

/// Looks up textures by owner (canvas id) and relative name.
pub trait TextureProvider {
    /// Returns `None` when the texture is unknown; callers fall back to a placeholder.
    fn get(&self, owner_id: &str, name: &str) -> Option<TextureHandle>;
}

/// Fixed-advance text metrics.
///
/// Good enough for layout when the host does not provide real font metrics.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    /// Glyph advance as a fraction of the font size.
    pub advance: f64,
    /// Line height as a fraction of the font size.
    pub line_height: f64,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.0,
        }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn measure_text(&self, text: &str, _font: &str, font_size: f64) -> Size {
        let chars = text.chars().count() as f64;
        Size::new(chars * font_size * self.advance, font_size * self.line_height)
    }
}

/// In-memory texture table keyed by owner id, then by name.
#[derive(Debug, Clone, Default)]
pub struct TextureTable {
    textures: HashMap<String, HashMap<String, TextureHandle>>,
}

impl TextureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture for an owner, replacing any previous handle.
    pub fn insert(&mut self, owner_id: &str, name: &str, handle: TextureHandle) {
        log::debug!("registered texture {} for {}", name, owner_id);
        self.textures
            .entry(owner_id.to_string())
            .or_default()
            .insert(name.to_string(), handle);
    }

    /// Drop every texture registered for an owner.
    pub fn remove_owner(&mut self, owner_id: &str) {
        self.textures.remove(owner_id);
    }

    /// Number of textures registered for an owner.
    pub fn len(&self, owner_id: &str) -> usize {
        self.textures.get(owner_id).map_or(0, |t| t.len())
    }
}

impl TextureProvider for TextureTable {
    fn get(&self, owner_id: &str, name: &str) -> Option<TextureHandle> {
        self.textures.get(owner_id)?.get(name).copied()
    }
}

/// Services owned by a single canvas.
pub struct CanvasContext {
    pub metrics: Box<dyn TextMetrics>,
    pub textures: Box<dyn TextureProvider>,
}

impl CanvasContext {
    pub fn new(metrics: Box<dyn TextMetrics>, textures: Box<dyn TextureProvider>) -> Self {
        Self { metrics, textures }
    }
}

impl Default for CanvasContext {
    fn default() -> Self {
        Self {
            metrics: Box::new(MonospaceMetrics::default()),
            textures: Box::new(TextureTable::new()),
        }
    }
}

impl std::fmt::Debug for CanvasContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_metrics() {
        let metrics = MonospaceMetrics::default();
        let size = metrics.measure_text("abcd", "Lucida Console", 10.0);
        assert!((size.width - 24.0).abs() < 1e-9);
        assert!((size.height - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_texture_lookup_is_per_owner() {
        let mut table = TextureTable::new();
        table.insert("canvas-a", "cursor/default.png", TextureHandle(1));

        assert_eq!(table.get("canvas-a", "cursor/default.png"), Some(TextureHandle(1)));
        assert_eq!(table.get("canvas-b", "cursor/default.png"), None);
        assert_eq!(table.get("canvas-a", "missing.png"), None);
        assert_eq!(table.len("canvas-a"), 1);

        table.remove_owner("canvas-a");
        assert_eq!(table.get("canvas-a", "cursor/default.png"), None);
    }
}
