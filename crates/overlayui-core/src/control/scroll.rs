//! Line scrolling and scrollbar geometry.

use kurbo::{Point, Rect};

use crate::config::MIN_THUMB_LENGTH;
use crate::error::{UiError, UiResult};
use crate::input::ScrollWheelStatus;

/// Scrollable capability: a list of lines shown through a fixed viewport.
///
/// The viewport, line pitch and scrollbar width are screen-space values
/// refreshed by every layout pass. Everything else is logical state.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollView {
    lines: Vec<String>,
    first_visible_line: usize,
    max_visible_lines: usize,
    /// Keep the last line visible when lines are appended.
    pub auto_scroll: bool,
    viewport: Rect,
    line_pitch: f64,
    scrollbar_width: f64,
    min_thumb_length: f64,
    /// Cursor offset from the thumb top while drag-scrolling.
    grab_offset: Option<f64>,
}

impl Default for ScrollView {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            first_visible_line: 0,
            max_visible_lines: 1,
            auto_scroll: true,
            viewport: Rect::ZERO,
            line_pitch: 0.0,
            scrollbar_width: 0.0,
            min_thumb_length: MIN_THUMB_LENGTH,
            grab_offset: None,
        }
    }
}

impl ScrollView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view with a fixed number of visible lines, before any layout.
    pub fn with_max_visible_lines(max_visible_lines: usize) -> Self {
        Self {
            max_visible_lines,
            ..Self::default()
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn first_visible_line(&self) -> usize {
        self.first_visible_line
    }

    pub fn max_visible_lines(&self) -> usize {
        self.max_visible_lines
    }

    /// Largest valid value of the first visible line.
    pub fn max_first_line(&self) -> usize {
        self.lines.len().saturating_sub(self.max_visible_lines)
    }

    /// Indices of the lines currently shown.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let end = (self.first_visible_line + self.max_visible_lines).min(self.lines.len());
        self.first_visible_line.min(end)..end
    }

    /// Append a line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        if self.auto_scroll && self.lines.len() > self.max_visible_lines {
            self.first_visible_line = self.max_first_line();
        }
    }

    /// Replace the text of an existing line.
    pub fn set_line(&mut self, index: usize, line: impl Into<String>) -> UiResult<()> {
        let len = self.lines.len();
        let slot = self
            .lines
            .get_mut(index)
            .ok_or(UiError::IndexOutOfRange { index, len })?;
        *slot = line.into();
        Ok(())
    }

    /// Remove a line, keeping the first visible line in range.
    pub fn remove_line(&mut self, index: usize) -> UiResult<String> {
        if index >= self.lines.len() {
            return Err(UiError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        let line = self.lines.remove(index);
        self.first_visible_line = self.first_visible_line.min(self.max_first_line());
        Ok(line)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.first_visible_line = 0;
        self.grab_offset = None;
    }

    /// Step the view by one line in the wheel's direction.
    pub fn scroll(&mut self, status: ScrollWheelStatus) {
        match status {
            ScrollWheelStatus::Up => {
                self.first_visible_line = self.first_visible_line.saturating_sub(1);
            }
            ScrollWheelStatus::Down => {
                if self.lines.len() > self.max_visible_lines
                    && self.first_visible_line < self.max_first_line()
                {
                    self.first_visible_line += 1;
                }
            }
            ScrollWheelStatus::None => {}
        }
    }

    /// Jump to a line, clamped into the valid range. Negative input lands at 0.
    pub fn scroll_to(&mut self, line: i64) {
        let max = self.max_first_line();
        self.first_visible_line = usize::try_from(line.max(0)).unwrap_or(usize::MAX).min(max);
    }

    /// Refresh screen geometry after a layout pass.
    pub(crate) fn set_geometry(
        &mut self,
        viewport: Rect,
        line_pitch: f64,
        scrollbar_width: f64,
        min_thumb_length: f64,
    ) {
        self.viewport = viewport;
        self.line_pitch = line_pitch;
        self.scrollbar_width = scrollbar_width;
        self.min_thumb_length = min_thumb_length;
        if line_pitch > 0.0 {
            self.max_visible_lines = (viewport.height() / line_pitch).floor() as usize;
        }
        self.first_visible_line = self.first_visible_line.min(self.max_first_line());
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn line_pitch(&self) -> f64 {
        self.line_pitch
    }

    /// A scrollbar exists only while there are more lines than fit.
    pub fn has_scrollbar(&self) -> bool {
        self.scrollbar_width > 0.0 && self.lines.len() > self.max_visible_lines
    }

    /// Outer scrollbar rectangle along the right edge of the viewport.
    pub fn track_bounds(&self) -> Option<Rect> {
        if !self.has_scrollbar() {
            return None;
        }
        let v = self.viewport;
        Some(Rect::new(v.x1 - self.scrollbar_width, v.y0, v.x1, v.y1))
    }

    fn thumb_length(&self) -> f64 {
        let total = self.lines.len().max(1) as f64;
        let proportional = self.viewport.height() * self.max_visible_lines as f64 / total;
        proportional.max(self.min_thumb_length)
    }

    /// Free travel of the thumb inside the track.
    fn slot_length(&self) -> f64 {
        self.viewport.height() - self.thumb_length()
    }

    /// Inner scrollbar rectangle.
    pub fn thumb_bounds(&self) -> Option<Rect> {
        let track = self.track_bounds()?;
        let length = self.thumb_length();
        let max_first = self.max_first_line();
        let ratio = if max_first == 0 {
            0.0
        } else {
            self.first_visible_line as f64 / max_first as f64
        };
        let top = track.y0 + self.slot_length() * ratio;
        Some(Rect::new(track.x0, top, track.x1, top + length))
    }

    pub fn scrollbar_contains(&self, point: Point) -> bool {
        self.track_bounds().is_some_and(|t| t.contains(point))
    }

    /// Begin a drag-scroll. Pressing outside the thumb centres it on the cursor first.
    pub fn scrollbar_click(&mut self, point: Point) {
        let Some(thumb) = self.thumb_bounds() else {
            return;
        };
        if thumb.contains(point) {
            self.grab_offset = Some(point.y - thumb.y0);
        } else {
            self.grab_offset = Some(thumb.height() / 2.0);
            self.drag_scroll(point);
        }
    }

    pub fn is_drag_scrolling(&self) -> bool {
        self.grab_offset.is_some()
    }

    /// Move the view so the thumb follows the cursor.
    pub fn drag_scroll(&mut self, point: Point) {
        let Some(grab) = self.grab_offset else {
            return;
        };
        let slot = self.slot_length();
        if slot <= 0.0 {
            return;
        }
        let max_first = self.max_first_line();
        let top = point.y - grab - self.viewport.y0;
        let line = (top / slot * max_first as f64).round();
        self.first_visible_line = (line.max(0.0) as usize).min(max_first);
    }

    pub fn stop_drag_scrolling(&mut self) {
        self.grab_offset = None;
    }

    /// Screen rectangle of the `row`-th visible line.
    pub fn line_bounds(&self, row: usize) -> Rect {
        let v = self.viewport;
        let right = if self.has_scrollbar() {
            v.x1 - self.scrollbar_width
        } else {
            v.x1
        };
        let top = v.y0 + row as f64 * self.line_pitch;
        Rect::new(v.x0, top, right, top + self.line_pitch)
    }

    /// Absolute index of the line under a screen point.
    pub fn line_at(&self, point: Point) -> Option<usize> {
        self.visible_range()
            .enumerate()
            .find(|(row, _)| self.line_bounds(*row).contains(point))
            .map(|(_, index)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with_lines(count: usize, visible: usize) -> ScrollView {
        let mut view = ScrollView::with_max_visible_lines(visible);
        view.auto_scroll = false;
        for i in 0..count {
            view.push_line(format!("line {i}"));
        }
        view
    }

    fn laid_out(count: usize) -> ScrollView {
        // 100px tall viewport, 25px lines: 4 visible.
        let mut view = view_with_lines(count, 4);
        view.set_geometry(Rect::new(0.0, 0.0, 200.0, 100.0), 25.0, 8.0, 10.0);
        view
    }

    #[test]
    fn test_ten_lines_four_visible() {
        let mut view = view_with_lines(10, 4);
        view.scroll_to(100);
        assert_eq!(view.first_visible_line(), 6);
        for _ in 0..3 {
            view.scroll(ScrollWheelStatus::Up);
        }
        assert_eq!(view.first_visible_line(), 3);
    }

    #[test]
    fn test_scroll_to_clamps() {
        let mut view = view_with_lines(10, 4);
        view.scroll_to(-5);
        assert_eq!(view.first_visible_line(), 0);
        view.scroll_to(i64::MAX);
        assert_eq!(view.first_visible_line(), 6);

        let mut short = view_with_lines(2, 4);
        short.scroll_to(100);
        assert_eq!(short.first_visible_line(), 0);
    }

    #[test]
    fn test_wheel_bounds() {
        let mut view = view_with_lines(5, 4);
        view.scroll(ScrollWheelStatus::Up);
        assert_eq!(view.first_visible_line(), 0);
        view.scroll(ScrollWheelStatus::Down);
        view.scroll(ScrollWheelStatus::Down);
        assert_eq!(view.first_visible_line(), 1);

        let mut short = view_with_lines(3, 4);
        short.scroll(ScrollWheelStatus::Down);
        assert_eq!(short.first_visible_line(), 0);
    }

    #[test]
    fn test_auto_scroll_follows_appends() {
        let mut view = ScrollView::with_max_visible_lines(4);
        for i in 0..10 {
            view.push_line(format!("{i}"));
        }
        assert_eq!(view.first_visible_line(), 6);
        assert_eq!(view.visible_range(), 6..10);
    }

    #[test]
    fn test_geometry_derives_visible_lines() {
        let view = laid_out(10);
        assert_eq!(view.max_visible_lines(), 4);
        assert!(view.has_scrollbar());
        assert_eq!(view.track_bounds(), Some(Rect::new(192.0, 0.0, 200.0, 100.0)));
        // 100 * 4 / 10 = 40px thumb at the top.
        assert_eq!(view.thumb_bounds(), Some(Rect::new(192.0, 0.0, 200.0, 40.0)));
    }

    #[test]
    fn test_thumb_has_minimum_length() {
        let view = laid_out(1000);
        let thumb = view.thumb_bounds().unwrap();
        assert!((thumb.height() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_thumb_position_tracks_first_line() {
        let mut view = laid_out(10);
        view.scroll_to(6);
        let thumb = view.thumb_bounds().unwrap();
        assert!((thumb.y1 - 100.0).abs() < 1e-9);
        view.scroll_to(3);
        let thumb = view.thumb_bounds().unwrap();
        assert!((thumb.y0 - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_scroll_to_current_position_is_idempotent() {
        for first in 0..=6 {
            let mut view = laid_out(10);
            view.scroll_to(first);
            let thumb = view.thumb_bounds().unwrap();
            let grab = Point::new(thumb.center().x, thumb.y0 + 7.0);
            view.scrollbar_click(grab);
            view.drag_scroll(grab);
            assert_eq!(view.first_visible_line(), first as usize);
        }
    }

    #[test]
    fn test_drag_scroll_follows_cursor() {
        let mut view = laid_out(10);
        view.scrollbar_click(Point::new(195.0, 5.0));
        assert!(view.is_drag_scrolling());
        // slot = 60px for 6 lines: 10px per line.
        view.drag_scroll(Point::new(195.0, 35.0));
        assert_eq!(view.first_visible_line(), 3);
        view.drag_scroll(Point::new(195.0, 500.0));
        assert_eq!(view.first_visible_line(), 6);
        view.drag_scroll(Point::new(195.0, -500.0));
        assert_eq!(view.first_visible_line(), 0);
        view.stop_drag_scrolling();
        view.drag_scroll(Point::new(195.0, 35.0));
        assert_eq!(view.first_visible_line(), 0);
    }

    #[test]
    fn test_zero_length_slot_is_noop() {
        let mut view = view_with_lines(5, 4);
        // Thumb minimum is larger than the whole track.
        view.set_geometry(Rect::new(0.0, 0.0, 100.0, 8.0), 2.0, 8.0, 10.0);
        view.scroll_to(1);
        view.scrollbar_click(Point::new(95.0, 4.0));
        view.drag_scroll(Point::new(95.0, 400.0));
        assert_eq!(view.first_visible_line(), 1);
    }

    #[test]
    fn test_line_at_accounts_for_scroll() {
        let mut view = laid_out(10);
        view.scroll_to(2);
        assert_eq!(view.line_at(Point::new(10.0, 30.0)), Some(3));
        assert_eq!(view.line_at(Point::new(10.0, 150.0)), None);
        // The scrollbar column is not part of any line.
        assert_eq!(view.line_at(Point::new(195.0, 30.0)), None);
    }

    #[test]
    fn test_remove_line_rejects_stale_index() {
        let mut view = view_with_lines(3, 4);
        assert!(matches!(
            view.remove_line(3),
            Err(UiError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert_eq!(view.len(), 3);
        assert_eq!(view.remove_line(1).unwrap(), "line 1");
        assert_eq!(view.lines(), ["line 0", "line 2"]);
    }
}
