use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;
use web_time::{Duration, Instant};

/// Horizontal padding between a field's frame and its text, in layout units.
pub const TF_PADDING_X: f32 = 1.0;

const BLINK_PERIOD: Duration = Duration::from_millis(500);

pub struct TextMetrics {
    /// positions[i] = advance up to the i-th grapheme (len == graphemes + 1)
    pub positions: Vec<f32>,
    /// byte_offsets[i] = byte index of the i-th grapheme (last == text.len())
    pub byte_offsets: Vec<usize>,
}

/// Measures `text` in display columns, one entry per grapheme boundary.
pub fn measure_text(text: &str) -> TextMetrics {
    let mut positions = vec![0.0];
    let mut byte_offsets = Vec::new();
    let mut x = 0.0;
    for (i, g) in text.grapheme_indices(true) {
        byte_offsets.push(i);
        x += g.width() as f32;
        positions.push(x);
    }
    byte_offsets.push(text.len());
    TextMetrics {
        positions,
        byte_offsets,
    }
}

/// Grapheme index for a byte position.
pub fn byte_to_grapheme_index(m: &TextMetrics, byte: usize) -> usize {
    match m.byte_offsets.binary_search(&byte) {
        Ok(i) | Err(i) => i,
    }
}

fn prev_grapheme_boundary(text: &str, byte: usize) -> usize {
    text.grapheme_indices(true)
        .map(|(i, _)| i)
        .take_while(|i| *i < byte)
        .last()
        .unwrap_or(0)
}

fn next_grapheme_boundary(text: &str, byte: usize) -> usize {
    text.grapheme_indices(true)
        .map(|(i, _)| i)
        .find(|i| *i > byte)
        .unwrap_or(text.len())
}

/// Editing buffer for a single-line field.
#[derive(Clone, Debug)]
pub struct TextFieldState {
    pub text: String,
    /// Byte range; `start == end` is a plain caret.
    pub selection: Range<usize>,
    pub scroll_offset: f32,
    pub blink_start: Instant,
}

impl Default for TextFieldState {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFieldState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            selection: 0..0,
            scroll_offset: 0.0,
            blink_start: Instant::now(),
        }
    }

    /// Replaces the whole text; caret goes to the end and scrolling resets.
    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.scroll_offset = 0.0;
        }
        let end = self.text.len();
        self.selection = end..end;
        self.reset_caret_blink();
    }

    pub fn insert_text(&mut self, text: &str) {
        let (start, end) = self.ordered_selection();
        self.text.replace_range(start..end, text);
        let new_pos = start + text.len();
        self.selection = new_pos..new_pos;
        self.reset_caret_blink();
    }

    /// Removes the selection, or the grapheme before the caret.
    pub fn delete_backward(&mut self) {
        let (start, end) = self.ordered_selection();
        if start == end {
            self.selection = prev_grapheme_boundary(&self.text, end)..end;
        }
        self.insert_text("");
    }

    /// Removes the selection, or the grapheme after the caret.
    pub fn delete_forward(&mut self) {
        let (start, end) = self.ordered_selection();
        if start == end {
            self.selection = start..next_grapheme_boundary(&self.text, start);
        }
        self.insert_text("");
    }

    /// Moves the caret by `delta` graphemes; with `extend_selection` the
    /// selection anchor stays put.
    pub fn move_cursor(&mut self, delta: isize, extend_selection: bool) {
        let mut pos = self.selection.end.min(self.text.len());
        for _ in 0..delta.unsigned_abs() {
            pos = if delta < 0 {
                prev_grapheme_boundary(&self.text, pos)
            } else {
                next_grapheme_boundary(&self.text, pos)
            };
        }
        self.place_caret(pos, extend_selection);
    }

    pub fn move_home(&mut self, extend_selection: bool) {
        self.place_caret(0, extend_selection);
    }

    pub fn move_end(&mut self, extend_selection: bool) {
        self.place_caret(self.text.len(), extend_selection);
    }

    pub fn selected_text(&self) -> &str {
        let (start, end) = self.ordered_selection();
        &self.text[start..end]
    }

    pub fn caret_index(&self) -> usize {
        self.selection.end
    }

    /// Caret position in columns from the start of the text.
    pub fn caret_x(&self) -> f32 {
        let m = measure_text(&self.text);
        let i = byte_to_grapheme_index(&m, self.caret_index());
        m.positions.get(i).copied().unwrap_or(0.0)
    }

    /// Keep caret visible inside inner content width.
    pub fn ensure_caret_visible(&mut self, inner_width: f32) {
        let caret_x = self.caret_x();
        let inner_width = inner_width.max(1.0);
        if caret_x < self.scroll_offset {
            self.scroll_offset = caret_x;
        } else if caret_x > self.scroll_offset + inner_width - 1.0 {
            self.scroll_offset = (caret_x - inner_width + 1.0).max(0.0);
        }
    }

    /// The part of the text that fits in `inner_width` after scrolling, and
    /// the caret's column relative to the start of that slice.
    pub fn visible_slice(&self, inner_width: f32) -> (&str, f32) {
        let m = measure_text(&self.text);
        let first = m
            .positions
            .iter()
            .position(|x| *x >= self.scroll_offset)
            .unwrap_or(m.positions.len() - 1);
        let limit = m.positions[first] + inner_width.max(0.0);
        let last = m
            .positions
            .iter()
            .rposition(|x| *x <= limit)
            .unwrap_or(first)
            .max(first);
        let slice = &self.text[m.byte_offsets[first]..m.byte_offsets[last]];
        (slice, self.caret_x() - m.positions[first])
    }

    pub fn reset_caret_blink(&mut self) {
        self.blink_start = Instant::now();
    }

    pub fn caret_visible_at(&self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.blink_start);
        (elapsed.as_millis() / BLINK_PERIOD.as_millis()) % 2 == 0
    }

    fn place_caret(&mut self, pos: usize, extend_selection: bool) {
        if extend_selection {
            self.selection.end = pos;
        } else {
            self.selection = pos..pos;
        }
        self.reset_caret_blink();
    }

    fn ordered_selection(&self) -> (usize, usize) {
        let a = self.selection.start.min(self.text.len());
        let b = self.selection.end.min(self.text.len());
        (a.min(b), a.max(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textfield_insert() {
        let mut state = TextFieldState::new();
        state.insert_text("Hello");
        assert_eq!(state.text, "Hello");
        assert_eq!(state.selection, 5..5);
    }

    #[test]
    fn test_textfield_delete_backward() {
        let mut state = TextFieldState::new();
        state.insert_text("Hello");
        state.delete_backward();
        assert_eq!(state.text, "Hell");
        assert_eq!(state.selection, 4..4);
    }

    #[test]
    fn test_textfield_selection_replaced() {
        let mut state = TextFieldState::new();
        state.insert_text("Hello World");
        state.selection = 0..5;
        assert_eq!(state.selected_text(), "Hello");
        state.insert_text("Hi");
        assert_eq!(state.text, "Hi World");
        assert_eq!(state.selection, 2..2);
    }

    #[test]
    fn test_backward_selection_is_ordered() {
        let mut state = TextFieldState::new();
        state.insert_text("Grace");
        state.move_cursor(-3, true);
        assert_eq!(state.selected_text(), "ace");
        state.delete_forward();
        assert_eq!(state.text, "Gr");
    }

    #[test]
    fn test_textfield_cursor_movement() {
        let mut state = TextFieldState::new();
        state.insert_text("Hello");
        state.move_cursor(-2, false);
        assert_eq!(state.selection, 3..3);

        state.move_cursor(1, false);
        assert_eq!(state.selection, 4..4);

        state.move_home(false);
        assert_eq!(state.selection, 0..0);
        state.delete_backward();
        assert_eq!(state.text, "Hello");
        state.delete_forward();
        assert_eq!(state.text, "ello");

        state.move_end(false);
        assert_eq!(state.caret_index(), 4);
    }

    #[test]
    fn test_grapheme_delete_and_move() {
        // thumbs up + skin tone is one grapheme cluster
        let mut st = TextFieldState::new();
        st.insert_text("A\u{1F44D}\u{1F3FD}B");
        st.move_cursor(-1, false);
        assert_eq!(st.selection.end, "A\u{1F44D}\u{1F3FD}".len());
        st.delete_backward();
        assert_eq!(st.text, "AB");
        assert_eq!(st.selection, 1..1);
    }

    #[test]
    fn test_delete_forward_removes_whole_cluster() {
        let mut st = TextFieldState::new();
        st.insert_text("A\u{1F44D}\u{1F3FD}B");
        st.move_home(false);
        st.move_cursor(1, false);
        st.delete_forward();
        assert_eq!(st.text, "AB");
        assert_eq!(st.selection, 1..1);

        st.move_end(false);
        st.delete_forward();
        assert_eq!(st.text, "AB");
        assert_eq!(st.selection, 2..2);
    }

    #[test]
    fn test_set_text_moves_caret_to_end() {
        let mut st = TextFieldState::new();
        st.set_text("Lovelace");
        assert_eq!(st.selection, 8..8);
        st.insert_text("!");
        assert_eq!(st.text, "Lovelace!");
    }

    #[test]
    fn test_measure_wide_graphemes() {
        let m = measure_text("a\u{4E2D}b");
        assert_eq!(m.positions, vec![0.0, 1.0, 3.0, 4.0]);
        assert_eq!(m.byte_offsets, vec![0, 1, 4, 5]);
    }

    #[test]
    fn test_scroll_keeps_caret_visible() {
        let mut st = TextFieldState::new();
        st.set_text("abcdefghij");
        st.ensure_caret_visible(4.0);
        // caret at column 10 must be the last visible column
        assert_eq!(st.scroll_offset, 7.0);
        let (slice, caret) = st.visible_slice(4.0);
        assert_eq!(slice, "hij");
        assert_eq!(caret, 3.0);

        st.move_home(false);
        st.ensure_caret_visible(4.0);
        assert_eq!(st.scroll_offset, 0.0);
        assert_eq!(st.visible_slice(4.0), ("abcd", 0.0));
    }

    #[test]
    fn test_caret_blink_phases() {
        let st = TextFieldState::new();
        let t0 = st.blink_start;
        assert!(st.caret_visible_at(t0));
        assert!(!st.caret_visible_at(t0 + Duration::from_millis(600)));
        assert!(st.caret_visible_at(t0 + Duration::from_millis(1100)));
    }
}
