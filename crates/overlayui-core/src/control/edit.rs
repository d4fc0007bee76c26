//! Single-line text editing.

/// A key already translated by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Enter,
}

/// Result of applying a key to an editable control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Unchanged,
    CaretMoved,
    Edited,
    Submitted,
}

/// Editable/focusable capability. The text itself lives on the element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditState {
    /// Caret position in chars.
    caret: usize,
    focused: bool,
    pub max_length: Option<usize>,
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..Self::default()
        }
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Enter or leave focus. Focusing puts the caret at the end of `text`.
    pub fn set_focused(&mut self, focused: bool, text: &str) {
        self.focused = focused;
        if focused {
            self.caret = text.chars().count();
        }
    }

    /// Apply a key to `text`.
    pub fn apply(&mut self, text: &mut String, key: KeyInput) -> EditOutcome {
        let len = text.chars().count();
        self.caret = self.caret.min(len);
        match key {
            KeyInput::Char(c) if c.is_control() => EditOutcome::Unchanged,
            KeyInput::Char(c) => {
                if self.max_length.is_some_and(|max| len >= max) {
                    return EditOutcome::Unchanged;
                }
                text.insert(byte_index(text, self.caret), c);
                self.caret += 1;
                EditOutcome::Edited
            }
            KeyInput::Backspace => {
                if self.caret == 0 {
                    return EditOutcome::Unchanged;
                }
                self.caret -= 1;
                text.remove(byte_index(text, self.caret));
                EditOutcome::Edited
            }
            KeyInput::Delete => {
                if self.caret == len {
                    return EditOutcome::Unchanged;
                }
                text.remove(byte_index(text, self.caret));
                EditOutcome::Edited
            }
            KeyInput::Left => self.move_caret(self.caret.saturating_sub(1)),
            KeyInput::Right => self.move_caret((self.caret + 1).min(len)),
            KeyInput::Home => self.move_caret(0),
            KeyInput::End => self.move_caret(len),
            KeyInput::Enter => EditOutcome::Submitted,
        }
    }

    fn move_caret(&mut self, to: usize) -> EditOutcome {
        if to == self.caret {
            EditOutcome::Unchanged
        } else {
            self.caret = to;
            EditOutcome::CaretMoved
        }
    }
}

/// Byte offset of the `chars`-th character.
pub(crate) fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}
