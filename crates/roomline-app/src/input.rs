//! Terminal-agnostic keyboard input and the line editor.

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries so the same key
/// handling runs under crossterm and in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key (submit).
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Escape key (quit).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
}

/// Input line state.
///
/// The cursor counts characters, not bytes, so multi-byte input edits
/// cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position in characters.
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Empty the buffer and reset the cursor.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Apply an editing key.
    ///
    /// Returns `false` for keys that are not line edits (Enter, Esc).
    pub fn edit(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.char_len() {
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.char_len(),
            KeyInput::Enter | KeyInput::Esc => return false,
        }
        true
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputState {
        let mut input = InputState::new();
        for c in text.chars() {
            input.edit(KeyInput::Char(c));
        }
        input
    }

    #[test]
    fn typing_appends_at_cursor() {
        let mut input = typed("hllo");
        input.edit(KeyInput::Home);
        input.edit(KeyInput::Right);
        input.edit(KeyInput::Char('e'));

        assert_eq!(input.buffer(), "hello");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn backspace_and_delete() {
        let mut input = typed("abc");
        input.edit(KeyInput::Backspace);
        assert_eq!(input.buffer(), "ab");

        input.edit(KeyInput::Home);
        input.edit(KeyInput::Delete);
        assert_eq!(input.buffer(), "b");

        // At the edges these are no-ops
        input.edit(KeyInput::Home);
        input.edit(KeyInput::Backspace);
        input.edit(KeyInput::End);
        input.edit(KeyInput::Delete);
        assert_eq!(input.buffer(), "b");
    }

    #[test]
    fn multibyte_characters_edit_by_char() {
        let mut input = typed("héllo");
        input.edit(KeyInput::Left);
        input.edit(KeyInput::Left);
        input.edit(KeyInput::Left);
        input.edit(KeyInput::Backspace);

        assert_eq!(input.buffer(), "hllo");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = typed("ab");
        input.edit(KeyInput::Right);
        input.edit(KeyInput::Right);
        assert_eq!(input.cursor(), 2);

        input.edit(KeyInput::Home);
        input.edit(KeyInput::Left);
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn submit_keys_are_not_edits() {
        let mut input = typed("x");
        assert!(!input.edit(KeyInput::Enter));
        assert!(!input.edit(KeyInput::Esc));
        assert_eq!(input.buffer(), "x");
    }
}
