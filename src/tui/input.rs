//! Single-line text input for the terminal user interface.

/// A text input with a cursor counted in characters, not bytes.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte offset of the character the cursor sits before.
    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Take the text out, leaving the field empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_handles_multibyte_characters() {
        let mut input = InputField::new();
        for c in "héllo".chars() {
            input.handle_char(c);
        }
        input.move_cursor_left();
        input.move_cursor_left();
        input.handle_backspace();
        assert_eq!(input.value, "hélo");
        input.handle_char('✓');
        assert_eq!(input.value, "hé✓lo");
        input.handle_delete();
        assert_eq!(input.value, "hé✓o");
        assert_eq!(input.take(), "hé✓o");
        assert_eq!(input.cursor, 0);
        assert!(input.value.is_empty());
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = InputField::new();
        input.move_cursor_left();
        input.handle_backspace();
        input.handle_delete();
        input.handle_char('a');
        input.move_cursor_right();
        assert_eq!(input.cursor, 1);
    }
}
