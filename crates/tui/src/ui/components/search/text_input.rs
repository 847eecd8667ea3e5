//! UTF-8 safe single-line text buffer with a cursor.

#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Replace the buffer and move the cursor to its end.
    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        self.input = s.into();
        self.cursor = self.input.len();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev_len = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        self.cursor = self.cursor.saturating_sub(prev_len);
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the char immediately before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        let start = self.cursor - prev;
        self.input.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    /// Remove the char under the cursor.
    pub fn delete(&mut self) -> bool {
        match self.input[self.cursor..].chars().next() {
            Some(next) => {
                self.input.drain(self.cursor..self.cursor + next.len_utf8());
                true
            }
            None => false,
        }
    }

    /// Display width of the text before the cursor.
    pub fn cursor_columns(&self) -> u16 {
        unicode_width::UnicodeWidthStr::width(&self.input[..self.cursor]) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_move_insert_backspace() {
        let mut st = TextInputState::new();
        st.set_input("h🙂llo");
        st.move_home();
        st.move_right();
        st.insert_char('e');
        assert_eq!(st.input(), "he🙂llo");
        st.move_right();
        assert!(st.backspace());
        assert_eq!(st.input(), "hello");
        st.move_left();
        st.backspace();
        assert_eq!(st.input(), "ello");
    }

    #[test]
    fn delete_removes_the_char_under_the_cursor() {
        let mut st = TextInputState::new();
        st.set_input("abc");
        st.move_end();
        assert!(!st.delete());
        st.move_home();
        assert!(st.delete());
        assert_eq!(st.input(), "bc");
        assert_eq!(st.cursor_columns(), 0);
    }
}
