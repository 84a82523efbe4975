//! Editable text buffer.
//!
//! The buffer stores text as a list of lines plus a cursor. Columns are
//! counted in characters, not bytes, so the cursor can never land inside a
//! multi-byte sequence.
//!
//! Every editing method reports whether the text actually changed. The
//! owning [`Document`](crate::Document) uses that to keep its modified flag
//! up to date.

/// Cursor position inside a [`TextBuffer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position
{
    /// Zero-based line index
    pub row: usize,
    /// Zero-based character index within the line
    pub col: usize,
}

impl Position
{
    /// Creates a position from a row and a column.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self
    {
        Self { row, col }
    }
}

/// Terminator placed between lines when the text is joined back together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding
{
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding
{
    /// Detects the line ending of `text`.
    ///
    /// Only text in which every `\n` is preceded by a `\r` counts as
    /// [`LineEnding::CrLf`]. Mixed text is treated as [`LineEnding::Lf`] and
    /// its stray `\r` characters stay part of the lines.
    #[must_use]
    pub fn detect(text: &str) -> Self
    {
        let newlines = text.matches('\n').count();
        if newlines > 0 && text.matches("\r\n").count() == newlines
        {
            Self::CrLf
        }
        else
        {
            Self::Lf
        }
    }

    /// Returns the terminator itself.
    #[must_use]
    pub const fn as_str(self) -> &'static str
    {
        match self
        {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Line-based text buffer with a cursor.
///
/// There is always at least one line, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer
{
    /// Lines without their terminators
    lines: Vec<String>,
    /// Current cursor position, always valid for `lines`
    cursor: Position,
    /// Terminator used by [`TextBuffer::text`]
    line_ending: LineEnding,
}

impl Default for TextBuffer
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl TextBuffer
{
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self
    {
        Self {
            lines: vec![String::new()],
            cursor: Position::default(),
            line_ending: LineEnding::default(),
        }
    }

    /// Creates a buffer holding `text`, with the cursor at the start.
    ///
    /// Lines are split on the detected [`LineEnding`]. A trailing
    /// terminator shows up as an empty last line, so [`TextBuffer::text`]
    /// gives back exactly the same string.
    #[must_use]
    pub fn from_text(text: &str) -> Self
    {
        let line_ending = LineEnding::detect(text);
        let lines = text
            .split(line_ending.as_str())
            .map(str::to_owned)
            .collect();

        Self {
            lines,
            cursor: Position::default(),
            line_ending,
        }
    }

    /// Returns the whole text, lines joined with the buffer's line ending.
    #[must_use]
    pub fn text(&self) -> String
    {
        self.lines.join(self.line_ending.as_str())
    }

    /// Returns the line ending used when joining lines.
    #[must_use]
    pub const fn line_ending(&self) -> LineEnding
    {
        self.line_ending
    }

    /// Returns `true` if the buffer holds no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Returns the lines of the buffer.
    #[must_use]
    pub fn lines(&self) -> &[String]
    {
        &self.lines
    }

    /// Returns the number of lines, which is never zero.
    #[must_use]
    pub const fn line_count(&self) -> usize
    {
        self.lines.len()
    }

    /// Returns the cursor position.
    #[must_use]
    pub const fn cursor(&self) -> Position
    {
        self.cursor
    }

    /// Returns the length of line `row` in characters, zero past the end.
    #[must_use]
    pub fn line_len(&self, row: usize) -> usize
    {
        self.lines
            .get(row)
            .map_or(0, |line| line.chars().count())
    }

    /// Inserts a character at the cursor. `'\n'` splits the line.
    pub fn insert_char(&mut self, ch: char) -> bool
    {
        if ch == '\n'
        {
            return self.newline();
        }

        let Position { row, col } = self.cursor;
        let line = &mut self.lines[row];
        let at = byte_index(line, col);
        line.insert(at, ch);
        self.cursor.col = col.saturating_add(1);
        true
    }

    /// Inserts a string at the cursor, e.g. from a paste.
    ///
    /// Carriage returns are dropped so pasted `\r\n` text becomes plain
    /// line breaks.
    pub fn insert_str(&mut self, text: &str) -> bool
    {
        let mut changed = false;
        for ch in text.chars().filter(|ch| *ch != '\r')
        {
            changed |= self.insert_char(ch);
        }
        changed
    }

    /// Splits the current line at the cursor.
    pub fn newline(&mut self) -> bool
    {
        let Position { row, col } = self.cursor;
        let line = &mut self.lines[row];
        let at = byte_index(line, col);
        let rest = line.split_off(at);

        let next_row = row.saturating_add(1);
        self.lines.insert(next_row, rest);
        self.cursor = Position::new(next_row, 0);
        true
    }

    /// Deletes the character before the cursor.
    ///
    /// At the start of a line the line is joined onto the previous one.
    /// Does nothing at the very start of the buffer.
    pub fn backspace(&mut self) -> bool
    {
        let Position { row, col } = self.cursor;

        if col > 0
        {
            let prev = col.saturating_sub(1);
            let line = &mut self.lines[row];
            let at = byte_index(line, prev);
            line.remove(at);
            self.cursor.col = prev;
            return true;
        }

        if row == 0
        {
            return false;
        }

        let removed = self.lines.remove(row);
        let prev_row = row.saturating_sub(1);
        let join_col = self.line_len(prev_row);
        self.lines[prev_row].push_str(&removed);
        self.cursor = Position::new(prev_row, join_col);
        true
    }

    /// Deletes the character under the cursor.
    ///
    /// At the end of a line the next line is joined onto this one.
    /// Does nothing at the very end of the buffer.
    pub fn delete(&mut self) -> bool
    {
        let Position { row, col } = self.cursor;

        if col < self.line_len(row)
        {
            let line = &mut self.lines[row];
            let at = byte_index(line, col);
            line.remove(at);
            return true;
        }

        let next_row = row.saturating_add(1);
        if next_row >= self.lines.len()
        {
            return false;
        }

        let next = self.lines.remove(next_row);
        self.lines[row].push_str(&next);
        true
    }

    /// Moves the cursor one character left, wrapping to the previous line.
    pub fn move_left(&mut self)
    {
        let Position { row, col } = self.cursor;
        if col > 0
        {
            self.cursor.col = col.saturating_sub(1);
        }
        else if row > 0
        {
            let prev_row = row.saturating_sub(1);
            self.cursor = Position::new(prev_row, self.line_len(prev_row));
        }
    }

    /// Moves the cursor one character right, wrapping to the next line.
    pub fn move_right(&mut self)
    {
        let Position { row, col } = self.cursor;
        if col < self.line_len(row)
        {
            self.cursor.col = col.saturating_add(1);
        }
        else if row.saturating_add(1) < self.lines.len()
        {
            self.cursor = Position::new(row.saturating_add(1), 0);
        }
    }

    /// Moves the cursor up by `count` lines.
    pub fn move_up(&mut self, count: usize)
    {
        self.cursor.row = self.cursor.row.saturating_sub(count);
        self.clamp_col();
    }

    /// Moves the cursor down by `count` lines.
    pub fn move_down(&mut self, count: usize)
    {
        let last = self.lines.len().saturating_sub(1);
        self.cursor.row = self
            .cursor
            .row
            .saturating_add(count)
            .min(last);
        self.clamp_col();
    }

    /// Moves the cursor to the start of the line.
    pub const fn move_home(&mut self)
    {
        self.cursor.col = 0;
    }

    /// Moves the cursor to the end of the line.
    pub fn move_end(&mut self)
    {
        self.cursor.col = self.line_len(self.cursor.row);
    }

    /// Moves the cursor to the start of the buffer.
    pub const fn move_to_start(&mut self)
    {
        self.cursor = Position::new(0, 0);
    }

    /// Moves the cursor to the end of the buffer.
    pub fn move_to_end(&mut self)
    {
        let last = self.lines.len().saturating_sub(1);
        self.cursor = Position::new(last, self.line_len(last));
    }

    /// Keeps the column inside the current line.
    fn clamp_col(&mut self)
    {
        let len = self.line_len(self.cursor.row);
        if self.cursor.col > len
        {
            self.cursor.col = len;
        }
    }
}

/// Converts a character column into a byte offset within `line`.
fn byte_index(line: &str, col: usize) -> usize
{
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(idx, _)| idx)
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn typed(text: &str) -> TextBuffer
    {
        let mut buffer = TextBuffer::new();
        buffer.insert_str(text);
        buffer
    }

    #[test]
    fn new_buffer_is_empty()
    {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn from_text_keeps_trailing_newline()
    {
        let buffer = TextBuffer::from_text("one\ntwo\n");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.text(), "one\ntwo\n");
    }

    #[test]
    fn crlf_text_keeps_its_line_ending()
    {
        let buffer = TextBuffer::from_text("one\r\ntwo\r\n");
        assert_eq!(buffer.line_ending(), LineEnding::CrLf);
        assert_eq!(buffer.lines(), ["one", "two", ""]);
        assert_eq!(buffer.text(), "one\r\ntwo\r\n");
    }

    #[test]
    fn lone_carriage_returns_are_kept()
    {
        for text in ["tail\r", "a\rb", "mixed\r\nline\nends"]
        {
            let buffer = TextBuffer::from_text(text);
            assert_eq!(buffer.line_ending(), LineEnding::Lf);
            assert_eq!(buffer.text(), text);
        }
    }

    #[test]
    fn new_lines_in_crlf_text_use_crlf()
    {
        let mut buffer = TextBuffer::from_text("a\r\nb");
        buffer.move_to_end();
        buffer.newline();
        buffer.insert_char('c');
        assert_eq!(buffer.text(), "a\r\nb\r\nc");
    }

    #[test]
    fn typing_and_newline_split_lines()
    {
        let mut buffer = typed("hello world");
        for _ in 0..5
        {
            buffer.move_left();
        }
        assert!(buffer.newline());
        assert_eq!(buffer.lines(), ["hello ", "world"]);
        assert_eq!(buffer.cursor(), Position::new(1, 0));
    }

    #[test]
    fn backspace_at_line_start_joins_lines()
    {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        buffer.move_down(1);
        assert!(buffer.backspace());
        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.cursor(), Position::new(0, 2));
    }

    #[test]
    fn backspace_at_buffer_start_is_a_no_op()
    {
        let mut buffer = TextBuffer::from_text("ab");
        assert!(!buffer.backspace());
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn delete_at_line_end_joins_next_line()
    {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        buffer.move_end();
        assert!(buffer.delete());
        assert_eq!(buffer.text(), "abcd");
        buffer.move_to_end();
        assert!(!buffer.delete());
    }

    #[test]
    fn multibyte_characters_are_edited_whole()
    {
        let mut buffer = typed("añb");
        buffer.move_left();
        assert!(buffer.backspace());
        assert_eq!(buffer.text(), "ab");
        buffer.insert_char('é');
        assert_eq!(buffer.text(), "aéb");
    }

    #[test]
    fn vertical_moves_clamp_the_column()
    {
        let mut buffer = TextBuffer::from_text("long line\nx\nanother");
        buffer.move_end();
        buffer.move_down(1);
        assert_eq!(buffer.cursor(), Position::new(1, 1));
        buffer.move_down(10);
        assert_eq!(buffer.cursor().row, 2);
        buffer.move_up(10);
        assert_eq!(buffer.cursor().row, 0);
    }

    #[test]
    fn horizontal_moves_wrap_across_lines()
    {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        buffer.move_end();
        buffer.move_right();
        assert_eq!(buffer.cursor(), Position::new(1, 0));
        buffer.move_left();
        assert_eq!(buffer.cursor(), Position::new(0, 2));
    }

    #[test]
    fn paste_with_newlines_creates_lines()
    {
        let buffer = typed("one\r\ntwo\nthree");
        assert_eq!(buffer.lines(), ["one", "two", "three"]);
        assert_eq!(buffer.cursor(), Position::new(2, 5));
    }
}
