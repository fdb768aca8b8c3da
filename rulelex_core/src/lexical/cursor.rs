//! Position tracker for one tokenization run
//!
//! The cursor owns the working text. When a trailing newline is appended so
//! line-anchored rules fire on the last line, the cursor remembers the
//! original length and clips the synthetic character out of every token it
//! produces.

use crate::tokens::{Token, TokenType};
use crate::utils::{Position, Span};
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: Cow<'a, str>,
    /// Length of the caller's input; bytes past it are synthetic
    visible_len: usize,
    offset: usize,
    position: Position,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str, ensure_trailing_newline: bool) -> Self {
        let text = if ensure_trailing_newline && !input.ends_with('\n') {
            let mut owned = String::with_capacity(input.len() + 1);
            owned.push_str(input);
            owned.push('\n');
            Cow::Owned(owned)
        } else {
            Cow::Borrowed(input)
        };

        Self {
            text,
            visible_len: input.len(),
            offset: 0,
            position: Position::start(),
        }
    }

    /// Working text, including any synthetic newline
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn remaining(&self) -> &str {
        &self.text[self.offset..]
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.text.len()
    }

    pub fn has_synthetic_newline(&self) -> bool {
        self.text.len() > self.visible_len
    }

    pub fn at_line_start(&self) -> bool {
        self.offset == 0 || self.text.as_bytes().get(self.offset - 1) == Some(&b'\n')
    }

    /// Byte length of the character under the cursor
    pub fn next_char_len(&self) -> Option<usize> {
        self.remaining().chars().next().map(char::len_utf8)
    }

    /// First char boundary at or after `index`, never behind the cursor
    /// and never past the end of the text
    pub fn snap_forward(&self, index: usize) -> usize {
        let mut index = index.clamp(self.offset, self.text.len());
        while !self.text.is_char_boundary(index) {
            index += 1;
        }
        index
    }

    /// Advance to `end`, returning the token covering the visible part of the step.
    /// `end` is snapped forward onto a char boundary at or after the cursor.
    pub fn emit(&mut self, kind: TokenType, end: usize) -> Option<Token> {
        let end = self.snap_forward(end);
        let start_offset = self.offset;
        let start = self.position;
        let visible_end = end.min(self.visible_len).max(start_offset);

        let token = if visible_end > start_offset {
            let text = &self.text[start_offset..visible_end];
            let span = Span::new(start, start.advance_str(text));
            Some(Token::new(kind, text, span))
        } else {
            None
        };

        self.position = self.position.advance_str(&self.text[start_offset..end]);
        self.offset = end;
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_snaps_to_char_boundary() {
        let mut cursor = Cursor::new("\u{e9}t\u{e9}", false);
        let token = cursor.emit(TokenType::Name, 1).unwrap();
        assert_eq!(token.text, "\u{e9}");
        assert_eq!(cursor.offset(), 2);

        // behind the cursor clamps to the cursor, past the end clamps to the end
        assert!(cursor.emit(TokenType::Name, 0).is_none());
        assert_eq!(cursor.offset(), 2);
        let token = cursor.emit(TokenType::Name, 99).unwrap();
        assert_eq!(token.text, "t\u{e9}");
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_appends_missing_newline() {
        let cursor = Cursor::new("key", true);
        assert_eq!(cursor.text(), "key\n");
        assert!(cursor.has_synthetic_newline());

        let cursor = Cursor::new("key\n", true);
        assert!(!cursor.has_synthetic_newline());

        let cursor = Cursor::new("key", false);
        assert_eq!(cursor.text(), "key");
    }

    #[test]
    fn test_emit_advances_position() {
        let mut cursor = Cursor::new("ab\ncd\n", true);
        let first = cursor.emit(TokenType::Name, 3).unwrap();
        assert_eq!(first.text, "ab\n");
        assert_eq!(first.span.start, Position::start());
        assert_eq!(cursor.position(), Position::new(3, 2, 1));
        assert!(cursor.at_line_start());

        cursor.emit(TokenType::Name, 4);
        assert!(!cursor.at_line_start());
        assert_eq!(cursor.remaining(), "d\n");
    }

    #[test]
    fn test_synthetic_newline_is_clipped() {
        let mut cursor = Cursor::new("value", true);
        let token = cursor.emit(TokenType::String, 6).unwrap();
        assert_eq!(token.text, "value");
        assert_eq!(token.span.end.offset, 5);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_fully_synthetic_step_emits_nothing() {
        let mut cursor = Cursor::new("v", true);
        cursor.emit(TokenType::String, 1);
        assert!(cursor.emit(TokenType::Whitespace, 2).is_none());
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_next_char_len_is_utf8_aware() {
        let cursor = Cursor::new("é", false);
        assert_eq!(cursor.next_char_len(), Some(2));
        assert_eq!(Cursor::new("", false).next_char_len(), None);
    }
}
