//! Path text grammar.
//!
//! ```text
//! path   := '' | lead? crumb*
//! lead   := name                      (non-empty, no separator)
//! crumb  := '.' name | '.'? '[' index ']'
//! name   := (alphanumeric | '_' | '-')*
//! index  := '-'? digit+
//! ```
//!
//! A dot directly before a bracket is absorbed. A dot at the very start that
//! is not followed by a bracket stands for a leading empty-string key, so
//! `.a` is `["", "a"]` while `.[0]` is `[0]`.

use crate::crumb::Crumb;
use crate::error::{PathError, Result};
use crate::path::Path;

/// Parse path text into a [`Path`].
pub fn parse(input: &str) -> Result<Path> {
    let mut cursor = Cursor::new(input);
    let mut crumbs = Vec::new();

    let lead = cursor.take_name();
    if !lead.is_empty() {
        crumbs.push(Crumb::Key(lead.to_string()));
    } else if cursor.peek() == Some('.') && cursor.peek_nth(1) != Some('[') {
        crumbs.push(Crumb::Key(String::new()));
    }

    while let Some(c) = cursor.peek() {
        match c {
            '.' => {
                cursor.bump();
                if cursor.peek() == Some('[') {
                    continue;
                }
                crumbs.push(Crumb::Key(cursor.take_name().to_string()));
            }
            '[' => crumbs.push(Crumb::Index(cursor.take_index()?)),
            other => return Err(cursor.error(format!("unexpected character {other:?}"))),
        }
    }

    Ok(Path::from(crumbs))
}

/// Characters allowed in a key segment.
pub fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn take_name(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !is_name_char(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        &rest[..len]
    }

    /// Consume `[digits]`. The cursor must be on the opening bracket.
    fn take_index(&mut self) -> Result<i64> {
        let start = self.pos;
        self.bump();
        let rest = self.rest();
        let Some(close) = rest.find(']') else {
            return Err(self.error_at(start, "unterminated index".to_string()));
        };
        let body = &rest[..close];
        let digits = body.strip_prefix('-').unwrap_or(body);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.error_at(start, format!("index {body:?} is not an integer")));
        }
        let index = body
            .parse::<i64>()
            .map_err(|e| self.error_at(start, format!("index {body:?}: {e}")))?;
        self.pos += close + 1;
        Ok(index)
    }

    fn error(&self, reason: String) -> PathError {
        self.error_at(self.pos, reason)
    }

    fn error_at(&self, position: usize, reason: String) -> PathError {
        PathError::InvalidPathSyntax {
            input: self.input.to_string(),
            position,
            reason,
        }
    }
}
