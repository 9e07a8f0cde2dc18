// scanner.rs - Cursor over the source pattern.
//
// Text patterns are scanned by code point, byte patterns by byte (each
// byte presented as the Latin-1 character of the same value). Positions
// are unit indexes in both modes, so they double as error offsets.

use crate::error::{RegexError, RegexResult};
use crate::regerror::SyntaxErrorKind;

pub struct Scanner {
    units: Vec<char>,
    position: usize,
    bytes: bool,
}

impl Scanner {
    pub fn new(pattern: &str) -> Self {
        Scanner {
            units: pattern.chars().collect(),
            position: 0,
            bytes: false,
        }
    }

    pub fn from_bytes(pattern: &[u8]) -> Self {
        Scanner {
            units: pattern.iter().map(|&b| char::from(b)).collect(),
            position: 0,
            bytes: true,
        }
    }

    #[inline]
    pub fn is_bytes(&self) -> bool {
        self.bytes
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.position >= self.units.len()
    }

    /// Peek at the next unit without consuming it.
    #[inline]
    pub fn current(&self) -> Option<char> {
        self.units.get(self.position).copied()
    }

    #[inline]
    pub fn peek_is(&self, c: char) -> bool {
        self.current() == Some(c)
    }

    pub fn consume(&mut self) -> Option<char> {
        let c = self.current()?;
        self.position += 1;
        Some(c)
    }

    #[inline]
    pub fn advance(&mut self) {
        if !self.at_end() {
            self.position += 1;
        }
    }

    /// Step back over the unit just consumed.
    #[inline]
    pub fn retreat(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Consume `literal` if the upcoming text equals it.
    pub fn match_literal(&mut self, literal: &str) -> bool {
        let mut p = self.position;
        for c in literal.chars() {
            if self.units.get(p) != Some(&c) {
                return false;
            }
            p += 1;
        }
        self.position = p;
        true
    }

    pub fn must_have_more(&self) -> RegexResult<()> {
        if self.at_end() {
            Err(RegexError::syntax(
                SyntaxErrorKind::UnexpectedEnd,
                None,
                self.position,
            ))
        } else {
            Ok(())
        }
    }

    /// Consume units while `pred` holds.
    pub fn get_many(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.position;
        while let Some(c) = self.current() {
            if !pred(c) {
                break;
            }
            self.position += 1;
        }
        self.substring(start, self.position)
    }

    /// Consume at most `count` units while `pred` holds.
    pub fn get_up_to(&mut self, count: usize, pred: impl Fn(char) -> bool) -> String {
        let start = self.position;
        while self.position - start < count {
            match self.current() {
                Some(c) if pred(c) => self.position += 1,
                _ => break,
            }
        }
        self.substring(start, self.position)
    }

    pub fn substring(&self, start: usize, end: usize) -> String {
        let end = end.min(self.units.len());
        let start = start.min(end);
        self.units[start..end].iter().collect()
    }

    /// Check, without consuming, whether the cursor sits on `:name:]` or
    /// `:^name:]`, i.e. a POSIX bracket after an opening `[`.
    pub fn is_posix_bracket_start(&self) -> bool {
        if !self.peek_is(':') {
            return false;
        }
        let mut p = self.position + 1;
        while let Some(&c) = self.units.get(p) {
            match c {
                ':' => return self.units.get(p + 1) == Some(&']'),
                ']' | '[' | '\\' => return false,
                _ => p += 1,
            }
        }
        false
    }
}

// ============================================================================
// Tests
// ============================================================================
