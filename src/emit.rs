// emit.rs - ECMAScript output buffer and case-aware emission.
//
// Emitter knows how to spell code points and ranges in ECMAScript
// syntax. The Parser methods below add case folding on top of it.

use std::fmt::Write;

use crate::charset::{CodePointRange, CodePointSet};
use crate::regparse::Parser;
use crate::unicode::apply_case_fold;

// Characters that must be escaped outside / inside a bracket class.
const SYNTAX_CHARACTERS: &[char] = &[
    '^', '$', '\\', '.', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|',
];
const CHAR_CLASS_SYNTAX_CHARACTERS: &[char] = &['\\', ']', '-', '^'];

// Characters written as themselves. Controls, line separators and
// noncharacters are written as `\u{...}` instead.
fn is_printable(c: char) -> bool {
    let cp = c as u32;
    let noncharacter = (0xFDD0..=0xFDEF).contains(&cp) || cp & 0xFFFE == 0xFFFE;
    !c.is_control() && !(c.is_whitespace() && c != ' ') && !noncharacter
}

/// Append-only ECMAScript pattern buffer. A silent emitter drops
/// everything it is given.
#[derive(Debug)]
pub struct Emitter {
    out: String,
    silent: bool,
    // `\1` followed by `0` would read as `\10`.
    after_backreference: bool,
}

impl Emitter {
    pub fn new(capacity: usize, silent: bool) -> Self {
        Emitter {
            out: String::with_capacity(capacity),
            silent,
            after_backreference: false,
        }
    }

    #[inline]
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn separate_backreference(&mut self, next: char) {
        if self.after_backreference {
            if next.is_ascii_digit() {
                self.out.push_str("(?:)");
            }
            self.after_backreference = false;
        }
    }

    /// Emit ECMAScript text verbatim.
    pub fn snippet(&mut self, text: &str) {
        if self.silent {
            return;
        }
        if let Some(first) = text.chars().next() {
            self.separate_backreference(first);
        }
        self.out.push_str(text);
    }

    /// Emit one character verbatim.
    pub fn raw_char(&mut self, c: char) {
        if self.silent {
            return;
        }
        self.separate_backreference(c);
        self.out.push(c);
    }

    pub fn backreference(&mut self, group_number: usize) {
        if self.silent {
            return;
        }
        self.snippet(&format!("\\{}", group_number));
        self.after_backreference = true;
    }

    /// Emit a code point, escaped if it is syntax in its context.
    pub fn code_point_no_casing(&mut self, cp: u32, in_class: bool) {
        if self.silent {
            return;
        }
        let Some(c) = char::from_u32(cp).filter(|&c| is_printable(c)) else {
            self.separate_backreference('u');
            let _ = write!(self.out, "\\u{{{:x}}}", cp);
            return;
        };
        let syntax = if in_class {
            CHAR_CLASS_SYNTAX_CHARACTERS
        } else {
            SYNTAX_CHARACTERS
        };
        if syntax.contains(&c) {
            self.raw_char('\\');
        }
        self.raw_char(c);
    }

    /// Emit the inside of a bracket class for `ranges`.
    pub fn char_set_no_casing(&mut self, ranges: &[CodePointRange]) {
        for r in ranges {
            self.code_point_no_casing(r.lo, true);
            if !r.is_single() {
                self.raw_char('-');
                self.code_point_no_casing(r.hi, true);
            }
        }
    }
}

// ============================================================================
// Case-aware emission
// ============================================================================

impl Parser {
    /// Emit a literal code point, expanded to its case closure under `i`.
    pub(crate) fn emit_char(&mut self, cp: u32, in_class: bool) {
        if self.emitter.is_silent() {
            return;
        }
        if !self.is_ignore_case() {
            self.emitter.code_point_no_casing(cp, in_class);
            return;
        }
        let algorithm = self.case_fold_algorithm();
        let mut acc = self.pool.acquire();
        let mut tmp = self.pool.acquire();
        acc.add_code_point(cp);
        apply_case_fold(&mut acc, &mut tmp, algorithm);
        if acc.is_single_char() {
            self.emitter.code_point_no_casing(cp, in_class);
        } else if in_class {
            self.emitter.char_set_no_casing(acc.ranges());
        } else {
            self.emitter.snippet("[");
            self.emitter.char_set_no_casing(acc.ranges());
            self.emitter.snippet("]");
        }
        self.pool.release(tmp);
        self.pool.release(acc);
    }

    pub(crate) fn emit_string(&mut self, text: &str) {
        for c in text.chars() {
            self.emit_char(c as u32, false);
        }
    }

    /// Emit the ranges of the class under construction (without brackets).
    pub(crate) fn emit_char_set(&mut self) {
        if self.emitter.is_silent() {
            return;
        }
        self.case_fold_class();
        self.emitter.char_set_no_casing(self.class.ranges());
    }

    /// Emit a whole code-point set as a bracket class.
    pub(crate) fn emit_set_as_class(&mut self, set: &CodePointSet) {
        if self.emitter.is_silent() {
            return;
        }
        let algorithm = self.case_fold_algorithm();
        let mut acc = self.pool.acquire();
        acc.add_set(set);
        if self.is_ignore_case() {
            let mut tmp = self.pool.acquire();
            apply_case_fold(&mut acc, &mut tmp, algorithm);
            self.pool.release(tmp);
        }
        self.emitter.snippet("[");
        self.emitter.char_set_no_casing(acc.ranges());
        self.emitter.snippet("]");
        self.pool.release(acc);
    }

    /// Close the class under construction over case, when `i` is active.
    pub(crate) fn case_fold_class(&mut self) {
        if !self.is_ignore_case() {
            return;
        }
        let algorithm = self.case_fold_algorithm();
        let mut tmp = self.pool.acquire();
        apply_case_fold(&mut self.class, &mut tmp, algorithm);
        self.pool.release(tmp);
    }

    /// A reference to a still-open group can never match.
    pub(crate) fn emit_backreference(&mut self, group_number: usize, start: usize) {
        if self.groups.is_open(group_number) {
            self.emitter.snippet("[]");
        } else if self.is_ignore_case() {
            self.bail_out("case insensitive backreferences not supported", start);
        } else {
            self.emitter.backreference(group_number);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn emitted(f: impl FnOnce(&mut Emitter)) -> String {
        let mut e = Emitter::new(0, false);
        f(&mut e);
        e.into_string()
    }

    #[test]
    fn escapes_depend_on_context() {
        assert_eq!(emitted(|e| e.code_point_no_casing('.' as u32, false)), r"\.");
        assert_eq!(emitted(|e| e.code_point_no_casing('.' as u32, true)), ".");
        assert_eq!(emitted(|e| e.code_point_no_casing('-' as u32, false)), "-");
        assert_eq!(emitted(|e| e.code_point_no_casing('-' as u32, true)), r"\-");
        assert_eq!(emitted(|e| e.code_point_no_casing('^' as u32, true)), r"\^");
    }

    #[test]
    fn controls_and_surrogates_use_braced_escapes() {
        assert_eq!(emitted(|e| e.code_point_no_casing(0, false)), r"\u{0}");
        assert_eq!(emitted(|e| e.code_point_no_casing(0xD800, true)), r"\u{d800}");
        assert_eq!(emitted(|e| e.code_point_no_casing('é' as u32, false)), "é");
    }

    #[test]
    fn ranges() {
        let out = emitted(|e| {
            e.char_set_no_casing(&[
                CodePointRange::new('a' as u32, 'z' as u32),
                CodePointRange::single('_' as u32),
            ])
        });
        assert_eq!(out, "a-z_");
    }

    #[test]
    fn backreference_followed_by_digit() {
        let out = emitted(|e| {
            e.backreference(1);
            e.code_point_no_casing('0' as u32, false);
        });
        assert_eq!(out, r"\1(?:)0");
        let out = emitted(|e| {
            e.backreference(1);
            e.raw_char('a');
            e.raw_char('0');
        });
        assert_eq!(out, r"\1a0");
    }

    #[test]
    fn silent_emitter_drops_output() {
        let out = emitted(|_| {});
        assert!(out.is_empty());
        let mut e = Emitter::new(0, true);
        e.snippet("abc");
        e.code_point_no_casing('x' as u32, false);
        assert!(e.is_silent());
        assert_eq!(e.into_string(), "");
    }
}
