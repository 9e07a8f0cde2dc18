// cclass.rs - Bracket expressions: `[...]`, nested classes, POSIX
// brackets and `&&` intersection.
//
// The class being built lives in `Parser::class`. Nested classes and
// intersections swap in an accumulator from the pool, collect into it,
// then swap the outer one back and combine. The borrowed accumulator is
// released on both the success and the error path.

use std::mem;

use crate::error::RegexResult;
use crate::regerror::SyntaxErrorKind;
use crate::regparse::Parser;
use crate::trace::trace_log;
use crate::unicode::posix_class;

impl Parser {
    /// Translate a class whose `[` sits at `start`.
    pub(crate) fn character_class(&mut self, start: usize) -> RegexResult<()> {
        self.class.clear();
        self.collect_char_class(start)?;
        trace_log!(
            "class",
            "class at {}: {} ranges",
            start,
            self.class.ranges().len()
        );
        self.emitter.snippet("[");
        self.emit_char_set();
        self.emitter.snippet("]");
        Ok(())
    }

    fn collect_char_class(&mut self, start: usize) -> RegexResult<()> {
        let negated = self.scanner.match_literal("^");
        let first_pos_inside = self.scanner.position();
        self.collect_char_class_contents(start, first_pos_inside)?;
        if negated {
            // Fold first so that `[^a]` under `i` also excludes `A`.
            self.case_fold_class();
            self.negate_char_class();
        }
        Ok(())
    }

    fn collect_char_class_contents(&mut self, start: usize, first_pos_inside: usize) -> RegexResult<()> {
        loop {
            let range_start = self.scanner.position();
            let Some(ch) = self.scanner.consume() else {
                return Err(self.unterminated_class(start));
            };
            let lower = match ch {
                ']' if range_start == first_pos_inside => Some(']' as u32),
                ']' => return Ok(()),
                '\\' => self.class_escape(range_start)?,
                '[' => {
                    self.nested_char_class()?;
                    None
                }
                '&' if self.scanner.match_literal("&") => {
                    return self.intersect_rest(start, first_pos_inside);
                }
                c => Some(c as u32),
            };

            if !self.scanner.match_literal("-") {
                if let Some(lo) = lower {
                    self.class.add_code_point(lo);
                }
                continue;
            }

            let upper_start = self.scanner.position();
            let Some(ch) = self.scanner.consume() else {
                return Err(self.unterminated_class(start));
            };
            let upper = match ch {
                ']' => {
                    // Trailing `-` is literal.
                    if let Some(lo) = lower {
                        self.class.add_code_point(lo);
                    }
                    self.class.add_code_point('-' as u32);
                    return Ok(());
                }
                '\\' => self.class_escape(upper_start)?,
                '[' => {
                    self.nested_char_class()?;
                    None
                }
                c => Some(c as u32),
            };
            let added = match (lower, upper) {
                (Some(lo), Some(hi)) => self.class.add_range(lo, hi).is_ok(),
                _ => false,
            };
            if !added {
                let text = self.scanner.substring(range_start, self.scanner.position());
                return Err(self.syntax_error_at(
                    SyntaxErrorKind::BadCharacterRange,
                    Some(&text),
                    range_start,
                ));
            }
        }
    }

    fn unterminated_class(&self, start: usize) -> crate::error::RegexError {
        self.syntax_error_at(SyntaxErrorKind::UnterminatedCharacterSet, None, start)
    }

    // `left&&rest`: collect the rest of the class separately and keep
    // only what both sides contain.
    fn intersect_rest(&mut self, start: usize, first_pos_inside: usize) -> RegexResult<()> {
        let rest = self.pool.acquire();
        let left = mem::replace(&mut self.class, rest);
        let result = self.collect_char_class_contents(start, first_pos_inside);
        let rest = mem::replace(&mut self.class, left);
        if result.is_ok() {
            self.class.intersect_with(&rest);
        }
        self.pool.release(rest);
        result
    }

    // `[` inside a class: either a POSIX bracket or a nested class whose
    // contents are unioned into the enclosing one.
    fn nested_char_class(&mut self) -> RegexResult<()> {
        let nested_start = self.scanner.position() - 1;
        self.enter()?;
        let inner = self.pool.acquire();
        let outer = mem::replace(&mut self.class, inner);
        let result = if self.scanner.is_posix_bracket_start() {
            self.collect_posix_char_class()
        } else {
            self.collect_char_class(nested_start)
        };
        let inner = mem::replace(&mut self.class, outer);
        if result.is_ok() {
            self.class.add_all(&inner);
        }
        self.pool.release(inner);
        self.leave();
        result
    }

    // `:name:]` or `:^name:]`, already known to be well-formed.
    fn collect_posix_char_class(&mut self) -> RegexResult<()> {
        self.scanner.advance();
        let negated = self.scanner.match_literal("^");
        let name_start = self.scanner.position();
        let name = self.scanner.get_many(|c| c != ':');
        self.scanner.match_literal(":]");
        let Some(set) = posix_class(&name) else {
            return Err(self.syntax_error_at(SyntaxErrorKind::InvalidPosixBracket, None, name_start));
        };
        self.class.add_set(set);
        if negated {
            self.case_fold_class();
            self.negate_char_class();
        }
        Ok(())
    }

    /// Replace the class with its complement in the target encoding.
    fn negate_char_class(&mut self) {
        let mut inverted = self.pool.acquire();
        self.class
            .invert_into(&mut inverted, self.encoding.max_code_point());
        mem::swap(&mut self.class, &mut inverted);
        self.pool.release(inverted);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::encodings::{ONIG_ENCODING_ISO_8859_1, ONIG_ENCODING_UTF8};
    use crate::error::{RegexError, RegexResult};
    use crate::flags::RubyFlags;
    use crate::regerror::SyntaxErrorKind;
    use crate::regparse::{ParseOutput, Parser, DEFAULT_PARSE_DEPTH_LIMIT};
    use crate::scanner::Scanner;

    fn run(pattern: &str, flags: &str) -> RegexResult<ParseOutput> {
        Parser::new(
            Scanner::new(pattern),
            RubyFlags::parse(flags).unwrap(),
            &ONIG_ENCODING_UTF8,
            false,
            DEFAULT_PARSE_DEPTH_LIMIT,
        )
        .parse()
    }

    fn out(pattern: &str) -> String {
        run(pattern, "").unwrap().pattern
    }

    fn out_i(pattern: &str) -> String {
        run(pattern, "i").unwrap().pattern
    }

    fn err(pattern: &str) -> RegexError {
        run(pattern, "").unwrap_err()
    }

    #[test]
    fn ranges_and_literals() {
        assert_eq!(out("[a-z]"), "[a-z]");
        assert_eq!(out("[cba]"), "[a-c]");
        assert_eq!(out("[]a]"), r"[\]a]");
        assert_eq!(out("[^]a]"), r"[\u{0}-\\\^-`b-\u{10ffff}]");
        assert_eq!(out("[a-]"), r"[\-a]");
        assert_eq!(out("[-a]"), r"[\-a]");
        assert_eq!(out("[.*]"), "[*.]");
    }

    #[test]
    fn escapes_inside_class() {
        assert_eq!(out(r"[\d_]"), "[0-9_]");
        assert_eq!(out(r"[\b]"), r"[\u{8}]");
        assert_eq!(out(r"[\x41-\x43]"), "[A-C]");
        assert_eq!(out(r"[\p{ASCII_Hex_Digit}]"), "[0-9A-Fa-f]");
        assert_eq!(err(r"[\q]").kind(), Some(SyntaxErrorKind::BadEscape));
    }

    #[test]
    fn double_negation_restores_the_set() {
        assert_eq!(out("[^[^a-c]]"), "[a-c]");
    }

    #[test]
    fn nested_classes_union() {
        assert_eq!(out("[a[x-z]]"), "[ax-z]");
    }

    #[test]
    fn intersection() {
        assert_eq!(out("[a-z&&[^aeiou]]"), "[b-df-hj-np-tv-z]");
        assert_eq!(out("[a-f&&d-z]"), "[d-f]");
        assert_eq!(out("[a&&]"), "[]");
    }

    #[test]
    fn posix_brackets() {
        assert_eq!(out("[[:xdigit:]&&[:ascii:]]"), "[0-9A-Fa-f]");
        assert_eq!(out("[[:blank:]]"), r"[\u{9} ]");
        assert_eq!(out("[[:^ascii:]&&[:blank:]]"), "[]");
        let e = err("[[:bogus:]]");
        assert_eq!(e.kind(), Some(SyntaxErrorKind::InvalidPosixBracket));
        assert_eq!(e.position(), Some(3));
        // Not a POSIX bracket: just the characters.
        assert_eq!(out("[:a]"), "[:a]");
    }

    #[test]
    fn case_folding() {
        assert_eq!(out_i("[a-c]"), "[A-Ca-c]");
        assert_eq!(out_i("[^a]"), out("[^Aa]"));
        assert_eq!(out_i("[1]"), "[1]");
    }

    #[test]
    fn class_errors() {
        let e = err("a[z-a]");
        assert_eq!(e.kind(), Some(SyntaxErrorKind::BadCharacterRange));
        assert_eq!(e.position(), Some(2));
        assert_eq!(e.to_string(), "syntax error at 2: bad character range z-a");
        assert_eq!(err(r"[a-\d]").kind(), Some(SyntaxErrorKind::BadCharacterRange));

        let e = err("ab[cd");
        assert_eq!(e.kind(), Some(SyntaxErrorKind::UnterminatedCharacterSet));
        assert_eq!(e.position(), Some(2));
        assert_eq!(err("[a-").kind(), Some(SyntaxErrorKind::UnterminatedCharacterSet));
        assert_eq!(err("[[a]").kind(), Some(SyntaxErrorKind::UnterminatedCharacterSet));
    }

    #[test]
    fn byte_mode_negation_stays_in_latin1() {
        let o = Parser::new(
            Scanner::from_bytes(b"[^a]"),
            RubyFlags::empty(),
            &ONIG_ENCODING_ISO_8859_1,
            false,
            DEFAULT_PARSE_DEPTH_LIMIT,
        )
        .parse()
        .unwrap();
        assert_eq!(o.pattern, "[\\u{0}-`b-\u{ff}]");
    }

    #[test]
    fn pool_is_balanced_after_errors() {
        let mut parser = Parser::new(
            Scanner::new("[a[b[c"),
            RubyFlags::empty(),
            &ONIG_ENCODING_UTF8,
            true,
            DEFAULT_PARSE_DEPTH_LIMIT,
        );
        assert!(parser.disjunction().is_err());
        assert_eq!(parser.pool.available(), 2);
    }
}
