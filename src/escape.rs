// escape.rs - Backslash escapes: classification and emission.
//
// The order in which escape kinds are tried matters. `\b` is an
// assertion outside a class and a backspace inside one, and a leading
// digit is a backreference before it is an octal escape.

use crate::charset::CodePointSet;
use crate::error::RegexResult;
use crate::regerror::SyntaxErrorKind;
use crate::regparse::{GroupName, Parser};
use crate::regparse_types::TermCategory;
use crate::unicode::{is_untranslatable_property, lookup_property, CategoryEscape};

const END_OF_INPUT_OR_FINAL_NEWLINE: &str = r"(?:$|(?=[\r\n]$))";
const LINEBREAK: &str = r"(?:\r\n|[\n\v\f\r\u0085\u2028\u2029])";

/// What a backslash sequence outside a character class stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Escape {
    /// Zero-width, with its ECMAScript spelling.
    Assertion(&'static str),
    Category(CategoryEscape),
    Property(CodePointSet),
    Backreference(usize),
    /// `\R`
    Linebreak,
    /// Well-formed but without an ECMAScript equivalent.
    Unsupported {
        reason: &'static str,
        category: TermCategory,
    },
    Character(u32),
}

fn assertion_escape(c: char) -> Option<Escape> {
    let text = match c {
        'A' => "^",
        'z' => "$",
        'Z' => END_OF_INPUT_OR_FINAL_NEWLINE,
        'b' => r"\b",
        'B' => r"\B",
        'G' => {
            return Some(Escape::Unsupported {
                reason: "\\G escape sequence is not supported",
                category: TermCategory::Assertion,
            })
        }
        _ => return None,
    };
    Some(Escape::Assertion(text))
}

#[inline]
fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

impl Parser {
    // ========================================================================
    // Escapes in pattern context
    // ========================================================================

    /// Translate the escape whose backslash sits at `start`.
    pub(crate) fn escape(&mut self, start: usize) -> RegexResult<()> {
        self.last_term = match self.classify_escape(start)? {
            Escape::Assertion(text) => {
                self.emitter.snippet(text);
                TermCategory::Assertion
            }
            Escape::Category(category) => {
                self.emitter.snippet(category.ecmascript());
                TermCategory::Atom
            }
            Escape::Property(set) => {
                self.emit_set_as_class(&set);
                TermCategory::Atom
            }
            Escape::Backreference(group_number) => {
                self.emit_backreference(group_number, start);
                TermCategory::Atom
            }
            Escape::Linebreak => {
                self.emitter.snippet(LINEBREAK);
                TermCategory::Atom
            }
            Escape::Unsupported { reason, category } => {
                self.bail_out(reason, start);
                category
            }
            Escape::Character(cp) => {
                self.emit_char(cp, false);
                TermCategory::Atom
            }
        };
        Ok(())
    }

    pub(crate) fn classify_escape(&mut self, start: usize) -> RegexResult<Escape> {
        let Some(ch) = self.scanner.consume() else {
            return Err(self.syntax_error_at(SyntaxErrorKind::EscapeAtEnd, None, start));
        };
        if let Some(assertion) = assertion_escape(ch) {
            return Ok(assertion);
        }
        if let Some(category) = CategoryEscape::from_escape_char(ch) {
            return Ok(Escape::Category(category));
        }
        if matches!(ch, 'p' | 'P') && self.scanner.peek_is('{') {
            return self.property_escape(ch == 'P', start).map(Escape::Property);
        }
        if matches!(ch, '1'..='9') {
            self.scanner.retreat();
            return self.numeric_backreference();
        }
        if ch == 'k' && matches!(self.scanner.current(), Some('<' | '\'')) {
            return self.named_backreference();
        }
        if let Some(special) = self.special_escape(ch)? {
            return Ok(special);
        }
        self.character_escape(ch, start).map(Escape::Character)
    }

    /// `\p{Name}`, `\p{^Name}`, `\P{Name}`. The cursor is on the `{`.
    fn property_escape(&mut self, negated: bool, start: usize) -> RegexResult<CodePointSet> {
        self.scanner.advance();
        let negated = negated ^ self.scanner.match_literal("^");
        let name = self.scanner.get_many(|c| c != '}' && c != '\\');
        if !self.scanner.match_literal("}") {
            return Err(self.syntax_error_at(SyntaxErrorKind::InvalidCharProperty, Some(&name), start));
        }
        if is_untranslatable_property(&name) {
            self.bail_out(&format!("character property {} not supported", name), start);
            return Ok(CodePointSet::empty());
        }
        let Some(set) = lookup_property(&name) else {
            return Err(self.syntax_error_at(SyntaxErrorKind::InvalidCharProperty, Some(&name), start));
        };
        if negated {
            Ok(set.invert(self.encoding.max_code_point()))
        } else {
            Ok(set)
        }
    }

    fn numeric_backreference(&mut self) -> RegexResult<Escape> {
        let digits_start = self.scanner.position();
        let digits = self.scanner.get_up_to(2, |c| c.is_ascii_digit());
        let group_number = digits.parse::<usize>().unwrap_or(usize::MAX);
        if group_number > self.groups.count() {
            return Err(self.syntax_error_at(
                SyntaxErrorKind::InvalidGroupReference,
                Some(&digits),
                digits_start,
            ));
        }
        self.verify_group_reference(group_number, digits_start)?;
        Ok(Escape::Backreference(group_number))
    }

    /// `\k<name>`, `\k'name'`, `\k<N>`, `\k<-N>`. The cursor is on the
    /// opening delimiter.
    fn named_backreference(&mut self) -> RegexResult<Escape> {
        let terminator = if self.scanner.match_literal("<") {
            '>'
        } else {
            self.scanner.advance();
            '\''
        };
        let name = self.parse_group_name_text(terminator)?;
        let group_number = match self.numbered_reference(&name)? {
            Some(n) => n,
            None => {
                self.check_group_name(&name.text, name.position)?;
                self.groups.lookup(&name.text).ok_or_else(|| {
                    self.syntax_error_at(
                        SyntaxErrorKind::UnknownGroupName,
                        Some(&name.text),
                        name.position,
                    )
                })?
            }
        };
        self.verify_group_reference(group_number, name.position)?;
        Ok(Escape::Backreference(group_number))
    }

    // A reference written as a number: absolute `N` or relative `-N`.
    fn numbered_reference(&self, name: &GroupName) -> RegexResult<Option<usize>> {
        let (relative, digits) = match name.text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, name.text.as_str()),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Ok(None);
        }
        let invalid = || {
            self.syntax_error_at(
                SyntaxErrorKind::InvalidGroupReference,
                Some(&name.text),
                name.position,
            )
        };
        let n = digits.parse::<usize>().map_err(|_| invalid())?;
        let count = self.groups.count();
        if n == 0 || n > count {
            return Err(invalid());
        }
        Ok(Some(if relative { count + 1 - n } else { n }))
    }

    // \X, \K, \R and subexpression calls.
    fn special_escape(&mut self, ch: char) -> RegexResult<Option<Escape>> {
        let escape = match ch {
            'X' => Escape::Unsupported {
                reason: "extended grapheme cluster escape not supported",
                category: TermCategory::Atom,
            },
            'K' => Escape::Unsupported {
                reason: "\\K escape sequence is not supported",
                category: TermCategory::Assertion,
            },
            'R' => Escape::Linebreak,
            'g' if matches!(self.scanner.current(), Some('<' | '\'')) => {
                self.subexpression_call()?;
                Escape::Unsupported {
                    reason: "subexpression calls not supported",
                    category: TermCategory::Atom,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(escape))
    }

    // Validate the target of `\g<...>`; the call itself is never emitted.
    fn subexpression_call(&mut self) -> RegexResult<()> {
        let terminator = if self.scanner.match_literal("<") {
            '>'
        } else {
            self.scanner.advance();
            '\''
        };
        let name = self.parse_group_name_text(terminator)?;
        let digits = name.text.trim_start_matches(['+', '-']);
        let numbered = !digits.is_empty()
            && name.text.len() - digits.len() <= 1
            && digits.chars().all(|c| c.is_ascii_digit());
        if numbered {
            return Ok(());
        }
        self.check_group_name(&name.text, name.position)?;
        if self.groups.lookup(&name.text).is_none() {
            return Err(self.syntax_error_at(
                SyntaxErrorKind::UndefinedNameReference,
                Some(&name.text),
                name.position,
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Character escapes
    // ========================================================================

    /// Escapes inside a bracket class. Categories and properties are
    /// added to the class directly (`None`); character escapes yield
    /// their code point.
    pub(crate) fn class_escape(&mut self, start: usize) -> RegexResult<Option<u32>> {
        let Some(ch) = self.scanner.consume() else {
            return Err(self.syntax_error_at(SyntaxErrorKind::EscapeAtEnd, None, start));
        };
        if let Some(category) = CategoryEscape::from_escape_char(ch) {
            let set = category.to_set(self.encoding.max_code_point());
            self.class.add_set(&set);
            return Ok(None);
        }
        if matches!(ch, 'p' | 'P') && self.scanner.peek_is('{') {
            let set = self.property_escape(ch == 'P', start)?;
            self.class.add_set(&set);
            return Ok(None);
        }
        self.character_escape(ch, start).map(Some)
    }

    /// The code point denoted by `\ch...`; `ch` is already consumed.
    fn character_escape(&mut self, ch: char, start: usize) -> RegexResult<u32> {
        let cp = match ch {
            'a' => 0x07,
            'b' => 0x08,
            'e' => 0x1B,
            'f' => 0x0C,
            'n' => 0x0A,
            'r' => 0x0D,
            't' => 0x09,
            'v' => 0x0B,
            'c' => match self.scanner.consume() {
                Some('?') => 0x7F,
                Some(c) if c.is_ascii() => c as u32 & 0x1F,
                Some(_) => {
                    return Err(self.syntax_error_at(SyntaxErrorKind::BadEscape, Some("\\c"), start))
                }
                None => {
                    return Err(self.syntax_error_at(
                        SyntaxErrorKind::IncompleteEscape,
                        Some("\\c"),
                        start,
                    ))
                }
            },
            'x' => {
                let code = self.scanner.get_up_to(2, |c| c.is_ascii_hexdigit());
                if code.len() < 2 {
                    let text = format!("\\x{}", code);
                    return Err(self.syntax_error_at(SyntaxErrorKind::IncompleteEscape, Some(&text), start));
                }
                self.parse_hex(&code, start)?
            }
            'u' | 'U' => {
                if self.scanner.is_bytes() {
                    let text = format!("\\{}", ch);
                    return Err(self.syntax_error_at(SyntaxErrorKind::BadEscape, Some(&text), start));
                }
                self.unicode_escape(ch, start)?
            }
            c if is_octal_digit(c) => {
                self.scanner.retreat();
                let code = self.scanner.get_up_to(3, is_octal_digit);
                let value = u32::from_str_radix(&code, 8).unwrap_or(u32::MAX);
                if value > 0o377 {
                    let text = format!("\\{}", code);
                    return Err(self.syntax_error_at(
                        SyntaxErrorKind::OctalEscapeOutOfRange,
                        Some(&text),
                        start,
                    ));
                }
                value
            }
            c if c.is_ascii_alphabetic() => {
                let text = format!("\\{}", c);
                return Err(self.syntax_error_at(SyntaxErrorKind::BadEscape, Some(&text), start));
            }
            c => c as u32,
        };
        Ok(cp)
    }

    // \uHHHH, \UHHHHHHHH and \u{H...}
    fn unicode_escape(&mut self, lead: char, start: usize) -> RegexResult<u32> {
        let braced = lead == 'u' && self.scanner.match_literal("{");
        let code = if braced {
            let code = self.scanner.get_many(|c| c.is_ascii_hexdigit());
            if code.is_empty() || code.len() > 6 || !self.scanner.match_literal("}") {
                let text = format!("\\u{{{}", code);
                return Err(self.syntax_error_at(SyntaxErrorKind::IncompleteEscape, Some(&text), start));
            }
            code
        } else {
            let width = if lead == 'u' { 4 } else { 8 };
            let code = self.scanner.get_up_to(width, |c| c.is_ascii_hexdigit());
            if code.len() < width {
                let text = format!("\\{}{}", lead, code);
                return Err(self.syntax_error_at(SyntaxErrorKind::IncompleteEscape, Some(&text), start));
            }
            code
        };
        let value = self.parse_hex(&code, start)?;
        if value > 0x10FFFF {
            let text = if braced {
                format!("\\u{{{}}}", code)
            } else {
                format!("\\{}{}", lead, code)
            };
            return Err(self.syntax_error_at(
                SyntaxErrorKind::UnicodeEscapeOutOfRange,
                Some(&text),
                start,
            ));
        }
        Ok(value)
    }

    fn parse_hex(&self, code: &str, start: usize) -> RegexResult<u32> {
        u32::from_str_radix(code, 16).map_err(|_| {
            let text = format!("\\{}", code);
            self.syntax_error_at(SyntaxErrorKind::BadEscape, Some(&text), start)
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
