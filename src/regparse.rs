// regparse.rs - Recursive-descent parser for Ruby regex syntax.
//
// Grammar: disjunction -> alternative -> term. ECMAScript text is emitted
// while parsing; validation runs the same parser with emission off.
// Escapes live in escape.rs, bracket classes in cclass.rs and the
// case-aware emission helpers in emit.rs.

use std::cmp::Ordering;
use std::collections::HashMap;

use smallvec::SmallVec;

use crate::charset::{AccumulatorPool, CodePointSetAccumulator};
use crate::emit::Emitter;
use crate::error::{RegexError, RegexResult};
use crate::flags::RubyFlags;
use crate::regenc::TargetEncoding;
use crate::regerror::SyntaxErrorKind;
use crate::regparse_types::*;
use crate::scanner::Scanner;
use crate::trace::trace_log;
use crate::unicode::{is_group_name_continue, is_group_name_start, CaseFoldAlgorithm};

// ============================================================================
// Constants
// ============================================================================

// Each level costs several frames; 256 levels fit a 2 MiB debug stack.
pub const DEFAULT_PARSE_DEPTH_LIMIT: u32 = 256;

// Insignificant in extended mode.
const EXTENDED_WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0B', '\x0C'];

const DOT_SINGLE_LINE: &str = r"[^\n]";
const LINE_START: &str = r"(?:^|(?<=[\r\n])(?=.))";
const LINE_END: &str = r"(?:$|(?=[\r\n]))";

// ============================================================================
// Parser state
// ============================================================================

/// A group name together with the offset of its first character.
#[derive(Debug, Clone)]
pub(crate) struct GroupName {
    pub text: String,
    pub position: usize,
}

/// What a successful parse produced.
#[derive(Debug)]
pub(crate) struct ParseOutput {
    pub pattern: String,
    /// Capturing groups plus the implicit group 0.
    pub group_count: usize,
    pub names: Option<HashMap<String, usize>>,
    pub bailout: Option<Bailout>,
}

pub(crate) struct Parser {
    pub(crate) scanner: Scanner,
    pub(crate) emitter: Emitter,
    pub(crate) flags: FlagStack,
    pub(crate) groups: GroupRegistry,
    pub(crate) lookbehinds: SmallVec<[Lookbehind; 4]>,
    pub(crate) last_term: TermCategory,
    /// The character class currently being collected.
    pub(crate) class: CodePointSetAccumulator,
    pub(crate) pool: AccumulatorPool,
    pub(crate) encoding: TargetEncoding,
    bailout: Option<Bailout>,
    depth: u32,
    depth_limit: u32,
}

impl Parser {
    pub(crate) fn new(
        scanner: Scanner,
        global_flags: RubyFlags,
        encoding: TargetEncoding,
        silent: bool,
        depth_limit: u32,
    ) -> Self {
        let capacity = if silent { 0 } else { scanner.len() + 16 };
        Parser {
            scanner,
            emitter: Emitter::new(capacity, silent),
            flags: FlagStack::new(global_flags),
            groups: GroupRegistry::new(),
            lookbehinds: SmallVec::new(),
            last_term: TermCategory::None,
            class: CodePointSetAccumulator::new(),
            pool: AccumulatorPool::new(),
            encoding,
            bailout: None,
            depth: 0,
            depth_limit,
        }
    }

    /// Parse the whole pattern.
    pub(crate) fn parse(mut self) -> RegexResult<ParseOutput> {
        trace_log!(
            "parse",
            "{} units, flags '{}', {}",
            self.scanner.len(),
            self.flags.top(),
            if self.emitter.is_silent() { "validate" } else { "translate" }
        );
        self.disjunction()?;
        if !self.scanner.at_end() {
            return Err(self.syntax_error_here(SyntaxErrorKind::UnbalancedParenthesis, None));
        }
        let group_count = self.groups.count() + 1;
        Ok(ParseOutput {
            pattern: self.emitter.into_string(),
            group_count,
            names: self.groups.into_names(),
            bailout: self.bailout,
        })
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    pub(crate) fn syntax_error_at(
        &self,
        kind: SyntaxErrorKind,
        param: Option<&str>,
        position: usize,
    ) -> RegexError {
        let err = RegexError::syntax(kind, param, position);
        trace_log!("parse", "{}", err);
        err
    }

    pub(crate) fn syntax_error_here(&self, kind: SyntaxErrorKind, param: Option<&str>) -> RegexError {
        self.syntax_error_at(kind, param, self.scanner.position())
    }

    /// Record a construct with no ECMAScript translation. Only the first
    /// one is kept, and nothing is recorded while validating.
    pub(crate) fn bail_out(&mut self, reason: &str, position: usize) {
        trace_log!("bailout", "{} at {}", reason, position);
        if self.emitter.is_silent() || self.bailout.is_some() {
            return;
        }
        self.bailout = Some(Bailout {
            reason: reason.to_string(),
            position,
        });
    }

    #[inline]
    pub(crate) fn is_ignore_case(&self) -> bool {
        self.flags.top().is_ignore_case()
    }

    pub(crate) fn case_fold_algorithm(&self) -> CaseFoldAlgorithm {
        if self.encoding.is_unicode() {
            CaseFoldAlgorithm::Unicode
        } else {
            CaseFoldAlgorithm::Ascii
        }
    }

    /// Enter one level of group or class nesting.
    pub(crate) fn enter(&mut self) -> RegexResult<()> {
        self.depth += 1;
        if self.depth > self.depth_limit {
            return Err(RegexError::ParseDepthLimitOver {
                position: self.scanner.position(),
            });
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ========================================================================
    // Disjunction / alternative / term
    // ========================================================================

    pub(crate) fn disjunction(&mut self) -> RegexResult<()> {
        self.enter()?;
        let result = self.alternatives();
        self.leave();
        result
    }

    fn alternatives(&mut self) -> RegexResult<()> {
        loop {
            self.alternative()?;
            if self.scanner.match_literal("|") {
                self.emitter.snippet("|");
            } else {
                return Ok(());
            }
        }
    }

    /// Terms up to `|`, `)` or the end, in a flag scope of their own.
    pub(crate) fn alternative(&mut self) -> RegexResult<()> {
        self.flags.push(self.flags.top());
        self.last_term = TermCategory::None;
        let result = self.terms();
        self.flags.pop();
        result
    }

    fn terms(&mut self) -> RegexResult<()> {
        while let Some(c) = self.scanner.current() {
            if c == '|' || c == ')' {
                break;
            }
            self.term()?;
        }
        Ok(())
    }

    fn term(&mut self) -> RegexResult<()> {
        let start = self.scanner.position();
        let Some(ch) = self.scanner.consume() else {
            return Ok(());
        };

        if self.flags.top().is_extended() {
            if EXTENDED_WHITESPACE.contains(&ch) {
                return Ok(());
            }
            if ch == '#' {
                self.skip_line_comment();
                return Ok(());
            }
        }

        match ch {
            '\\' => self.escape(start)?,
            '[' => {
                self.character_class(start)?;
                self.last_term = TermCategory::Atom;
            }
            '*' | '+' | '?' | '{' => self.quantifier(ch, start)?,
            '.' => {
                if self.flags.top().is_multiline() {
                    self.emitter.snippet(".");
                } else {
                    self.emitter.snippet(DOT_SINGLE_LINE);
                }
                self.last_term = TermCategory::Atom;
            }
            '(' => self.parens(start)?,
            '^' => {
                self.emitter.snippet(LINE_START);
                self.last_term = TermCategory::Assertion;
            }
            '$' => {
                self.emitter.snippet(LINE_END);
                self.last_term = TermCategory::Assertion;
            }
            _ => {
                self.emit_char(ch as u32, false);
                self.last_term = TermCategory::Atom;
            }
        }
        Ok(())
    }

    // `#` to end of line; a backslash hides the next character.
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.scanner.consume() {
            match c {
                '\n' => return,
                '\\' => self.scanner.advance(),
                _ => {}
            }
        }
    }

    // ========================================================================
    // Quantifiers
    // ========================================================================

    fn quantifier(&mut self, ch: char, start: usize) -> RegexResult<()> {
        if ch == '{' {
            if self.scanner.match_literal("}") {
                self.emit_literal_since(start);
                self.last_term = TermCategory::Atom;
                return Ok(());
            }
            if self.scanner.match_literal(",}") {
                self.emitter.snippet("*");
            } else {
                let lower = self.scanner.get_many(|c| c.is_ascii_digit());
                let upper = if self.scanner.match_literal(",") {
                    Some(self.scanner.get_many(|c| c.is_ascii_digit()))
                } else {
                    None
                };
                if !self.scanner.match_literal("}") {
                    // Not an interval after all: the text is literal.
                    self.emit_literal_since(start);
                    self.last_term = TermCategory::Atom;
                    return Ok(());
                }
                let upper_bound = upper.as_deref().unwrap_or(&lower);
                if !lower.is_empty()
                    && !upper_bound.is_empty()
                    && compare_decimal(&lower, upper_bound) == Ordering::Greater
                {
                    return Err(self.syntax_error_at(
                        SyntaxErrorKind::MinRepeatGreaterThanMax,
                        None,
                        start,
                    ));
                }
                let end = self.scanner.position();
                if lower.is_empty() {
                    // `{,n}`: ECMAScript needs the lower bound spelled out.
                    self.emitter.snippet("{0,");
                    let rest = self.scanner.substring(start + 2, end);
                    self.emitter.snippet(&rest);
                } else {
                    let text = self.scanner.substring(start, end);
                    self.emitter.snippet(&text);
                }
            }
        } else {
            self.emitter.raw_char(ch);
        }

        match self.last_term {
            TermCategory::None | TermCategory::Assertion => Err(self.syntax_error_at(
                SyntaxErrorKind::NothingToRepeat,
                None,
                start,
            )),
            TermCategory::Quantifier => {
                Err(self.syntax_error_at(SyntaxErrorKind::MultipleRepeat, None, start))
            }
            TermCategory::Atom => {
                if self.scanner.match_literal("?") {
                    self.emitter.snippet("?");
                }
                self.last_term = TermCategory::Quantifier;
                Ok(())
            }
        }
    }

    fn emit_literal_since(&mut self, start: usize) {
        let text = self.scanner.substring(start, self.scanner.position());
        self.emit_string(&text);
    }

    // ========================================================================
    // Parentheses
    // ========================================================================

    fn parens(&mut self, start: usize) -> RegexResult<()> {
        if self.scanner.at_end() {
            return Err(self.syntax_error_at(SyntaxErrorKind::UnterminatedSubpattern, None, start));
        }
        if !self.scanner.match_literal("?") {
            return self.group(true, None, start);
        }
        self.scanner.must_have_more()?;
        let Some(ch1) = self.scanner.consume() else {
            return Err(self.syntax_error_here(SyntaxErrorKind::UnexpectedEnd, None));
        };
        match ch1 {
            ':' => self.group(false, None, start),
            '#' => self.parens_comment(start),
            '<' => {
                self.scanner.must_have_more()?;
                if self.scanner.match_literal("=") {
                    self.lookbehind(true, start)
                } else if self.scanner.match_literal("!") {
                    self.lookbehind(false, start)
                } else {
                    let name = self.parse_group_name('>')?;
                    self.group(true, Some(name), start)
                }
            }
            '\'' => {
                let name = self.parse_group_name('\'')?;
                self.group(true, Some(name), start)
            }
            '=' => self.lookahead(true, start),
            '!' => self.lookahead(false, start),
            '>' => {
                self.bail_out("atomic groups are not supported", start);
                self.group(false, None, start)
            }
            '(' => self.conditional_backreference(start),
            '~' => self.absent_expression(start),
            '-' | 'm' | 'i' | 'x' => self.flags_group(ch1, start),
            _ => Err(self.syntax_error_at(
                SyntaxErrorKind::UnknownExtension,
                Some(&ch1.to_string()),
                start + 1,
            )),
        }
    }

    fn parens_comment(&mut self, start: usize) -> RegexResult<()> {
        self.scanner.get_many(|c| c != ')');
        if self.scanner.match_literal(")") {
            Ok(())
        } else {
            Err(self.syntax_error_at(SyntaxErrorKind::UnterminatedComment, None, start))
        }
    }

    fn expect_close(&mut self, start: usize) -> RegexResult<()> {
        if self.scanner.match_literal(")") {
            self.emitter.snippet(")");
            Ok(())
        } else {
            Err(self.syntax_error_at(SyntaxErrorKind::UnterminatedSubpattern, None, start))
        }
    }

    pub(crate) fn group(
        &mut self,
        capturing: bool,
        name: Option<GroupName>,
        start: usize,
    ) -> RegexResult<()> {
        if capturing {
            let number = self.groups.open();
            self.emitter.snippet("(");
            if let Some(name) = name {
                if let Err(previous) = self.groups.register_name(&name.text, number) {
                    self.groups.close();
                    let detail = format!("'{}' as group {}; was group {}", name.text, number, previous);
                    return Err(self.syntax_error_at(
                        SyntaxErrorKind::GroupNameRedefinition,
                        Some(&detail),
                        name.position,
                    ));
                }
            }
        } else {
            self.emitter.snippet("(?:");
        }

        let result = self.disjunction();
        if capturing {
            self.groups.close();
        }
        result?;
        self.expect_close(start)?;
        self.last_term = TermCategory::Atom;
        Ok(())
    }

    fn lookahead(&mut self, positive: bool, start: usize) -> RegexResult<()> {
        self.emitter.snippet(if positive { "(?=" } else { "(?!" });
        self.disjunction()?;
        self.expect_close(start)?;
        self.last_term = TermCategory::Assertion;
        Ok(())
    }

    fn lookbehind(&mut self, positive: bool, start: usize) -> RegexResult<()> {
        self.emitter.snippet(if positive { "(?<=" } else { "(?<!" });
        self.lookbehinds.push(Lookbehind {
            contained_groups: self.groups.count() + 1,
        });
        let result = self.disjunction();
        self.lookbehinds.pop();
        result?;
        self.expect_close(start)?;
        self.last_term = TermCategory::Assertion;
        Ok(())
    }

    /// `(?(cond)yes|no)`. Never translatable, but parsed in full.
    fn conditional_backreference(&mut self, start: usize) -> RegexResult<()> {
        self.bail_out("conditional backreference groups not supported", start);
        let id_start = self.scanner.position();
        let id = self.scanner.get_many(|c| c != ')');
        if id.is_empty() {
            return Err(self.syntax_error_here(SyntaxErrorKind::MissingGroupName, None));
        }
        if !self.scanner.match_literal(")") {
            return Err(self.syntax_error_at(SyntaxErrorKind::UnterminatedName, Some(")"), id_start));
        }
        let group_number = self.resolve_condition(&id, id_start)?;
        self.verify_group_reference(group_number, id_start)?;

        self.emitter.snippet("(?:");
        self.enter()?;
        let result = self.conditional_branches();
        self.leave();
        result?;
        self.expect_close(start)?;
        self.last_term = TermCategory::Atom;
        Ok(())
    }

    // `yes` or `yes|no`; a third branch is an error.
    fn conditional_branches(&mut self) -> RegexResult<()> {
        self.alternative()?;
        if self.scanner.match_literal("|") {
            self.emitter.snippet("|");
            self.alternative()?;
            if self.scanner.peek_is('|') {
                return Err(self.syntax_error_here(SyntaxErrorKind::ConditionalTooManyBranches, None));
            }
        }
        Ok(())
    }

    fn resolve_condition(&self, id: &str, id_start: usize) -> RegexResult<usize> {
        let delimited = id.len() >= 2
            && ((id.starts_with('<') && id.ends_with('>'))
                || (id.starts_with('\'') && id.ends_with('\'')));
        if delimited {
            let name = &id[1..id.len() - 1];
            self.check_group_name(name, id_start + 1)?;
            return self.groups.lookup(name).ok_or_else(|| {
                self.syntax_error_at(SyntaxErrorKind::UnknownGroupName, Some(name), id_start + 1)
            });
        }
        if id.chars().all(|c| c.is_ascii_digit()) {
            return match id.parse::<usize>() {
                Ok(n) if (1..=self.groups.count()).contains(&n) => Ok(n),
                _ => Err(self.syntax_error_at(
                    SyntaxErrorKind::InvalidGroupReference,
                    Some(id),
                    id_start,
                )),
            };
        }
        Err(self.syntax_error_at(SyntaxErrorKind::BadGroupName, Some(id), id_start))
    }

    /// `(?~...)`. Parsed, then rejected.
    fn absent_expression(&mut self, start: usize) -> RegexResult<()> {
        self.emitter.snippet("(?:");
        self.disjunction()?;
        self.expect_close(start)?;
        self.bail_out("absent expressions not supported", start);
        self.last_term = TermCategory::Atom;
        Ok(())
    }

    // ========================================================================
    // Inline flags
    // ========================================================================

    fn flags_group(&mut self, first: char, start: usize) -> RegexResult<()> {
        let mut flags = self.flags.top();
        let mut negative = false;
        let mut ch = first;
        loop {
            let missing = match ch {
                ')' => return self.open_ended_flags(flags),
                ':' => return self.scoped_flags(flags, start),
                '-' => {
                    if negative {
                        return Err(self.syntax_error_at(
                            SyntaxErrorKind::MissingFlagTerminator,
                            None,
                            self.scanner.position() - 1,
                        ));
                    }
                    negative = true;
                    SyntaxErrorKind::MissingFlag
                }
                c if RubyFlags::is_valid_inline_flag_char(c) => {
                    flags = if negative {
                        flags.del_flag(c)
                    } else {
                        flags.add_flag(c)
                    };
                    SyntaxErrorKind::MissingFlagTerminator
                }
                c => {
                    let kind = if c.is_alphabetic() {
                        SyntaxErrorKind::UnknownFlag
                    } else {
                        SyntaxErrorKind::MissingFlagTerminator
                    };
                    return Err(self.syntax_error_at(kind, None, self.scanner.position() - 1));
                }
            };
            ch = match self.scanner.consume() {
                Some(c) => c,
                None => return Err(self.syntax_error_here(missing, None)),
            };
        }
    }

    /// `(?i)`: the new flags hold for the rest of the enclosing group.
    fn open_ended_flags(&mut self, flags: RubyFlags) -> RegexResult<()> {
        self.flags.replace_top(flags);
        self.emitter.snippet("(?:");
        self.disjunction()?;
        self.emitter.snippet(")");
        Ok(())
    }

    /// `(?i:...)`
    fn scoped_flags(&mut self, flags: RubyFlags, start: usize) -> RegexResult<()> {
        self.flags.push(flags);
        let result = self.group(false, None, start);
        self.flags.pop();
        result
    }

    // ========================================================================
    // Group names and references
    // ========================================================================

    /// Read a name up to `terminator` without validating its characters.
    pub(crate) fn parse_group_name_text(&mut self, terminator: char) -> RegexResult<GroupName> {
        let position = self.scanner.position();
        let text = self.scanner.get_many(|c| c != terminator);
        if text.is_empty() {
            return Err(self.syntax_error_here(SyntaxErrorKind::MissingGroupName, None));
        }
        if !self.scanner.match_literal(&terminator.to_string()) {
            return Err(self.syntax_error_at(
                SyntaxErrorKind::UnterminatedName,
                Some(&terminator.to_string()),
                position,
            ));
        }
        Ok(GroupName { text, position })
    }

    pub(crate) fn parse_group_name(&mut self, terminator: char) -> RegexResult<GroupName> {
        let name = self.parse_group_name_text(terminator)?;
        self.check_group_name(&name.text, name.position)?;
        Ok(name)
    }

    pub(crate) fn check_group_name(&self, name: &str, position: usize) -> RegexResult<()> {
        let mut chars = name.chars();
        let valid = chars.next().is_some_and(is_group_name_start) && chars.all(is_group_name_continue);
        if valid {
            Ok(())
        } else {
            Err(self.syntax_error_at(SyntaxErrorKind::BadGroupName, Some(name), position))
        }
    }

    /// Reject references from inside a lookbehind to groups it contains.
    pub(crate) fn verify_group_reference(&self, group_number: usize, position: usize) -> RegexResult<()> {
        if self
            .lookbehinds
            .iter()
            .any(|lb| group_number >= lb.contained_groups)
        {
            return Err(self.syntax_error_at(
                SyntaxErrorKind::LookbehindGroupReference,
                None,
                position,
            ));
        }
        Ok(())
    }
}

// Compare two decimal digit strings by numeric value.
fn compare_decimal(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

// ============================================================================
// Tests
// ============================================================================
