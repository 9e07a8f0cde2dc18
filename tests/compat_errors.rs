// compat_errors.rs - Syntax errors: kind, position and message.

use ruby_regex_flavor::api::TranslatorBuilder;
use ruby_regex_flavor::prelude::*;
use ruby_regex_flavor::regerror::SyntaxErrorKind;
use ruby_regex_flavor::regerror::SyntaxErrorKind::*;

// ============================================================================
// Helpers
// ============================================================================

/// `pattern` must fail with `kind` at `position`, in both modes.
fn e(pattern: &str, kind: SyntaxErrorKind, position: usize) -> RegexError {
    let translated = match translate(pattern, "") {
        Ok(re) => panic!("e: /{}/ should fail, translated to {}", pattern, re.pattern()),
        Err(err) => err,
    };
    assert_eq!(translated.kind(), Some(kind), "e: /{}/ kind: {}", pattern, translated);
    assert_eq!(
        translated.position(),
        Some(position),
        "e: /{}/ position: {}",
        pattern,
        translated
    );
    assert_eq!(
        validate(pattern, "").unwrap_err(),
        translated,
        "e: /{}/ validate and translate disagree",
        pattern
    );
    translated
}

/// Like `e`, and also check the rendered message.
fn em(pattern: &str, kind: SyntaxErrorKind, position: usize, message: &str) {
    let err = e(pattern, kind, position);
    assert_eq!(
        err.to_string(),
        format!("syntax error at {}: {}", position, message),
        "em: /{}/",
        pattern
    );
}

// ============================================================================
// Parentheses
// ============================================================================

#[test]
fn unbalanced_parentheses() {
    em("(", UnterminatedSubpattern, 0, "missing ), unterminated subpattern");
    e("(a(b)", UnterminatedSubpattern, 0);
    em(")", UnbalancedParenthesis, 0, "unbalanced parenthesis");
    e("a)", UnbalancedParenthesis, 1);
    em("(?#abc", UnterminatedComment, 0, "missing ), unterminated comment");
}

#[test]
fn unknown_extensions() {
    em("(?q)", UnknownExtension, 1, "unknown extension ?q");
    e("(?", UnexpectedEnd, 2);
}

#[test]
fn inline_flag_errors() {
    em("(?iz)", UnknownFlag, 3, "unknown flag");
    em("(?i-", MissingFlag, 4, "missing flag");
    em("(?i", MissingFlagTerminator, 3, "missing -, : or )");
}

// ============================================================================
// Quantifiers
// ============================================================================

#[test]
fn repeat_errors() {
    em("*", NothingToRepeat, 0, "nothing to repeat");
    e("a|+", NothingToRepeat, 2);
    e(r"\A?", NothingToRepeat, 2);
    em("a**", MultipleRepeat, 2, "multiple repeat");
    e("a+{2}", MultipleRepeat, 2);
    em("a{3,2}", MinRepeatGreaterThanMax, 1, "min repeat greater than max repeat");
}

// ============================================================================
// Character classes
// ============================================================================

#[test]
fn class_errors() {
    em("[abc", UnterminatedCharacterSet, 0, "unterminated character set");
    e("a[[b]", UnterminatedCharacterSet, 1);
    em("[b-a]", BadCharacterRange, 1, "bad character range b-a");
    em("[[:foo:]]", InvalidPosixBracket, 3, "invalid POSIX bracket type");
    e(r"[\477]", OctalEscapeOutOfRange, 1);
}

#[test]
fn property_errors() {
    em(r"\p{Foo}", InvalidCharProperty, 0, "invalid character property name {Foo}");
    e(r"[\p{Nope}]", InvalidCharProperty, 1);
}

// ============================================================================
// Escapes
// ============================================================================

#[test]
fn escape_errors() {
    em(r"a\", EscapeAtEnd, 1, "bad escape (end of pattern)");
    em(r"\xZ", IncompleteEscape, 0, r"incomplete escape \x");
    e(r"\c", IncompleteEscape, 0);
    e(r"\q", BadEscape, 0);
    e(r"\u{110000}", UnicodeEscapeOutOfRange, 0);
}

// ============================================================================
// Group references
// ============================================================================

#[test]
fn numbered_references() {
    em(r"\2", InvalidGroupReference, 1, "invalid group reference 2");
    e(r"(a)\10", InvalidGroupReference, 4);
    e(r"(a)\k<2>", InvalidGroupReference, 6);
    e(r"(a)\k<-2>", InvalidGroupReference, 6);
}

#[test]
fn named_references() {
    em(r"\k<nope>", UnknownGroupName, 3, "unknown group name nope");
    em(r"\g<nope>", UndefinedNameReference, 3, "undefined name <nope> reference");
    e(r"\k<a", UnterminatedName, 3);
}

#[test]
fn lookbehind_references() {
    e(r"(?<=(a)\1)", LookbehindGroupReference, 8);
    e(r"(?<n>a)(?<!(?<m>b)\k<m>)", LookbehindGroupReference, 21);
}

#[test]
fn group_names() {
    em("(?<>a)", MissingGroupName, 3, "missing group name");
    em("(?<a", UnterminatedName, 3, "missing >, unterminated name");
    em("(?<1a>x)", BadGroupName, 3, "bad character in group name 1a");
    em(
        "(?<a>x)(?<a>y)",
        GroupNameRedefinition,
        10,
        "redefinition of group name 'a' as group 2; was group 1",
    );
}

// ============================================================================
// Conditionals
// ============================================================================

#[test]
fn conditional_errors() {
    em(
        "(a)(?(1)b|c|d)",
        ConditionalTooManyBranches,
        11,
        "conditional backref with more than two branches",
    );
    e("(?(1)a)", InvalidGroupReference, 3);
    e("(a)(?(<x>)a)", UnknownGroupName, 7);
    e("(a)(?()a)", MissingGroupName, 6);
}

// ============================================================================
// Precedence over unsupported constructs
// ============================================================================

#[test]
fn syntax_errors_beat_bailouts() {
    e(r"(?>a)[", UnterminatedCharacterSet, 5);
    e(r"\G(", UnterminatedSubpattern, 2);
}

#[test]
fn flags_do_not_hide_errors() {
    let err = TranslatorBuilder::new("[z-a]")
        .case_insensitive(true)
        .extended(true)
        .translate()
        .unwrap_err();
    assert_eq!(err.kind(), Some(BadCharacterRange));
    assert_eq!(err.position(), Some(1));
}
