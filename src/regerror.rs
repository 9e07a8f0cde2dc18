// regerror.rs - Syntax error kinds and their message formats.
//
// Each kind maps to a fixed format string. Kinds that carry a parameter
// use `%n` as the placeholder, substituted by error_kind_to_str().

/// Classification of a malformed Ruby pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    UnexpectedEnd,
    UnbalancedParenthesis,
    UnterminatedSubpattern,
    UnterminatedComment,
    UnterminatedCharacterSet,
    BadCharacterRange,
    InvalidPosixBracket,
    InvalidCharProperty,
    EscapeAtEnd,
    BadEscape,
    IncompleteEscape,
    UnicodeEscapeOutOfRange,
    OctalEscapeOutOfRange,
    InvalidGroupReference,
    UnknownGroupName,
    UndefinedNameReference,
    LookbehindGroupReference,
    MissingGroupName,
    UnterminatedName,
    BadGroupName,
    GroupNameRedefinition,
    UnknownExtension,
    UnknownFlag,
    MissingFlag,
    MissingFlagTerminator,
    NothingToRepeat,
    MultipleRepeat,
    MinRepeatGreaterThanMax,
    ConditionalTooManyBranches,
}

/// Get the format string for an error kind.
pub fn error_kind_to_format(kind: SyntaxErrorKind) -> &'static str {
    use SyntaxErrorKind::*;
    match kind {
        UnexpectedEnd => "unexpected end of pattern",
        UnbalancedParenthesis => "unbalanced parenthesis",
        UnterminatedSubpattern => "missing ), unterminated subpattern",
        UnterminatedComment => "missing ), unterminated comment",
        UnterminatedCharacterSet => "unterminated character set",
        BadCharacterRange => "bad character range %n",
        InvalidPosixBracket => "invalid POSIX bracket type",
        InvalidCharProperty => "invalid character property name {%n}",
        EscapeAtEnd => "bad escape (end of pattern)",
        BadEscape => "bad escape %n",
        IncompleteEscape => "incomplete escape %n",
        UnicodeEscapeOutOfRange => "unicode escape value %n outside of range 0-0x10FFFF",
        OctalEscapeOutOfRange => "octal escape value %n outside of range 0-o377",
        InvalidGroupReference => "invalid group reference %n",
        UnknownGroupName => "unknown group name %n",
        UndefinedNameReference => "undefined name <%n> reference",
        LookbehindGroupReference => {
            "cannot refer to group defined in the same lookbehind subpattern"
        }
        MissingGroupName => "missing group name",
        UnterminatedName => "missing %n, unterminated name",
        BadGroupName => "bad character in group name %n",
        GroupNameRedefinition => "redefinition of group name %n",
        UnknownExtension => "unknown extension ?%n",
        UnknownFlag => "unknown flag",
        MissingFlag => "missing flag",
        MissingFlagTerminator => "missing -, : or )",
        NothingToRepeat => "nothing to repeat",
        MultipleRepeat => "multiple repeat",
        MinRepeatGreaterThanMax => "min repeat greater than max repeat",
        ConditionalTooManyBranches => "conditional backref with more than two branches",
    }
}

/// Whether an error kind's format string takes a `%n` parameter.
pub fn is_error_kind_needs_param(kind: SyntaxErrorKind) -> bool {
    error_kind_to_format(kind).contains("%n")
}

/// Render the message for `kind`, substituting `param` for `%n`.
///
/// A missing parameter renders as an empty string; a parameter passed to
/// a kind without a placeholder is ignored.
pub fn error_kind_to_str(kind: SyntaxErrorKind, param: Option<&str>) -> String {
    let fmt = error_kind_to_format(kind);
    if !is_error_kind_needs_param(kind) {
        return fmt.to_string();
    }
    fmt.replacen("%n", param.unwrap_or(""), 1)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_message() {
        assert_eq!(
            error_kind_to_str(SyntaxErrorKind::NothingToRepeat, None),
            "nothing to repeat"
        );
    }

    #[test]
    fn parameter_substitution() {
        assert_eq!(
            error_kind_to_str(SyntaxErrorKind::InvalidGroupReference, Some("3")),
            "invalid group reference 3"
        );
        assert_eq!(
            error_kind_to_str(SyntaxErrorKind::UndefinedNameReference, Some("foo")),
            "undefined name <foo> reference"
        );
    }

    #[test]
    fn parameter_ignored_without_placeholder() {
        assert!(!is_error_kind_needs_param(SyntaxErrorKind::UnknownFlag));
        assert_eq!(
            error_kind_to_str(SyntaxErrorKind::UnknownFlag, Some("q")),
            "unknown flag"
        );
    }
}
