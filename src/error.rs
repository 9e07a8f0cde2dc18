// error.rs - Error types for Ruby-to-ECMAScript translation.
//
// Malformed patterns are syntax errors and are always reported.
// Well-formed patterns that ECMAScript cannot express are reported as
// unsupported, and only when a translation was actually requested.

use std::fmt;

use crate::regerror::{error_kind_to_str, SyntaxErrorKind};

/// Error type for validation and translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// The pattern is not well-formed Ruby syntax.
    ///
    /// `position` counts code points in text mode and bytes in byte mode.
    Syntax {
        kind: SyntaxErrorKind,
        message: String,
        position: usize,
    },
    /// The pattern is well-formed but has no ECMAScript equivalent.
    Unsupported { reason: String, position: usize },
    /// The flag string contains a character that is not a Ruby flag.
    InvalidFlag(char),
    /// Groups nest deeper than the configured parse depth limit.
    ParseDepthLimitOver { position: usize },
}

/// Result alias used throughout the crate.
pub type RegexResult<T> = Result<T, RegexError>;

impl RegexError {
    /// Build a syntax error from its kind and optional `%n` parameter.
    pub fn syntax(kind: SyntaxErrorKind, param: Option<&str>, position: usize) -> Self {
        RegexError::Syntax {
            kind,
            message: error_kind_to_str(kind, param),
            position,
        }
    }

    pub fn unsupported(reason: impl Into<String>, position: usize) -> Self {
        RegexError::Unsupported {
            reason: reason.into(),
            position,
        }
    }

    /// Source offset of the error, if it refers to a pattern location.
    pub fn position(&self) -> Option<usize> {
        match self {
            RegexError::Syntax { position, .. }
            | RegexError::Unsupported { position, .. }
            | RegexError::ParseDepthLimitOver { position } => Some(*position),
            RegexError::InvalidFlag(_) => None,
        }
    }

    /// The syntax error kind, if this is a syntax error.
    pub fn kind(&self) -> Option<SyntaxErrorKind> {
        match self {
            RegexError::Syntax { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, RegexError::Syntax { .. })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, RegexError::Unsupported { .. })
    }
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexError::Syntax {
                message, position, ..
            } => write!(f, "syntax error at {}: {}", position, message),
            RegexError::Unsupported { reason, position } => {
                write!(f, "unsupported at {}: {}", position, reason)
            }
            RegexError::InvalidFlag(c) => write!(f, "invalid flag '{}'", c),
            RegexError::ParseDepthLimitOver { position } => {
                write!(f, "parse depth limit over at {}", position)
            }
        }
    }
}

impl std::error::Error for RegexError {}

// ============================================================================
// Tests
// ============================================================================
