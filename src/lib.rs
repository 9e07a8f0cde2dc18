//! # ruby-regex-flavor
//!
//! Translates Ruby (Onigmo) regular expressions into ECMAScript regular
//! expressions, compiled with the `su` flags (`suy` for sticky patterns).
//!
//! The translator parses the Ruby pattern with a recursive-descent parser
//! and emits the ECMAScript text as it goes, collecting capture-group
//! metadata on the way. Ruby modifiers (`i`, `m`, `x`) are compiled into
//! the pattern itself: case-insensitive literals and classes become
//! explicit case-closed classes, `.` becomes `[^\n]` unless `m` is set,
//! and so on.
//!
//! ## Quick Start
//!
//! ```rust
//! use ruby_regex_flavor::prelude::*;
//!
//! let re = translate(r"(?<year>\d+)-\k<year>", "").unwrap();
//! assert_eq!(re.pattern(), r"(\d+)-\1");
//! assert_eq!(re.group_count(), 2);
//! assert_eq!(re.group_number("year"), Some(1));
//! ```
//!
//! Patterns that are valid Ruby but have no ECMAScript equivalent are
//! rejected as unsupported, while [`validate`] still accepts them:
//!
//! ```rust
//! use ruby_regex_flavor::prelude::*;
//!
//! assert!(validate(r"(?>a+)b", "").is_ok());
//! let err = translate(r"(?>a+)b", "").unwrap_err();
//! assert!(err.is_unsupported());
//! ```
//!
//! For fine-grained control, use [`TranslatorBuilder`]:
//!
//! ```rust
//! use ruby_regex_flavor::prelude::*;
//!
//! let re = TranslatorBuilder::new("a.c")
//!     .case_insensitive(true)
//!     .translate()
//!     .unwrap();
//! assert_eq!(re.pattern(), r"[Aa][^\n][Cc]");
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`api`] | Processor, builder, free functions |
//! | [`regparse`] | Grammar parser |
//! | [`regparse_types`] | Flag stack, group registry, parser bookkeeping |
//! | [`scanner`] | Cursor over the source pattern |
//! | [`charset`] | Code-point range sets and the accumulator pool |
//! | [`unicode`] | Unicode properties, POSIX brackets, case folding |
//! | [`flags`] | Ruby modifier flags |
//! | [`regenc`] | Target encoding trait |
//! | [`regerror`] | Syntax error kinds and messages |
//! | [`error`] | Error type |
//!
//! Set `RUBY_FLAVOR_TRACE=1` (or a list such as `parse,bailout,class`)
//! to trace parsing to stderr.

pub mod api;
mod cclass;
pub mod charset;
mod emit;
pub mod encodings;
pub mod error;
mod escape;
pub mod flags;
pub mod prelude;
pub mod regenc;
pub mod regerror;
pub mod regparse;
pub mod regparse_types;
pub mod scanner;
pub(crate) mod trace;
pub mod unicode;

pub use api::{
    translate, validate, RegexFlavorProcessor, RegexSource, RubyFlavorProcessor, SourcePattern,
    TranslatedRegex, TranslatorBuilder,
};
pub use error::{RegexError, RegexResult};
pub use flags::RubyFlags;
