// api.rs - Public API for Ruby-to-ECMAScript translation.
//
// Wraps the parser with Rust-native types: RegexSource,
// RubyFlavorProcessor, TranslatedRegex and TranslatorBuilder.

use std::collections::HashMap;
use std::fmt;

use crate::encodings::{ONIG_ENCODING_ISO_8859_1, ONIG_ENCODING_UTF8};
use crate::error::{RegexError, RegexResult};
use crate::flags::RubyFlags;
use crate::regenc::TargetEncoding;
use crate::regparse::{ParseOutput, Parser, DEFAULT_PARSE_DEPTH_LIMIT};
use crate::scanner::Scanner;
use crate::trace::trace_log;

// === RegexSource ===

/// Pattern text, either a string or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePattern {
    Text(String),
    /// Each byte is one unit; positions in errors are byte offsets.
    Bytes(Vec<u8>),
}

/// A Ruby regex as written: pattern, flag string and target encoding.
#[derive(Debug, Clone)]
pub struct RegexSource {
    pattern: SourcePattern,
    flags: String,
    encoding: TargetEncoding,
}

impl RegexSource {
    /// A text pattern targeting UTF-8.
    pub fn new(pattern: &str, flags: &str) -> Self {
        RegexSource {
            pattern: SourcePattern::Text(pattern.to_string()),
            flags: flags.to_string(),
            encoding: &ONIG_ENCODING_UTF8,
        }
    }

    /// A byte pattern. Targets ISO-8859-1 unless another encoding is set.
    pub fn from_bytes(pattern: &[u8], flags: &str) -> Self {
        RegexSource {
            pattern: SourcePattern::Bytes(pattern.to_vec()),
            flags: flags.to_string(),
            encoding: &ONIG_ENCODING_ISO_8859_1,
        }
    }

    pub fn with_encoding(mut self, encoding: TargetEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn pattern(&self) -> &SourcePattern {
        &self.pattern
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn encoding(&self) -> TargetEncoding {
        self.encoding
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self.pattern, SourcePattern::Bytes(_))
    }

    fn scanner(&self) -> Scanner {
        match &self.pattern {
            SourcePattern::Text(text) => Scanner::new(text),
            SourcePattern::Bytes(bytes) => Scanner::from_bytes(bytes),
        }
    }
}

// === TranslatedRegex ===

/// The ECMAScript equivalent of a Ruby regex.
///
/// # Examples
///
/// ```
/// use ruby_regex_flavor::translate;
///
/// let re = translate(r"(?<year>\d+)-\k<year>", "").unwrap();
/// assert_eq!(re.pattern(), r"(\d+)-\1");
/// assert_eq!(re.flags(), "su");
/// assert_eq!(re.group_count(), 2);
/// assert_eq!(re.group_number("year"), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct TranslatedRegex {
    pattern: String,
    flags: &'static str,
    encoding: TargetEncoding,
    group_count: usize,
    named_groups: Option<HashMap<String, usize>>,
}

impl TranslatedRegex {
    /// ECMAScript pattern source, to be compiled with [`flags`](Self::flags).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// ECMAScript flags: `su`, plus `y` for sticky patterns.
    pub fn flags(&self) -> &'static str {
        self.flags
    }

    pub fn encoding(&self) -> TargetEncoding {
        self.encoding
    }

    /// Number of capture groups, counting the whole match as group 0.
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Name to group number, or `None` if the pattern has no named groups.
    pub fn named_groups(&self) -> Option<&HashMap<String, usize>> {
        self.named_groups.as_ref()
    }

    pub fn group_number(&self, name: &str) -> Option<usize> {
        self.named_groups.as_ref()?.get(name).copied()
    }

    pub fn into_pattern(self) -> String {
        self.pattern
    }
}

impl fmt::Display for TranslatedRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.flags)
    }
}

// === RegexFlavorProcessor ===

/// A source dialect that can be checked and rewritten as ECMAScript.
pub trait RegexFlavorProcessor {
    /// Check syntax only. Constructs without an ECMAScript equivalent
    /// are accepted.
    fn validate(&self) -> RegexResult<()>;

    /// Translate the pattern. Fails with [`RegexError::Unsupported`]
    /// if the pattern is valid but cannot be expressed.
    fn to_ecmascript_regex(&self) -> RegexResult<TranslatedRegex>;

    /// Capture groups including group 0.
    fn number_of_capture_groups(&self) -> RegexResult<usize>;

    fn named_capture_groups(&self) -> RegexResult<Option<HashMap<String, usize>>>;

    /// The global flags of the source.
    fn flags(&self) -> RubyFlags;

    /// Whether the translated pattern uses ECMAScript's `u` mode.
    fn is_unicode_pattern(&self) -> bool;
}

/// Processor for Ruby (Onigmo) patterns. Every call parses the source
/// afresh; nothing is shared between calls.
#[derive(Debug)]
pub struct RubyFlavorProcessor<'s> {
    source: &'s RegexSource,
    flags: RubyFlags,
    depth_limit: u32,
}

impl<'s> RubyFlavorProcessor<'s> {
    /// Fails only if the flag string contains something other than `imxy`.
    pub fn new(source: &'s RegexSource) -> RegexResult<Self> {
        let flags = RubyFlags::parse(source.flags())?;
        Ok(RubyFlavorProcessor {
            source,
            flags,
            depth_limit: DEFAULT_PARSE_DEPTH_LIMIT,
        })
    }

    /// Maximum nesting of groups and classes (default 256).
    pub fn with_depth_limit(mut self, limit: u32) -> Self {
        self.depth_limit = limit;
        self
    }

    pub fn source(&self) -> &RegexSource {
        self.source
    }

    fn run(&self, silent: bool) -> RegexResult<ParseOutput> {
        Parser::new(
            self.source.scanner(),
            self.flags,
            self.source.encoding(),
            silent,
            self.depth_limit,
        )
        .parse()
    }
}

impl RegexFlavorProcessor for RubyFlavorProcessor<'_> {
    fn validate(&self) -> RegexResult<()> {
        self.run(true).map(|_| ())
    }

    fn to_ecmascript_regex(&self) -> RegexResult<TranslatedRegex> {
        let output = self.run(false)?;
        if let Some(bailout) = output.bailout {
            trace_log!("bailout", "translation rejected: {}", bailout.reason);
            return Err(RegexError::unsupported(bailout.reason, bailout.position));
        }
        Ok(TranslatedRegex {
            pattern: output.pattern,
            flags: self.flags.ecmascript_flags(),
            encoding: self.source.encoding(),
            group_count: output.group_count,
            named_groups: output.names,
        })
    }

    fn number_of_capture_groups(&self) -> RegexResult<usize> {
        self.run(true).map(|output| output.group_count)
    }

    fn named_capture_groups(&self) -> RegexResult<Option<HashMap<String, usize>>> {
        self.run(true).map(|output| output.names)
    }

    fn flags(&self) -> RubyFlags {
        self.flags
    }

    fn is_unicode_pattern(&self) -> bool {
        true
    }
}

// === TranslatorBuilder ===

/// Builder for translating a pattern with custom options.
///
/// # Examples
///
/// ```
/// use ruby_regex_flavor::api::TranslatorBuilder;
///
/// let re = TranslatorBuilder::new("abc")
///     .case_insensitive(true)
///     .translate()
///     .unwrap();
/// assert_eq!(re.pattern(), "[Aa][Bb][Cc]");
/// ```
#[derive(Debug, Clone)]
pub struct TranslatorBuilder {
    pattern: SourcePattern,
    flags: RubyFlags,
    encoding: Option<TargetEncoding>,
    depth_limit: u32,
}

impl TranslatorBuilder {
    /// Create a new builder for the given pattern.
    pub fn new(pattern: &str) -> Self {
        Self::with_pattern(SourcePattern::Text(pattern.to_string()))
    }

    /// Create a builder for a byte pattern.
    pub fn bytes(pattern: &[u8]) -> Self {
        Self::with_pattern(SourcePattern::Bytes(pattern.to_vec()))
    }

    fn with_pattern(pattern: SourcePattern) -> Self {
        TranslatorBuilder {
            pattern,
            flags: RubyFlags::empty(),
            encoding: None,
            depth_limit: DEFAULT_PARSE_DEPTH_LIMIT,
        }
    }

    fn set(mut self, flag: RubyFlags, yes: bool) -> Self {
        self.flags.set(flag, yes);
        self
    }

    /// Enable or disable case-insensitive matching (`i`).
    pub fn case_insensitive(self, yes: bool) -> Self {
        self.set(RubyFlags::IGNORECASE, yes)
    }

    /// Enable or disable Ruby multiline mode (`m`: `.` matches `\n`).
    pub fn multiline(self, yes: bool) -> Self {
        self.set(RubyFlags::MULTILINE, yes)
    }

    /// Enable or disable extended mode (whitespace and `#` comments ignored).
    pub fn extended(self, yes: bool) -> Self {
        self.set(RubyFlags::EXTENDED, yes)
    }

    pub fn sticky(self, yes: bool) -> Self {
        self.set(RubyFlags::STICKY, yes)
    }

    /// Replace all flags at once.
    pub fn flags(mut self, flags: RubyFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Select the target encoding (default: UTF-8 for text, ISO-8859-1
    /// for bytes).
    pub fn encoding(mut self, encoding: TargetEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn parse_depth_limit(mut self, limit: u32) -> Self {
        self.depth_limit = limit;
        self
    }

    /// The source this builder describes.
    pub fn source(&self) -> RegexSource {
        let flags = self.flags.to_string();
        let source = match &self.pattern {
            SourcePattern::Text(text) => RegexSource::new(text, &flags),
            SourcePattern::Bytes(bytes) => RegexSource::from_bytes(bytes, &flags),
        };
        match self.encoding {
            Some(encoding) => source.with_encoding(encoding),
            None => source,
        }
    }

    pub fn validate(&self) -> RegexResult<()> {
        let source = self.source();
        RubyFlavorProcessor::new(&source)?
            .with_depth_limit(self.depth_limit)
            .validate()
    }

    /// Translate the pattern into a [`TranslatedRegex`].
    pub fn translate(&self) -> RegexResult<TranslatedRegex> {
        let source = self.source();
        RubyFlavorProcessor::new(&source)?
            .with_depth_limit(self.depth_limit)
            .to_ecmascript_regex()
    }
}

// === Free functions ===

/// Translate `pattern` with the global `flags` (any of `imxy`).
pub fn translate(pattern: &str, flags: &str) -> RegexResult<TranslatedRegex> {
    let source = RegexSource::new(pattern, flags);
    RubyFlavorProcessor::new(&source)?.to_ecmascript_regex()
}

/// Check that `pattern` is valid Ruby syntax.
pub fn validate(pattern: &str, flags: &str) -> RegexResult<()> {
    let source = RegexSource::new(pattern, flags);
    RubyFlavorProcessor::new(&source)?.validate()
}
