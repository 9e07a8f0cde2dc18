// flags.rs - Ruby regex modifier flags.
//
// The global flag string (e.g. "imx") and inline `(?imx-imx)` groups both
// produce RubyFlags values. Values are Copy; add/remove return new sets.

use std::fmt;

use bitflags::bitflags;

use crate::error::{RegexError, RegexResult};

bitflags! {
    /// Set of active Ruby modifiers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RubyFlags: u8 {
        /// `i`: case-insensitive matching.
        const IGNORECASE = 1 << 0;
        /// `m`: `.` also matches newline (Ruby's multiline).
        const MULTILINE = 1 << 1;
        /// `x`: whitespace and `#` comments are ignored.
        const EXTENDED = 1 << 2;
        /// `y`: matching is anchored at the search start.
        const STICKY = 1 << 3;
    }
}

impl RubyFlags {
    /// Parse a global flag string such as `"imx"` or `"y"`.
    pub fn parse(flags: &str) -> RegexResult<RubyFlags> {
        let mut result = RubyFlags::empty();
        for c in flags.chars() {
            match Self::from_flag_char(c) {
                Some(f) => result.insert(f),
                None => return Err(RegexError::InvalidFlag(c)),
            }
        }
        Ok(result)
    }

    /// Map a global flag character to its flag.
    pub fn from_flag_char(c: char) -> Option<RubyFlags> {
        match c {
            'i' => Some(RubyFlags::IGNORECASE),
            'm' => Some(RubyFlags::MULTILINE),
            'x' => Some(RubyFlags::EXTENDED),
            'y' => Some(RubyFlags::STICKY),
            _ => None,
        }
    }

    /// Flags that may appear inside a `(?...)` group. Sticky is global only.
    pub fn is_valid_inline_flag_char(c: char) -> bool {
        matches!(c, 'i' | 'm' | 'x')
    }

    pub fn add_flag(self, c: char) -> RubyFlags {
        match Self::from_flag_char(c) {
            Some(f) => self.union(f),
            None => self,
        }
    }

    pub fn del_flag(self, c: char) -> RubyFlags {
        match Self::from_flag_char(c) {
            Some(f) => self.difference(f),
            None => self,
        }
    }

    pub fn is_ignore_case(self) -> bool {
        self.contains(RubyFlags::IGNORECASE)
    }

    pub fn is_multiline(self) -> bool {
        self.contains(RubyFlags::MULTILINE)
    }

    pub fn is_extended(self) -> bool {
        self.contains(RubyFlags::EXTENDED)
    }

    pub fn is_sticky(self) -> bool {
        self.contains(RubyFlags::STICKY)
    }

    /// Flags for the translated ECMAScript regex.
    ///
    /// Dot-all and Unicode mode are always on; the Ruby modifiers are
    /// compiled into the pattern itself, except sticky.
    pub fn ecmascript_flags(self) -> &'static str {
        if self.is_sticky() {
            "suy"
        } else {
            "su"
        }
    }
}

impl fmt::Display for RubyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, c) in [
            (RubyFlags::IGNORECASE, 'i'),
            (RubyFlags::MULTILINE, 'm'),
            (RubyFlags::EXTENDED, 'x'),
            (RubyFlags::STICKY, 'y'),
        ] {
            if self.contains(flag) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
