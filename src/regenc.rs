// regenc.rs - Target encoding trait.
//
// The translator only needs to know how large the code-point space of
// the target is (for class inversion) and whether Unicode case folding
// applies. Everything else about the encoding belongs to the matcher.

use std::fmt;

use crate::encodings::{
    ONIG_ENCODING_ASCII, ONIG_ENCODING_ISO_8859_1, ONIG_ENCODING_UTF16, ONIG_ENCODING_UTF32,
    ONIG_ENCODING_UTF8,
};

// A trait object reference, shared by every translation.
pub type TargetEncoding = &'static dyn Encoding;

pub const ASCII_LIMIT: u32 = 0x7F;
pub const LATIN1_LIMIT: u32 = 0xFF;
pub const UNICODE_LIMIT: u32 = 0x10FFFF;

// === Encoding Trait ===
pub trait Encoding: Send + Sync {
    fn name(&self) -> &str;

    /// Largest code point representable in this encoding.
    fn max_code_point(&self) -> u32;

    /// Whether Unicode case folding and properties apply.
    fn is_unicode(&self) -> bool;
}

impl fmt::Debug for dyn Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up an encoding by name, ignoring case and `-`/`_` separators.
pub fn encoding_by_name(name: &str) -> Option<TargetEncoding> {
    let normalized: String = name
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    match normalized.as_str() {
        "UTF8" => Some(&ONIG_ENCODING_UTF8),
        "UTF16" | "UTF16LE" | "UTF16BE" => Some(&ONIG_ENCODING_UTF16),
        "UTF32" | "UTF32LE" | "UTF32BE" => Some(&ONIG_ENCODING_UTF32),
        "ISO88591" | "LATIN1" | "BYTES" | "ASCII8BIT" | "BINARY" => {
            Some(&ONIG_ENCODING_ISO_8859_1)
        }
        "ASCII" | "USASCII" => Some(&ONIG_ENCODING_ASCII),
        _ => None,
    }
}
