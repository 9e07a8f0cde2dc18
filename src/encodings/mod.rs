// encodings/mod.rs - Target encoding registry
// One module per encoding family.

pub mod ascii;
pub mod latin1;
pub mod utf16;
pub mod utf32;
pub mod utf8;

pub use ascii::ONIG_ENCODING_ASCII;
pub use latin1::ONIG_ENCODING_ISO_8859_1;
pub use utf16::ONIG_ENCODING_UTF16;
pub use utf32::ONIG_ENCODING_UTF32;
pub use utf8::ONIG_ENCODING_UTF8;
