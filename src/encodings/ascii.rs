// encodings/ascii.rs - US-ASCII target encoding.

use crate::regenc::*;

pub struct AsciiEncoding;

pub static ONIG_ENCODING_ASCII: AsciiEncoding = AsciiEncoding;

impl Encoding for AsciiEncoding {
    fn name(&self) -> &str {
        "US-ASCII"
    }

    fn max_code_point(&self) -> u32 {
        ASCII_LIMIT
    }

    fn is_unicode(&self) -> bool {
        false
    }
}
