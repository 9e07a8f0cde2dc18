// encodings/utf16.rs - UTF-16 target encoding.

use crate::regenc::*;

pub struct Utf16Encoding;

pub static ONIG_ENCODING_UTF16: Utf16Encoding = Utf16Encoding;

impl Encoding for Utf16Encoding {
    fn name(&self) -> &str {
        "UTF-16"
    }

    fn max_code_point(&self) -> u32 {
        UNICODE_LIMIT
    }

    fn is_unicode(&self) -> bool {
        true
    }
}
