// encodings/utf32.rs - UTF-32 target encoding.

use crate::regenc::*;

pub struct Utf32Encoding;

pub static ONIG_ENCODING_UTF32: Utf32Encoding = Utf32Encoding;

impl Encoding for Utf32Encoding {
    fn name(&self) -> &str {
        "UTF-32"
    }

    fn max_code_point(&self) -> u32 {
        UNICODE_LIMIT
    }

    fn is_unicode(&self) -> bool {
        true
    }
}
