// encodings/utf8.rs - UTF-8 target encoding.

use crate::regenc::*;

pub struct Utf8Encoding;

pub static ONIG_ENCODING_UTF8: Utf8Encoding = Utf8Encoding;

impl Encoding for Utf8Encoding {
    fn name(&self) -> &str {
        "UTF-8"
    }

    fn max_code_point(&self) -> u32 {
        UNICODE_LIMIT
    }

    fn is_unicode(&self) -> bool {
        true
    }
}
