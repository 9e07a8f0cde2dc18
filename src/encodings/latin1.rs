// encodings/latin1.rs - ISO-8859-1 target encoding.
// Also used for byte-mode patterns, where every byte is one code point.

use crate::regenc::*;

pub struct Latin1Encoding;

pub static ONIG_ENCODING_ISO_8859_1: Latin1Encoding = Latin1Encoding;

impl Encoding for Latin1Encoding {
    fn name(&self) -> &str {
        "ISO-8859-1"
    }

    fn max_code_point(&self) -> u32 {
        LATIN1_LIMIT
    }

    fn is_unicode(&self) -> bool {
        false
    }
}
