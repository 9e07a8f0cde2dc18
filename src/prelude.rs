// prelude.rs - Convenient re-exports for the public API.
//
//! # Prelude
//!
//! ```
//! use ruby_regex_flavor::prelude::*;
//!
//! let re = translate(r"\h+", "").unwrap();
//! assert_eq!(re.pattern(), "[0-9A-Fa-f]+");
//! ```

pub use crate::api::{
    translate, validate, RegexFlavorProcessor, RegexSource, RubyFlavorProcessor, TranslatedRegex,
    TranslatorBuilder,
};
pub use crate::error::{RegexError, RegexResult};
pub use crate::flags::RubyFlags;
