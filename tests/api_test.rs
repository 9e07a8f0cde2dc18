// api_test.rs - Integration tests for the public API.

use std::collections::HashMap;

use ruby_regex_flavor::api::{RegexSource, SourcePattern, TranslatorBuilder};
use ruby_regex_flavor::encodings::{ONIG_ENCODING_ASCII, ONIG_ENCODING_UTF16};
use ruby_regex_flavor::error::RegexError;
use ruby_regex_flavor::prelude::*;
use ruby_regex_flavor::regenc::encoding_by_name;

// === translate ===

#[test]
fn simple_pattern() {
    let re = translate(r"\d+", "").unwrap();
    assert_eq!(re.pattern(), r"\d+");
    assert_eq!(re.flags(), "su");
    assert_eq!(re.group_count(), 1);
}

#[test]
fn empty_pattern() {
    let re = translate("", "").unwrap();
    assert_eq!(re.pattern(), "");
    assert_eq!(re.group_count(), 1);
}

#[test]
fn named_groups_map() {
    let re = translate(r"(?<year>\d{4})-(?<month>\d{2})", "").unwrap();
    let expected: HashMap<String, usize> = [("year".to_string(), 1), ("month".to_string(), 2)]
        .into_iter()
        .collect();
    assert_eq!(re.named_groups(), Some(&expected));
    assert_eq!(re.group_number("month"), Some(2));
    assert_eq!(re.group_number("day"), None);
}

#[test]
fn into_pattern_and_display() {
    let re = translate("a", "y").unwrap();
    assert_eq!(re.to_string(), "/a/suy");
    assert_eq!(re.into_pattern(), "a");
}

#[test]
fn invalid_pattern_syntax_error() {
    let err = translate(r"(unclosed", "").unwrap_err();
    match err {
        RegexError::Syntax { position, .. } => assert_eq!(position, 0),
        other => panic!("expected Syntax error, got {:?}", other),
    }
}

#[test]
fn invalid_flag_string() {
    assert_eq!(translate("a", "s").unwrap_err(), RegexError::InvalidFlag('s'));
    assert_eq!(
        validate("a", "i m").unwrap_err().to_string(),
        "invalid flag ' '"
    );
}

#[test]
fn unsupported_is_reported_with_position() {
    let err = translate(r"ab\G", "").unwrap_err();
    assert_eq!(
        err,
        RegexError::Unsupported {
            reason: "\\G escape sequence is not supported".to_string(),
            position: 2,
        }
    );
    assert_eq!(err.to_string(), "unsupported at 2: \\G escape sequence is not supported");
}

// === RubyFlavorProcessor ===

#[test]
fn processor_reuses_source() {
    let source = RegexSource::new(r"(a)(?<b>b)", "i");
    let p = RubyFlavorProcessor::new(&source).unwrap();
    assert_eq!(p.flags(), RubyFlags::IGNORECASE);
    assert_eq!(p.number_of_capture_groups().unwrap(), 3);
    let first = p.to_ecmascript_regex().unwrap();
    let second = p.to_ecmascript_regex().unwrap();
    assert_eq!(first.pattern(), "([Aa])([Bb])");
    assert_eq!(first.pattern(), second.pattern());
    assert_eq!(p.source().flags(), "i");
}

#[test]
fn processor_as_trait_object() {
    let source = RegexSource::new(r"a|b", "");
    let p = RubyFlavorProcessor::new(&source).unwrap();
    let dynamic: &dyn RegexFlavorProcessor = &p;
    assert!(dynamic.validate().is_ok());
    assert_eq!(dynamic.to_ecmascript_regex().unwrap().pattern(), "a|b");
    assert_eq!(dynamic.named_capture_groups().unwrap(), None);
}

#[test]
fn processor_depth_limit() {
    let deep = format!("{}a{}", "(".repeat(50), ")".repeat(50));
    let source = RegexSource::new(&deep, "");
    let p = RubyFlavorProcessor::new(&source).unwrap();
    assert!(p.validate().is_ok());
    let limited = RubyFlavorProcessor::new(&source).unwrap().with_depth_limit(10);
    assert!(matches!(
        limited.validate(),
        Err(RegexError::ParseDepthLimitOver { .. })
    ));
}

#[test]
fn nested_classes_hit_depth_limit() {
    let deep = format!("{}a{}", "[".repeat(40), "]".repeat(40));
    let err = TranslatorBuilder::new(&deep)
        .parse_depth_limit(16)
        .translate()
        .unwrap_err();
    assert!(matches!(err, RegexError::ParseDepthLimitOver { .. }));
    assert_eq!(
        TranslatorBuilder::new(&deep).translate().unwrap().pattern(),
        "[a]"
    );
}

#[test]
fn default_depth_limit_fits_small_stack() {
    // Parse on a 2 MiB thread; past the default limit the parser must
    // report an error rather than overflow.
    fn on_small_stack(pattern: String) -> Result<(), RegexError> {
        std::thread::Builder::new()
            .stack_size(2 << 20)
            .spawn(move || translate(&pattern, "").map(|_| ()))
            .unwrap()
            .join()
            .unwrap()
    }
    let nested = |open: &str, close: &str, n: usize| {
        format!("{}a{}", open.repeat(n), close.repeat(n))
    };
    for (open, close) in [("(", ")"), ("[", "]"), ("(?:", ")"), ("(?=", ")")] {
        assert!(on_small_stack(nested(open, close, 200)).is_ok(), "{}", open);
        for n in [300, 1000, 5000] {
            assert!(
                matches!(
                    on_small_stack(nested(open, close, n)),
                    Err(RegexError::ParseDepthLimitOver { .. })
                ),
                "{} x {}",
                open,
                n
            );
        }
    }
    let conditionals = format!("(a){}b{}", "(?(1)".repeat(1000), ")".repeat(1000));
    assert!(matches!(
        on_small_stack(conditionals),
        Err(RegexError::ParseDepthLimitOver { .. })
    ));
}

// === RegexSource ===

#[test]
fn byte_source_positions_are_byte_offsets() {
    let source = RegexSource::from_bytes("é(".as_bytes(), "");
    assert!(matches!(source.pattern(), SourcePattern::Bytes(_)));
    assert_eq!(source.encoding().name(), "ISO-8859-1");
    let err = RubyFlavorProcessor::new(&source).unwrap().validate().unwrap_err();
    assert_eq!(err.position(), Some(2));

    let err = validate("é(", "").unwrap_err();
    assert_eq!(err.position(), Some(1));
}

#[test]
fn source_with_encoding() {
    let source = RegexSource::new("[^a]", "").with_encoding(&ONIG_ENCODING_UTF16);
    let re = RubyFlavorProcessor::new(&source)
        .unwrap()
        .to_ecmascript_regex()
        .unwrap();
    assert_eq!(re.pattern(), r"[\u{0}-`b-\u{10ffff}]");
    assert_eq!(re.encoding().name(), "UTF-16");
}

// === TranslatorBuilder ===

#[test]
fn builder_case_insensitive() {
    let re = TranslatorBuilder::new("hello")
        .case_insensitive(true)
        .translate()
        .unwrap();
    assert_eq!(re.pattern(), "[Hh][Ee][Ll][Ll][Oo]");
}

#[test]
fn builder_ascii_folding_for_single_byte_targets() {
    let re = TranslatorBuilder::new("k")
        .case_insensitive(true)
        .encoding(&ONIG_ENCODING_ASCII)
        .translate()
        .unwrap();
    assert_eq!(re.pattern(), "[Kk]");

    let re = TranslatorBuilder::new("k")
        .case_insensitive(true)
        .translate()
        .unwrap();
    assert_eq!(re.pattern(), "[Kk\u{212A}]");
}

#[test]
fn builder_encoding_by_name() {
    let latin1 = encoding_by_name("latin1").unwrap();
    let re = TranslatorBuilder::new(r"\W")
        .encoding(latin1)
        .translate()
        .unwrap();
    assert_eq!(re.pattern(), r"\W");
    assert_eq!(re.encoding().max_code_point(), 0xFF);
}

#[test]
fn builder_toggles_flags_off() {
    let b = TranslatorBuilder::new(".")
        .multiline(true)
        .multiline(false)
        .sticky(true);
    let re = b.translate().unwrap();
    assert_eq!(re.pattern(), r"[^\n]");
    assert_eq!(re.flags(), "suy");
    assert!(b.validate().is_ok());
}
