// unicode/mod.rs - Unicode properties, POSIX brackets and Ruby's
// predefined character categories.
//
// Property data comes from regex-syntax's Unicode tables. Sets that the
// parser needs repeatedly are built once and cached for the process.

mod casefold;

use std::sync::OnceLock;

use regex_syntax::hir::{Class, Hir, HirKind};
use regex_syntax::ParserBuilder;

use crate::charset::{CodePointRange, CodePointSet};

pub use casefold::{apply_case_fold, CaseFoldAlgorithm};

// ============================================================================
// Property lookup
// ============================================================================

/// Resolve a Unicode property (general category, script or binary
/// property) to its code-point set. Names follow UTS#18 loose matching.
pub fn property(name: &str) -> Option<CodePointSet> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' ' | '='))
    {
        return None;
    }
    let mut parser = ParserBuilder::new().build();
    let hir = parser.parse(&format!(r"\p{{{}}}", name)).ok()?;
    hir_to_set(&hir)
}

fn hir_to_set(hir: &Hir) -> Option<CodePointSet> {
    match hir.kind() {
        HirKind::Class(Class::Unicode(cls)) => Some(CodePointSet::from_ranges(
            cls.ranges()
                .iter()
                .map(|r| CodePointRange::new(r.start() as u32, r.end() as u32)),
        )),
        HirKind::Literal(lit) => std::str::from_utf8(&lit.0)
            .ok()
            .map(|s| CodePointSet::from_code_points(s.chars().map(|c| c as u32))),
        _ => None,
    }
}

// Built-in table names always resolve; fall back to empty rather than panic.
fn table(name: &str) -> CodePointSet {
    property(name).unwrap_or_default()
}

/// Property lookup for `\p{...}`: POSIX bracket names first (`Alpha`,
/// `Word`, ...), then the Unicode database. `Graph` and `Print` have no
/// table and resolve to nothing.
pub fn lookup_property(name: &str) -> Option<CodePointSet> {
    if is_untranslatable_property(name) {
        return None;
    }
    let lower = name.to_ascii_lowercase();
    if let Some(set) = posix_class(&lower) {
        return Some(set.clone());
    }
    property(name)
}

/// Valid Ruby property names with no translation.
pub fn is_untranslatable_property(name: &str) -> bool {
    matches!(name.to_ascii_lowercase().as_str(), "graph" | "print")
}

// ============================================================================
// POSIX brackets
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PosixClass {
    Alpha,
    Alnum,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    XDigit,
    Word,
    Ascii,
}

struct PosixBracketEntry {
    name: &'static str,
    class: PosixClass,
}

static POSIX_BRACKETS: &[PosixBracketEntry] = &[
    PosixBracketEntry { name: "alpha", class: PosixClass::Alpha },
    PosixBracketEntry { name: "alnum", class: PosixClass::Alnum },
    PosixBracketEntry { name: "blank", class: PosixClass::Blank },
    PosixBracketEntry { name: "cntrl", class: PosixClass::Cntrl },
    PosixBracketEntry { name: "digit", class: PosixClass::Digit },
    PosixBracketEntry { name: "graph", class: PosixClass::Graph },
    PosixBracketEntry { name: "lower", class: PosixClass::Lower },
    PosixBracketEntry { name: "print", class: PosixClass::Print },
    PosixBracketEntry { name: "punct", class: PosixClass::Punct },
    PosixBracketEntry { name: "space", class: PosixClass::Space },
    PosixBracketEntry { name: "upper", class: PosixClass::Upper },
    PosixBracketEntry { name: "xdigit", class: PosixClass::XDigit },
    PosixBracketEntry { name: "word", class: PosixClass::Word },
    PosixBracketEntry { name: "ascii", class: PosixClass::Ascii },
];

impl PosixClass {
    fn build(self) -> CodePointSet {
        match self {
            PosixClass::Alpha => table("Alphabetic"),
            PosixClass::Alnum => table("Letter").union(&table("Number")),
            PosixClass::Blank => CodePointSet::from_code_points([0x09, 0x20]),
            PosixClass::Cntrl => table("Control"),
            PosixClass::Digit => table("Decimal_Number"),
            // No agreed definition yet; both match nothing.
            PosixClass::Graph | PosixClass::Print => CodePointSet::empty(),
            PosixClass::Lower => table("Lowercase"),
            PosixClass::Punct => table("Punctuation"),
            PosixClass::Space => table("White_Space"),
            PosixClass::Upper => table("Uppercase"),
            PosixClass::XDigit => table("Hex_Digit"),
            PosixClass::Word => table("Letter")
                .union(&table("Mark"))
                .union(&table("Number"))
                .union(&table("Connector_Punctuation")),
            PosixClass::Ascii => CodePointSet::from_ranges([CodePointRange::new(0, 0x7F)]),
        }
    }
}

/// The code-point set for a POSIX bracket name such as `alpha`.
pub fn posix_class(name: &str) -> Option<&'static CodePointSet> {
    static SETS: OnceLock<Vec<CodePointSet>> = OnceLock::new();
    let idx = POSIX_BRACKETS.iter().position(|e| e.name == name)?;
    SETS.get_or_init(|| POSIX_BRACKETS.iter().map(|e| e.class.build()).collect())
        .get(idx)
}

// ============================================================================
// Group names
// ============================================================================

fn xid_start() -> &'static CodePointSet {
    static SET: OnceLock<CodePointSet> = OnceLock::new();
    SET.get_or_init(|| table("XID_Start"))
}

fn xid_continue() -> &'static CodePointSet {
    static SET: OnceLock<CodePointSet> = OnceLock::new();
    SET.get_or_init(|| table("XID_Continue"))
}

pub fn is_group_name_start(c: char) -> bool {
    c == '_' || xid_start().contains(c as u32)
}

pub fn is_group_name_continue(c: char) -> bool {
    xid_continue().contains(c as u32)
}

// ============================================================================
// Predefined categories (\d \s \w \h)
// ============================================================================

// Ruby's shorthand classes are ASCII-only.
static DIGIT_RANGES: &[CodePointRange] = &[CodePointRange::new(0x30, 0x39)];
static SPACE_RANGES: &[CodePointRange] =
    &[CodePointRange::new(0x09, 0x0D), CodePointRange::single(0x20)];
static WORD_RANGES: &[CodePointRange] = &[
    CodePointRange::new(0x30, 0x39),
    CodePointRange::new(0x41, 0x5A),
    CodePointRange::single(0x5F),
    CodePointRange::new(0x61, 0x7A),
];
static HEX_DIGIT_RANGES: &[CodePointRange] = &[
    CodePointRange::new(0x30, 0x39),
    CodePointRange::new(0x41, 0x46),
    CodePointRange::new(0x61, 0x66),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharCategory {
    Digit,
    Space,
    Word,
    HexDigit,
}

/// A category escape, possibly complemented (`\D`, `\S`, `\W`, `\H`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryEscape {
    pub category: CharCategory,
    pub negated: bool,
}

impl CategoryEscape {
    pub fn from_escape_char(c: char) -> Option<CategoryEscape> {
        let category = match c.to_ascii_lowercase() {
            'd' => CharCategory::Digit,
            's' => CharCategory::Space,
            'w' => CharCategory::Word,
            'h' => CharCategory::HexDigit,
            _ => return None,
        };
        Some(CategoryEscape {
            category,
            negated: c.is_ascii_uppercase(),
        })
    }

    fn ranges(&self) -> &'static [CodePointRange] {
        match self.category {
            CharCategory::Digit => DIGIT_RANGES,
            CharCategory::Space => SPACE_RANGES,
            CharCategory::Word => WORD_RANGES,
            CharCategory::HexDigit => HEX_DIGIT_RANGES,
        }
    }

    /// The set this escape denotes, complemented within `[0, max]`.
    pub fn to_set(&self, max: u32) -> CodePointSet {
        let set = CodePointSet::from_ranges(self.ranges().iter().copied());
        if self.negated {
            set.invert(max)
        } else {
            set
        }
    }

    /// ECMAScript text for the escape outside a class.
    pub fn ecmascript(&self) -> &'static str {
        match (self.category, self.negated) {
            (CharCategory::Digit, false) => r"\d",
            (CharCategory::Digit, true) => r"\D",
            (CharCategory::Word, false) => r"\w",
            (CharCategory::Word, true) => r"\W",
            // ECMAScript's \s is Unicode whitespace; Ruby's is not.
            (CharCategory::Space, false) => r"[\t-\r ]",
            (CharCategory::Space, true) => r"[^\t-\r ]",
            (CharCategory::HexDigit, false) => "[0-9A-Fa-f]",
            (CharCategory::HexDigit, true) => "[^0-9A-Fa-f]",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_lookup() {
        let greek = property("Greek").unwrap();
        assert!(greek.contains('α' as u32));
        assert!(!greek.contains('a' as u32));
        assert!(property("Not_A_Property").is_none());
        assert!(property("L}").is_none());
    }

    #[test]
    fn posix_table() {
        assert!(posix_class("alpha").unwrap().contains('é' as u32));
        assert!(posix_class("digit").unwrap().contains('٣' as u32));
        assert!(posix_class("blank").unwrap().contains(0x09));
        assert!(posix_class("word").unwrap().contains('_' as u32));
        assert!(posix_class("graph").unwrap().is_empty());
        assert!(posix_class("print").unwrap().is_empty());
        assert!(posix_class("bogus").is_none());
    }

    #[test]
    fn digit_is_decimal_number_only() {
        let digit = posix_class("digit").unwrap();
        assert!(digit.contains('0' as u32));
        assert!(digit.contains(0x660));
        assert!(!digit.contains(0xB2));
        assert!(!digit.contains(0x2155));
        let alnum = posix_class("alnum").unwrap();
        assert!(alnum.contains(0xB2));
        assert!(alnum.contains(0x2155));
    }

    #[test]
    fn graph_and_print_have_no_property_table() {
        assert!(is_untranslatable_property("Print"));
        assert!(is_untranslatable_property("graph"));
        assert!(!is_untranslatable_property("Alpha"));
        assert!(lookup_property("Print").is_none());
        assert!(lookup_property("GRAPH").is_none());
    }

    #[test]
    fn property_lookup_prefers_posix_names() {
        let alpha = lookup_property("Alpha").unwrap();
        assert!(alpha.contains('Z' as u32));
        assert!(lookup_property("Hiragana").unwrap().contains('せ' as u32));
    }

    #[test]
    fn group_name_characters() {
        assert!(is_group_name_start('_'));
        assert!(is_group_name_start('名'));
        assert!(!is_group_name_start('1'));
        assert!(is_group_name_continue('1'));
        assert!(!is_group_name_continue('-'));
    }

    #[test]
    fn categories() {
        let w = CategoryEscape::from_escape_char('w').unwrap();
        assert!(!w.negated);
        assert!(w.to_set(0x10FFFF).contains('_' as u32));
        assert!(!w.to_set(0x10FFFF).contains('é' as u32));

        let big_s = CategoryEscape::from_escape_char('S').unwrap();
        assert!(big_s.negated);
        assert!(!big_s.to_set(0xFF).contains(0x0B));
        assert!(big_s.to_set(0xFF).contains('a' as u32));
        assert_eq!(big_s.ecmascript(), r"[^\t-\r ]");

        assert!(CategoryEscape::from_escape_char('q').is_none());
    }
}
