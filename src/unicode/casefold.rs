// unicode/casefold.rs - Case-fold closure of code-point sets.

use regex_syntax::hir::{ClassUnicode, ClassUnicodeRange};

use crate::charset::CodePointSetAccumulator;

/// Which folding table to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseFoldAlgorithm {
    /// Only `A-Z` <-> `a-z`. Used for single-byte targets.
    Ascii,
    /// Unicode simple case folding.
    Unicode,
}

const SURROGATE_FIRST: u32 = 0xD800;
const SURROGATE_LAST: u32 = 0xDFFF;

/// Replace `acc` with the set of every code point that folds to the same
/// value as some member of `acc`. `tmp` is scratch space.
pub fn apply_case_fold(
    acc: &mut CodePointSetAccumulator,
    tmp: &mut CodePointSetAccumulator,
    algorithm: CaseFoldAlgorithm,
) {
    tmp.clear();
    match algorithm {
        CaseFoldAlgorithm::Ascii => fold_ascii(acc, tmp),
        CaseFoldAlgorithm::Unicode => fold_unicode(acc, tmp),
    }
    acc.add_all(tmp);
}

fn fold_ascii(acc: &CodePointSetAccumulator, tmp: &mut CodePointSetAccumulator) {
    const UPPER: (u32, u32) = (0x41, 0x5A);
    const LOWER: (u32, u32) = (0x61, 0x7A);
    for r in acc.ranges() {
        let lo = r.lo.max(UPPER.0);
        let hi = r.hi.min(UPPER.1);
        if lo <= hi {
            let _ = tmp.add_range(lo + 0x20, hi + 0x20);
        }
        let lo = r.lo.max(LOWER.0);
        let hi = r.hi.min(LOWER.1);
        if lo <= hi {
            let _ = tmp.add_range(lo - 0x20, hi - 0x20);
        }
    }
}

fn fold_unicode(acc: &CodePointSetAccumulator, tmp: &mut CodePointSetAccumulator) {
    let mut ranges = Vec::with_capacity(acc.ranges().len());
    for r in acc.ranges() {
        // Surrogates are not chars; fold the pieces on either side.
        if r.lo < SURROGATE_FIRST {
            push_char_range(&mut ranges, r.lo, r.hi.min(SURROGATE_FIRST - 1));
        }
        if r.hi > SURROGATE_LAST {
            push_char_range(&mut ranges, r.lo.max(SURROGATE_LAST + 1), r.hi);
        }
    }
    if ranges.is_empty() {
        return;
    }
    let mut class = ClassUnicode::new(ranges);
    if class.try_case_fold_simple().is_err() {
        return;
    }
    for r in class.ranges() {
        let _ = tmp.add_range(r.start() as u32, r.end() as u32);
    }
}

fn push_char_range(out: &mut Vec<ClassUnicodeRange>, lo: u32, hi: u32) {
    if let (Some(lo), Some(hi)) = (char::from_u32(lo), char::from_u32(hi.min(0x10FFFF))) {
        if lo <= hi {
            out.push(ClassUnicodeRange::new(lo, hi));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
