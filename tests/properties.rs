// properties.rs - Property-based tests for the range sets and the parser.

use proptest::prelude::*;

use ruby_regex_flavor::charset::CodePointSetAccumulator;
use ruby_regex_flavor::prelude::*;
use ruby_regex_flavor::regenc::UNICODE_LIMIT;

// ============================================================================
// Strategies
// ============================================================================

fn ranges() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((0u32..=UNICODE_LIMIT, 0u32..300), 0..12)
        .prop_map(|v| {
            v.into_iter()
                .map(|(lo, len)| (lo, lo.saturating_add(len).min(UNICODE_LIMIT)))
                .collect()
        })
}

fn accumulate(ranges: &[(u32, u32)]) -> CodePointSetAccumulator {
    let mut acc = CodePointSetAccumulator::new();
    for &(lo, hi) in ranges {
        acc.add_range(lo, hi).unwrap();
    }
    acc
}

// Short patterns over an alphabet dense in metacharacters.
fn pattern() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "a", "b", "(", ")", "(?:", "(?<n>", "|", "*", "+", "?", "{2}", "[", "]", "^", "-",
            "\\", "\\1", "\\d", "\\k<n>", ".", "(?i)", "(?>", "&&",
        ]),
        0..10,
    )
    .prop_map(|parts| parts.concat())
}

// ============================================================================
// Range sets
// ============================================================================

proptest! {
    #[test]
    fn accumulator_stays_normalized(input in ranges()) {
        let acc = accumulate(&input);
        for pair in acc.ranges().windows(2) {
            // Sorted, disjoint and not adjacent.
            prop_assert!(pair[0].hi.saturating_add(1) < pair[1].lo);
        }
        for r in acc.ranges() {
            prop_assert!(r.lo <= r.hi);
        }
        for &(lo, hi) in &input {
            prop_assert!(acc.contains(lo));
            prop_assert!(acc.contains(hi));
        }
    }

    #[test]
    fn double_inversion_is_identity(input in ranges()) {
        let acc = accumulate(&input);
        let mut once = CodePointSetAccumulator::new();
        let mut twice = CodePointSetAccumulator::new();
        acc.invert_into(&mut once, UNICODE_LIMIT);
        once.invert_into(&mut twice, UNICODE_LIMIT);
        prop_assert_eq!(acc.ranges(), twice.ranges());
    }

    #[test]
    fn inversion_partitions_the_code_space(input in ranges(), probe in 0u32..=UNICODE_LIMIT) {
        let acc = accumulate(&input);
        let mut inverted = CodePointSetAccumulator::new();
        acc.invert_into(&mut inverted, UNICODE_LIMIT);
        prop_assert_ne!(acc.contains(probe), inverted.contains(probe));
    }

    #[test]
    fn intersection_keeps_common_points(a in ranges(), b in ranges(), probe in 0u32..=UNICODE_LIMIT) {
        let mut left = accumulate(&a);
        let right = accumulate(&b);
        let expected = left.contains(probe) && right.contains(probe);
        left.intersect_with(&right);
        prop_assert_eq!(left.contains(probe), expected);
    }
}

// ============================================================================
// Parser
// ============================================================================

proptest! {
    #[test]
    fn validate_and_translate_agree(p in pattern()) {
        match (validate(&p, ""), translate(&p, "")) {
            (Ok(()), Ok(_)) => {}
            (Ok(()), Err(e)) => prop_assert!(e.is_unsupported(), "/{}/: {}", p, e),
            (Err(v), Err(t)) => prop_assert_eq!(v, t),
            (Err(v), Ok(re)) => {
                prop_assert!(false, "/{}/ rejected by validate ({}) but translated to {}", p, v, re.pattern())
            }
        }
    }

    #[test]
    fn group_count_matches_capturing_groups(parts in prop::collection::vec(0u8..3, 0..12)) {
        let mut pattern = String::new();
        let mut capturing = 0;
        for part in parts {
            match part {
                0 => {
                    pattern.push_str("(a)");
                    capturing += 1;
                }
                1 => pattern.push_str("(?:b)"),
                _ => pattern.push('c'),
            }
        }
        let re = translate(&pattern, "").unwrap();
        prop_assert_eq!(re.group_count(), capturing + 1);
        prop_assert_eq!(re.pattern(), pattern.as_str());
    }

    #[test]
    fn plain_text_survives_translation(text in "[a-zA-Z0-9 ,;:!@#%=~_]{0,24}") {
        let re = translate(&text, "").unwrap();
        prop_assert_eq!(re.pattern(), text.as_str());
    }
}
