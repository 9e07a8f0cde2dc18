// charset.rs - Code-point range sets for character classes.
//
// CodePointSet is an immutable, normalized range list used for the
// Unicode and POSIX tables. CodePointSetAccumulator is the mutable
// builder used while parsing a class, and AccumulatorPool recycles
// builders across nested classes.

use std::fmt;

use smallvec::SmallVec;

/// Inclusive code-point range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CodePointRange {
    pub lo: u32,
    pub hi: u32,
}

impl CodePointRange {
    #[inline]
    pub const fn new(lo: u32, hi: u32) -> Self {
        CodePointRange { lo, hi }
    }

    #[inline]
    pub const fn single(cp: u32) -> Self {
        CodePointRange { lo: cp, hi: cp }
    }

    #[inline]
    pub fn is_single(&self) -> bool {
        self.lo == self.hi
    }

    #[inline]
    pub fn contains(&self, cp: u32) -> bool {
        self.lo <= cp && cp <= self.hi
    }
}

/// Returned by `add_range` when `hi < lo`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidRangeError {
    pub lo: u32,
    pub hi: u32,
}

impl fmt::Display for InvalidRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid range {:#x}-{:#x}", self.lo, self.hi)
    }
}

impl std::error::Error for InvalidRangeError {}

// ============================================================================
// CodePointSet
// ============================================================================

/// Immutable set of code points, stored as sorted, disjoint,
/// non-adjacent ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodePointSet {
    ranges: SmallVec<[CodePointRange; 4]>,
}

impl CodePointSet {
    pub fn empty() -> Self {
        CodePointSet::default()
    }

    /// Build a set from arbitrary (unsorted, overlapping) ranges.
    /// Ranges with `hi < lo` are ignored.
    pub fn from_ranges(ranges: impl IntoIterator<Item = CodePointRange>) -> Self {
        let mut acc = CodePointSetAccumulator::new();
        for r in ranges {
            let _ = acc.add_range(r.lo, r.hi);
        }
        acc.to_set()
    }

    pub fn from_code_points(cps: impl IntoIterator<Item = u32>) -> Self {
        Self::from_ranges(cps.into_iter().map(CodePointRange::single))
    }

    pub fn ranges(&self) -> &[CodePointRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, cp: u32) -> bool {
        contains_in(&self.ranges, cp)
    }

    pub fn union(&self, other: &CodePointSet) -> CodePointSet {
        let mut acc = CodePointSetAccumulator::new();
        acc.add_set(self);
        acc.add_set(other);
        acc.to_set()
    }

    /// Complement within `[0, max]`.
    pub fn invert(&self, max: u32) -> CodePointSet {
        let mut acc = CodePointSetAccumulator::new();
        acc.add_set(self);
        let mut out = CodePointSetAccumulator::new();
        acc.invert_into(&mut out, max);
        out.to_set()
    }
}

fn contains_in(ranges: &[CodePointRange], cp: u32) -> bool {
    let i = ranges.partition_point(|r| r.hi < cp);
    ranges.get(i).is_some_and(|r| r.lo <= cp)
}

// ============================================================================
// CodePointSetAccumulator
// ============================================================================

/// Mutable range set used while a character class is being parsed.
/// Ranges stay normalized after every mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodePointSetAccumulator {
    ranges: SmallVec<[CodePointRange; 8]>,
}

impl CodePointSetAccumulator {
    pub fn new() -> Self {
        CodePointSetAccumulator::default()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[CodePointRange] {
        &self.ranges
    }

    pub fn contains(&self, cp: u32) -> bool {
        contains_in(&self.ranges, cp)
    }

    /// True when the set holds exactly one code point.
    pub fn is_single_char(&self) -> bool {
        self.ranges.len() == 1 && self.ranges[0].is_single()
    }

    pub fn add_code_point(&mut self, cp: u32) {
        self.insert(cp, cp);
    }

    pub fn add_range(&mut self, lo: u32, hi: u32) -> Result<(), InvalidRangeError> {
        if hi < lo {
            return Err(InvalidRangeError { lo, hi });
        }
        self.insert(lo, hi);
        Ok(())
    }

    pub fn add_set(&mut self, set: &CodePointSet) {
        for r in set.ranges() {
            self.insert(r.lo, r.hi);
        }
    }

    /// Union `other` into this accumulator.
    pub fn add_all(&mut self, other: &CodePointSetAccumulator) {
        for r in other.ranges() {
            self.insert(r.lo, r.hi);
        }
    }

    // Merge [lo, hi] into the range list. Every existing range that
    // overlaps or touches it is absorbed.
    fn insert(&mut self, lo: u32, hi: u32) {
        let low = self.ranges.partition_point(|r| r.hi.saturating_add(1) < lo);
        let high = self
            .ranges
            .partition_point(|r| r.lo <= hi.saturating_add(1));

        let mut merged = CodePointRange::new(lo, hi);
        if low < high {
            merged.lo = merged.lo.min(self.ranges[low].lo);
            merged.hi = merged.hi.max(self.ranges[high - 1].hi);
            self.ranges.drain(low..high);
        }
        self.ranges.insert(low, merged);
    }

    /// Keep only the code points also present in `other`.
    pub fn intersect_with(&mut self, other: &CodePointSetAccumulator) {
        let a = &self.ranges;
        let b = &other.ranges;
        let mut out: SmallVec<[CodePointRange; 8]> = SmallVec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let lo = a[i].lo.max(b[j].lo);
            let hi = a[i].hi.min(b[j].hi);
            if lo <= hi {
                out.push(CodePointRange::new(lo, hi));
            }
            if a[i].hi < b[j].hi {
                i += 1;
            } else {
                j += 1;
            }
        }
        self.ranges = out;
    }

    /// Write the complement of this set within `[0, max]` into `target`.
    pub fn invert_into(&self, target: &mut CodePointSetAccumulator, max: u32) {
        target.clear();
        let mut next = 0u32;
        for r in &self.ranges {
            if r.lo > max {
                break;
            }
            if r.lo > next {
                target.ranges.push(CodePointRange::new(next, r.lo - 1));
            }
            if r.hi >= max {
                return;
            }
            next = r.hi + 1;
        }
        target.ranges.push(CodePointRange::new(next, max));
    }

    pub fn to_set(&self) -> CodePointSet {
        CodePointSet {
            ranges: self.ranges.iter().copied().collect(),
        }
    }
}

// ============================================================================
// AccumulatorPool
// ============================================================================

/// Free list of accumulators. `acquire` hands out a cleared instance,
/// reusing a released one when available.
#[derive(Debug, Default)]
pub struct AccumulatorPool {
    free: Vec<CodePointSetAccumulator>,
}

impl AccumulatorPool {
    pub fn new() -> Self {
        AccumulatorPool::default()
    }

    pub fn acquire(&mut self) -> CodePointSetAccumulator {
        match self.free.pop() {
            Some(mut acc) => {
                acc.clear();
                acc
            }
            None => CodePointSetAccumulator::new(),
        }
    }

    pub fn release(&mut self, acc: CodePointSetAccumulator) {
        self.free.push(acc);
    }

    /// Number of accumulators waiting for reuse.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
