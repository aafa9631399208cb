//! Single-interval ranges used as row-index metadata.
//!
//! A predicate can only ever declare one contiguous window of row indices in
//! which it may evaluate to true. Combining windows therefore never produces a
//! set of disjoint pieces: OR takes the enclosing span, and negation falls back
//! to the unbounded range whenever the exact complement would be two rays.

use std::{cmp::Ordering, fmt, ops::Bound};

/// Row-index window declared by a predicate.
pub type RowIndexRange = Interval<u64>;

/// An interval with owned bounds over a totally ordered domain.
///
/// An interval whose start lies past its end is *empty*; it is produced by
/// intersecting disjoint windows and contains nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval<K> {
    /// Start bound (inclusive/exclusive/unbounded).
    pub start: Bound<K>,
    /// End bound (inclusive/exclusive/unbounded).
    pub end: Bound<K>,
}

impl<K> Interval<K> {
    /// Create an unbounded interval (every value).
    pub fn all() -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Unbounded,
        }
    }

    /// Create a new interval from explicit bounds.
    pub fn new(start: Bound<K>, end: Bound<K>) -> Self {
        Self { start, end }
    }

    /// `[value, +∞)`
    pub fn at_least(value: K) -> Self {
        Self::new(Bound::Included(value), Bound::Unbounded)
    }

    /// `(value, +∞)`
    pub fn greater_than(value: K) -> Self {
        Self::new(Bound::Excluded(value), Bound::Unbounded)
    }

    /// `(-∞, value]`
    pub fn at_most(value: K) -> Self {
        Self::new(Bound::Unbounded, Bound::Included(value))
    }

    /// `(-∞, value)`
    pub fn less_than(value: K) -> Self {
        Self::new(Bound::Unbounded, Bound::Excluded(value))
    }

    /// `[lower, upper]`
    pub fn closed(lower: K, upper: K) -> Self {
        Self::new(Bound::Included(lower), Bound::Included(upper))
    }

    /// Whether both bounds are unbounded.
    pub fn is_all(&self) -> bool {
        matches!(
            (&self.start, &self.end),
            (Bound::Unbounded, Bound::Unbounded)
        )
    }
}

impl<K: Clone> Interval<K> {
    /// `[value, value]`
    pub fn singleton(value: K) -> Self {
        Self::closed(value.clone(), value)
    }
}

impl<K: Ord + Clone> Interval<K> {
    /// Whether this interval contains `value`.
    pub fn contains(&self, value: &K) -> bool {
        let start_ok = match &self.start {
            Bound::Unbounded => true,
            Bound::Included(bound) => value >= bound,
            Bound::Excluded(bound) => value > bound,
        };
        if !start_ok {
            return false;
        }
        match &self.end {
            Bound::Unbounded => true,
            Bound::Included(bound) => value <= bound,
            Bound::Excluded(bound) => value < bound,
        }
    }

    /// Whether the interval contains no value at all.
    ///
    /// `(x, x]`, `[x, x)` and `(x, x)` are considered empty; over a discrete
    /// domain `(x, x+1)` is not detected and is treated as non-empty, which only
    /// ever over-approximates.
    pub fn is_empty(&self) -> bool {
        is_empty_range(&self.start, &self.end)
    }

    /// Largest interval contained in both `self` and `other`.
    ///
    /// Disjoint inputs yield an empty interval.
    pub fn intersection(&self, other: &Self) -> Self {
        Self::new(
            max_lower(self.start.clone(), other.start.clone()),
            min_upper(self.end.clone(), other.end.clone()),
        )
    }

    /// Smallest single interval enclosing both `self` and `other`.
    ///
    /// Empty operands do not widen the result.
    pub fn span(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        Self::new(
            min_lower(self.start.clone(), other.start.clone()),
            max_upper(self.end.clone(), other.end.clone()),
        )
    }

    /// Smallest single interval enclosing the complement of `self`.
    ///
    /// A half-bounded interval flips to the opposite half. The complement of an
    /// interval bounded on both sides is two disjoint rays, so its hull is the
    /// unbounded interval; the same applies to the unbounded and empty inputs.
    pub fn negation_hull(&self) -> Self {
        match (&self.start, &self.end) {
            (Bound::Included(v), Bound::Unbounded) => Self::less_than(v.clone()),
            (Bound::Excluded(v), Bound::Unbounded) => Self::at_most(v.clone()),
            (Bound::Unbounded, Bound::Included(v)) => Self::greater_than(v.clone()),
            (Bound::Unbounded, Bound::Excluded(v)) => Self::at_least(v.clone()),
            _ => Self::all(),
        }
    }
}

impl Interval<u64> {
    /// Concrete half-open window `[lo, hi)` of row indices within a table of
    /// `len` rows.
    ///
    /// Returns an empty window (`lo == hi`) when nothing in `0..len` is covered.
    pub fn index_bounds(&self, len: u64) -> (u64, u64) {
        let lo = match self.start {
            Bound::Unbounded => 0,
            Bound::Included(v) => v,
            Bound::Excluded(v) => v.saturating_add(1),
        };
        let hi = match self.end {
            Bound::Unbounded => len,
            Bound::Included(v) => v.saturating_add(1).min(len),
            Bound::Excluded(v) => v.min(len),
        };
        if lo >= hi || self.is_empty() {
            (hi, hi)
        } else {
            (lo, hi)
        }
    }
}

impl<K: fmt::Display> fmt::Display for Interval<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.start {
            Bound::Unbounded => f.write_str("(-∞")?,
            Bound::Included(v) => write!(f, "[{v}")?,
            Bound::Excluded(v) => write!(f, "({v}")?,
        }
        f.write_str(", ")?;
        match &self.end {
            Bound::Unbounded => f.write_str("+∞)"),
            Bound::Included(v) => write!(f, "{v}]"),
            Bound::Excluded(v) => write!(f, "{v})"),
        }
    }
}

// Lower bounds at the same value: Included(x) < Excluded(x)
fn cmp_lower<K: Ord>(a: &Bound<K>, b: &Bound<K>) -> Ordering {
    use Bound as B;
    match (a, b) {
        (B::Unbounded, B::Unbounded) => Ordering::Equal,
        (B::Unbounded, _) => Ordering::Less,
        (_, B::Unbounded) => Ordering::Greater,
        (B::Included(x), B::Included(y)) | (B::Excluded(x), B::Excluded(y)) => x.cmp(y),
        (B::Included(x), B::Excluded(y)) => x.cmp(y).then(Ordering::Less),
        (B::Excluded(x), B::Included(y)) => x.cmp(y).then(Ordering::Greater),
    }
}

// Upper bounds at the same value: Excluded(x) < Included(x)
fn cmp_upper<K: Ord>(a: &Bound<K>, b: &Bound<K>) -> Ordering {
    use Bound as B;
    match (a, b) {
        (B::Unbounded, B::Unbounded) => Ordering::Equal,
        (B::Unbounded, _) => Ordering::Greater,
        (_, B::Unbounded) => Ordering::Less,
        (B::Included(x), B::Included(y)) | (B::Excluded(x), B::Excluded(y)) => x.cmp(y),
        (B::Included(x), B::Excluded(y)) => x.cmp(y).then(Ordering::Greater),
        (B::Excluded(x), B::Included(y)) => x.cmp(y).then(Ordering::Less),
    }
}

fn max_lower<K: Ord>(a: Bound<K>, b: Bound<K>) -> Bound<K> {
    if cmp_lower(&a, &b) == Ordering::Less {
        b
    } else {
        a
    }
}

fn min_lower<K: Ord>(a: Bound<K>, b: Bound<K>) -> Bound<K> {
    if cmp_lower(&a, &b) == Ordering::Greater {
        b
    } else {
        a
    }
}

fn min_upper<K: Ord>(a: Bound<K>, b: Bound<K>) -> Bound<K> {
    if cmp_upper(&a, &b) == Ordering::Greater {
        b
    } else {
        a
    }
}

fn max_upper<K: Ord>(a: Bound<K>, b: Bound<K>) -> Bound<K> {
    if cmp_upper(&a, &b) == Ordering::Less {
        b
    } else {
        a
    }
}

fn is_empty_range<K: Ord>(start: &Bound<K>, end: &Bound<K>) -> bool {
    use Bound as B;
    match (start, end) {
        (B::Unbounded, _) | (_, B::Unbounded) => false,
        (B::Included(a), B::Included(b)) => a > b,
        (B::Included(a), B::Excluded(b)) => a >= b,
        (B::Excluded(a), B::Included(b)) => a >= b,
        (B::Excluded(a), B::Excluded(b)) => a >= b,
    }
}
