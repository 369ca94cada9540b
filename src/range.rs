//! A normalized union of disjoint, non-touching [`Bound`]s.
//!
//! A version range is a set of zero or more contiguous ranges of versions.
//! For example, "3.0 or greater, but less than 4" is a contiguous range that
//! contains versions such as "3.0", "3.1.0", "3.99", etc. Version ranges
//! behave something like sets - they can be intersected, unioned and
//! subtracted, and can also be inverted. You can test whether a Version is
//! contained within a VersionRange.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use tracing::warn;

use crate::bound::Bound;
use crate::endpoint::{LowerEndpoint, UpperEndpoint};
use crate::error::VersionError;
use crate::parser::parse_with_thread_local;
use crate::version::Version;

/// A normalized, ordered list of non-overlapping, non-touching [`Bound`]s.
///
/// An empty `bounds` list is the *empty set* - no version satisfies it. A
/// single universe [`Bound`] (`lower` and `upper` both absent) is the
/// *universe* - every version satisfies it. Both print as the empty string;
/// callers that need to tell them apart should use [`VersionRange::is_empty`]
/// / [`VersionRange::is_universe`] rather than comparing the printed form.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VersionRange {
    bounds: Vec<Bound>,
}

impl VersionRange {
    /// The set containing every version.
    pub fn universe() -> Self {
        Self {
            bounds: vec![Bound::universe()],
        }
    }

    /// The set containing no versions.
    pub fn empty() -> Self {
        Self { bounds: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn is_universe(&self) -> bool {
        matches!(self.bounds.as_slice(), [b] if b.lower.is_none() && b.upper.is_none())
    }

    /// Builds a normalized range from a list of raw, possibly-overlapping,
    /// possibly-invalid Bounds (e.g. straight from the parser or from a set
    /// operation).
    pub fn from_raw_bounds(bounds: Vec<Bound>) -> Self {
        Self {
            bounds: normalize(bounds),
        }
    }

    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    /// Parses a range expression (see the grammar in [`crate::parser`]).
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let raw = parse_with_thread_local(s)?;
        let range = Self::from_raw_bounds(raw);
        if range.is_empty() {
            warn!(input = s, "range expression normalizes to the empty set");
        }
        Ok(range)
    }

    pub fn contains_version(&self, v: &Version) -> bool {
        self.bounds.iter().any(|b| b.contains(v))
    }

    /// True iff every Bound of `other` is a subset of some Bound of `self`.
    pub fn contains_range(&self, other: &VersionRange) -> bool {
        other
            .bounds
            .iter()
            .all(|ob| self.bounds.iter().any(|sb| ob.is_subset_of(sb)))
    }

    pub fn intersects(&self, other: &VersionRange) -> bool {
        self.bounds
            .iter()
            .any(|a| other.bounds.iter().any(|b| a.intersects(b)))
    }

    pub fn union(&self, other: &VersionRange) -> VersionRange {
        let mut bounds = self.bounds.clone();
        bounds.extend(other.bounds.iter().cloned());
        Self::from_raw_bounds(bounds)
    }

    pub fn intersect(&self, other: &VersionRange) -> VersionRange {
        let mut bounds = Vec::new();
        for a in &self.bounds {
            for b in &other.bounds {
                if let Some(i) = a.intersect(b) {
                    bounds.push(i);
                }
            }
        }
        Self::from_raw_bounds(bounds)
    }

    pub fn subtract(&self, other: &VersionRange) -> VersionRange {
        let mut bounds = self.bounds.clone();
        for subtrahend in &other.bounds {
            let mut next = Vec::new();
            for b in &bounds {
                next.extend(subtract_bound(b, subtrahend));
            }
            bounds = next;
        }
        Self::from_raw_bounds(bounds)
    }

    pub fn complement(&self) -> VersionRange {
        Self::universe().subtract(self)
    }

    /// The smallest single Bound covering every Bound in this range, or
    /// `None` if the range is empty.
    pub fn span(&self) -> Option<Bound> {
        let first = self.bounds.first()?;
        let last = self.bounds.last()?;
        Some(Bound::new(first.lower.clone(), last.upper.clone()))
    }
}

/// Subtracts `subtrahend` from `b`, splitting `b` around the subtrahend's
/// endpoints. `subtrahend`'s complement is (up to) two half-open bounds -
/// everything below its lower endpoint and everything above its upper
/// endpoint - and the result is `b` intersected with each half.
fn subtract_bound(b: &Bound, subtrahend: &Bound) -> Vec<Bound> {
    if !b.intersects(subtrahend) {
        return vec![b.clone()];
    }

    let mut pieces = Vec::new();

    if let Some(sub_lower) = &subtrahend.lower {
        let left = Bound::new(
            b.lower.clone(),
            Some(UpperEndpoint::new(sub_lower.version.clone(), !sub_lower.inclusive)),
        );
        if left.is_valid() {
            if let Some(piece) = b.intersect(&left) {
                pieces.push(piece);
            }
        }
    }

    if let Some(sub_upper) = &subtrahend.upper {
        let right = Bound::new(
            Some(LowerEndpoint::new(sub_upper.version.clone(), !sub_upper.inclusive)),
            b.upper.clone(),
        );
        if right.is_valid() {
            if let Some(piece) = b.intersect(&right) {
                pieces.push(piece);
            }
        }
    }

    pieces
}

/// Drops empty Bounds, sorts by lower endpoint, then sweeps once fusing any
/// two adjacent Bounds that overlap or meet.
fn normalize(mut bounds: Vec<Bound>) -> Vec<Bound> {
    bounds.retain(Bound::is_valid);
    bounds.sort_by(Bound::compare);

    let mut result: Vec<Bound> = Vec::new();
    for bound in bounds {
        if let Some(last) = result.last() {
            let fused = last.union_contiguous(&bound);
            if fused.len() == 1 {
                *result.last_mut().expect("checked Some above") = fused.into_iter().next().expect("len 1");
                continue;
            }
        }
        result.push(bound);
    }
    result
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for VersionRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.bounds.iter().map(Bound::to_string).collect();
        write!(f, "{}", parts.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_expression_is_universe_not_empty_set() {
        let r = VersionRange::parse("").unwrap();
        assert!(r.is_universe());
        assert!(!r.is_empty());
        assert_eq!(r.to_string(), "");
    }

    #[test]
    fn overlapping_alternatives_fuse() {
        let r = VersionRange::parse("3+<6|4+<8").unwrap();
        assert_eq!(r.to_string(), "3+<8");
    }

    #[test]
    fn superset_contains_minor_versions_but_not_next_major() {
        let r = VersionRange::parse("3").unwrap();
        assert!(r.contains_version(&Version::parse("3.99").unwrap()));
        assert!(!r.contains_version(&Version::parse("4").unwrap()));
        assert!(!r.contains_version(&Version::parse("2.99").unwrap()));
    }

    #[test]
    fn intersect_matches_spec_scenario() {
        let r = VersionRange::parse("1+<5").unwrap();
        let s = VersionRange::parse("3+<7").unwrap();
        assert_eq!(r.intersect(&s).to_string(), "3+<5");
    }

    #[test]
    fn exact_does_not_contain_longer_version() {
        let r = VersionRange::parse("==2.0").unwrap();
        assert!(!r.contains_version(&Version::parse("2.0.0").unwrap()));
    }

    #[test]
    fn union_idempotent() {
        let r = VersionRange::parse("1+<5|8").unwrap();
        assert_eq!(r.union(&r), r);
    }

    #[test]
    fn union_commutative() {
        let r = VersionRange::parse("1+<5").unwrap();
        let s = VersionRange::parse("3+<9").unwrap();
        assert_eq!(r.union(&s), s.union(&r));
    }

    #[test]
    fn subtraction_identity() {
        let r = VersionRange::parse("1+<10").unwrap();
        let s = VersionRange::parse("3+<6").unwrap();
        let recombined = r.subtract(&s).union(&r.intersect(&s));
        assert_eq!(recombined, r);
    }

    #[test]
    fn de_morgan_on_complement() {
        let r = VersionRange::parse("1+<5").unwrap();
        let s = VersionRange::parse("3+<9").unwrap();
        let lhs = r.union(&s).complement();
        let rhs = r.complement().intersect(&s.complement());
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn complement_of_universe_is_empty() {
        assert!(VersionRange::universe().complement().is_empty());
    }

    #[test]
    fn span_covers_all_bounds() {
        let r = VersionRange::parse("1+<3|8+<9").unwrap();
        assert_eq!(r.span().unwrap().to_string(), "1+<9");
    }

    #[test]
    fn span_of_empty_range_is_none() {
        assert!(VersionRange::empty().span().is_none());
    }

    #[test]
    fn disjointness_invariant_holds_after_union() {
        let r = VersionRange::parse("1+<3|5+<7|9").unwrap();
        for pair in r.bounds().windows(2) {
            assert_eq!(pair[0].compare(&pair[1]), std::cmp::Ordering::Less);
            assert!(!pair[0].intersects(&pair[1]));
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::cmp::Ordering;

    /// A handful of small numeric tokens joined by `.`, enough to generate
    /// varied but always-parseable versions without needing a full grammar
    /// generator.
    fn arb_version() -> impl Strategy<Value = Version> {
        prop::collection::vec(0u32..6, 1..4).prop_map(|parts| {
            let raw = parts
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(".");
            Version::parse(&raw).unwrap()
        })
    }

    fn arb_bound() -> impl Strategy<Value = Bound> {
        (arb_version(), arb_version(), any::<bool>(), any::<bool>()).prop_filter_map(
            "must describe a non-empty interval",
            |(a, b, lo_inc, hi_inc)| {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let bound = Bound::new(
                    Some(LowerEndpoint::new(lo, lo_inc)),
                    Some(UpperEndpoint::new(hi, hi_inc)),
                );
                bound.is_valid().then_some(bound)
            },
        )
    }

    fn arb_range() -> impl Strategy<Value = VersionRange> {
        prop::collection::vec(arb_bound(), 0..4).prop_map(VersionRange::from_raw_bounds)
    }

    proptest! {
        #[test]
        fn union_is_commutative(r in arb_range(), s in arb_range()) {
            prop_assert_eq!(r.union(&s), s.union(&r));
        }

        #[test]
        fn union_is_idempotent(r in arb_range()) {
            prop_assert_eq!(r.union(&r), r);
        }

        #[test]
        fn intersect_is_commutative(r in arb_range(), s in arb_range()) {
            prop_assert_eq!(r.intersect(&s), s.intersect(&r));
        }

        #[test]
        fn de_morgan_over_union(r in arb_range(), s in arb_range()) {
            let lhs = r.union(&s).complement();
            let rhs = r.complement().intersect(&s.complement());
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn de_morgan_over_intersect(r in arb_range(), s in arb_range()) {
            let lhs = r.intersect(&s).complement();
            let rhs = r.complement().union(&s.complement());
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn subtraction_identity_holds(r in arb_range(), s in arb_range()) {
            let recombined = r.subtract(&s).union(&r.intersect(&s));
            prop_assert_eq!(recombined, r);
        }

        #[test]
        fn double_complement_is_identity(r in arb_range()) {
            prop_assert_eq!(r.complement().complement(), r);
        }

        #[test]
        fn normalized_bounds_are_strictly_ordered_and_disjoint(r in arb_range()) {
            for pair in r.bounds().windows(2) {
                prop_assert_eq!(pair[0].compare(&pair[1]), Ordering::Less);
                prop_assert!(!pair[0].intersects(&pair[1]));
            }
        }

        #[test]
        fn contains_version_agrees_with_membership_in_some_bound(r in arb_range(), v in arb_version()) {
            prop_assert_eq!(
                r.contains_version(&v),
                r.bounds().iter().any(|b| b.contains(&v))
            );
        }
    }
}
