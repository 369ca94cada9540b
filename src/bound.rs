//! A single contiguous interval of versions.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use crate::endpoint::{LowerEndpoint, UpperEndpoint};
use crate::version::Version;

/// One contiguous interval, defined by an optional lower and optional upper
/// endpoint. At least one of the two must be present.
///
/// An absent lower endpoint means "no lower constraint" (equivalent to
/// `(Version::empty(), inclusive = true)`); an absent upper endpoint means
/// "no upper constraint" (`+infinity`).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Bound {
    pub lower: Option<LowerEndpoint>,
    pub upper: Option<UpperEndpoint>,
}

impl Bound {
    pub fn new(lower: Option<LowerEndpoint>, upper: Option<UpperEndpoint>) -> Self {
        debug_assert!(lower.is_some() || upper.is_some());
        Self { lower, upper }
    }

    /// The universe: no lower or upper constraint at all.
    pub fn universe() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    /// Whether this bound describes a non-empty interval, per spec: either
    /// endpoint absent, or lower < upper, or lower == upper with both
    /// inclusive (a point interval).
    pub fn is_valid(&self) -> bool {
        match (&self.lower, &self.upper) {
            (None, _) | (_, None) => true,
            (Some(lower), Some(upper)) => match lower.version.cmp(&upper.version) {
                Ordering::Less => true,
                Ordering::Equal => lower.inclusive && upper.inclusive,
                Ordering::Greater => false,
            },
        }
    }

    pub fn contains(&self, v: &Version) -> bool {
        let lower_ok = match &self.lower {
            None => true,
            Some(lower) if lower.inclusive => *v >= lower.version,
            Some(lower) => *v > lower.version,
        };
        let upper_ok = match &self.upper {
            None => true,
            Some(upper) if upper.inclusive => *v <= upper.version,
            Some(upper) => *v < upper.version,
        };
        lower_ok && upper_ok
    }

    pub fn intersects(&self, other: &Bound) -> bool {
        self.intersect(other).is_some()
    }

    /// Whether every version in `self` is also in `other`.
    pub fn is_subset_of(&self, other: &Bound) -> bool {
        self.intersect(other).as_ref() == Some(self)
    }

    /// Intersection of two bounds, or `None` if it would be empty.
    pub fn intersect(&self, other: &Bound) -> Option<Bound> {
        let lower = lower_max(&self.lower, &other.lower);
        let upper = upper_min(&self.upper, &other.upper);
        if lower.is_none() && upper.is_none() {
            return Some(Bound::universe());
        }
        let bound = Bound { lower, upper };
        bound.is_valid().then_some(bound)
    }

    /// True when `self` and `other` overlap, or meet at a shared endpoint
    /// where at least one side is inclusive (so the union is one contiguous
    /// interval, not two).
    fn touches(&self, other: &Bound) -> bool {
        let meets = |upper: &Option<UpperEndpoint>, lower: &Option<LowerEndpoint>| -> bool {
            match (upper, lower) {
                (Some(u), Some(l)) => u.version == l.version && (u.inclusive || l.inclusive),
                _ => false,
            }
        };
        meets(&self.upper, &other.lower) || meets(&other.upper, &self.lower)
    }

    /// Fuses `self` and `other` into a single Bound when they overlap or
    /// touch, otherwise returns them as a two-element list, sorted by lower
    /// endpoint.
    pub fn union_contiguous(&self, other: &Bound) -> Vec<Bound> {
        if self.intersects(other) || self.touches(other) {
            vec![Bound {
                lower: lower_min(&self.lower, &other.lower),
                upper: upper_max(&self.upper, &other.upper),
            }]
        } else if self.compare(other) == Ordering::Greater {
            vec![other.clone(), self.clone()]
        } else {
            vec![self.clone(), other.clone()]
        }
    }

    /// Orders by lower endpoint first, then by upper endpoint. An absent
    /// lower sorts first; an absent upper sorts last.
    pub fn compare(&self, other: &Bound) -> Ordering {
        lower_cmp(&self.lower, &other.lower).then_with(|| upper_cmp(&self.upper, &other.upper))
    }
}

impl Ord for Bound {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for Bound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Display for Bound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.lower, &self.upper) {
            (None, None) => Ok(()),
            (None, Some(upper)) => write!(f, "{}", upper),
            (Some(lower), None) => write!(f, "{}", lower),
            (Some(lower), Some(upper)) => {
                if lower.version == upper.version {
                    write!(f, "=={}", lower.version)
                } else if lower.inclusive && upper.inclusive {
                    write!(f, "{}..{}", lower.version, upper.version)
                } else if lower.inclusive
                    && !upper.inclusive
                    && !lower.version.is_empty()
                    && lower
                        .version
                        .successor()
                        .map(|next| next == upper.version)
                        .unwrap_or(false)
                {
                    write!(f, "{}", lower.version)
                } else {
                    write!(f, "{}{}", lower, upper)
                }
            }
        }
    }
}

fn lower_cmp(a: &Option<LowerEndpoint>, b: &Option<LowerEndpoint>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

fn upper_cmp(a: &Option<UpperEndpoint>, b: &Option<UpperEndpoint>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

/// The more restrictive (numerically greater) of two optional lower
/// endpoints, as used by intersection.
fn lower_max(a: &Option<LowerEndpoint>, b: &Option<LowerEndpoint>) -> Option<LowerEndpoint> {
    match (a, b) {
        (None, None) => None,
        (None, Some(x)) | (Some(x), None) => Some(x.clone()),
        (Some(a), Some(b)) => Some(if a >= b { a.clone() } else { b.clone() }),
    }
}

/// The less restrictive (numerically smaller) of two optional lower
/// endpoints, as used by union.
fn lower_min(a: &Option<LowerEndpoint>, b: &Option<LowerEndpoint>) -> Option<LowerEndpoint> {
    match (a, b) {
        (None, _) | (_, None) => None,
        (Some(a), Some(b)) => Some(if a <= b { a.clone() } else { b.clone() }),
    }
}

/// The more restrictive (numerically smaller) of two optional upper
/// endpoints, as used by intersection.
fn upper_min(a: &Option<UpperEndpoint>, b: &Option<UpperEndpoint>) -> Option<UpperEndpoint> {
    match (a, b) {
        (None, None) => None,
        (None, Some(x)) | (Some(x), None) => Some(x.clone()),
        (Some(a), Some(b)) => Some(if a <= b { a.clone() } else { b.clone() }),
    }
}

/// The less restrictive (numerically greater) of two optional upper
/// endpoints, as used by union.
fn upper_max(a: &Option<UpperEndpoint>, b: &Option<UpperEndpoint>) -> Option<UpperEndpoint> {
    match (a, b) {
        (None, _) | (_, None) => None,
        (Some(a), Some(b)) => Some(if a >= b { a.clone() } else { b.clone() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(v: &str, inclusive: bool) -> Option<LowerEndpoint> {
        Some(LowerEndpoint::new(Version::parse(v).unwrap(), inclusive))
    }

    fn upper(v: &str, inclusive: bool) -> Option<UpperEndpoint> {
        Some(UpperEndpoint::new(Version::parse(v).unwrap(), inclusive))
    }

    #[test]
    fn contains_respects_inclusivity() {
        let b = Bound::new(lower("1", true), upper("5", false));
        assert!(b.contains(&Version::parse("1").unwrap()));
        assert!(!b.contains(&Version::parse("5").unwrap()));
        assert!(b.contains(&Version::parse("4.99").unwrap()));
    }

    #[test]
    fn point_interval_contains_only_itself() {
        let b = Bound::new(lower("1.0", true), upper("1.0", true));
        assert!(b.contains(&Version::parse("1.0").unwrap()));
        assert!(!b.contains(&Version::parse("1.0.0").unwrap()));
    }

    #[test]
    fn intersect_takes_stricter_bounds() {
        let b1 = Bound::new(lower("1", true), upper("5", false));
        let b2 = Bound::new(lower("3", true), upper("7", false));
        let i = b1.intersect(&b2).unwrap();
        assert_eq!(i.to_string(), "3+<5");
    }

    #[test]
    fn disjoint_bounds_do_not_intersect() {
        let b1 = Bound::new(lower("1", true), upper("2", false));
        let b2 = Bound::new(lower("3", true), upper("4", false));
        assert!(!b1.intersects(&b2));
    }

    #[test]
    fn touching_bounds_fuse_on_union() {
        let b1 = Bound::new(lower("1", true), upper("3", false));
        let b2 = Bound::new(lower("3", true), upper("5", false));
        let fused = b1.union_contiguous(&b2);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].to_string(), "1+<5");
    }

    #[test]
    fn non_touching_bounds_stay_separate() {
        let b1 = Bound::new(lower("1", true), upper("2", false));
        let b2 = Bound::new(lower("5", true), None);
        let parts = b1.union_contiguous(&b2);
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn superset_form_collapses_to_bare_version() {
        let b = Bound::new(lower("3", true), upper("4", false));
        assert_eq!(b.to_string(), "3");
    }

    #[test]
    fn exact_point_prints_with_equals() {
        let b = Bound::new(lower("2.0", true), upper("2.0", true));
        assert_eq!(b.to_string(), "==2.0");
    }
}
