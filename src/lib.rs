//! Version algebra core for a package management system.
//!
//! This crate is the set of types and algorithms by which packages are
//! identified, dependencies are requested, and a resolver decides
//! compatibility: a custom ordered-token version grammar, an interval
//! algebra over those versions, and a range-expression grammar with several
//! equivalent surface syntaxes (`"3"`, `"3+"`, `">=3"`, `"1..5"`, `"1+<5"`,
//! `"3|5+"`) that all reduce to the same interval representation.
//!
//! The crate performs no I/O and has no global mutable state beyond a
//! per-thread range-parser cache (see [`parser`]).
//!
//! ```rust
//! use std::str::FromStr;
//! use rez_version::{Version, VersionRange};
//!
//! let range = VersionRange::from_str("3+<6|4+<8").unwrap();
//! assert_eq!(range.to_string(), "3+<8");
//!
//! let version = Version::from_str("3.99").unwrap();
//! assert!(range.contains_version(&version));
//! ```

mod bound;
mod endpoint;
mod error;
mod parser;
mod range;
mod token;
mod version;

pub use bound::Bound;
pub use endpoint::{LowerEndpoint, UpperEndpoint};
pub use error::{VersionError, VersionErrorReport};
pub use range::VersionRange;
pub use token::Token;
pub use version::Version;

use std::cmp::Ordering;

/// Parses a version string. The empty string is the smallest possible
/// Version ("unversioned"), not an error.
pub fn parse_version(s: &str) -> Result<Version, VersionError> {
    Version::parse(s)
}

/// Like [`parse_version`], but on failure returns a [`VersionErrorReport`]
/// ready to print to a terminal with the offending input underlined.
pub fn parse_version_reporting(s: &str) -> Result<Version, VersionErrorReport> {
    Version::parse(s).map_err(|err| VersionErrorReport::new(err, s))
}

/// Parses a version range expression. The empty string is the universal
/// range (every version matches).
pub fn parse_range(s: &str) -> Result<VersionRange, VersionError> {
    VersionRange::parse(s)
}

/// Compares two versions per the token/subtoken ordering rules.
pub fn version_compare(a: &Version, b: &Version) -> Ordering {
    a.cmp(b)
}

/// Whether `v` is contained in `r`.
pub fn version_in_range(r: &VersionRange, v: &Version) -> bool {
    r.contains_version(v)
}

/// Whether every version matched by `s` is also matched by `r`.
pub fn range_contains_range(r: &VersionRange, s: &VersionRange) -> bool {
    r.contains_range(s)
}

/// Whether `r` and `s` share any version.
pub fn ranges_intersect(r: &VersionRange, s: &VersionRange) -> bool {
    r.intersects(s)
}

pub fn range_union(r: &VersionRange, s: &VersionRange) -> VersionRange {
    r.union(s)
}

pub fn range_intersect(r: &VersionRange, s: &VersionRange) -> VersionRange {
    r.intersect(s)
}

pub fn range_subtract(r: &VersionRange, s: &VersionRange) -> VersionRange {
    r.subtract(s)
}

pub fn range_complement(r: &VersionRange) -> VersionRange {
    r.complement()
}

/// The smallest single [`Bound`] covering every Bound in `r`, or `None` if
/// `r` is empty.
pub fn range_span(r: &VersionRange) -> Option<Bound> {
    r.span()
}
