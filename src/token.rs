//! Token within a version number.
//!
//! A version token is the part of a version number that appears between
//! delimiters, typically `.` or `-`. For example, the version number
//! `2.3.07b` contains the tokens `2`, `3` and `07b`.
//!
//! Version tokens are only allowed to contain alphanumerics (any case) and
//! underscores.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use crate::error::VersionError;

/// A maximal numeric or non-numeric run within a [`Token`].
///
/// Numeric subtokens remember their original text width so that
/// [`Token::successor`] can zero-pad the incremented value back to it
/// (`"009"` -> `"010"`).
#[derive(Debug, Clone)]
enum Subtoken {
    Alpha(String),
    Numeric { value: u64, width: usize },
}

impl Subtoken {
    fn text(&self) -> String {
        match self {
            Subtoken::Alpha(s) => s.clone(),
            Subtoken::Numeric { value, width } => format!("{:0width$}", value, width = width),
        }
    }

    /// Rank of a single byte within this domain's alpha ordering:
    /// `_` is the smallest letter-class character, then `A`-`Z`, then `a`-`z`.
    fn byte_rank(b: u8) -> u8 {
        match b {
            b'_' => 0,
            b'A'..=b'Z' => 1 + (b - b'A'),
            b'a'..=b'z' => 27 + (b - b'a'),
            // Can't occur in a well-formed token, but give every byte a rank
            // so this stays a total order.
            other => 53 + other,
        }
    }

    fn alpha_cmp(a: &str, b: &str) -> Ordering {
        a.bytes()
            .map(Self::byte_rank)
            .cmp(b.bytes().map(Self::byte_rank))
    }
}

impl PartialEq for Subtoken {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Subtoken::Numeric { value: a, .. }, Subtoken::Numeric { value: b, .. }) => a == b,
            (Subtoken::Alpha(a), Subtoken::Alpha(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Subtoken {}

impl Ord for Subtoken {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Subtoken::Numeric { value: a, .. }, Subtoken::Numeric { value: b, .. }) => a.cmp(b),
            (Subtoken::Alpha(a), Subtoken::Alpha(b)) => Self::alpha_cmp(a, b),
            // alphas always come before numbers
            (Subtoken::Alpha(_), Subtoken::Numeric { .. }) => Ordering::Less,
            (Subtoken::Numeric { .. }, Subtoken::Alpha(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Subtoken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A single atom of a version, e.g. `07b` or `rc02`.
///
/// Comparison is a strict weak order over the token's subtokens: alphas
/// before numbers, numbers compared by value (padding-insensitive), alphas
/// compared by a custom byte order where `_` sorts before `A`-`Z` before
/// `a`-`z`.
#[derive(Debug, Clone, Eq)]
pub struct Token {
    raw: String,
    subtokens: Vec<Subtoken>,
}

impl Token {
    /// Parses a single token. Fails unless `s` matches `^[A-Za-z0-9_]+$`.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        if s.is_empty() || !s.bytes().all(is_token_byte) {
            return Err(VersionError::invalid_token(
                s,
                "tokens may only contain letters, digits and underscores, and must be non-empty",
            ));
        }
        Ok(Self {
            raw: s.to_string(),
            subtokens: decompose(s),
        })
    }

    /// The smallest token strictly greater than `self`.
    pub fn successor(&self) -> Self {
        let mut subtokens = self.subtokens.clone();
        let last = subtokens.pop().expect("tokens are never empty");
        let next_last = match last {
            Subtoken::Numeric { value, width } => Subtoken::Numeric {
                value: value + 1,
                width,
            },
            Subtoken::Alpha(s) => Subtoken::Alpha(s + "_"),
        };
        subtokens.push(next_last);
        let raw = subtokens.iter().map(Subtoken::text).collect();
        Self { raw, subtokens }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.subtokens == other.subtokens
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        self.subtokens.cmp(&other.subtokens)
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Splits `s` into alternating numeric/non-numeric subtokens in a single
/// scan, starting with whichever kind appears first.
fn decompose(s: &str) -> Vec<Subtoken> {
    let bytes = s.as_bytes();
    let mut subtokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let is_digit = bytes[i].is_ascii_digit();
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() == is_digit {
            i += 1;
        }
        let run = &s[start..i];
        if is_digit {
            subtokens.push(Subtoken::Numeric {
                value: run.parse().expect("ascii digit run parses as u64"),
                width: run.len(),
            });
        } else {
            subtokens.push(Subtoken::Alpha(run.to_string()));
        }
    }
    subtokens
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn successor_is_always_strictly_greater(s in "[a-zA-Z0-9_]{1,8}") {
            let t = Token::parse(&s).unwrap();
            prop_assert!(t.successor() > t);
        }

        #[test]
        fn padding_insensitive_equality_is_symmetric(n in 0u64..1000) {
            let a = Token::parse(&n.to_string()).unwrap();
            let padded = Token::parse(&format!("{:06}", n)).unwrap();
            prop_assert_eq!(a, padded);
        }
    }
}
