//! Version object.
//!
//! A Version is a sequence of zero or more version tokens, separated by
//! either a dot `.` or hyphen `-`. A Version is constructed from a string;
//! separators only affect a Version cosmetically - the version `1.0.0` is
//! equivalent to `1-0-0`.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::VersionError;
use crate::token::Token;

/// An ordered sequence of [`Token`]s plus the cosmetic separators between
/// them.
///
/// The empty Version (zero tokens) is the smallest possible Version and
/// represents "unversioned".
#[derive(Debug, Clone, Eq)]
pub struct Version {
    raw: String,
    tokens: Vec<Token>,
    seps: Vec<char>,
}

impl Version {
    /// The empty version: zero tokens, smallest possible value.
    pub fn empty() -> Self {
        Self {
            raw: String::new(),
            tokens: Vec::new(),
            seps: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Parses a version string. The empty string yields the empty Version;
    /// this is not an error.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        if s.is_empty() {
            return Ok(Self::empty());
        }

        let runs = split_runs(s);
        if !runs.first().map(|(is_token, _)| *is_token).unwrap_or(false) {
            return Err(VersionError::invalid_version(
                s,
                "version must not begin with a separator",
            ));
        }
        if !runs.last().map(|(is_token, _)| *is_token).unwrap_or(false) {
            return Err(VersionError::invalid_version(
                s,
                "version must not end with a separator",
            ));
        }

        let mut tokens = Vec::new();
        let mut seps = Vec::new();
        for (is_token, run) in &runs {
            if *is_token {
                let token = Token::parse(run).map_err(|err| {
                    VersionError::invalid_version(s, format!("invalid token '{}': {}", run, err))
                })?;
                tokens.push(token);
            } else {
                if run.len() != 1 {
                    return Err(VersionError::invalid_version(
                        s,
                        "consecutive separators are not allowed",
                    ));
                }
                let sep = run.chars().next().expect("checked length 1");
                if sep != '.' && sep != '-' {
                    return Err(VersionError::invalid_version(
                        s,
                        format!("'{}' is not a valid separator, only '.' and '-' are", sep),
                    ));
                }
                seps.push(sep);
            }
        }

        Ok(Self {
            raw: s.to_string(),
            tokens,
            seps,
        })
    }

    /// Returns the smallest Version strictly greater than `self`.
    ///
    /// Fails with [`VersionError::NoNext`] on the empty Version.
    pub fn successor(&self) -> Result<Self, VersionError> {
        if self.tokens.is_empty() {
            return Err(VersionError::NoNext);
        }
        let mut tokens = self.tokens.clone();
        let last = tokens.pop().expect("checked non-empty");
        tokens.push(last.successor());
        Ok(Self {
            raw: render(&tokens, &self.seps),
            tokens,
            seps: self.seps.clone(),
        })
    }

    /// Returns a Version containing only the first `n` tokens.
    pub fn trim(&self, n: usize) -> Self {
        let n = n.min(self.tokens.len());
        let tokens = self.tokens[..n].to_vec();
        let seps = if n == 0 {
            Vec::new()
        } else {
            self.seps[..n - 1].to_vec()
        };
        Self {
            raw: render(&tokens, &seps),
            tokens,
            seps,
        }
    }
}

fn render(tokens: &[Token], seps: &[char]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(seps[i - 1]);
        }
        out.push_str(&token.to_string());
    }
    out
}

/// Splits `s` into alternating token-byte / non-token-byte runs in a single
/// scan.
fn split_runs(s: &str) -> Vec<(bool, &str)> {
    let bytes = s.as_bytes();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let is_token = bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_';
        let start = i;
        while i < bytes.len() {
            let b_is_token = bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_';
            if b_is_token != is_token {
                break;
            }
            i += 1;
        }
        runs.push((is_token, &s[start..i]));
    }
    runs
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Vec's lexicographic Ord already treats a shorter prefix as smaller,
        // matching "3 < 3.0".
        self.tokens.cmp(&other.tokens)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
