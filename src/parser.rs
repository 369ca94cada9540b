//! Grammar-driven recognizer that turns a range expression into raw Bounds.
//!
//! ```text
//! version        = [ token { sep token } ]            (* sep in {".","-"} *)
//! exact_range    = "==" version
//! lower_only     = ( ( ">" | ">=" ) version ) | ( version "+" )
//! upper_only     = ( "<" | "<=" ) version
//! closed_range   = lower_only upper_only
//! inclusive_pair = version ".." version
//! range_atom     = version | exact_range | lower_only | upper_only
//!                | closed_range | inclusive_pair
//! expression     = [ range_atom { "|" range_atom } ]
//! ```
//!
//! Each atom is lexed into a short run of operator/version lexemes and
//! reduced on a small value stack, the same shape as the original
//! `_VersionRangeParser`'s pyparsing parse actions: a version pushes a
//! `Version`, an operator pops what it needs and pushes a `LowerEndpoint`,
//! `UpperEndpoint`, or finished `Bound`.

use std::cell::RefCell;

use tracing::trace;

use crate::bound::Bound;
use crate::endpoint::{LowerEndpoint, UpperEndpoint};
use crate::error::VersionError;
use crate::version::Version;

#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Eq,
    Ge,
    Gt,
    Le,
    Lt,
    Plus,
    DotDot,
    Version(String),
}

fn lex(atom: &str) -> Vec<Lexeme> {
    let mut lexemes = Vec::new();
    let bytes = atom.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let rest = &atom[i..];
        if rest.starts_with("==") {
            lexemes.push(Lexeme::Eq);
            i += 2;
        } else if rest.starts_with(">=") {
            lexemes.push(Lexeme::Ge);
            i += 2;
        } else if rest.starts_with("<=") {
            lexemes.push(Lexeme::Le);
            i += 2;
        } else if rest.starts_with("..") {
            lexemes.push(Lexeme::DotDot);
            i += 2;
        } else if bytes[i] == b'>' {
            lexemes.push(Lexeme::Gt);
            i += 1;
        } else if bytes[i] == b'<' {
            lexemes.push(Lexeme::Lt);
            i += 1;
        } else if bytes[i] == b'+' {
            lexemes.push(Lexeme::Plus);
            i += 1;
        } else {
            let start = i;
            while i < bytes.len() {
                let rest = &atom[i..];
                let is_op_start = rest.starts_with("==")
                    || rest.starts_with(">=")
                    || rest.starts_with("<=")
                    || rest.starts_with("..")
                    || bytes[i] == b'>'
                    || bytes[i] == b'<'
                    || bytes[i] == b'+';
                if is_op_start {
                    break;
                }
                i += 1;
            }
            lexemes.push(Lexeme::Version(atom[start..i].to_string()));
        }
    }
    lexemes
}

#[derive(Debug, Clone)]
enum StackItem {
    Version(Version),
    Lower(LowerEndpoint),
    Upper(UpperEndpoint),
    Bound(Bound),
}

/// A reusable reduction stack for parsing range expressions.
///
/// Parsing is cheap and the stack carries no state across calls to
/// [`RangeParser::parse`]; instances exist only to amortize the small Vec
/// allocations. An instance MUST NOT be shared across concurrently parsing
/// threads - [`parse_range`](crate::parse_range) hands out a per-thread one.
#[derive(Debug, Default)]
pub struct RangeParser {
    stack: Vec<StackItem>,
}

impl RangeParser {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Parses a full range expression into its raw (unnormalized) Bounds.
    pub fn parse(&mut self, input: &str) -> Result<Vec<Bound>, VersionError> {
        let stripped: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if stripped.is_empty() {
            trace!(input, "empty range expression, yielding the universe");
            return Ok(vec![Bound::universe()]);
        }

        let mut bounds = Vec::new();
        for atom in stripped.split('|') {
            if atom.is_empty() {
                return Err(VersionError::invalid_range(
                    input,
                    "empty alternative between '|' separators",
                ));
            }
            let bound = self.parse_atom(input, atom)?;
            trace!(input, atom, bound = %bound, "reduced range atom");
            bounds.push(bound);
        }
        Ok(bounds)
    }

    fn parse_atom(&mut self, full_input: &str, atom: &str) -> Result<Bound, VersionError> {
        self.stack.clear();
        let lexemes = lex(atom);
        let mut i = 0;
        while i < lexemes.len() {
            match &lexemes[i] {
                Lexeme::Version(s) => {
                    let v = Version::parse(s).map_err(|err| {
                        VersionError::invalid_range(full_input, format!("bad version: {}", err))
                    })?;
                    self.stack.push(StackItem::Version(v));
                    i += 1;
                }
                Lexeme::Eq => {
                    i += 1;
                    let v = self.expect_version(full_input, &lexemes, &mut i)?;
                    self.stack.push(StackItem::Bound(Bound::new(
                        Some(LowerEndpoint::new(v.clone(), true)),
                        Some(UpperEndpoint::new(v, true)),
                    )));
                }
                Lexeme::Ge => {
                    i += 1;
                    let v = self.expect_version(full_input, &lexemes, &mut i)?;
                    self.stack
                        .push(StackItem::Lower(LowerEndpoint::new(v, true)));
                }
                Lexeme::Gt => {
                    i += 1;
                    let v = self.expect_version(full_input, &lexemes, &mut i)?;
                    self.stack
                        .push(StackItem::Lower(LowerEndpoint::new(v, false)));
                }
                Lexeme::Le => {
                    i += 1;
                    let v = self.expect_version(full_input, &lexemes, &mut i)?;
                    self.stack
                        .push(StackItem::Upper(UpperEndpoint::new(v, true)));
                }
                Lexeme::Lt => {
                    i += 1;
                    let v = self.expect_version(full_input, &lexemes, &mut i)?;
                    self.stack
                        .push(StackItem::Upper(UpperEndpoint::new(v, false)));
                }
                Lexeme::Plus => {
                    let v = self.pop_version(full_input)?;
                    self.stack.push(StackItem::Lower(LowerEndpoint::new(v, true)));
                    i += 1;
                }
                Lexeme::DotDot => {
                    let v1 = self.pop_version(full_input)?;
                    i += 1;
                    let v2 = self.expect_version(full_input, &lexemes, &mut i)?;
                    let bound = Bound::new(
                        Some(LowerEndpoint::new(v1, true)),
                        Some(UpperEndpoint::new(v2, true)),
                    );
                    self.stack.push(StackItem::Bound(bound));
                }
            }
        }

        self.finalize(full_input, atom)
    }

    fn expect_version(
        &self,
        full_input: &str,
        lexemes: &[Lexeme],
        i: &mut usize,
    ) -> Result<Version, VersionError> {
        match lexemes.get(*i) {
            Some(Lexeme::Version(s)) => {
                *i += 1;
                Version::parse(s).map_err(|err| {
                    VersionError::invalid_range(full_input, format!("bad version: {}", err))
                })
            }
            // A bare operator with nothing after it (e.g. ">") takes the
            // empty version as its operand.
            _ => Ok(Version::empty()),
        }
    }

    fn pop_version(&mut self, full_input: &str) -> Result<Version, VersionError> {
        match self.stack.pop() {
            Some(StackItem::Version(v)) => Ok(v),
            _ => Err(VersionError::invalid_range(
                full_input,
                "expected a version before this operator",
            )),
        }
    }

    fn finalize(&mut self, full_input: &str, atom: &str) -> Result<Bound, VersionError> {
        let bound = match self.stack.len() {
            1 => match self.stack.pop().expect("checked len") {
                StackItem::Version(v) => {
                    if v.is_empty() {
                        return Err(VersionError::invalid_range(
                            full_input,
                            "the empty version may only appear as the whole expression",
                        ));
                    }
                    let next = v.successor().map_err(|err| {
                        VersionError::invalid_range(full_input, err.to_string())
                    })?;
                    Bound::new(
                        Some(LowerEndpoint::new(v, true)),
                        Some(UpperEndpoint::new(next, false)),
                    )
                }
                StackItem::Lower(l) => Bound::new(Some(l), None),
                StackItem::Upper(u) => Bound::new(None, Some(u)),
                StackItem::Bound(b) => b,
            },
            2 => {
                let upper = match self.stack.pop() {
                    Some(StackItem::Upper(u)) => u,
                    _ => {
                        return Err(VersionError::invalid_range(
                            full_input,
                            format!("malformed range atom '{}'", atom),
                        ))
                    }
                };
                let lower = match self.stack.pop() {
                    Some(StackItem::Lower(l)) => l,
                    _ => {
                        return Err(VersionError::invalid_range(
                            full_input,
                            format!("malformed range atom '{}'", atom),
                        ))
                    }
                };
                Bound::new(Some(lower), Some(upper))
            }
            _ => {
                return Err(VersionError::invalid_range(
                    full_input,
                    format!("malformed range atom '{}'", atom),
                ))
            }
        };

        if !bound.is_valid() {
            return Err(VersionError::invalid_range(
                full_input,
                format!("range atom '{}' describes an empty interval", atom),
            ));
        }
        Ok(bound)
    }
}

thread_local! {
    static PARSER: RefCell<RangeParser> = RefCell::new(RangeParser::new());
}

/// Parses a range expression using the current thread's cached parser.
pub(crate) fn parse_with_thread_local(input: &str) -> Result<Vec<Bound>, VersionError> {
    PARSER.with(|cell| cell.borrow_mut().parse(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(s: &str) -> Vec<Bound> {
        RangeParser::new().parse(s).unwrap()
    }

    #[test]
    fn bare_version_is_superset() {
        let b = bounds("3");
        assert_eq!(b.len(), 1);
        assert!(b[0].contains(&Version::parse("3.99").unwrap()));
        assert!(!b[0].contains(&Version::parse("4").unwrap()));
    }

    #[test]
    fn exact_matches_only_that_version() {
        let b = bounds("==2.0");
        assert!(!b[0].contains(&Version::parse("2.0.0").unwrap()));
        assert!(b[0].contains(&Version::parse("2.0").unwrap()));
    }

    #[test]
    fn plus_and_ge_are_equivalent() {
        assert_eq!(bounds("3+"), bounds(">=3"));
    }

    #[test]
    fn closed_forms_agree() {
        assert_eq!(bounds("1+<5"), bounds(">=1<5"));
    }

    #[test]
    fn inclusive_pair_matches_closed_form() {
        let a = bounds("1..5");
        assert_eq!(a[0].to_string(), "1..5");
    }

    #[test]
    fn bare_gt_is_all_nonempty_versions() {
        let b = bounds(">");
        assert!(!b[0].contains(&Version::empty()));
        assert!(b[0].contains(&Version::parse("0").unwrap()));
    }

    #[test]
    fn empty_expression_is_universe() {
        let b = bounds("");
        assert_eq!(b, vec![Bound::universe()]);
    }

    #[test]
    fn alternatives_split_on_pipe() {
        let b = bounds("4|6+");
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn rejects_empty_alternative() {
        assert!(RangeParser::new().parse("3||4").is_err());
        assert!(RangeParser::new().parse("|3").is_err());
    }

    #[test]
    fn whitespace_is_insignificant() {
        assert_eq!(bounds(" >= 3 < 5 "), bounds(">=3<5"));
    }
}
