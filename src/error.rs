//! Errors produced by token, version, and range parsing.

use std::fmt;

/// Everything that can go wrong while parsing or manipulating version values.
///
/// Each `Invalid*` variant carries the original input string so that a caller
/// can report it without re-threading context through every call site.
#[derive(thiserror::Error, Debug, Eq, PartialEq, Clone)]
pub enum VersionError {
    /// A token contained a character outside `[A-Za-z0-9_]`, or was empty.
    #[error("invalid version token '{input}': {message}")]
    InvalidToken { input: String, message: String },

    /// A version string had a leading/trailing/consecutive separator, an
    /// illegal separator character, or a token that failed to parse.
    #[error("invalid version '{input}': {message}")]
    InvalidVersion { input: String, message: String },

    /// A range expression did not reduce to the grammar in the spec, or
    /// produced an empty/inconsistent bound.
    #[error("invalid version range '{input}': {message}")]
    InvalidRange { input: String, message: String },

    /// `successor` was requested on the empty Version.
    #[error("the empty version has no successor")]
    NoNext,
}

impl VersionError {
    pub(crate) fn invalid_token(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidToken {
            input: input.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_version(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidVersion {
            input: input.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_range(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRange {
            input: input.into(),
            message: message.into(),
        }
    }
}

/// A parse failure with enough span information to underline the offending
/// substring in a terminal, mirroring how collaborators surface the error to
/// a human.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct VersionErrorReport {
    /// The actual error.
    pub error: VersionError,
    /// The full line that failed to parse.
    pub line: String,
    /// Byte offset of the first character to underline.
    pub start: usize,
    /// Number of characters to underline.
    pub width: usize,
}

impl VersionErrorReport {
    /// Builds a report that underlines the whole input line, which is
    /// accurate for every error kind this crate produces today - each one is
    /// detected only after the full string failed to reduce to a value.
    pub fn new(error: VersionError, line: impl Into<String>) -> Self {
        let line = line.into();
        let width = line.chars().count();
        Self {
            error,
            line,
            start: 0,
            width,
        }
    }
}

impl fmt::Display for VersionErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.error)?;
        writeln!(f, "{}", self.line)?;
        writeln!(f, "{}{}", " ".repeat(self.start), "^".repeat(self.width.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_underlines_the_whole_line() {
        let err = VersionError::invalid_version("1..2", "consecutive separators are not allowed");
        let report = VersionErrorReport::new(err, "1..2");
        let rendered = report.to_string();
        assert!(rendered.contains("1..2"));
        assert!(rendered.contains("^^^^"));
    }
}
