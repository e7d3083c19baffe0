//! Structured parse failures.
//!
//! Grounded on `apollo-parser`'s `Error` (a plain `{ message, data, index }`
//! struct with a hand-written `Debug`), generalized to the full failure
//! taxonomy spec.md §7 calls for and given a `thiserror`-derived `Display`.

use std::fmt;

/// The kind of failure a production encountered. Mirrors spec.md §7 exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The token stream violates the grammar at the current position.
    SyntaxError,
    /// A specific expected token was absent.
    UnexpectedToken,
    /// The stream ended inside an incomplete production.
    UnexpectedEof,
    /// Syntactically well-formed but locally illegal (e.g. `HAVING` with no
    /// `GROUP BY` and no aggregate in the select list).
    InvalidConstruct,
    /// The depth guard tripped.
    DepthExceeded,
    /// The arena's total byte cap was reached.
    MemoryExceeded,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::SyntaxError => "syntax error",
            FailureKind::UnexpectedToken => "unexpected token",
            FailureKind::UnexpectedEof => "unexpected end of input",
            FailureKind::InvalidConstruct => "invalid construct",
            FailureKind::DepthExceeded => "recursion depth exceeded",
            FailureKind::MemoryExceeded => "memory budget exceeded",
        };
        f.write_str(s)
    }
}

/// A related source location attached to a [`FailureRecord`] — e.g. the
/// opening `(` an `UnexpectedEof` failure is still waiting to see closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedLocation {
    pub offset: u32,
    pub note: &'static str,
}

/// A single recorded parse failure. Carries enough information for a caller
/// to map the failure back onto the original query text without the parser
/// itself doing any formatting work beyond the message string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message} (at byte {offset})")]
pub struct FailureRecord {
    pub kind: FailureKind,
    pub message: String,
    pub offset: u32,
    pub hint: Option<String>,
    pub related: Vec<RelatedLocation>,
}

impl FailureRecord {
    pub fn new(kind: FailureKind, message: impl Into<String>, offset: u32) -> Self {
        Self {
            kind,
            message: message.into(),
            offset,
            hint: None,
            related: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_related(mut self, offset: u32, note: &'static str) -> Self {
        self.related.push(RelatedLocation { offset, note });
        self
    }
}
