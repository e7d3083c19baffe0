//! Tokens and the [`TokenSource`] boundary (spec.md §6, SPEC_FULL.md §1).
//!
//! Grounded on the shape of the teacher's old `lexer.rs` `Token`/`Location`
//! pair (an index + length location attached to a token kind), generalized
//! so the parser itself is decoupled from any one lexer implementation —
//! SPEC_FULL.md §1 calls this out explicitly: "the parser consumes a stream
//! of tokens through a narrow trait boundary, so a hand-fed token stream (as
//! used by the invariant tests) and the built-in lexer are interchangeable."

use crate::keyword::Keyword;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    QuotedIdentifier,
    Keyword(Keyword),
    NumericLiteral,
    StringLiteral,
    Parameter, // `?`, `$1`, `:name`

    // Punctuation
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,
    Star,

    // Operators
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Slash,
    Percent,
    Concat, // ||

    Eof,
    /// A lexeme the scanner could not classify (e.g. a stray `$` outside a
    /// parameter, or an unterminated string). Carries its own message so the
    /// parser can fold it straight into a `FailureRecord` without having to
    /// re-derive what went wrong.
    Error,
}

/// One lexeme: its classification, its byte range in the source text, and —
/// for error tokens — a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: u32,
    pub end: u32,
    pub error_message: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self { kind, start, end, error_message: None }
    }

    pub fn error(start: u32, end: u32, message: impl Into<String>) -> Self {
        Self { kind: TokenKind::Error, start, end, error_message: Some(message.into()) }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The parser's only contract with whatever produces tokens. [`crate::lexer::Lexer`]
/// is the built-in implementation; tests that want to hand-feed a token
/// sequence without going through lexical analysis can implement this
/// directly (SPEC_FULL.md §1's "external scanner" boundary).
pub trait TokenSource {
    /// The token at `index` positions ahead of the current position (0 =
    /// current). Returns an `Eof` token forever once the stream is
    /// exhausted — callers never need to special-case "ran off the end".
    fn peek_nth(&self, index: usize) -> Token;

    /// Consume and return the current token, advancing the stream by one.
    fn advance(&mut self) -> Token;

    /// Current position, as a token index — used by the parser to restore
    /// to a checkpoint after a failed speculative parse.
    fn position(&self) -> usize;

    /// Rewind to a previously observed `position()`. `pos` must have come
    /// from this same stream; implementations may panic otherwise.
    fn restore(&mut self, pos: usize);

    /// Source text byte offset of the current token — used to anchor
    /// `FailureRecord::offset` even when `peek_nth` returns an `Eof` token
    /// that doesn't itself carry a meaningful range.
    fn current_offset(&self) -> u32 {
        self.peek_nth(0).start
    }
}
