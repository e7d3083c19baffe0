//! A hand-rolled recursive-descent and Pratt SQL parser that builds a
//! fixed-size AST inside a bump-allocated [`arena`], instead of heap-boxed
//! or reference-counted tree nodes.
//!
//! The entry point is [`Parser`]: construct one from a source string and a
//! [`ParserConfig`], then call [`Parser::parse_script`] (recovering past
//! statement errors, `;`-separated) or [`Parser::parse_single`] (one
//! statement, no recovery). Both return a [`ParseOutcome`] holding the
//! arena, the parsed root node ids, any [`FailureRecord`]s, and parse
//! statistics.
//!
//! ```
//! use veloxsql_parser::{Parser, ParserConfig};
//!
//! let outcome = Parser::new("SELECT id, name FROM users WHERE id = 1;", ParserConfig::default())
//!     .parse_script();
//! assert!(outcome.is_success());
//! assert_eq!(outcome.roots.len(), 1);
//! ```

pub mod arena;
pub mod config;
pub mod context;
pub mod depth_guard;
pub mod dispatcher;
pub mod error;
pub mod intern;
pub mod keyword;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod result;
pub mod token;
pub mod validate;

pub use crate::arena::{Arena, ArenaError, ArenaStr, NodeId};
pub use crate::config::{Dialect, ParserConfig};
pub use crate::error::{FailureKind, FailureRecord, RelatedLocation};
pub use crate::intern::Interner;
pub use crate::keyword::Keyword;
pub use crate::lexer::Lexer;
pub use crate::node::{Node, NodeFlags, NodeKind, OperatorKind, Payload, SetOpKind};
pub use crate::parser::{Failed, PResult, Parser};
pub use crate::result::{ParseOutcome, ParseStats};
pub use crate::token::{Token, TokenKind, TokenSource};
