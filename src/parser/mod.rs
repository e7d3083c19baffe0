//! The parser proper (spec.md §4.3 "Cursor", §4.5 "Dispatcher",
//! §4.8 "Failure & recovery").
//!
//! Grounded on `apollo-parser::Parser`'s overall shape — a struct owning a
//! token source, a tree-building sink, and a recursion guard, with public
//! `parse()`/`parse_selection_set()`-style entry points — generalized to
//! SQL's dispatcher-led statement grammar and an arena-backed tree instead
//! of `rowan`'s event-based green tree builder.

pub mod clauses;
pub mod expr;

use crate::arena::{Arena, NodeId};
use crate::context::ContextStack;
use crate::depth_guard::DepthCounter;
use crate::config::ParserConfig;
use crate::dispatcher::{route, StatementRoute};
use crate::error::{FailureKind, FailureRecord};
use crate::keyword::Keyword;
use crate::lexer::Lexer;
use crate::node::{Node, NodeKind};
use crate::result::{ParseOutcome, ParseStats};
use crate::token::{Token, TokenKind, TokenSource};

/// Sentinel returned by a failed production. Carries nothing: the actual
/// diagnostic was already pushed onto `Parser::failures` at the point of
/// failure (spec.md §4.8: "productions signal failure through a return
/// value, never a panic or exception").
pub type PResult<T> = Result<T, Failed>;

#[derive(Debug, Clone, Copy)]
pub struct Failed;

pub struct Parser<'src, T: TokenSource> {
    pub(crate) source: &'src str,
    pub(crate) tokens: T,
    pub(crate) arena: Arena,
    pub(crate) depth: DepthCounter,
    pub(crate) context: ContextStack,
    pub(crate) config: ParserConfig,
    pub(crate) failures: Vec<FailureRecord>,
    tokens_consumed: usize,
}

impl<'src> Parser<'src, Lexer> {
    pub fn new(source: &'src str, config: ParserConfig) -> Self {
        let lexer = Lexer::new(source);
        Self::with_token_source(source, lexer, config)
    }
}

impl<'src, T: TokenSource> Parser<'src, T> {
    pub fn with_token_source(source: &'src str, tokens: T, config: ParserConfig) -> Self {
        let arena = Arena::new(config.initial_arena_bytes, config.max_block_bytes, config.max_total_bytes);
        let depth = DepthCounter::new(config.max_depth);
        Self {
            source,
            tokens,
            arena,
            depth,
            context: ContextStack::new(),
            config,
            failures: Vec::new(),
            tokens_consumed: 0,
        }
    }

    // --- cursor primitives (spec.md §4.3) ---

    pub(crate) fn current(&self) -> Token {
        self.tokens.peek_nth(0)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Token {
        self.tokens.peek_nth(n)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    pub(crate) fn at_keyword(&self, kw: Keyword) -> bool {
        self.current().kind == TokenKind::Keyword(kw)
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    pub(crate) fn bump(&mut self) -> Token {
        self.tokens_consumed += 1;
        self.tokens.advance()
    }

    pub(crate) fn checkpoint(&self) -> usize {
        self.tokens.position()
    }

    pub(crate) fn restore(&mut self, checkpoint: usize) {
        self.tokens.restore(checkpoint);
    }

    pub(crate) fn text_of(&self, tok: &Token) -> &'src str {
        &self.source[tok.start as usize..tok.end as usize]
    }

    /// Consume the current token if it matches `kind`, else record a
    /// failure and return the sentinel (spec.md §4.8).
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            self.fail_unexpected(format!("expected {kind:?}"))
        }
    }

    pub(crate) fn expect_keyword(&mut self, kw: Keyword) -> PResult<Token> {
        if self.at_keyword(kw) {
            Ok(self.bump())
        } else {
            self.fail_unexpected(format!("expected keyword {kw:?}"))
        }
    }

    pub(crate) fn fail_unexpected<R>(&mut self, message: impl Into<String>) -> PResult<R> {
        let tok = self.current();
        let kind = if tok.kind == TokenKind::Eof {
            FailureKind::UnexpectedEof
        } else {
            FailureKind::UnexpectedToken
        };
        self.failures.push(FailureRecord::new(kind, message, tok.start));
        Err(Failed)
    }

    pub(crate) fn fail_invalid<R>(&mut self, message: impl Into<String>, offset: u32) -> PResult<R> {
        self.failures.push(FailureRecord::new(FailureKind::InvalidConstruct, message, offset));
        Err(Failed)
    }

    /// Record a `SYNTAX_ERROR` (spec.md §4.5/§9: a non-statement leader or an
    /// unrecognized operator lexeme, as opposed to a specific expected token
    /// being absent). Surfaces the lexer's own `error_message` as a hint when
    /// the current token is itself an `Error` token.
    pub(crate) fn fail_syntax<R>(&mut self, message: impl Into<String>) -> PResult<R> {
        let tok = self.current();
        let mut record = FailureRecord::new(FailureKind::SyntaxError, message, tok.start);
        if let Some(hint) = &tok.error_message {
            record = record.with_hint(hint.clone());
        }
        self.failures.push(record);
        Err(Failed)
    }

    /// Acquire a recursion-depth guard or fail with `DEPTH_EXCEEDED`
    /// (spec.md §4.4). Every recursive grammar function calls this first.
    pub(crate) fn enter_depth(&mut self) -> PResult<crate::depth_guard::DepthGuard> {
        match self.depth.enter() {
            Some(guard) => Ok(guard),
            None => {
                let tok = self.current();
                self.failures.push(FailureRecord::new(
                    FailureKind::DepthExceeded,
                    format!("recursion depth exceeded (max {})", self.depth.max()),
                    tok.start,
                ));
                Err(Failed)
            }
        }
    }

    pub(crate) fn alloc(&mut self, node: Node) -> PResult<NodeId> {
        match self.arena.alloc_node(node) {
            Ok(id) => Ok(id),
            Err(_) => {
                let tok = self.current();
                self.failures.push(FailureRecord::new(
                    FailureKind::MemoryExceeded,
                    "arena memory budget exceeded",
                    tok.start,
                ));
                Err(Failed)
            }
        }
    }

    pub(crate) fn alloc_text(&mut self, text: &str) -> PResult<crate::arena::ArenaStr> {
        match self.arena.alloc_str(text) {
            Ok(s) => Ok(s),
            Err(_) => {
                let tok = self.current();
                self.failures.push(FailureRecord::new(
                    FailureKind::MemoryExceeded,
                    "arena memory budget exceeded",
                    tok.start,
                ));
                Err(Failed)
            }
        }
    }

    // --- top-level entry points (spec.md §4.5) ---

    /// Parse exactly one statement, not consuming a trailing `;` if present
    /// (the caller — `parse_script` or a direct caller of `parse_statement`
    /// — decides what to do with separators).
    pub fn parse_statement(&mut self) -> PResult<NodeId> {
        let _guard = self.enter_depth()?;
        let leader = match self.current().kind {
            TokenKind::Keyword(kw) => kw,
            _ => return self.fail_unexpected("expected a statement-leading keyword"),
        };
        let second = match self.peek_nth(1).kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        };
        let route = match route(leader, second) {
            Some(r) => r,
            None => return self.fail_syntax(format!("`{leader:?}` cannot start a statement")),
        };
        match route {
            StatementRoute::Select | StatementRoute::With => clauses::select::parse_select_statement(self),
            StatementRoute::Insert => clauses::insert::parse_insert_statement(self),
            StatementRoute::Update => clauses::update::parse_update_statement(self),
            StatementRoute::Delete => clauses::delete::parse_delete_statement(self),
            StatementRoute::CreateTable => clauses::ddl::parse_create_table(self),
            StatementRoute::CreateIndex => clauses::ddl::parse_create_index(self),
            StatementRoute::CreateView => clauses::ddl::parse_create_view(self),
            StatementRoute::AlterTable => clauses::ddl::parse_alter_table(self),
            StatementRoute::Drop => clauses::ddl::parse_drop(self),
            StatementRoute::Truncate => clauses::ddl::parse_truncate(self),
            StatementRoute::Begin => clauses::transaction::parse_begin(self),
            StatementRoute::Commit => clauses::transaction::parse_commit(self),
            StatementRoute::Rollback => clauses::transaction::parse_rollback(self),
            StatementRoute::Savepoint => clauses::transaction::parse_savepoint(self),
            StatementRoute::Release => clauses::transaction::parse_release(self),
            StatementRoute::Explain => clauses::transaction::parse_explain(self),
            StatementRoute::Vacuum => clauses::transaction::parse_utility(self, NodeKind::VacuumStatement, Keyword::Vacuum),
            StatementRoute::Analyze => clauses::transaction::parse_utility(self, NodeKind::AnalyzeStatement, Keyword::Analyze),
            StatementRoute::Attach => clauses::transaction::parse_utility(self, NodeKind::AttachStatement, Keyword::Attach),
            StatementRoute::Detach => clauses::transaction::parse_utility(self, NodeKind::DetachStatement, Keyword::Detach),
            StatementRoute::Pragma => clauses::transaction::parse_utility(self, NodeKind::PragmaStatement, Keyword::Pragma),
            StatementRoute::Reindex => clauses::transaction::parse_utility(self, NodeKind::ReindexStatement, Keyword::Reindex),
            StatementRoute::Set => clauses::transaction::parse_utility(self, NodeKind::SetStatement, Keyword::Set),
            StatementRoute::Values => clauses::select::parse_values_statement(self),
        }
    }

    /// Parse a `;`-separated script, recovering past a failing statement by
    /// skipping to the next `;` (spec.md §4.5/§4.8 panic-mode recovery),
    /// bounded by `config.max_errors`.
    pub fn parse_script(mut self) -> ParseOutcome {
        let mut roots = Vec::new();
        loop {
            while self.at(TokenKind::Semicolon) {
                self.bump();
            }
            if self.at_eof() {
                break;
            }
            let budget_exhausted = self.failures.len() as u32 >= self.config.max_errors;
            if budget_exhausted {
                break;
            }
            match self.parse_statement() {
                Ok(id) => {
                    roots.push(id);
                    if !self.at(TokenKind::Semicolon) && !self.at_eof() {
                        let _ = self.fail_unexpected::<()>("expected `;` or end of input after statement");
                        if !self.config.continue_on_error {
                            break;
                        }
                        self.skip_to_next_statement();
                    }
                }
                Err(Failed) => {
                    if !self.config.continue_on_error {
                        break;
                    }
                    self.skip_to_next_statement();
                }
            }
        }
        self.finish(roots)
    }

    fn skip_to_next_statement(&mut self) {
        while !self.at(TokenKind::Semicolon) && !self.at_eof() {
            self.bump();
        }
    }

    fn finish(self, roots: Vec<NodeId>) -> ParseOutcome {
        let stats = ParseStats {
            nodes_created: self.arena.node_count(),
            arena_high_water_bytes: self.arena.high_water_mark(),
            tokens_consumed: self.tokens_consumed,
            max_depth_reached: self.depth.high_water_mark(),
        };
        ParseOutcome { arena: self.arena, roots, failures: self.failures, stats }
    }

    /// Parse exactly one statement and finish, for single-statement callers
    /// that don't want script-mode recovery semantics.
    pub fn parse_single(mut self) -> ParseOutcome {
        let result = self.parse_statement();
        let roots = match result {
            Ok(id) => vec![id],
            Err(Failed) => Vec::new(),
        };
        self.finish(roots)
    }
}
