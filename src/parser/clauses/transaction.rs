//! Transaction control (`BEGIN`/`COMMIT`/`ROLLBACK`/`SAVEPOINT`/`RELEASE`)
//! and the single-keyword utility statements (spec.md [MODULE]
//! TRANSACTION, [MODULE] UTILITY).

use crate::arena::NodeId;
use crate::keyword::Keyword;
use crate::node::{Node, NodeKind};
use crate::parser::{PResult, Parser};
use crate::token::{TokenKind, TokenSource};

fn parse_optional_name<T: TokenSource>(p: &mut Parser<T>) -> PResult<Option<NodeId>> {
    if p.at(TokenKind::Identifier) {
        let tok = p.expect(TokenKind::Identifier)?;
        let text = p.alloc_text(p.text_of(&tok))?;
        Ok(Some(p.alloc(Node::new(NodeKind::Identifier).with_range(tok.start, tok.end).with_text(text))?))
    } else {
        Ok(None)
    }
}

pub fn parse_begin<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let tok = p.bump(); // BEGIN
    p.alloc(Node::new(NodeKind::BeginStatement).with_range(tok.start, tok.end))
}

pub fn parse_commit<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let tok = p.bump(); // COMMIT
    p.alloc(Node::new(NodeKind::CommitStatement).with_range(tok.start, tok.end))
}

pub fn parse_rollback<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // ROLLBACK
    let mut end = start;
    let to = if p.at_keyword(Keyword::Savepoint) {
        p.bump();
        let name = parse_optional_name(p)?;
        if let Some(n) = name {
            end = p.arena.node(n).end;
        }
        name
    } else {
        None
    };
    let stmt = p.alloc(Node::new(NodeKind::RollbackStatement).with_range(start, end))?;
    if let Some(n) = to {
        p.arena.append_child(stmt, n);
    }
    Ok(stmt)
}

pub fn parse_savepoint<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // SAVEPOINT
    let name_tok = p.expect(TokenKind::Identifier)?;
    let name = p.alloc_text(p.text_of(&name_tok))?;
    let name_node = p.alloc(Node::new(NodeKind::Identifier).with_range(name_tok.start, name_tok.end).with_text(name))?;
    let stmt = p.alloc(Node::new(NodeKind::SavepointStatement).with_range(start, name_tok.end))?;
    p.arena.append_child(stmt, name_node);
    Ok(stmt)
}

pub fn parse_release<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // RELEASE
    if p.at_keyword(Keyword::Savepoint) {
        p.bump();
    }
    let name_tok = p.expect(TokenKind::Identifier)?;
    let name = p.alloc_text(p.text_of(&name_tok))?;
    let name_node = p.alloc(Node::new(NodeKind::Identifier).with_range(name_tok.start, name_tok.end).with_text(name))?;
    let stmt = p.alloc(Node::new(NodeKind::ReleaseStatement).with_range(start, name_tok.end))?;
    p.arena.append_child(stmt, name_node);
    Ok(stmt)
}

pub fn parse_explain<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // EXPLAIN
    let inner = p.parse_statement()?;
    let end = p.arena.node(inner).end;
    let stmt = p.alloc(Node::new(NodeKind::ExplainStatement).with_range(start, end))?;
    p.arena.append_child(stmt, inner);
    Ok(stmt)
}

/// Single-keyword utility statements (`VACUUM`, `ANALYZE`, `ATTACH`,
/// `DETACH`, `PRAGMA`, `REINDEX`, `SET`) that share a "leading keyword plus
/// an optional trailing identifier" shape. `kind`/`leader` come from the
/// dispatcher so one function covers all of them.
pub fn parse_utility<T: TokenSource>(p: &mut Parser<T>, kind: NodeKind, leader: Keyword) -> PResult<NodeId> {
    let start = p.current().start;
    debug_assert!(p.at_keyword(leader));
    p.bump();
    let mut end = start;
    let name = parse_optional_name(p)?;
    if let Some(n) = name {
        end = p.arena.node(n).end;
    }
    let stmt = p.alloc(Node::new(kind).with_range(start, end))?;
    if let Some(n) = name {
        p.arena.append_child(stmt, n);
    }
    Ok(stmt)
}
