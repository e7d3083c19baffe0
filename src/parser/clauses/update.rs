//! `UPDATE` (spec.md [MODULE] UPDATE).

use crate::arena::NodeId;
use crate::context::ParseContext;
use crate::keyword::Keyword;
use crate::node::{Node, NodeKind};
use crate::parser::{expr, PResult, Parser};
use crate::token::{TokenKind, TokenSource};

pub fn parse_update_statement<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // UPDATE

    let table_tok = p.expect(TokenKind::Identifier)?;
    let table_name = p.alloc_text(p.text_of(&table_tok))?;
    let table = p.alloc(Node::new(NodeKind::Identifier).with_range(table_tok.start, table_tok.end).with_text(table_name))?;

    p.expect_keyword(Keyword::Set)?;
    let assignments = parse_assignment_list(p)?;

    let from_clause = if p.at_keyword(Keyword::From) {
        Some(super::from_join::parse_from_clause(p)?)
    } else {
        None
    };

    let where_clause = if p.at_keyword(Keyword::Where) {
        Some(super::select::parse_where_clause(p)?)
    } else {
        None
    };

    let returning = if p.at_keyword(Keyword::Returning) {
        Some(super::insert::parse_returning_clause(p)?)
    } else {
        None
    };

    let end = returning
        .or(where_clause)
        .or(from_clause)
        .map(|n| p.arena.node(n).end)
        .unwrap_or_else(|| p.arena.node(assignments).end);
    let stmt = p.alloc(Node::new(NodeKind::UpdateStatement).with_range(start, end))?;
    p.arena.append_child(stmt, table);
    p.arena.append_child(stmt, assignments);
    if let Some(f) = from_clause {
        p.arena.append_child(stmt, f);
    }
    if let Some(w) = where_clause {
        p.arena.append_child(stmt, w);
    }
    if let Some(r) = returning {
        p.arena.append_child(stmt, r);
    }
    Ok(stmt)
}

pub(super) fn parse_assignment_list<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    let list = p.alloc(Node::new(NodeKind::AssignmentList).with_range(start, start))?;
    loop {
        let assignment = parse_assignment(p)?;
        p.arena.append_child(list, assignment);
        if p.at(TokenKind::Comma) {
            p.bump();
        } else {
            break;
        }
    }
    let end = p.arena.children(list).last().map(|c| p.arena.node(c).end).unwrap_or(start);
    p.arena.node_mut(list).end = end;
    Ok(list)
}

fn parse_assignment<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let col_tok = p.expect(TokenKind::Identifier)?;
    let col_name = p.alloc_text(p.text_of(&col_tok))?;
    let col = p.alloc(Node::new(NodeKind::Identifier).with_range(col_tok.start, col_tok.end).with_text(col_name))?;
    p.expect(TokenKind::Eq)?;
    let _guard = crate::context::ContextGuard::enter(&mut p.context, ParseContext::Where);
    let value = expr::parse_expr(p)?;
    let end = p.arena.node(value).end;
    let assignment = p.alloc(Node::new(NodeKind::Assignment).with_range(col_tok.start, end))?;
    p.arena.append_child(assignment, col);
    p.arena.append_child(assignment, value);
    Ok(assignment)
}
