//! `INSERT` (spec.md [MODULE] INSERT).

use crate::arena::NodeId;
use crate::context::ParseContext;
use crate::keyword::Keyword;
use crate::node::{Node, NodeFlags, NodeKind};
use crate::parser::{expr, PResult, Parser};
use crate::token::{TokenKind, TokenSource};

pub fn parse_insert_statement<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // INSERT
    p.expect_keyword(Keyword::Into)?;

    let table_tok = p.expect(TokenKind::Identifier)?;
    let table_name = p.alloc_text(p.text_of(&table_tok))?;
    let table = p.alloc(Node::new(NodeKind::Identifier).with_range(table_tok.start, table_tok.end).with_text(table_name))?;

    let columns = if p.at(TokenKind::LParen) {
        Some(parse_column_list(p)?)
    } else {
        None
    };

    let body = if p.at_keyword(Keyword::Values) {
        p.bump();
        parse_values_list(p)?
    } else if p.at_keyword(Keyword::Select) || p.at_keyword(Keyword::With) {
        super::select::parse_select_core(p)?
    } else {
        return p.fail_unexpected("expected VALUES or a SELECT after INSERT INTO table");
    };

    let on_conflict = if p.at_keyword(Keyword::On) {
        Some(parse_on_conflict_clause(p)?)
    } else {
        None
    };

    let returning = if p.at_keyword(Keyword::Returning) {
        Some(parse_returning_clause(p)?)
    } else {
        None
    };

    let end = returning
        .map(|r| p.arena.node(r).end)
        .or_else(|| on_conflict.map(|c| p.arena.node(c).end))
        .unwrap_or_else(|| p.arena.node(body).end);
    let stmt = p.alloc(Node::new(NodeKind::InsertStatement).with_range(start, end))?;
    p.arena.append_child(stmt, table);
    if let Some(cols) = columns {
        p.arena.append_child(stmt, cols);
    }
    p.arena.append_child(stmt, body);
    if let Some(c) = on_conflict {
        p.arena.append_child(stmt, c);
    }
    if let Some(r) = returning {
        p.arena.append_child(stmt, r);
    }
    Ok(stmt)
}

/// `ON CONFLICT [(col, ...)] DO {NOTHING | UPDATE SET ... [WHERE ...]}`.
fn parse_on_conflict_clause<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // ON
    p.expect_keyword(Keyword::Conflict)?;
    let target = if p.at(TokenKind::LParen) { Some(parse_column_list(p)?) } else { None };
    p.expect_keyword(Keyword::Do)?;

    let mut flags = NodeFlags::empty();
    let mut assignments = None;
    let mut where_clause = None;
    let end;
    if p.at_keyword(Keyword::Nothing) {
        let tok = p.bump();
        flags |= NodeFlags::DO_NOTHING;
        end = tok.end;
    } else {
        p.expect_keyword(Keyword::Update)?;
        p.expect_keyword(Keyword::Set)?;
        let list = super::update::parse_assignment_list(p)?;
        let mut list_end = p.arena.node(list).end;
        if p.at_keyword(Keyword::Where) {
            let w = super::select::parse_where_clause(p)?;
            list_end = p.arena.node(w).end;
            where_clause = Some(w);
        }
        assignments = Some(list);
        end = list_end;
    }

    let clause = p.alloc(Node::new(NodeKind::OnConflictClause).with_range(start, end).with_flags(flags))?;
    if let Some(t) = target {
        p.arena.append_child(clause, t);
    }
    if let Some(a) = assignments {
        p.arena.append_child(clause, a);
    }
    if let Some(w) = where_clause {
        p.arena.append_child(clause, w);
    }
    Ok(clause)
}

fn parse_column_list<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // (
    let list = p.alloc(Node::new(NodeKind::InsertColumnList).with_range(start, start))?;
    loop {
        let col_tok = p.expect(TokenKind::Identifier)?;
        let col_name = p.alloc_text(p.text_of(&col_tok))?;
        let col = p.alloc(Node::new(NodeKind::Identifier).with_range(col_tok.start, col_tok.end).with_text(col_name))?;
        p.arena.append_child(list, col);
        if p.at(TokenKind::Comma) {
            p.bump();
        } else {
            break;
        }
    }
    let rparen = p.expect(TokenKind::RParen)?;
    p.arena.node_mut(list).end = rparen.end;
    Ok(list)
}

fn parse_values_list<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    let list = p.alloc(Node::new(NodeKind::InsertValuesList).with_range(start, start))?;
    loop {
        let row = parse_values_row(p)?;
        p.arena.append_child(list, row);
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

/// One `(expr, expr, ...)` row, shared with `select.rs`'s bare `VALUES` statement.
pub fn parse_values_row<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.expect(TokenKind::LParen)?;
    let row = p.alloc(Node::new(NodeKind::InsertValuesRow).with_range(start, start))?;
    if !p.at(TokenKind::RParen) {
        loop {
            let value = expr::parse_expr(p)?;
            p.arena.append_child(row, value);
            if p.at(TokenKind::Comma) {
                p.bump();
            } else {
                break;
            }
        }
    }
    let rparen = p.expect(TokenKind::RParen)?;
    p.arena.node_mut(row).end = rparen.end;
    Ok(row)
}

pub(super) fn parse_returning_clause<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // RETURNING
    let clause = p.alloc(Node::new(NodeKind::ReturningClause).with_range(start, start))?;
    if p.at(TokenKind::Star) {
        let star_tok = p.bump();
        let star = p.alloc(Node::new(NodeKind::StarExpr).with_range(star_tok.start, star_tok.end))?;
        p.arena.append_child(clause, star);
        p.arena.node_mut(clause).end = star_tok.end;
        return Ok(clause);
    }
    let _guard = crate::context::ContextGuard::enter(&mut p.context, ParseContext::SelectList);
    loop {
        let item = expr::parse_expr(p)?;
        p.arena.append_child(clause, item);
        if p.at(TokenKind::Comma) {
            p.bump();
        } else {
            break;
        }
    }
    let end = p.arena.children(clause).last().map(|c| p.arena.node(c).end).unwrap_or(start);
    p.arena.node_mut(clause).end = end;
    Ok(clause)
}
