//! `SELECT` (spec.md [MODULE] SELECT/CTE/SET-OPERATION), `VALUES`.
//!
//! Grounded on `apollo-parser/src/parser/grammar/selection.rs`'s shape for
//! a clause that's "a list of comma-separated items, each possibly
//! qualified" (its selection-set parsing), generalized to SQL's richer
//! select list / FROM / WHERE / GROUP BY / HAVING / ORDER BY chain.

use crate::arena::NodeId;
use crate::context::ParseContext;
use crate::keyword::Keyword;
use crate::node::{Node, NodeFlags, NodeKind, Payload, SetOpKind};
use crate::parser::{expr, PResult, Parser};
use crate::token::{TokenKind, TokenSource};
use crate::validate;

pub fn parse_select_statement<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    let with = if p.at_keyword(Keyword::With) {
        Some(parse_with_clause(p)?)
    } else {
        None
    };

    let body = parse_set_operation(p)?;

    let order_by = if p.at_keyword(Keyword::Order) { Some(parse_order_by(p)?) } else { None };
    let limit = if p.at_keyword(Keyword::Limit) { Some(parse_limit(p)?) } else { None };

    let end = limit
        .or(order_by)
        .map(|n| p.arena.node(n).end)
        .unwrap_or_else(|| p.arena.node(body).end);
    let stmt = p.alloc(Node::new(NodeKind::SelectStatement).with_range(start, end))?;
    if let Some(w) = with {
        p.arena.append_child(stmt, w);
    }
    p.arena.append_child(stmt, body);
    if let Some(o) = order_by {
        p.arena.append_child(stmt, o);
    }
    if let Some(l) = limit {
        p.arena.append_child(stmt, l);
    }
    Ok(stmt)
}

pub fn parse_values_statement<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.expect_keyword(Keyword::Values)?;
    let stmt = p.alloc(Node::new(NodeKind::ValuesStatement).with_range(start, start))?;
    loop {
        let row = super::insert::parse_values_row(p)?;
        p.arena.append_child(stmt, row);
        if p.at(TokenKind::Comma) {
            p.bump();
        } else {
            break;
        }
    }
    let end = p.arena.children(stmt).last().map(|c| p.arena.node(c).end).unwrap_or(start);
    p.arena.node_mut(stmt).end = end;
    Ok(stmt)
}

fn parse_with_clause<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // WITH
    let mut flags = NodeFlags::empty();
    if p.at_keyword(Keyword::Recursive) {
        p.bump();
        flags |= NodeFlags::RECURSIVE;
    }
    let with = p.alloc(Node::new(NodeKind::WithClause).with_range(start, start).with_flags(flags))?;
    loop {
        let cte = parse_cte_definition(p)?;
        p.arena.append_child(with, cte);
        if p.at(TokenKind::Comma) {
            p.bump();
        } else {
            break;
        }
    }
    let end = p.arena.children(with).last().map(|c| p.arena.node(c).end).unwrap_or(start);
    p.arena.node_mut(with).end = end;
    Ok(with)
}

fn parse_cte_definition<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let name_tok = p.expect(TokenKind::Identifier)?;
    let name = p.alloc_text(p.text_of(&name_tok))?;
    let cte = p.alloc(Node::new(NodeKind::CteDefinition).with_range(name_tok.start, name_tok.end).with_text(name))?;

    if p.at(TokenKind::LParen) {
        p.bump();
        loop {
            let col_tok = p.expect(TokenKind::Identifier)?;
            let col_name = p.alloc_text(p.text_of(&col_tok))?;
            let col = p.alloc(Node::new(NodeKind::Identifier).with_range(col_tok.start, col_tok.end).with_text(col_name))?;
            p.arena.append_child(cte, col);
            if p.at(TokenKind::Comma) {
                p.bump();
            } else {
                break;
            }
        }
        p.expect(TokenKind::RParen)?;
    }

    p.expect_keyword(Keyword::As)?;
    p.expect(TokenKind::LParen)?;
    let body = {
        let _guard = crate::context::ContextGuard::enter(&mut p.context, ParseContext::Subquery);
        parse_set_operation(p)?
    };
    let rparen = p.expect(TokenKind::RParen)?;
    p.arena.append_child(cte, body);
    p.arena.node_mut(cte).end = rparen.end;
    Ok(cte)
}

/// Parse a `SelectCore` (or a parenthesized one) and fold in any trailing
/// `UNION`/`INTERSECT`/`EXCEPT [ALL]` operands, left-associatively.
fn parse_set_operation<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let mut left = parse_set_operand(p)?;
    loop {
        let op = match p.current().kind {
            TokenKind::Keyword(Keyword::Union) => {
                p.bump();
                if p.at_keyword(Keyword::All) {
                    p.bump();
                    SetOpKind::UnionAll
                } else {
                    SetOpKind::Union
                }
            }
            TokenKind::Keyword(Keyword::Intersect) => {
                p.bump();
                SetOpKind::Intersect
            }
            TokenKind::Keyword(Keyword::Except) => {
                p.bump();
                SetOpKind::Except
            }
            _ => break,
        };
        let right = parse_set_operand(p)?;
        let start = p.arena.node(left).start;
        let end = p.arena.node(right).end;
        let node = p.alloc(Node::new(NodeKind::SetOperation).with_range(start, end).with_payload(Payload::SetOpKind(op)))?;
        let op_site = *p.arena.node(right);
        validate::validate_set_operation(&p.arena, left, right, &op_site, &mut p.failures);
        p.arena.append_child(node, left);
        p.arena.append_child(node, right);
        left = node;
    }
    Ok(left)
}

fn parse_set_operand<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    if p.at(TokenKind::LParen) {
        p.bump();
        let inner = parse_set_operation(p)?;
        p.expect(TokenKind::RParen)?;
        return Ok(inner);
    }
    parse_select_core(p)
}

/// One `SELECT ... [FROM ...] [WHERE ...] [GROUP BY ...] [HAVING ...]`
/// core, with no set-operation or trailing `ORDER BY`/`LIMIT` of its own
/// (those belong to the enclosing statement per spec.md's grammar).
pub fn parse_select_core<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.expect_keyword(Keyword::Select)?;

    let mut flags = NodeFlags::empty();
    if p.at_keyword(Keyword::Distinct) {
        p.bump();
        flags |= NodeFlags::DISTINCT;
    } else if p.at_keyword(Keyword::All) {
        p.bump();
        flags |= NodeFlags::ALL;
    }

    let core = p.alloc(Node::new(NodeKind::SelectCore).with_range(start, start).with_flags(flags))?;

    let select_list = parse_select_list(p)?;
    p.arena.append_child(core, select_list);

    if p.at_keyword(Keyword::From) {
        let from = super::from_join::parse_from_clause(p)?;
        p.arena.append_child(core, from);
    }
    if p.at_keyword(Keyword::Where) {
        let wh = parse_where_clause(p)?;
        p.arena.append_child(core, wh);
    }
    if p.at_keyword(Keyword::Group) {
        let gb = parse_group_by(p)?;
        p.arena.append_child(core, gb);
    }
    if p.at_keyword(Keyword::Having) {
        let hv = parse_having(p)?;
        p.arena.append_child(core, hv);
    }

    let end = p.arena.children(core).last().map(|c| p.arena.node(c).end).unwrap_or(start);
    p.arena.node_mut(core).end = end;

    validate::validate_select_core(&p.arena, core, &mut p.failures);
    Ok(core)
}

fn parse_select_list<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let _guard = crate::context::ContextGuard::enter(&mut p.context, ParseContext::SelectList);
    let start = p.current().start;
    let list = p.alloc(Node::new(NodeKind::SelectList).with_range(start, start))?;
    if p.at_keyword(Keyword::From) || p.at(TokenKind::Eof) {
        return Ok(list);
    }
    loop {
        let item = parse_select_item(p)?;
        p.arena.append_child(list, item);
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

fn parse_select_item<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    let value = expr::parse_expr(p)?;
    let mut end = p.arena.node(value).end;

    let item = p.alloc(Node::new(NodeKind::SelectItem).with_range(start, end))?;
    p.arena.append_child(item, value);

    let has_as = p.at_keyword(Keyword::As);
    if has_as {
        p.bump();
    }
    if has_as || p.at(TokenKind::Identifier) || p.at(TokenKind::QuotedIdentifier) {
        let alias_tok = if p.at(TokenKind::Identifier) || p.at(TokenKind::QuotedIdentifier) {
            p.bump()
        } else {
            return p.fail_unexpected("expected alias after AS");
        };
        let alias = p.alloc_text(p.text_of(&alias_tok))?;
        p.arena.node_mut(item).text2 = alias;
        end = alias_tok.end;
        p.arena.node_mut(item).end = end;
    }
    Ok(item)
}

pub(super) fn parse_where_clause<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let _guard = crate::context::ContextGuard::enter(&mut p.context, ParseContext::Where);
    let start = p.current().start;
    p.bump(); // WHERE
    let cond = expr::parse_expr(p)?;
    let end = p.arena.node(cond).end;
    let wh = p.alloc(Node::new(NodeKind::WhereClause).with_range(start, end))?;
    p.arena.append_child(wh, cond);
    Ok(wh)
}

fn parse_group_by<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let _guard = crate::context::ContextGuard::enter(&mut p.context, ParseContext::GroupBy);
    let start = p.current().start;
    p.bump(); // GROUP
    p.expect_keyword(Keyword::By)?;
    let gb = p.alloc(Node::new(NodeKind::GroupByClause).with_range(start, start))?;
    loop {
        let item = expr::parse_expr(p)?;
        p.arena.append_child(gb, item);
        if p.at(TokenKind::Comma) {
            p.bump();
        } else {
            break;
        }
    }
    let end = p.arena.children(gb).last().map(|c| p.arena.node(c).end).unwrap_or(start);
    p.arena.node_mut(gb).end = end;
    Ok(gb)
}

fn parse_having<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let _guard = crate::context::ContextGuard::enter(&mut p.context, ParseContext::Having);
    let start = p.current().start;
    p.bump(); // HAVING
    let cond = expr::parse_expr(p)?;
    let end = p.arena.node(cond).end;
    let hv = p.alloc(Node::new(NodeKind::HavingClause).with_range(start, end))?;
    p.arena.append_child(hv, cond);
    Ok(hv)
}

fn parse_order_by<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let _guard = crate::context::ContextGuard::enter(&mut p.context, ParseContext::OrderBy);
    let start = p.current().start;
    p.bump(); // ORDER
    p.expect_keyword(Keyword::By)?;
    let ob = p.alloc(Node::new(NodeKind::OrderByClause).with_range(start, start))?;
    loop {
        let item_start = p.current().start;
        let value = expr::parse_expr(p)?;
        let mut flags = NodeFlags::empty();
        if p.at_keyword(Keyword::Asc) {
            p.bump();
            flags |= NodeFlags::ASC;
        } else if p.at_keyword(Keyword::Desc) {
            p.bump();
            flags |= NodeFlags::DESC;
        }
        if p.at_keyword(Keyword::Nulls) {
            p.bump();
            if p.at_keyword(Keyword::First) {
                p.bump();
                flags |= NodeFlags::NULLS_FIRST;
            } else {
                p.expect_keyword(Keyword::Last)?;
                flags |= NodeFlags::NULLS_LAST;
            }
        }
        let end = p.arena.node(value).end;
        let item = p.alloc(Node::new(NodeKind::OrderByItem).with_range(item_start, end).with_flags(flags))?;
        p.arena.append_child(item, value);
        p.arena.append_child(ob, item);
        if p.at(TokenKind::Comma) {
            p.bump();
        } else {
            break;
        }
    }
    let end = p.arena.children(ob).last().map(|c| p.arena.node(c).end).unwrap_or(start);
    p.arena.node_mut(ob).end = end;
    Ok(ob)
}

fn parse_limit<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // LIMIT
    let count = expr::parse_expr(p)?;
    let lc = p.alloc(Node::new(NodeKind::LimitClause).with_range(start, p.arena.node(count).end))?;
    p.arena.append_child(lc, count);
    if p.at_keyword(Keyword::Offset) {
        p.bump();
        let offset = expr::parse_expr(p)?;
        p.arena.node_mut(lc).end = p.arena.node(offset).end;
        p.arena.append_child(lc, offset);
    }
    Ok(lc)
}
