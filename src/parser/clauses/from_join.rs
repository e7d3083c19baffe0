//! `FROM` and `JOIN` (spec.md [MODULE] FROM/JOIN).
//!
//! Joins fold left-associatively into a chain of binary `JoinClause` nodes,
//! the same shape `select.rs` uses for `UNION`/`INTERSECT`/`EXCEPT` — both
//! are "a left operand, an operator, a right operand, repeat" grammars.

use crate::arena::NodeId;
use crate::context::ParseContext;
use crate::keyword::Keyword;
use crate::node::{Node, NodeFlags, NodeKind};
use crate::parser::{expr, PResult, Parser};
use crate::token::{TokenKind, TokenSource};

pub fn parse_from_clause<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let _guard = crate::context::ContextGuard::enter(&mut p.context, ParseContext::From);
    let start = p.current().start;
    p.bump(); // FROM

    let mut current = parse_table_ref(p)?;
    loop {
        if p.at(TokenKind::Comma) {
            p.bump();
            let right = parse_table_ref(p)?;
            current = build_join(p, current, right, NodeFlags::CROSS, None)?;
            continue;
        }
        let Some(flags) = peek_join_flags(p) else { break };
        consume_join_modifiers(p);
        p.expect_keyword(Keyword::Join)?;
        let right = parse_table_ref(p)?;

        let condition = if p.at_keyword(Keyword::On) {
            p.bump();
            let _guard = crate::context::ContextGuard::enter(&mut p.context, ParseContext::JoinCondition);
            Some(expr::parse_expr(p)?)
        } else if p.at_keyword(Keyword::Using) {
            p.bump();
            Some(parse_using_list(p)?)
        } else {
            None
        };
        current = build_join(p, current, right, flags, condition)?;
    }

    let end = p.arena.node(current).end;
    let from = p.alloc(Node::new(NodeKind::FromClause).with_range(start, end))?;
    p.arena.append_child(from, current);
    Ok(from)
}

fn peek_join_flags<T: TokenSource>(p: &Parser<T>) -> Option<NodeFlags> {
    match p.current().kind {
        TokenKind::Keyword(Keyword::Join) => Some(NodeFlags::INNER),
        TokenKind::Keyword(Keyword::Inner) => Some(NodeFlags::INNER),
        TokenKind::Keyword(Keyword::Left) => Some(NodeFlags::LEFT),
        TokenKind::Keyword(Keyword::Right) => Some(NodeFlags::RIGHT),
        TokenKind::Keyword(Keyword::Full) => Some(NodeFlags::FULL),
        TokenKind::Keyword(Keyword::Cross) => Some(NodeFlags::CROSS),
        TokenKind::Keyword(Keyword::Natural) => Some(NodeFlags::INNER),
        _ => None,
    }
}

fn consume_join_modifiers<T: TokenSource>(p: &mut Parser<T>) {
    if p.at_keyword(Keyword::Natural) {
        p.bump();
    }
    if matches!(
        p.current().kind,
        TokenKind::Keyword(Keyword::Inner)
            | TokenKind::Keyword(Keyword::Left)
            | TokenKind::Keyword(Keyword::Right)
            | TokenKind::Keyword(Keyword::Full)
            | TokenKind::Keyword(Keyword::Cross)
    ) {
        p.bump();
        if p.at_keyword(Keyword::Outer) {
            p.bump();
        }
    }
}

fn build_join<T: TokenSource>(
    p: &mut Parser<T>,
    left: NodeId,
    right: NodeId,
    flags: NodeFlags,
    condition: Option<NodeId>,
) -> PResult<NodeId> {
    let start = p.arena.node(left).start;
    let end = condition.map(|c| p.arena.node(c).end).unwrap_or_else(|| p.arena.node(right).end);
    let join = p.alloc(Node::new(NodeKind::JoinClause).with_range(start, end).with_flags(flags))?;
    p.arena.append_child(join, left);
    p.arena.append_child(join, right);
    if let Some(c) = condition {
        let wrapper = p.alloc(Node::new(NodeKind::JoinCondition).with_range(p.arena.node(c).start, p.arena.node(c).end))?;
        p.arena.append_child(wrapper, c);
        p.arena.append_child(join, wrapper);
    }
    Ok(join)
}

fn parse_using_list<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.expect(TokenKind::LParen)?;
    let list = p.alloc(Node::new(NodeKind::UsingList).with_range(start, start))?;
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

fn parse_table_ref<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let table = if p.at(TokenKind::LParen) {
        let start = p.current().start;
        p.bump();
        let inner = if p.at_keyword(Keyword::Select) || p.at_keyword(Keyword::With) {
            let _guard = crate::context::ContextGuard::enter(&mut p.context, ParseContext::Subquery);
            super::select::parse_select_core(p)?
        } else {
            parse_table_ref(p)?
        };
        let rparen = p.expect(TokenKind::RParen)?;
        let sub = p.alloc(Node::new(NodeKind::Subquery).with_range(start, rparen.end))?;
        p.arena.append_child(sub, inner);
        sub
    } else {
        let name_tok = p.expect(TokenKind::Identifier)?;
        let name = p.alloc_text(p.text_of(&name_tok))?;
        p.alloc(Node::new(NodeKind::Identifier).with_range(name_tok.start, name_tok.end).with_text(name))?
    };

    let has_as = p.at_keyword(Keyword::As);
    if has_as {
        p.bump();
    }
    if has_as || p.at(TokenKind::Identifier) {
        let alias_tok = p.expect(TokenKind::Identifier)?;
        let alias = p.alloc_text(p.text_of(&alias_tok))?;
        p.arena.node_mut(table).text2 = alias;
        p.arena.node_mut(table).end = alias_tok.end;
    }
    Ok(table)
}
