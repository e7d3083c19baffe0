//! `CREATE TABLE`/`INDEX`/`VIEW`, `ALTER TABLE`, `DROP`, `TRUNCATE`
//! (spec.md [MODULE] DDL).

use crate::arena::NodeId;
use crate::keyword::Keyword;
use crate::node::{Node, NodeFlags, NodeKind};
use crate::parser::{expr, PResult, Parser};
use crate::token::{TokenKind, TokenSource};

fn parse_table_name<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let name_tok = p.expect(TokenKind::Identifier)?;
    let name = p.alloc_text(p.text_of(&name_tok))?;
    p.alloc(Node::new(NodeKind::Identifier).with_range(name_tok.start, name_tok.end).with_text(name))
}

fn parse_if_not_exists<T: TokenSource>(p: &mut Parser<T>) -> PResult<bool> {
    if p.at_keyword(Keyword::If) {
        p.bump();
        p.expect_keyword(Keyword::Not)?;
        p.expect_keyword(Keyword::Exists)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn parse_if_exists<T: TokenSource>(p: &mut Parser<T>) -> PResult<bool> {
    if p.at_keyword(Keyword::If) {
        p.bump();
        p.expect_keyword(Keyword::Exists)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

pub fn parse_create_table<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // CREATE
    let mut flags = NodeFlags::empty();
    if p.at_keyword(Keyword::Temporary) {
        p.bump();
        flags |= NodeFlags::TEMPORARY;
    }
    p.expect_keyword(Keyword::Table)?;
    if parse_if_not_exists(p)? {
        flags |= NodeFlags::IF_NOT_EXISTS;
    }
    let name = parse_table_name(p)?;

    p.expect(TokenKind::LParen)?;
    let columns = p.alloc(Node::new(NodeKind::ColumnDefinitionList).with_range(start, start))?;
    loop {
        if is_table_constraint_lead(p) {
            let constraint = parse_table_constraint(p)?;
            p.arena.append_child(columns, constraint);
        } else {
            let column = parse_column_definition(p)?;
            p.arena.append_child(columns, column);
        }
        if p.at(TokenKind::Comma) {
            p.bump();
        } else {
            break;
        }
    }
    let rparen = p.expect(TokenKind::RParen)?;
    p.arena.node_mut(columns).end = rparen.end;

    let stmt = p.alloc(Node::new(NodeKind::CreateTableStatement).with_range(start, rparen.end).with_flags(flags))?;
    p.arena.append_child(stmt, name);
    p.arena.append_child(stmt, columns);
    Ok(stmt)
}

fn is_table_constraint_lead<T: TokenSource>(p: &Parser<T>) -> bool {
    matches!(
        p.current().kind,
        TokenKind::Keyword(Keyword::Primary)
            | TokenKind::Keyword(Keyword::Unique)
            | TokenKind::Keyword(Keyword::Foreign)
            | TokenKind::Keyword(Keyword::Check)
            | TokenKind::Keyword(Keyword::Constraint)
    )
}

fn parse_column_definition<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let name_tok = p.expect(TokenKind::Identifier)?;
    let name = p.alloc_text(p.text_of(&name_tok))?;

    let type_tok = p.expect(TokenKind::Identifier)?;
    let type_name = p.alloc_text(p.text_of(&type_tok))?;
    let mut end = type_tok.end;

    let col = p.alloc(Node::new(NodeKind::ColumnDefinition).with_range(name_tok.start, end).with_text(name))?;
    p.arena.node_mut(col).text2 = type_name;

    let mut flags = NodeFlags::empty();
    loop {
        if p.at_keyword(Keyword::Primary) {
            p.bump();
            p.expect_keyword(Keyword::Key)?;
            flags |= NodeFlags::UNIQUE;
            end = p.current().start;
        } else if p.at_keyword(Keyword::Not) {
            p.bump();
            p.expect_keyword(Keyword::Null)?;
            flags |= NodeFlags::NOT;
        } else if p.at_keyword(Keyword::Unique) {
            p.bump();
            flags |= NodeFlags::UNIQUE;
        } else if p.at_keyword(Keyword::Default) {
            p.bump();
            let value = expr::parse_expr(p)?;
            end = p.arena.node(value).end;
            p.arena.append_child(col, value);
        } else if p.at_keyword(Keyword::Check) {
            let check_start = p.current().start;
            p.bump();
            p.expect(TokenKind::LParen)?;
            let cond = expr::parse_expr(p)?;
            let rparen = p.expect(TokenKind::RParen)?;
            let check = p.alloc(Node::new(NodeKind::CheckConstraint).with_range(check_start, rparen.end))?;
            p.arena.append_child(check, cond);
            p.arena.append_child(col, check);
            end = rparen.end;
        } else if p.at_keyword(Keyword::References) {
            let ref_start = p.current().start;
            p.bump();
            let referenced = parse_table_name(p)?;
            let mut ref_end = p.arena.node(referenced).end;
            let references = p.alloc(Node::new(NodeKind::ReferencesClause).with_range(ref_start, ref_start))?;
            p.arena.append_child(references, referenced);
            if p.at(TokenKind::LParen) {
                let ref_cols = parse_index_column_list(p)?;
                ref_end = p.arena.node(ref_cols).end;
                p.arena.append_child(references, ref_cols);
            }
            while p.at_keyword(Keyword::On) {
                let action = parse_foreign_key_action(p)?;
                ref_end = p.arena.node(action).end;
                p.arena.append_child(references, action);
            }
            p.arena.node_mut(references).end = ref_end;
            p.arena.append_child(col, references);
            end = ref_end;
        } else if p.at_keyword(Keyword::Collate) {
            p.bump();
            let name_tok = p.expect(TokenKind::Identifier)?;
            let name = p.alloc_text(p.text_of(&name_tok))?;
            let collate = p.alloc(Node::new(NodeKind::Keyword).with_range(name_tok.start, name_tok.end).with_text(name))?;
            p.arena.append_child(col, collate);
            end = name_tok.end;
        } else {
            break;
        }
    }
    p.arena.node_mut(col).flags = flags;
    p.arena.node_mut(col).end = end;
    Ok(col)
}

/// `ON {DELETE | UPDATE} {CASCADE | RESTRICT | SET NULL | SET DEFAULT | NO ACTION}`,
/// one per `REFERENCES` clause trigger.
fn parse_foreign_key_action<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // ON
    let trigger = if p.at_keyword(Keyword::Delete) {
        p.bump();
        "DELETE"
    } else {
        p.expect_keyword(Keyword::Update)?;
        "UPDATE"
    };
    let (action_text, end) = if p.at_keyword(Keyword::Cascade) {
        let tok = p.bump();
        ("CASCADE", tok.end)
    } else if p.at_keyword(Keyword::Restrict) {
        let tok = p.bump();
        ("RESTRICT", tok.end)
    } else if p.at_keyword(Keyword::Set) {
        p.bump();
        if p.at_keyword(Keyword::Null) {
            let tok = p.bump();
            ("SET NULL", tok.end)
        } else {
            let tok = p.expect_keyword(Keyword::Default)?;
            ("SET DEFAULT", tok.end)
        }
    } else {
        p.expect_keyword(Keyword::No)?;
        let tok = p.expect_keyword(Keyword::Action)?;
        ("NO ACTION", tok.end)
    };
    let action = p.alloc_text(action_text)?;
    let trigger_text = p.alloc_text(trigger)?;
    let node = p.alloc(Node::new(NodeKind::ForeignKeyAction).with_range(start, end).with_text(action))?;
    p.arena.node_mut(node).text2 = trigger_text;
    Ok(node)
}

fn parse_table_constraint<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    if p.at_keyword(Keyword::Constraint) {
        p.bump();
        p.expect(TokenKind::Identifier)?;
    }
    let constraint = p.alloc(Node::new(NodeKind::TableConstraint).with_range(start, start))?;
    match p.current().kind {
        TokenKind::Keyword(Keyword::Primary) => {
            p.bump();
            p.expect_keyword(Keyword::Key)?;
            let cols = parse_index_column_list(p)?;
            p.arena.append_child(constraint, cols);
        }
        TokenKind::Keyword(Keyword::Unique) => {
            p.bump();
            let cols = parse_index_column_list(p)?;
            p.arena.append_child(constraint, cols);
        }
        TokenKind::Keyword(Keyword::Foreign) => {
            p.bump();
            p.expect_keyword(Keyword::Key)?;
            let cols = parse_index_column_list(p)?;
            p.arena.append_child(constraint, cols);
            p.expect_keyword(Keyword::References)?;
            let referenced = parse_table_name(p)?;
            p.arena.append_child(constraint, referenced);
            if p.at(TokenKind::LParen) {
                let ref_cols = parse_index_column_list(p)?;
                p.arena.append_child(constraint, ref_cols);
            }
        }
        TokenKind::Keyword(Keyword::Check) => {
            p.bump();
            p.expect(TokenKind::LParen)?;
            let cond = expr::parse_expr(p)?;
            p.arena.append_child(constraint, cond);
            p.expect(TokenKind::RParen)?;
        }
        _ => return p.fail_unexpected("expected a table constraint"),
    }
    let end = p.arena.children(constraint).last().map(|c| p.arena.node(c).end).unwrap_or(start);
    p.arena.node_mut(constraint).end = end;
    Ok(constraint)
}

fn parse_index_column_list<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.expect(TokenKind::LParen)?;
    let list = p.alloc(Node::new(NodeKind::IndexColumnList).with_range(start, start))?;
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

/// Like [`parse_index_column_list`] but accepts a full expression per column
/// (e.g. `lower(name)`), as `CREATE INDEX` allows and a bare `FOREIGN KEY`/
/// `PRIMARY KEY`/`UNIQUE` column list does not.
fn parse_index_expr_list<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.expect(TokenKind::LParen)?;
    let list = p.alloc(Node::new(NodeKind::IndexColumnList).with_range(start, start))?;
    loop {
        let col = expr::parse_expr(p)?;
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

pub fn parse_create_index<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // CREATE
    let mut flags = NodeFlags::empty();
    if p.at_keyword(Keyword::Unique) {
        p.bump();
        flags |= NodeFlags::UNIQUE;
    }
    p.expect_keyword(Keyword::Index)?;
    if parse_if_not_exists(p)? {
        flags |= NodeFlags::IF_NOT_EXISTS;
    }
    let name = parse_table_name(p)?;
    p.expect_keyword(Keyword::On)?;
    let table = parse_table_name(p)?;
    let columns = parse_index_expr_list(p)?;
    let where_clause = if p.at_keyword(Keyword::Where) {
        Some(super::select::parse_where_clause(p)?)
    } else {
        None
    };
    let end = where_clause.map(|w| p.arena.node(w).end).unwrap_or_else(|| p.arena.node(columns).end);
    let stmt = p.alloc(Node::new(NodeKind::CreateIndexStatement).with_range(start, end).with_flags(flags))?;
    p.arena.append_child(stmt, name);
    p.arena.append_child(stmt, table);
    p.arena.append_child(stmt, columns);
    if let Some(w) = where_clause {
        p.arena.append_child(stmt, w);
    }
    Ok(stmt)
}

pub fn parse_create_view<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // CREATE
    let mut flags = NodeFlags::empty();
    if p.at_keyword(Keyword::Or) {
        p.bump();
        p.expect_keyword(Keyword::Replace)?;
        flags |= NodeFlags::OR_REPLACE;
    }
    if p.at_keyword(Keyword::Temporary) {
        p.bump();
        flags |= NodeFlags::TEMPORARY;
    }
    p.expect_keyword(Keyword::View)?;
    if parse_if_not_exists(p)? {
        flags |= NodeFlags::IF_NOT_EXISTS;
    }
    let name = parse_table_name(p)?;
    let columns = if p.at(TokenKind::LParen) { Some(parse_index_column_list(p)?) } else { None };
    p.expect_keyword(Keyword::As)?;
    let body = super::select::parse_select_statement(p)?;
    let end = p.arena.node(body).end;
    let stmt = p.alloc(Node::new(NodeKind::CreateViewStatement).with_range(start, end).with_flags(flags))?;
    p.arena.append_child(stmt, name);
    if let Some(cols) = columns {
        p.arena.append_child(stmt, cols);
    }
    p.arena.append_child(stmt, body);
    Ok(stmt)
}

pub fn parse_alter_table<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // ALTER
    p.expect_keyword(Keyword::Table)?;
    let name = parse_table_name(p)?;

    let action = if p.at_keyword(Keyword::Add) {
        p.bump();
        if p.at_keyword(Keyword::Column) {
            p.bump();
        }
        parse_column_definition(p)?
    } else if p.at_keyword(Keyword::Drop) {
        p.bump();
        if p.at_keyword(Keyword::Column) {
            p.bump();
        }
        let col_tok = p.expect(TokenKind::Identifier)?;
        let col_name = p.alloc_text(p.text_of(&col_tok))?;
        p.alloc(Node::new(NodeKind::Identifier).with_range(col_tok.start, col_tok.end).with_text(col_name))?
    } else {
        return p.fail_unexpected("expected ADD or DROP after ALTER TABLE name");
    };

    let end = p.arena.node(action).end;
    let stmt = p.alloc(Node::new(NodeKind::AlterTableStatement).with_range(start, end))?;
    p.arena.append_child(stmt, name);
    p.arena.append_child(stmt, action);
    Ok(stmt)
}

pub fn parse_drop<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // DROP
    let object_kind = match p.current().kind {
        TokenKind::Keyword(Keyword::Table) => "TABLE",
        TokenKind::Keyword(Keyword::Index) => "INDEX",
        TokenKind::Keyword(Keyword::View) => "VIEW",
        _ => return p.fail_unexpected("expected TABLE, INDEX, or VIEW after DROP"),
    };
    p.bump();
    let mut flags = NodeFlags::empty();
    if parse_if_exists(p)? {
        flags |= NodeFlags::IF_EXISTS;
    }
    let name = parse_table_name(p)?;
    let mut end = p.arena.node(name).end;
    if p.at_keyword(Keyword::Cascade) || p.at_keyword(Keyword::Restrict) {
        let tok = p.bump();
        end = tok.end;
    }
    let kind_text = p.alloc_text(object_kind)?;
    let stmt = p.alloc(Node::new(NodeKind::DropStatement).with_range(start, end).with_flags(flags))?;
    p.arena.node_mut(stmt).text2 = kind_text;
    p.arena.append_child(stmt, name);
    Ok(stmt)
}

pub fn parse_truncate<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // TRUNCATE
    if p.at_keyword(Keyword::Table) {
        p.bump();
    }
    let name = parse_table_name(p)?;
    let end = p.arena.node(name).end;
    let stmt = p.alloc(Node::new(NodeKind::TruncateStatement).with_range(start, end))?;
    p.arena.append_child(stmt, name);
    Ok(stmt)
}
