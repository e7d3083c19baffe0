//! `DELETE` (spec.md [MODULE] DELETE).

use crate::arena::NodeId;
use crate::keyword::Keyword;
use crate::node::{Node, NodeKind};
use crate::parser::{PResult, Parser};
use crate::token::{TokenKind, TokenSource};

pub fn parse_delete_statement<T: TokenSource>(p: &mut Parser<T>) -> PResult<NodeId> {
    let start = p.current().start;
    p.bump(); // DELETE
    p.expect_keyword(Keyword::From)?;

    let table_tok = p.expect(TokenKind::Identifier)?;
    let table_name = p.alloc_text(p.text_of(&table_tok))?;
    let table = p.alloc(Node::new(NodeKind::Identifier).with_range(table_tok.start, table_tok.end).with_text(table_name))?;

    // `USING` shares `FROM`'s table-ref-chain grammar, so the same
    // production runs here; only the leading keyword differs.
    let using_clause = if p.at_keyword(Keyword::Using) {
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
        .or(using_clause)
        .map(|n| p.arena.node(n).end)
        .unwrap_or(table_tok.end);
    let stmt = p.alloc(Node::new(NodeKind::DeleteStatement).with_range(start, end))?;
    p.arena.append_child(stmt, table);
    if let Some(u) = using_clause {
        p.arena.append_child(stmt, u);
    }
    if let Some(w) = where_clause {
        p.arena.append_child(stmt, w);
    }
    if let Some(r) = returning {
        p.arena.append_child(stmt, r);
    }
    Ok(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::parser::Parser as SqlParser;

    #[test]
    fn parses_delete_with_where_and_returning() {
        let mut p = SqlParser::new("DELETE FROM t WHERE id = 1 RETURNING id", ParserConfig::default());
        let id = parse_delete_statement(&mut p).expect("parses");
        assert_eq!(p.arena.node(id).kind, NodeKind::DeleteStatement);
        assert!(p.failures.is_empty());
    }
}
