//! Statement dispatch table (spec.md §4.5: "the dispatcher routes on the
//! leading keyword in O(1) — no statement's grammar function scans ahead to
//! decide which statement it is").
//!
//! Grounded on `apollo-parser/src/parser/grammar/document.rs`'s top-level
//! `match` over the first token's kind to pick which definition grammar
//! function runs; generalized from a `match` over a closed token-kind set
//! to a `match` over [`Keyword`] (SQL's leading keyword is always a
//! `Keyword`-kind token once lexed, so the two are equivalent in practice —
//! `match` over an enum compiles to a jump table, which is what gives this
//! O(1) dispatch without a `phf`/hash-map dependency the teacher never
//! carried).

use crate::keyword::Keyword;

/// Which grammar function should run for a statement whose leading token is
/// `kw`. `None` means `kw` cannot start a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementRoute {
    Select,
    Insert,
    Update,
    Delete,
    CreateTable,
    CreateIndex,
    CreateView,
    AlterTable,
    Drop,
    Truncate,
    Begin,
    Commit,
    Rollback,
    Savepoint,
    Release,
    Explain,
    Vacuum,
    Analyze,
    Attach,
    Detach,
    Pragma,
    Reindex,
    Set,
    Values,
    With,
}

/// Route a leading keyword to its statement grammar, or `None` if `kw`
/// cannot lead a statement on its own (e.g. `FROM`, `WHERE`).
///
/// `CREATE` needs one token of lookahead (`TABLE`/`INDEX`/`VIEW`) to fully
/// resolve; callers pass that second keyword in when `kw` is `Create`.
pub fn route(kw: Keyword, second: Option<Keyword>) -> Option<StatementRoute> {
    use Keyword::*;
    Some(match kw {
        Select => StatementRoute::Select,
        Insert => StatementRoute::Insert,
        Update => StatementRoute::Update,
        Delete => StatementRoute::Delete,
        Create => match second {
            Some(Table) | Some(Temporary) => StatementRoute::CreateTable,
            Some(Index) | Some(Unique) => StatementRoute::CreateIndex,
            Some(View) | Some(Or) => StatementRoute::CreateView,
            _ => return None,
        },
        Alter => StatementRoute::AlterTable,
        Drop => StatementRoute::Drop,
        Truncate => StatementRoute::Truncate,
        Begin => StatementRoute::Begin,
        Commit => StatementRoute::Commit,
        Rollback => StatementRoute::Rollback,
        Savepoint => StatementRoute::Savepoint,
        Release => StatementRoute::Release,
        Explain => StatementRoute::Explain,
        Vacuum => StatementRoute::Vacuum,
        Analyze => StatementRoute::Analyze,
        Attach => StatementRoute::Attach,
        Detach => StatementRoute::Detach,
        Pragma => StatementRoute::Pragma,
        Reindex => StatementRoute::Reindex,
        Set => StatementRoute::Set,
        Values => StatementRoute::Values,
        With => StatementRoute::With,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_keywords_route_directly() {
        assert_eq!(route(Keyword::Select, None), Some(StatementRoute::Select));
        assert_eq!(route(Keyword::Delete, None), Some(StatementRoute::Delete));
    }

    #[test]
    fn create_needs_second_keyword_to_resolve() {
        assert_eq!(route(Keyword::Create, Some(Keyword::Table)), Some(StatementRoute::CreateTable));
        assert_eq!(route(Keyword::Create, Some(Keyword::Index)), Some(StatementRoute::CreateIndex));
        assert_eq!(route(Keyword::Create, Some(Keyword::View)), Some(StatementRoute::CreateView));
        assert_eq!(route(Keyword::Create, Some(Keyword::Or)), Some(StatementRoute::CreateView));
        assert_eq!(route(Keyword::Create, Some(Keyword::Select)), None);
    }

    #[test]
    fn clause_keywords_cannot_lead_a_statement() {
        assert_eq!(route(Keyword::From, None), None);
        assert_eq!(route(Keyword::Where, None), None);
    }
}
