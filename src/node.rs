//! The fixed-size AST node record (spec.md §3, §4.2).
//!
//! Grounded on the *shape* of `apollo-parser`'s generated node accessors
//! (`src/ast/generated/nodes.rs`) and its `SyntaxKind` enum
//! (`src/syntax_kind/generated.rs`) — there each node is a thin typed wrapper
//! over a `rowan` green-tree slot; here that's restructured into a single
//! `#[repr(C)]` record of fixed size, intrusively linked by
//! [`crate::arena::NodeId`] rather than by a reference-counted tree pointer,
//! per SPEC_FULL.md §3's representation decision.

use crate::arena::{ArenaStr, NodeId};
use bitflags::bitflags;

/// Discriminates what a [`Node`] represents. Covers every statement, clause,
/// and expression construct spec.md's [MODULE] blocks name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeKind {
    // Statements
    SelectStatement,
    InsertStatement,
    UpdateStatement,
    DeleteStatement,
    CreateTableStatement,
    CreateIndexStatement,
    CreateViewStatement,
    AlterTableStatement,
    DropStatement,
    TruncateStatement,
    BeginStatement,
    CommitStatement,
    RollbackStatement,
    SavepointStatement,
    ReleaseStatement,
    ExplainStatement,
    VacuumStatement,
    AnalyzeStatement,
    AttachStatement,
    DetachStatement,
    PragmaStatement,
    ReindexStatement,
    SetStatement,
    ValuesStatement,

    // CTE / select plumbing
    WithClause,
    CteDefinition,
    SetOperation,
    SelectCore,
    SelectList,
    SelectItem,
    FromClause,
    JoinClause,
    JoinCondition,
    UsingList,
    WhereClause,
    GroupByClause,
    HavingClause,
    OrderByClause,
    OrderByItem,
    LimitClause,
    WindowClause,
    PartitionByClause,
    FrameClause,
    FrameBound,

    // DML plumbing
    InsertColumnList,
    InsertValuesList,
    InsertValuesRow,
    AssignmentList,
    Assignment,
    OnConflictClause,
    ReturningClause,

    // DDL plumbing
    ColumnDefinition,
    ColumnDefinitionList,
    TableConstraint,
    IndexColumnList,
    CheckConstraint,
    ReferencesClause,
    ForeignKeyAction,

    // Expressions
    BinaryExpr,
    UnaryExpr,
    ComparisonExpr,
    LogicalExpr,
    BetweenExpr,
    InExpr,
    LikeExpr,
    IsNullExpr,
    CaseExpr,
    CaseWhenArm,
    FunctionCall,
    FunctionArgList,
    CastExpr,
    ExtractExpr,
    FilterClause,
    Subquery,
    ExistsExpr,
    TupleExpr,
    ParenExpr,

    // Leaves
    Identifier,
    QualifiedIdentifier,
    NumericLiteral,
    StringLiteral,
    BooleanLiteral,
    NullLiteral,
    ParameterPlaceholder,
    StarExpr,
    Keyword,

    // Recovery
    ErrorNode,
}

bitflags! {
    /// Per-node boolean flags. Kept as one word rather than separate `bool`
    /// fields so `Node` stays at a fixed, predictable size (spec.md §4.2).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        const DISTINCT        = 1 << 0;
        const ALL             = 1 << 1;
        const RECURSIVE       = 1 << 2;
        const NOT             = 1 << 3;
        const ASC             = 1 << 4;
        const DESC             = 1 << 5;
        const NULLS_FIRST      = 1 << 6;
        const NULLS_LAST       = 1 << 7;
        const OUTER            = 1 << 8;
        const LEFT             = 1 << 9;
        const RIGHT            = 1 << 10;
        const FULL             = 1 << 11;
        const INNER            = 1 << 12;
        const CROSS            = 1 << 13;
        const IF_EXISTS        = 1 << 14;
        const IF_NOT_EXISTS    = 1 << 15;
        const TEMPORARY        = 1 << 16;
        const UNIQUE           = 1 << 17;
        const RECOVERED        = 1 << 18;
        /// Set on a `BooleanLiteral` node whose lexeme was `TRUE` (absent
        /// for `FALSE`).
        const TRUE_LITERAL     = 1 << 19;
        /// `CREATE OR REPLACE VIEW`.
        const OR_REPLACE       = 1 << 20;
        /// Set on a `FrameClause` for `ROWS`, unset for `RANGE`.
        const ROWS             = 1 << 21;
        /// Set on a `FrameBound` for `PRECEDING`, unset for `FOLLOWING`
        /// (irrelevant for a bare `CURRENT ROW` bound).
        const PRECEDING        = 1 << 22;
        /// `ON CONFLICT DO NOTHING`, as opposed to `DO UPDATE SET ...`.
        const DO_NOTHING       = 1 << 23;
    }
}

impl NodeFlags {
    /// The upper byte is reserved for the parse-context hint recorded on
    /// identifier and column-reference primaries (spec.md §4.7/§9): which
    /// enclosing clause the parser was in when it built the node.
    pub const CONTEXT_SHIFT: u32 = 24;
    pub const CONTEXT_MASK: u32 = 0xFF << Self::CONTEXT_SHIFT;
}

/// A small typed payload inline in the node record, avoiding a separate
/// heap allocation for the handful of scalar facts a node needs beyond its
/// text views (spec.md §4.2: "a small inline payload").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Payload {
    #[default]
    None,
    /// Binding power / operator tag for expression nodes (spec.md §4.7).
    Operator(OperatorKind),
    /// Join kind for `JoinClause` nodes.
    SetOpKind(SetOpKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Or,
    And,
    Not,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    Is,
    Like,
    Between,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOpKind {
    Union,
    UnionAll,
    Intersect,
    Except,
}

/// One AST node. Fixed size, cache-line-ish aligned, intrusively linked.
///
/// Children are a singly-linked list via `first_child`/`next_sibling` rather
/// than an inline `Vec`, which is what lets every node stay the same size
/// regardless of its arity (spec.md §4.2's "fixed-size node, no matter how
/// many children a construct has").
#[repr(C, align(64))]
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub kind: NodeKind,
    pub flags: NodeFlags,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Byte offset range into the original query text this node spans.
    pub start: u32,
    pub end: u32,
    /// Primary text view: an identifier's name, a literal's lexeme, an
    /// operator's lexeme. Empty for purely structural nodes.
    pub text: ArenaStr,
    /// Secondary text view, used sparingly (e.g. a qualified identifier's
    /// trailing member name).
    pub text2: ArenaStr,
    pub payload: Payload,
}

const _ASSERT_NODE_SIZE: () = {
    // Not pinned to an exact byte count (Payload's enum tag and ArenaStr's
    // three u32s make 128 bytes an aspiration, not a guarantee, across
    // compilers) but kept well clear of a cache line blowing into two lines
    // by accident as fields are added.
    assert!(std::mem::size_of::<Node>() <= 128, "Node grew past its cache-line budget");
};

impl Node {
    /// A bare node of `kind` with no text, no payload, no links yet. Callers
    /// fill in `text`/`payload`/links as the production proceeds.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            flags: NodeFlags::empty(),
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            start: 0,
            end: 0,
            text: ArenaStr::EMPTY,
            text2: ArenaStr::EMPTY,
            payload: Payload::None,
        }
    }

    pub fn with_range(mut self, start: u32, end: u32) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_text(mut self, text: ArenaStr) -> Self {
        self.text = text;
        self
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_is_copy_and_fixed_size_regardless_of_kind() {
        let leaf = Node::new(NodeKind::Identifier);
        let branch = Node::new(NodeKind::SelectStatement);
        assert_eq!(std::mem::size_of_val(&leaf), std::mem::size_of_val(&branch));
    }

    #[test]
    fn builder_methods_compose() {
        let n = Node::new(NodeKind::SelectItem)
            .with_range(4, 10)
            .with_flags(NodeFlags::DISTINCT);
        assert_eq!(n.start, 4);
        assert_eq!(n.end, 10);
        assert!(n.flags.contains(NodeFlags::DISTINCT));
    }
}
