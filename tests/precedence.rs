//! Testable Property 8: canonical precedence shapes.

use veloxsql_parser::{NodeKind, OperatorKind, Parser, ParserConfig, Payload};

fn parse_expr_tree(expr: &str) -> (veloxsql_parser::Arena, veloxsql_parser::NodeId) {
    let source = format!("SELECT {expr} FROM t");
    let outcome = Parser::new(&source, ParserConfig::default()).parse_single();
    assert!(outcome.is_success(), "{expr}: {:?}", outcome.failures);
    let arena = outcome.arena;
    let root = outcome.roots[0];
    let core = arena.children(root).next().unwrap();
    let select_list = arena.children(core).next().unwrap();
    let item = arena.children(select_list).next().unwrap();
    let value = arena.children(item).next().unwrap();
    (arena, value)
}

#[test]
fn or_binds_looser_than_and() {
    // `a OR b AND c` -> `a OR (b AND c)`
    let (arena, top) = parse_expr_tree("a OR b AND c");
    assert_eq!(arena.node(top).kind, NodeKind::LogicalExpr);
    assert_eq!(arena.node(top).payload, Payload::Operator(OperatorKind::Or));
    let mut children = arena.children(top);
    let lhs = children.next().unwrap();
    let rhs = children.next().unwrap();
    assert_eq!(arena.resolve(arena.node(lhs).text), "a");
    assert_eq!(arena.node(rhs).kind, NodeKind::LogicalExpr);
    assert_eq!(arena.node(rhs).payload, Payload::Operator(OperatorKind::And));
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    // `a + b * c` -> `a + (b * c)`
    let (arena, top) = parse_expr_tree("a + b * c");
    assert_eq!(arena.node(top).payload, Payload::Operator(OperatorKind::Add));
    let mut children = arena.children(top);
    let lhs = children.next().unwrap();
    let rhs = children.next().unwrap();
    assert_eq!(arena.resolve(arena.node(lhs).text), "a");
    assert_eq!(arena.node(rhs).kind, NodeKind::BinaryExpr);
    assert_eq!(arena.node(rhs).payload, Payload::Operator(OperatorKind::Mul));
}

#[test]
fn not_binds_tighter_than_a_following_comparison_is_wrong_way_round() {
    // `NOT a = b` -> `NOT (a = b)`: `NOT` is a prefix operator that grabs
    // only as loose an operand as its own binding power allows, which is
    // looser than comparison, so the comparison is built first and `NOT`
    // wraps the whole thing.
    let (arena, top) = parse_expr_tree("NOT a = b");
    assert_eq!(arena.node(top).kind, NodeKind::UnaryExpr);
    assert_eq!(arena.node(top).payload, Payload::Operator(OperatorKind::Not));
    let operand = arena.children(top).next().unwrap();
    assert_eq!(arena.node(operand).kind, NodeKind::ComparisonExpr);
    assert_eq!(arena.node(operand).payload, Payload::Operator(OperatorKind::Eq));
}

#[test]
fn concatenation_binds_looser_than_addition() {
    // `a || b + c` -> `a || (b + c)`
    let (arena, top) = parse_expr_tree("a || b + c");
    assert_eq!(arena.node(top).kind, NodeKind::BinaryExpr);
    assert_eq!(arena.node(top).payload, Payload::Operator(OperatorKind::Concat));
    let mut children = arena.children(top);
    let lhs = children.next().unwrap();
    let rhs = children.next().unwrap();
    assert_eq!(arena.resolve(arena.node(lhs).text), "a");
    assert_eq!(arena.node(rhs).kind, NodeKind::BinaryExpr);
    assert_eq!(arena.node(rhs).payload, Payload::Operator(OperatorKind::Add));
}
