//! Testable Property 9: left-associativity, including the documented
//! chained-comparison decision (see DESIGN.md's Open Question decisions).

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
fn subtraction_is_left_associative() {
    // `a - b - c` -> `(a - b) - c`
    let (arena, top) = parse_expr_tree("a - b - c");
    assert_eq!(arena.node(top).payload, Payload::Operator(OperatorKind::Sub));
    let mut children = arena.children(top);
    let lhs = children.next().unwrap();
    let rhs = children.next().unwrap();
    assert_eq!(arena.resolve(arena.node(rhs).text), "c");
    assert_eq!(arena.node(lhs).kind, NodeKind::BinaryExpr);
    assert_eq!(arena.node(lhs).payload, Payload::Operator(OperatorKind::Sub));
    let mut lhs_children = arena.children(lhs);
    let a = lhs_children.next().unwrap();
    let b = lhs_children.next().unwrap();
    assert_eq!(arena.resolve(arena.node(a).text), "a");
    assert_eq!(arena.resolve(arena.node(b).text), "b");
}

#[test]
fn chained_equality_is_left_associative() {
    // `a = b = c` -> `(a = b) = c`, the chosen resolution of the dialect
    // question Testable Property 9 leaves open.
    let (arena, top) = parse_expr_tree("a = b = c");
    assert_eq!(arena.node(top).kind, NodeKind::ComparisonExpr);
    assert_eq!(arena.node(top).payload, Payload::Operator(OperatorKind::Eq));
    let mut children = arena.children(top);
    let lhs = children.next().unwrap();
    let rhs = children.next().unwrap();
    assert_eq!(arena.resolve(arena.node(rhs).text), "c");
    assert_eq!(arena.node(lhs).kind, NodeKind::ComparisonExpr);
    assert_eq!(arena.node(lhs).payload, Payload::Operator(OperatorKind::Eq));
}
