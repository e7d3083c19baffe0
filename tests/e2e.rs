//! End-to-end scenarios: literal SQL in, expected tree shape out.

use veloxsql_parser::{FailureKind, NodeFlags, NodeKind, OperatorKind, Parser, ParserConfig, Payload};

fn parse_one(source: &str) -> (veloxsql_parser::Arena, veloxsql_parser::NodeId) {
    let outcome = Parser::new(source, ParserConfig::default()).parse_single();
    assert!(outcome.is_success(), "unexpected failures: {:?}", outcome.failures);
    let root = outcome.root().expect("a root node");
    (outcome.arena, root)
}

fn child_kinds(arena: &veloxsql_parser::Arena, id: veloxsql_parser::NodeId) -> Vec<NodeKind> {
    arena.children(id).map(|c| arena.node(c).kind).collect()
}

#[test]
fn e1_simple_select() {
    let (arena, root) = parse_one("SELECT id, name FROM users WHERE id = 42");
    assert_eq!(arena.node(root).kind, NodeKind::SelectStatement);
    assert!(!arena.node(root).flags.contains(NodeFlags::DISTINCT));

    let core = arena.children(root).next().expect("select core");
    assert_eq!(arena.node(core).kind, NodeKind::SelectCore);
    assert_eq!(child_kinds(&arena, core), vec![NodeKind::SelectList, NodeKind::FromClause, NodeKind::WhereClause]);

    let select_list = arena.children(core).next().unwrap();
    let items: Vec<_> = arena.children(select_list).collect();
    assert_eq!(items.len(), 2);
    for item in &items {
        let value = arena.children(*item).next().unwrap();
        assert_eq!(arena.node(value).kind, NodeKind::Identifier);
    }

    let from = arena.children(core).nth(1).unwrap();
    let table = arena.children(from).next().unwrap();
    assert_eq!(arena.node(table).kind, NodeKind::Identifier);
    assert_eq!(arena.resolve(arena.node(table).text), "users");

    let where_clause = arena.children(core).nth(2).unwrap();
    let cond = arena.children(where_clause).next().unwrap();
    assert_eq!(arena.node(cond).kind, NodeKind::ComparisonExpr);
    assert_eq!(arena.node(cond).payload, Payload::Operator(OperatorKind::Eq));
}

#[test]
fn e2_precedence_and_associativity() {
    let (arena, root) = parse_one("SELECT 1 + 2 * 3 - 4 FROM t");
    let core = arena.children(root).next().unwrap();
    let select_list = arena.children(core).next().unwrap();
    let item = arena.children(select_list).next().unwrap();
    let top = arena.children(item).next().unwrap();

    // top is `(1 + 2*3) - 4`
    assert_eq!(arena.node(top).payload, Payload::Operator(OperatorKind::Sub));
    let mut top_children = arena.children(top);
    let lhs = top_children.next().unwrap();
    let rhs = top_children.next().unwrap();
    assert_eq!(arena.node(rhs).kind, NodeKind::NumericLiteral);
    assert_eq!(arena.resolve(arena.node(rhs).text), "4");

    assert_eq!(arena.node(lhs).payload, Payload::Operator(OperatorKind::Add));
    let mut lhs_children = arena.children(lhs);
    let one = lhs_children.next().unwrap();
    let mul = lhs_children.next().unwrap();
    assert_eq!(arena.resolve(arena.node(one).text), "1");
    assert_eq!(arena.node(mul).payload, Payload::Operator(OperatorKind::Mul));
}

#[test]
fn e3_join_with_using() {
    let (arena, root) = parse_one("SELECT * FROM a INNER JOIN b USING (id)");
    let core = arena.children(root).next().unwrap();
    let from = arena.children(core).nth(1).unwrap();
    let join = arena.children(from).next().unwrap();
    assert_eq!(arena.node(join).kind, NodeKind::JoinClause);
    assert!(arena.node(join).flags.contains(NodeFlags::INNER));

    let mut join_children = arena.children(join);
    let left = join_children.next().unwrap();
    let right = join_children.next().unwrap();
    let condition = join_children.next().unwrap();
    assert_eq!(arena.resolve(arena.node(left).text), "a");
    assert_eq!(arena.resolve(arena.node(right).text), "b");
    assert_eq!(arena.node(condition).kind, NodeKind::JoinCondition);
    let using = arena.children(condition).next().unwrap();
    assert_eq!(arena.node(using).kind, NodeKind::UsingList);
    let col = arena.children(using).next().unwrap();
    assert_eq!(arena.resolve(arena.node(col).text), "id");
}

#[test]
fn e4_recursive_cte() {
    let (arena, root) =
        parse_one("WITH RECURSIVE t(n) AS (SELECT 1 UNION ALL SELECT n+1 FROM t WHERE n < 10) SELECT * FROM t");
    let with = arena.children(root).next().unwrap();
    assert_eq!(arena.node(with).kind, NodeKind::WithClause);
    assert!(arena.node(with).flags.contains(NodeFlags::RECURSIVE));

    let cte = arena.children(with).next().unwrap();
    assert_eq!(arena.node(cte).kind, NodeKind::CteDefinition);
    assert_eq!(arena.resolve(arena.node(cte).text), "t");

    let mut cte_children = arena.children(cte);
    let col = cte_children.next().unwrap();
    assert_eq!(arena.resolve(arena.node(col).text), "n");
    let body = cte_children.next().unwrap();
    assert_eq!(arena.node(body).kind, NodeKind::SetOperation);
    assert_eq!(arena.node(body).payload, Payload::SetOpKind(veloxsql_parser::SetOpKind::UnionAll));

    let outer_core = arena.children(root).nth(1).unwrap();
    let outer_from = arena.children(outer_core).nth(1).unwrap();
    let outer_table = arena.children(outer_from).next().unwrap();
    assert_eq!(arena.resolve(arena.node(outer_table).text), "t");
}

#[test]
fn e5_depth_bomb_fails_with_depth_exceeded_and_releases_the_guard() {
    let mut source = String::new();
    source.push_str("SELECT ");
    for _ in 0..2000 {
        source.push('(');
    }
    source.push('1');
    for _ in 0..2000 {
        source.push(')');
    }
    source.push_str(" FROM t");

    let parser = Parser::new(&source, ParserConfig::default());
    let outcome = parser.parse_single();
    assert!(!outcome.is_success());
    assert!(outcome.failures.iter().any(|f| f.kind == FailureKind::DepthExceeded));
    assert_eq!(outcome.stats.max_depth_reached, 1000);
}

#[test]
fn e6_having_without_group_by_or_aggregate_is_invalid_construct() {
    let outcome = Parser::new("SELECT * FROM t HAVING 1=1", ParserConfig::default()).parse_single();
    assert!(!outcome.is_success());
    let failure = outcome
        .failures
        .iter()
        .find(|f| f.kind == FailureKind::InvalidConstruct)
        .expect("an INVALID_CONSTRUCT failure");
    assert!(failure.message.contains("HAVING"));
}
