use criterion::*;
use veloxsql_parser::{Parser, ParserConfig};

fn parse(query: &str) {
    let outcome = Parser::new(query, ParserConfig::default()).parse_script();
    if !outcome.is_success() {
        panic!("error parsing query: {:?}", outcome.failures);
    }
}

fn bench_simple_select(c: &mut Criterion) {
    let query = "SELECT id, name, email FROM users WHERE id = 1;";
    c.bench_function("select_simple", move |b| b.iter(|| parse(query)));
}

fn bench_joined_select(c: &mut Criterion) {
    let query = "SELECT o.id, o.total, c.name \
                  FROM orders o \
                  INNER JOIN customers c ON o.customer_id = c.id \
                  LEFT JOIN shipments s ON s.order_id = o.id \
                  WHERE o.total > 100 AND c.region = 'west' \
                  ORDER BY o.total DESC \
                  LIMIT 50;";
    c.bench_function("select_joined", move |b| b.iter(|| parse(query)));
}

fn bench_deeply_nested_expr(c: &mut Criterion) {
    let mut query = String::from("SELECT 1 FROM t WHERE ");
    for i in 0..64 {
        query.push_str(&format!("(a{i} + b{i} * c{i} - d{i} / 2) > "));
    }
    query.push_str("0;");
    c.bench_function("select_nested_expr", move |b| b.iter(|| parse(&query)));
}

criterion_group!(benches, bench_simple_select, bench_joined_select, bench_deeply_nested_expr);
criterion_main!(benches);
