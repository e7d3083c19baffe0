use criterion::*;
use veloxsql_parser::{Parser, ParserConfig};

const SCRIPT: &str = "\
BEGIN;
INSERT INTO users (id, name, email) VALUES (1, 'ada', 'ada@example.com');
UPDATE users SET name = 'ada lovelace' WHERE id = 1;
SELECT id, name FROM users WHERE id = 1;
DELETE FROM sessions WHERE user_id = 1;
COMMIT;
";

fn bench_script(c: &mut Criterion) {
    c.bench_function("script_mixed_statements", move |b| {
        b.iter(|| {
            let outcome = Parser::new(SCRIPT, ParserConfig::default()).parse_script();
            black_box(outcome.roots.len());
        })
    });
}

fn bench_script_with_recovery(c: &mut Criterion) {
    // One malformed statement in the middle; measures the cost of
    // panic-mode recovery alongside normal parsing.
    let script = "SELECT 1; SELECT FROM WHERE; SELECT 2;";
    c.bench_function("script_with_recovery", move |b| {
        b.iter(|| {
            let outcome = Parser::new(script, ParserConfig::default()).parse_script();
            black_box(outcome.roots.len());
        })
    });
}

criterion_group!(benches, bench_script, bench_script_with_recovery);
criterion_main!(benches);
