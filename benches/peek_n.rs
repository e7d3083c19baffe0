use criterion::*;
use veloxsql_parser::{Lexer, TokenSource};

const QUERY: &str = "SELECT o.id, o.total, c.name \
                      FROM orders o \
                      INNER JOIN customers c ON o.customer_id = c.id \
                      WHERE o.total > 100 AND c.region = 'west' \
                      ORDER BY o.total DESC LIMIT 50;";

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("lexer_tokenize", move |b| {
        b.iter(|| {
            let lexer = Lexer::new(QUERY);
            black_box(lexer.into_tokens().len());
        })
    });
}

fn bench_peek_nth(c: &mut Criterion) {
    let lexer = Lexer::new(QUERY);
    c.bench_function("lexer_peek_nth", move |b| {
        b.iter(|| {
            for n in 0..8 {
                black_box(lexer.peek_nth(n));
            }
        })
    });
}

criterion_group!(benches, bench_tokenize, bench_peek_nth);
criterion_main!(benches);
