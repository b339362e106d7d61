use criterion::{criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use std::fs;
use verbatim_json::lexer::{Lexer, TokenKind};

macro_rules! build_lex_benchmark {
    ($func : tt, $filename : expr) => {
        fn $func() {
            let source = fs::read_to_string(format!("fixtures/json/bench/{}.json", $filename)).unwrap();
            let mut lexer = Lexer::new(&source);
            loop {
                if lexer.next_token().kind == TokenKind::EndOfInput {
                    break;
                }
            }
        }
    };
}

build_lex_benchmark!(simple, "simple");
build_lex_benchmark!(config, "config");
build_lex_benchmark!(events, "events");

fn benchmark_simple(c: &mut Criterion) {
    c.bench_function("lex of simple", |b| b.iter(simple));
}
fn benchmark_config(c: &mut Criterion) {
    c.bench_function("lex of config", |b| b.iter(config));
}
fn benchmark_events(c: &mut Criterion) {
    c.bench_function("lex of events", |b| b.iter(events));
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = benchmark_simple, benchmark_config, benchmark_events
}
criterion_main!(benches);
