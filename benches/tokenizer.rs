use std::ops::ControlFlow;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rowscan::tokenizer::{parse, ParseOptions};
use rowscan::types::{ColumnType, Field, RowDelim, Schema};

fn synthetic_input(rows: usize, quoted_every: Option<usize>) -> String {
    let mut out = String::with_capacity(rows * 32);
    out.push_str("id,name,score,comment\n");
    for i in 0..rows {
        let comment = match quoted_every {
            Some(n) if i % n == 0 => "\"hello, \"\"world\"\"\"".to_string(),
            _ => "plain".to_string(),
        };
        out.push_str(&format!("{i},user{i},{}.5,{comment}\n", i % 100));
    }
    out
}

fn bench_schema(quote: Option<u8>) -> Schema {
    let fields = ["id", "name", "score", "comment"]
        .into_iter()
        .map(|n| Field::new(n, ColumnType::Utf8))
        .collect();
    Schema::new(b',', RowDelim::Lf, quote, fields)
}

fn run(text: &str, schema: &Schema) -> usize {
    let mut rows = 0;
    parse(text, schema, &ParseOptions::default(), |chunk, _| {
        rows += chunk.len();
        ControlFlow::Continue(())
    })
    .unwrap();
    rows
}

fn tokenizer_benches(c: &mut Criterion) {
    let plain = synthetic_input(50_000, None);
    let quoted = synthetic_input(50_000, Some(10));

    let mut group = c.benchmark_group("tokenizer");
    group.throughput(Throughput::Bytes(plain.len() as u64));
    group.bench_function("quote_free_fast_path", |b| {
        let schema = bench_schema(None);
        b.iter(|| black_box(run(&plain, &schema)));
    });
    group.throughput(Throughput::Bytes(quoted.len() as u64));
    group.bench_function("quoted_state_machine", |b| {
        let schema = bench_schema(Some(b'"'));
        b.iter(|| black_box(run(&quoted, &schema)));
    });
    group.finish();
}

criterion_group!(benches, tokenizer_benches);
criterion_main!(benches);
