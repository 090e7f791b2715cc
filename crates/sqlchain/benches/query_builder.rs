use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlchain::{Condition, Record, insert, select};

/// SELECT col0, col1, ... FROM `t` WHERE (`col0` = 0 AND `col1` = 1 ...)
fn build_select(n: usize) -> String {
    let cols: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
    let cond = cols
        .iter()
        .enumerate()
        .fold(Condition::new(), |c, (i, col)| c.eq(col.as_str(), i as i64));
    select()
        .fields(&cols)
        .from("t")
        .where_(cond)
        .to_string()
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/select");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n)));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let q = select()
                    .all()
                    .from("t")
                    .where_(Condition::new().in_list("id", values.iter().copied()));
                black_box(q.to_string());
            });
        });
    }

    group.finish();
}

fn bench_bulk_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/bulk_values");

    for n in [10, 100, 1000] {
        let rows: Vec<Record> = (0..n)
            .map(|i| {
                Record::new()
                    .set("id", i)
                    .set("name", format!("user'{i}"))
                    .set("active", i % 2 == 0)
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &rows, |b, rows| {
            b.iter(|| black_box(insert().into_table("users").bulk_values(rows).to_string()));
        });
    }

    group.finish();
}

fn bench_condition_from_json(c: &mut Criterion) {
    let json = serde_json::json!({
        "status": "active",
        "deleted_at": null,
        "$or": [{ "role": { "$in": ["admin", "owner"] } }, { "score": { "$gt": 10 } }],
        "email": { "$not": { "$like": "%@spam.test" } }
    });

    c.bench_function("query_builder/condition_from_json", |b| {
        b.iter(|| {
            let cond = Condition::from_json(black_box(&json)).ok();
            black_box(cond.map(|c| c.compile()));
        });
    });
}

criterion_group!(
    benches,
    bench_select,
    bench_in_list,
    bench_bulk_values,
    bench_condition_from_json
);
criterion_main!(benches);
