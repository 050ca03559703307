//! Criterion microbenches for oracle refinement and exact sign decisions.
//!
//! - Refining a fresh `sqrt` leaf to a fixed precision.
//! - Deciding `√a + √b` against `√c` (radical normal form, then intervals).
//! - Deciding the sign of a nested radical that only intervals can settle.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use geokernel::api::{ExactValue, OracleCfg};

fn sqrt(n: i64) -> ExactValue {
    ExactValue::from_integer(n).sqrt().unwrap()
}

fn bench_refine(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle");
    for rounds in [4usize, 16] {
        group.bench_function(BenchmarkId::new("refine_sqrt2", rounds), |b| {
            b.iter_batched(
                || sqrt(2),
                |v| {
                    let o = v.as_oracle().unwrap();
                    for _ in 0..rounds {
                        let _ = o.refine();
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.bench_function(BenchmarkId::new("cmp_exact", "sqrt2+sqrt3 vs sqrt10"), |b| {
        b.iter_batched(
            || (sqrt(2) + sqrt(3), sqrt(10)),
            |(lhs, rhs)| {
                let _ = lhs.cmp_exact(&rhs);
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function(BenchmarkId::new("sign", "nested"), |b| {
        let cfg = OracleCfg::default();
        b.iter_batched(
            || sqrt(2).sqrt().unwrap() - ExactValue::ratio(1189, 1000).unwrap(),
            |v| {
                let _ = v.sign_with(&cfg);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_refine);
criterion_main!(benches);
