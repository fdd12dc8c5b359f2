use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use submorph_dfa::Dfa;

fn bench_counting(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_range");
    let patterns = [
        ("small_alt", "(dev|prod|staging)"),
        ("concat_alt", "(api|cdn|mail|admin)-(dev|prod|staging|qa)"),
        ("number_class", "[0-9][0-9][0-9]"),
    ];
    for (label, pattern) in patterns {
        let dfa = Dfa::build(pattern).unwrap();
        group.bench_with_input(BenchmarkId::new("count", label), &dfa, |b, dfa| {
            b.iter(|| dfa.count_range_saturating(0, 10));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_counting);
criterion_main!(benches);
