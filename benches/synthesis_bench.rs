use criterion::{criterion_group, criterion_main, Criterion};
use popforge::optimizer::{NoProgress, OptimizationOptions, Optimizer};
use popforge::sample::{Individual, SamplePool};
use popforge::table::{Area, AttributeTable};
use popforge::SynthesisContext;
use std::hint::black_box;

fn setup_inputs() -> (SamplePool, AttributeTable) {
    let people = (0..500)
        .map(|i| Individual::new(format!("P{}", i), (i % 3 == 0) as u8).expect("binary value"))
        .collect();
    let pool = SamplePool::new(people).expect("non-empty pool");

    let areas = (0..200)
        .map(|i| Area::new(format!("E{:04}", i), 80 + (i % 40), 90 + (i % 25)))
        .collect();
    let target = AttributeTable::from_areas(areas).expect("non-empty table");

    (pool, target)
}

fn criterion_benchmark(c: &mut Criterion) {
    let (pool, target) = setup_inputs();

    c.bench_function("synthesize (200 areas, sequential)", |b| {
        b.iter(|| {
            let mut ctx = SynthesisContext::new(pool.clone(), target.clone(), Some(42));
            let report = Optimizer::new(OptimizationOptions::default())
                .run(&mut ctx, black_box(Some(42)), NoProgress)
                .expect("run");
            black_box(report.total_final_error())
        })
    });

    let parallel = OptimizationOptions {
        num_threads: 4,
        ..Default::default()
    };
    let optimizer = Optimizer::new(parallel);
    c.bench_function("synthesize (200 areas, 4 threads)", |b| {
        b.iter(|| {
            let mut ctx = SynthesisContext::new(pool.clone(), target.clone(), Some(42));
            let report = optimizer
                .run(&mut ctx, black_box(Some(42)), NoProgress)
                .expect("run");
            black_box(report.total_final_error())
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
