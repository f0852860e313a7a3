use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uuid::Uuid;

use common_policy::{classify, evaluate, AlertRegistry, PolicyConfig, Product};

fn snapshot(size: usize) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            id: Uuid::new_v4(),
            name: format!("product-{i}"),
            current_stock: (i % 60) as f64,
            min_stock: 25.0,
            reorder_point: 40.0,
            lead_time_days: 14,
            predicted_demand: Some(120.0),
            supplier_id: None,
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let cfg = PolicyConfig::default();
    let products = snapshot(1_000);
    c.bench_function("classify_1k", |b| {
        b.iter(|| {
            for p in &products {
                black_box(classify(p, &cfg).unwrap());
            }
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let cfg = PolicyConfig::default();
    let products = snapshot(1_000);
    let now = Utc::now();
    c.bench_function("evaluate_1k", |b| {
        b.iter(|| {
            let registry = AlertRegistry::new();
            black_box(evaluate(&products, &[], &registry, &cfg, now).unwrap());
        })
    });
}

criterion_group!(benches, bench_classify, bench_evaluate);
criterion_main!(benches);
