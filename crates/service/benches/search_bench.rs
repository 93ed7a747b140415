use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;

use service::marketplace::ServiceQuery;
use service::Services;

fn bench_search(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let svc = rt.block_on(Services::in_memory(&configs::AuthConfig::default())).unwrap();

    // seed a catalog outside of the benchmark
    rt.block_on(async {
        let provider = svc
            .providers
            .create(serde_json::from_value(json!({"name": "Bench Clinic", "type": "clinic"})).unwrap())
            .await
            .unwrap();
        for i in 0..1_000 {
            let input = serde_json::from_value(json!({
                "name": format!("Service {i}"), "price": format!("{}", (i * 37) % 500),
                "provider": provider.id, "discount": if i % 3 == 0 { "10" } else { "" }
            }))
            .unwrap();
            svc.services.create(input).await.unwrap();
        }
    });

    let query = ServiceQuery { keyword: Some("9".into()), sort: Some("price:asc".into()), filter: Some("has_discount".into()) };
    c.bench_function("marketplace_search_sorted", |b| {
        b.iter(|| rt.block_on(svc.market.search(&query)).unwrap());
    });
    c.bench_function("marketplace_home", |b| {
        b.iter(|| rt.block_on(svc.market.home()).unwrap());
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
