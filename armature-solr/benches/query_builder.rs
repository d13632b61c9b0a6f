//! Request Building Benchmarks
//!
//! Measures the cost of turning request specs into request strings and
//! cache keys, and of decoding facet counts from a response.
//!
//! Run with: cargo bench -p armature-solr --bench query_builder

use armature_solr::{
    FieldFacet, FilterSpec, LocalParams, NoopLogger, QueryBuilder, QueryFacet, QueryValue,
    RequestSpec, ResponseOptions, SolrResponse,
};
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;
use std::hint::black_box;

fn faceted_spec() -> RequestSpec {
    RequestSpec::new(QueryValue::fields([("index_type", "widget"), ("city", "new york")]))
        .filter(FilterSpec::fields([("instock_b", true), ("onsale_b", true)]))
        .filter(
            FilterSpec::fields([("brand", vec!["apple", "dell"])])
                .with_local_params(LocalParams::new().with("tag", "brand")),
        )
        .facet(FieldFacet::new("brand").limit(15).mincount(5))
        .facet(QueryFacet::new(QueryValue::fields([("price", 0..=10)])).name("cheap"))
        .sort("price asc")
        .highlight(true)
        .param("spellcheck", true)
}

// ============================================================================
// Request Building
// ============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    group.bench_function("simple", |b| {
        b.iter(|| {
            let query = QueryBuilder::new("standard", black_box(RequestSpec::new("good book")))
                .build()
                .unwrap();
            black_box(query)
        })
    });

    group.bench_function("faceted", |b| {
        let spec = faceted_spec();
        b.iter(|| {
            let query = QueryBuilder::new("standard", black_box(spec.clone()))
                .build()
                .unwrap();
            black_box(query)
        })
    });

    group.bench_function("faceted_cache_key", |b| {
        let query = QueryBuilder::new("standard", faceted_spec()).build().unwrap();
        b.iter(|| black_box(query.cache_key()))
    });

    group.finish();
}

// ============================================================================
// Response Decoding
// ============================================================================

fn bench_facets(c: &mut Criterion) {
    let query = QueryBuilder::new("standard", faceted_spec()).build().unwrap();
    let values: Vec<_> = (0..500)
        .flat_map(|i| vec![json!(format!("brand_{}", i)), json!(i % 7)])
        .collect();
    let body = json!({
        "responseHeader": {"status": 0, "QTime": 3, "params": {}},
        "response": {"numFound": 0, "start": 0, "docs": []},
        "facet_counts": {"facet_queries": {"cheap": 12}, "facet_fields": {"brand": values}}
    })
    .to_string();

    c.bench_function("facet_fields_by_hash/500", |b| {
        b.iter(|| {
            let response = SolrResponse::parse(
                black_box(&body),
                &query,
                ResponseOptions::default(),
                &NoopLogger,
            )
            .unwrap();
            black_box(response.facet_fields_by_hash().unwrap().len())
        })
    });
}

criterion_group!(benches, bench_build, bench_facets);
criterion_main!(benches);
