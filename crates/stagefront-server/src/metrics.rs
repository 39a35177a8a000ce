use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec,
};

pub static CATALOG_FETCH_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "catalog_fetch_seconds",
        "Content store fetch latency by kind",
        &["kind"]
    )
    .unwrap()
});

pub static CATALOG_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "catalog_requests_total",
        "Catalog requests by endpoint and status",
        &["endpoint", "status"]
    )
    .unwrap()
});

pub static QUERY_RESULTS_SIZE: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "query_results_size",
        "Records returned per query by kind",
        &["kind"],
        vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]
    )
    .unwrap()
});
