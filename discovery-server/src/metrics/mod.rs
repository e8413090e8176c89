//! Prometheus Metrics for Discovery
//!
//! - Cluster manager operations (create, get, register, update, delete)
//! - Store expiry
//! - HTTP requests per endpoint, partitioned by status code and method

use lazy_static::lazy_static;
use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, TextEncoder, register_histogram_vec,
    register_int_counter, register_int_counter_vec,
};

lazy_static! {
    // ============================================================================
    // Cluster Manager Metrics
    // ============================================================================

    /// Total cluster operations by type and outcome
    pub static ref CLUSTER_OPS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "discovery_cluster_operations_total",
        "Total number of cluster operations by type",
        &["operation", "status"]
    ).unwrap();

    /// Cluster operation latency in seconds
    pub static ref CLUSTER_OP_DURATION: HistogramVec = register_histogram_vec!(
        "discovery_cluster_operation_duration_seconds",
        "Cluster operation latency in seconds",
        &["operation"],
        vec![0.0001, 0.001, 0.01, 0.1, 1.0]
    ).unwrap();

    // ============================================================================
    // Store Metrics
    // ============================================================================

    /// Keys removed because their TTL elapsed
    pub static ref EXPIRED_KEYS_TOTAL: IntCounter = register_int_counter!(
        "discovery_expired_keys_total",
        "Total number of keys removed after TTL expiry"
    ).unwrap();

    // ============================================================================
    // HTTP Server Metrics
    // ============================================================================

    /// HTTP requests total
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "discovery_http_requests_total",
        "How many requests processed, partitioned by endpoint, status code and HTTP method",
        &["endpoint", "code", "method"]
    ).unwrap();
}

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record cluster manager operation
pub fn record_cluster_op(operation: &str, status: &str, duration_secs: f64) {
    CLUSTER_OPS_TOTAL
        .with_label_values(&[operation, status])
        .inc();
    CLUSTER_OP_DURATION
        .with_label_values(&[operation])
        .observe(duration_secs);
}

/// Record HTTP request
pub fn record_http_request(endpoint: &str, status: u16, method: &str) {
    let code = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[endpoint, code.as_str(), method])
        .inc();
}

/// Force registration so every metric shows up before its first sample
pub fn init_metrics() {
    let _ = &*CLUSTER_OPS_TOTAL;
    let _ = &*CLUSTER_OP_DURATION;
    let _ = &*EXPIRED_KEYS_TOTAL;
    let _ = &*HTTP_REQUESTS_TOTAL;

    tracing::info!("Prometheus metrics initialized");
}
