use crate::metrics::phase_metric;

/// A remote lookup completed and returned `keys` results
pub fn success(duration_secs: f64, keys: usize) {
    ::metrics::counter!(phase_metric!(counter, "lookup", "requests_success")).increment(1);
    ::metrics::histogram!(phase_metric!(histogram, "lookup", "request_duration_seconds"))
        .record(duration_secs);
    ::metrics::histogram!(phase_metric!(histogram, "lookup", "result_keys")).record(keys as f64);
}

/// A remote lookup failed and degraded to an empty result
pub fn failure() {
    ::metrics::counter!(phase_metric!(counter, "lookup", "requests_error")).increment(1);
}
