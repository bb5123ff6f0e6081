use crate::metrics::phase_metric;

/// A key was answered from the cache
pub fn hit() {
    ::metrics::counter!(phase_metric!(counter, "cache", "hits")).increment(1);
}

/// The cache snapshot was rewritten
pub fn flushed() {
    ::metrics::counter!(phase_metric!(counter, "cache", "flushes")).increment(1);
}
