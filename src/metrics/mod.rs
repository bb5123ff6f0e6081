//! Counters for the enrichment run
//!
//! Each phase owns a submodule of free functions so call sites stay one line.
//! Without an installed recorder every call is a no-op, which keeps the
//! library usable from tests and short CLI runs alike.

pub mod cache;
pub mod lookup;

/// Builds metric names following the convention
/// radius_zips_{phase}_{metric_name}[_total]
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("radius_zips_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("radius_zips_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
