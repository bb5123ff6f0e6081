pub mod apis;
pub mod app;
pub mod cache;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod join;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod persist;
pub mod pipeline;
pub mod table;
pub mod types;
pub mod union;
