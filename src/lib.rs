//! Library exports for reuse in binaries and tests.
/// HTTP routes and request validation.
pub mod api;
/// Service configuration loading.
pub mod config;
/// Logging setup.
pub mod logging;
/// Machine learning pipeline for sentiment classification.
pub mod ml;
/// Model artifact persistence and the load-or-train startup path.
pub mod store;
