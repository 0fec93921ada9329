//! Utils module - Shared utilities and helpers

/// reqwest/serde error conversion into `ApiError`
pub mod error_helpers;

/// tracing subscriber setup for the binary
pub mod logging;

/// Input validation for URLs and path segments
pub mod validation;
