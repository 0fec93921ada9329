//! HTTP client and the endpoint functions built on it

pub mod auth;
pub mod client;
pub mod config;

pub use client::{ApiClient, ApiResponse};
pub use config::ConfigId;
