/// Interactive login input
pub mod auth;
/// Cache store behind the query client
pub mod cache;
/// Bindings for the config resource
pub mod config_queries;
/// Query client, queries and mutations
pub mod query;
