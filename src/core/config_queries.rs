//! Query and mutation bindings for the `config` resource.
//!
//! Every write binding invalidates [`CONFIG_QUERY_KEY`], the same key the read
//! binding is registered under.

use super::query::{Mutation, Query, QueryClient, QueryKey};
use crate::api::client::ApiClient;
use crate::api::config::{ConfigId, create_config, delete_config, fetch_config, update_config};
use serde_json::Value;

pub const CONFIG_QUERY_KEY: QueryKey = QueryKey::new("config");

/// Input of the update binding.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateConfigArgs {
    pub id: ConfigId,
    pub data: Value,
}

pub fn use_fetch_config(query_client: &QueryClient, api: &ApiClient) -> Query {
    let api = api.clone();
    Query::new(CONFIG_QUERY_KEY, query_client, move || {
        let api = api.clone();
        async move { fetch_config::<Value>(&api).await }
    })
}

pub fn use_create_config(query_client: &QueryClient, api: &ApiClient) -> Mutation<Value> {
    let api = api.clone();
    Mutation::new(query_client, move |data: Value| {
        let api = api.clone();
        async move { create_config::<Value, Value>(&api, &data).await }
    })
    .invalidates(CONFIG_QUERY_KEY)
}

pub fn use_update_config(
    query_client: &QueryClient,
    api: &ApiClient,
) -> Mutation<UpdateConfigArgs> {
    let api = api.clone();
    Mutation::new(query_client, move |args: UpdateConfigArgs| {
        let api = api.clone();
        let UpdateConfigArgs { id, data } = args;
        async move { update_config::<Value, Value>(&api, &id, &data).await }
    })
    .invalidates(CONFIG_QUERY_KEY)
}

pub fn use_delete_config(query_client: &QueryClient, api: &ApiClient) -> Mutation<ConfigId> {
    let api = api.clone();
    Mutation::new(query_client, move |id: ConfigId| {
        let api = api.clone();
        async move { delete_config::<Value>(&api, &id).await }
    })
    .invalidates(CONFIG_QUERY_KEY)
}
