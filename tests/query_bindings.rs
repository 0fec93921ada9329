use nodebot_client::error::ApiError;
use nodebot_client::{
    ApiClient, CONFIG_QUERY_KEY, ConfigId, MutationStatus, QueryClient, Settings,
    UpdateConfigArgs, use_create_config, use_delete_config, use_fetch_config, use_update_config,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, ApiClient, QueryClient) {
    let server = MockServer::start().await;
    let settings = Settings::new(format!("{}/api/", server.uri()))
        .expect("settings")
        .with_stale_time(Duration::from_secs(60));
    let api = ApiClient::new(&settings).expect("client");
    (server, api, QueryClient::from_settings(&settings))
}

/// First GET answers `before`, every later GET answers `after`.
async fn mount_config_versions(server: &MockServer, before: serde_json::Value, after: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(before))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(after))
        .mount(server)
        .await;
}

async fn config_gets(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("recording enabled")
        .iter()
        .filter(|request| request.method.as_str() == "GET" && request.url.path() == "/api/config")
        .count()
}

#[tokio::test]
async fn fetch_binding_caches_reads() {
    let (server, api, queries) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "prefix": "!" })))
        .expect(1)
        .mount(&server)
        .await;

    let query = use_fetch_config(&queries, &api);
    assert_eq!(query.fetch().await.unwrap(), json!({ "prefix": "!" }));
    assert_eq!(query.fetch().await.unwrap(), json!({ "prefix": "!" }));

    // A second binding on the same client shares the cache entry.
    let other = use_fetch_config(&queries, &api);
    assert_eq!(other.data(), Some(json!({ "prefix": "!" })));
    assert_eq!(other.fetch().await.unwrap(), json!({ "prefix": "!" }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_reads_share_one_request() {
    let (server, api, queries) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([1, 2, 3]))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let first = use_fetch_config(&queries, &api);
    let second = use_fetch_config(&queries, &api);
    let (a, b) = tokio::join!(first.fetch(), second.fetch());

    assert_eq!(a.unwrap(), json!([1, 2, 3]));
    assert_eq!(b.unwrap(), json!([1, 2, 3]));
}

#[tokio::test]
async fn create_invalidates_config_reads() {
    let (server, api, queries) = setup().await;
    mount_config_versions(&server, json!([]), json!([{ "id": "1", "name": "x" }])).await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .and(body_json(json!({ "name": "x" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "1", "name": "x" })))
        .expect(1)
        .mount(&server)
        .await;

    let read = use_fetch_config(&queries, &api);
    let create = use_create_config(&queries, &api);

    assert_eq!(read.fetch().await.unwrap(), json!([]));
    assert_eq!(read.fetch().await.unwrap(), json!([]));
    assert_eq!(config_gets(&server).await, 1);

    let created = create.mutate(json!({ "name": "x" })).await.unwrap();
    assert_eq!(created, json!({ "id": "1", "name": "x" }));
    assert_eq!(create.status(), MutationStatus::Success);
    assert_eq!(queries.get_query_data(CONFIG_QUERY_KEY), None);

    assert_eq!(read.fetch().await.unwrap(), json!([{ "id": "1", "name": "x" }]));
    assert_eq!(config_gets(&server).await, 2);
}

#[tokio::test]
async fn update_destructures_args_and_invalidates() {
    let (server, api, queries) = setup().await;
    mount_config_versions(
        &server,
        json!([{ "id": "42", "name": "old" }]),
        json!([{ "id": "42", "name": "x" }]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/api/config/42"))
        .and(body_json(json!({ "name": "x" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "42", "name": "x" })))
        .expect(1)
        .mount(&server)
        .await;

    let read = use_fetch_config(&queries, &api);
    read.fetch().await.unwrap();

    use_update_config(&queries, &api)
        .mutate(UpdateConfigArgs {
            id: ConfigId::new("42").unwrap(),
            data: json!({ "name": "x" }),
        })
        .await
        .unwrap();

    assert_eq!(read.fetch().await.unwrap(), json!([{ "id": "42", "name": "x" }]));
    assert_eq!(config_gets(&server).await, 2);
}

#[tokio::test]
async fn delete_invalidates_config_reads() {
    let (server, api, queries) = setup().await;
    mount_config_versions(&server, json!([{ "id": "42" }]), json!([])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/config/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let read = use_fetch_config(&queries, &api);
    assert_eq!(read.fetch().await.unwrap(), json!([{ "id": "42" }]));

    let confirmation = use_delete_config(&queries, &api)
        .mutate(ConfigId::new("42").unwrap())
        .await
        .unwrap();
    assert!(confirmation.is_null());

    assert_eq!(read.fetch().await.unwrap(), json!([]));
}

#[tokio::test]
async fn failed_write_keeps_cached_read() {
    let (server, api, queries) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "1" }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(422).set_body_string("name required"))
        .expect(1)
        .mount(&server)
        .await;

    let read = use_fetch_config(&queries, &api);
    read.fetch().await.unwrap();

    let create = use_create_config(&queries, &api);
    let result = create.mutate(json!({})).await;
    assert!(matches!(result, Err(ApiError::Http { status: 422, .. })));
    assert_eq!(create.status(), MutationStatus::Error);

    assert_eq!(read.fetch().await.unwrap(), json!([{ "id": "1" }]));
}

#[tokio::test]
async fn fetch_binding_propagates_failures() {
    let settings = Settings::new("http://127.0.0.1:1/api/").expect("settings");
    let api = ApiClient::new(&settings).expect("client");
    let queries = QueryClient::from_settings(&settings);

    let read = use_fetch_config(&queries, &api);
    assert!(matches!(read.fetch().await, Err(ApiError::Transport { .. })));
    assert_eq!(read.data(), None);

    let delete = use_delete_config(&queries, &api);
    assert!(delete.mutate(ConfigId::from(1)).await.is_err());
    assert_eq!(delete.status(), MutationStatus::Error);
}

#[tokio::test]
async fn stale_reads_are_refetched() {
    let server = MockServer::start().await;
    mount_config_versions(&server, json!({ "v": 1 }), json!({ "v": 2 })).await;

    let settings = Settings::new(format!("{}/api/", server.uri()))
        .expect("settings")
        .with_stale_time(Duration::from_millis(50));
    let api = ApiClient::new(&settings).expect("client");
    let queries = QueryClient::from_settings(&settings);
    let read = use_fetch_config(&queries, &api);

    assert_eq!(read.fetch().await.unwrap(), json!({ "v": 1 }));
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(read.fetch().await.unwrap(), json!({ "v": 2 }));
}
