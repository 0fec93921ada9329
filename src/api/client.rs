use crate::error::ApiError;
use crate::storage::settings::Settings;
use crate::utils::error_helpers::{convert_json_error, convert_request_error, convert_status_error};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("nodebot-client/", env!("CARGO_PKG_VERSION"));
const JSON_CONTENT_TYPE: &str = "application/json";

/// A decoded response. `data` is the deserialized body.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Shared HTTP client bound to one base URL.
///
/// Immutable once built; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| convert_request_error(e, "client_init", settings.timeout))?;

        Ok(ApiClient {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout: settings.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url_for(path))
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
    }

    pub async fn get<T>(&self, path: &str) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        self.execute(self.build_request(Method::GET, path), path).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.build_request(Method::POST, path).json(body), path).await
    }

    /// POST without a request body.
    pub async fn post_empty<T>(&self, path: &str) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        self.execute(self.build_request(Method::POST, path), path).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.build_request(Method::PUT, path).json(body), path).await
    }

    pub async fn delete<T>(&self, path: &str) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        self.execute(self.build_request(Method::DELETE, path), path).await
    }

    async fn execute<T>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(endpoint, "sending request");

        let response = request
            .send()
            .await
            .map_err(|e| convert_request_error(e, endpoint, self.timeout))?;

        self.handle_response(response, endpoint).await
    }

    pub async fn handle_response<T>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| convert_request_error(e, endpoint, self.timeout))?;

        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "request failed");
            let message = String::from_utf8_lossy(&body).into_owned();
            return Err(convert_status_error(status.as_u16(), endpoint, message));
        }

        // An empty success body (e.g. 204) decodes as JSON null.
        let data = if body.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_slice::<T>(b"null")
        } else {
            serde_json::from_slice::<T>(&body)
        }
        .map_err(|e| convert_json_error(e, endpoint))?;

        tracing::debug!(endpoint, status = status.as_u16(), "request succeeded");
        Ok(ApiResponse {
            status,
            headers,
            data,
        })
    }
}
