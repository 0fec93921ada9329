//! Session endpoints.
//!
//! Both calls are pass-through: any token in the response is returned to the
//! caller untouched and nothing is persisted here.

use super::client::ApiClient;
use crate::error::ApiError;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const LOGIN_PATH: &str = "auth/login";
pub const LOGOUT_PATH: &str = "auth/logout";

/// `POST auth/login` with `credentials` as the JSON body.
pub async fn login<C, T>(client: &ApiClient, credentials: &C) -> Result<T, ApiError>
where
    C: Serialize + ?Sized,
    T: DeserializeOwned,
{
    Ok(client.post(LOGIN_PATH, credentials).await?.into_data())
}

/// `POST auth/logout` with no body.
pub async fn logout<T>(client: &ApiClient) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    Ok(client.post_empty(LOGOUT_PATH).await?.into_data())
}
