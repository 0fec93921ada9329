use super::client::ApiClient;
use crate::error::ApiError;
use crate::utils::validation::validate_path_segment;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CONFIG_PATH: &str = "config";

/// Identifier of a config record, safe to splice into `config/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfigId(String);

impl ConfigId {
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        validate_path_segment(&id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn path(&self) -> String {
        format!("{}/{}", CONFIG_PATH, self.0)
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ConfigId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ConfigId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfigId> for String {
    fn from(id: ConfigId) -> Self {
        id.0
    }
}

impl From<u64> for ConfigId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// `GET config`
pub async fn fetch_config<T>(client: &ApiClient) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    Ok(client.get(CONFIG_PATH).await?.into_data())
}

/// `POST config`
pub async fn create_config<B, T>(client: &ApiClient, data: &B) -> Result<T, ApiError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    Ok(client.post(CONFIG_PATH, data).await?.into_data())
}

/// `PUT config/{id}`
pub async fn update_config<B, T>(client: &ApiClient, id: &ConfigId, data: &B) -> Result<T, ApiError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    Ok(client.put(&id.path(), data).await?.into_data())
}

/// `DELETE config/{id}`
pub async fn delete_config<T>(client: &ApiClient, id: &ConfigId) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    Ok(client.delete(&id.path()).await?.into_data())
}
