use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::env;

use crate::error::{Result, StoreError};

const DEFAULT_BASE_URL: &str = "http://localhost:3000/webwork3/api/";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Deserialize, Debug)]
struct ResponseError {
    message: String,
}

/// JSON client for the course REST API. Paths are relative to `base_url`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &ApiConfig) -> Result<Self> {
        let mut raw = config.base_url.trim().to_string();
        // Url::join drops the last segment unless the base ends with '/'
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(|e| StoreError::Config(format!("{raw}: {e}")))?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| StoreError::Config(format!("{path}: {e}")))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        send(self.http.get(url)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path)?;
        send(self.http.post(url).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path)?;
        send(self.http.put(url).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        send(self.http.delete(url)).await
    }
}

async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
    let res = req.send().await?;
    let status = res.status();
    if status.is_success() {
        return Ok(res.json::<T>().await?);
    }

    let url = res.url().clone();
    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ResponseError>(&body)
        .map(|e| e.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
    tracing::error!(%status, %url, %message, "api request failed");
    Err(StoreError::Api { status, message })
}
