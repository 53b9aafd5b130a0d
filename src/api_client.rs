//! api_client.rs
//!
//! Тонкая обертка над `reqwest` для HTTP API кинотеатра.
//!
//! Все запросы уходят с `Content-Type: application/json`, авторизованные - с заголовком
//! `Authorization: Bearer <token>`. Ответ вне диапазона 2xx превращается в
//! [`ApiError::Status`], где сообщением служит тело ответа (или "API error", если тело пустое).

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ApiConfig;

/// Ошибки обращения к API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Сервер ответил кодом вне 2xx.
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    /// Сеть, таймаут, сборка клиента.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// Тело ответа не совпало с ожидаемой структурой.
    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Клиент HTTP API кинотеатра.
#[derive(Clone, Debug)]
pub struct ApiClient {
    /// Базовый URL без завершающего `/`, например `http://localhost:3000/api`.
    base_url: String,
    http_client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Duration::from_secs(config.request_timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<(), T>(Method::GET, path, None, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body), token).await
    }

    async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut builder = self
            .http_client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.is_empty() {
                "API error".to_string()
            } else {
                text
            };
            warn!("{} {} failed with {}: {}", method, url, status, message);
            return Err(ApiError::Status { status, message });
        }

        response.json::<T>().await.map_err(ApiError::Decode)
    }
}
