use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tokio::time::timeout;
use uuid::Uuid;

use super::error::{extract_message, ApiError};
use super::gateway::ApiGateway;
use crate::config::ApiConfig;

/// [`ApiGateway`] over HTTP with reqwest.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpGateway {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(config.timeout_seconds.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>, ApiError> {
        let result = timeout(self.request_timeout, self.do_send(method, path, body)).await;

        match result {
            Ok(response) => response,
            Err(_) => Err(ApiError::RequestTimeout {
                duration: self.request_timeout.as_secs(),
            }),
        }
    }

    async fn do_send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>, ApiError> {
        let url = self.url(path);
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&body)?);
        }

        let response = builder.send().await.map_err(|e| ApiError::Connection {
            url: url.clone(),
            source: e,
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| ApiError::Connection {
            url: url.clone(),
            source: e,
        })?;

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            url = %url,
            status = status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Gateway response"
        );

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: extract_message(&bytes),
            });
        }

        if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn send_expecting_body(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        self.send(method, path, body)
            .await?
            .ok_or_else(|| ApiError::EmptyBody {
                path: path.to_string(),
            })
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send_expecting_body(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.send_expecting_body(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.send_expecting_body(Method::PUT, path, Some(body)).await
    }

    async fn patch(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.send_expecting_body(Method::PATCH, path, body).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None).await.map(|_| ())
    }
}
