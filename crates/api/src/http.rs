use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::metrics::{Metrics, MetricsSnapshot, Outcome, TimedOperation};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Decorates every outgoing request, e.g. to inject auth headers.
pub trait RequestHook: Send + Sync {
    fn on_request(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Adds `Authorization: Bearer <token>`.
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl RequestHook for BearerAuth {
    fn on_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

/// The single configured HTTP client every domain module goes through.
///
/// Failures are logged here, once, before the error is returned. Callers
/// should display them but not log them again.
pub struct ApiClient {
    config: ClientConfig,
    http: reqwest::Client,
    hooks: Vec<Arc<dyn RequestHook>>,
    metrics: Metrics,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Request(format!("failed to build HTTP client: {e}")))?;

        let mut hooks: Vec<Arc<dyn RequestHook>> = Vec::new();
        if let Some(token) = &config.api_token {
            hooks.push(Arc::new(BearerAuth::new(token.clone())));
        }

        debug!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "API client created");

        Ok(Self {
            config,
            http,
            hooks,
            metrics: Metrics::new(),
        })
    }

    pub fn with_hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Explicit end of life; returns the final request counters.
    pub fn dispose(self) -> MetricsSnapshot {
        let snapshot = self.metrics.snapshot();
        debug!(
            total_requests = snapshot.total_requests,
            failed_requests = snapshot.failed_requests,
            "API client disposed"
        );
        snapshot
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse<T>> {
        let mut request = self.http.get(self.config.url_for(path));
        if !params.is_empty() {
            request = request.query(params);
        }
        self.send(Method::GET, path, request).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.config.url_for(path)).json(body);
        self.send(Method::POST, path, request).await
    }

    /// POST without a body, for trigger-style endpoints.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        let request = self.http.post(self.config.url_for(path));
        self.send(Method::POST, path, request).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<ApiResponse<T>> {
        let request = self.http.post(self.config.url_for(path)).multipart(form);
        self.send(Method::POST, path, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        mut request: RequestBuilder,
    ) -> Result<ApiResponse<T>> {
        let request_id = Uuid::new_v4().to_string();
        request = request.header(REQUEST_ID_HEADER, &request_id);
        for hook in &self.hooks {
            request = hook.on_request(request);
        }

        let timer = TimedOperation::start();
        let result = self.execute(request).await;
        let elapsed = timer.elapsed();

        match result {
            Ok(response) => {
                self.metrics.record(elapsed, Outcome::Success);
                debug!(
                    %method,
                    path,
                    status = response.status,
                    request_id = %request_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "request succeeded"
                );
                Ok(response)
            }
            Err(err) => {
                let outcome = if err.is_transport() {
                    Outcome::TransportFailure
                } else {
                    Outcome::Failure
                };
                self.metrics.record(elapsed, outcome);
                error!(
                    %method,
                    path,
                    status = ?err.status(),
                    request_id = %request_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %err,
                    "request failed"
                );
                Err(err)
            }
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<ApiResponse<T>> {
        let response = request.send().await.map_err(ApiError::transport)?;
        let status = response.status();
        let raw = response.text().await.map_err(ApiError::transport)?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, raw));
        }

        decode_body(status.as_u16(), raw).map(|data| ApiResponse {
            status: status.as_u16(),
            data,
        })
    }
}

/// Decode a 2xx body, surfacing in-band `{"error": "..."}` payloads as errors.
fn decode_body<T: DeserializeOwned>(status: u16, raw: String) -> Result<T> {
    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            return Err(ApiError::Decode {
                status,
                message: format!("response is not JSON: {e}"),
                raw,
            });
        }
    };

    if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
        return Err(ApiError::Backend {
            status,
            message: message.to_string(),
            raw,
        });
    }

    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        status,
        message: e.to_string(),
        raw,
    })
}
