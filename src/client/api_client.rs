use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::errors::ApiError;
use super::interceptors::{BearerInterceptor, Interceptor, RequestIdInterceptor};
use crate::config::ApiConfig;
use crate::store::SessionStore;
use crate::utils::http_helpers::{build_url, sanitize_body};

/// JSON client for the dashboard backend.
///
/// Built once and shared; the session token is resolved per request by the
/// bearer interceptor. There is no retry and no token refresh: a rejected
/// token comes back to the caller as `ApiError::RemoteRejection`.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_in_ms))
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        let mut interceptors: Vec<Box<dyn Interceptor>> =
            vec![Box::new(BearerInterceptor::new(store))];
        if config.request_id {
            interceptors.push(Box::new(RequestIdInterceptor));
        }

        Ok(ApiClient {
            http,
            base_url: config.base_url.clone(),
            interceptors,
        })
    }

    /// Appends an interceptor; it runs after the built-in ones.
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    pub fn url(&self, path: &str) -> String {
        build_url(&self.base_url, path)
    }

    /// Starts a request against `path` relative to the configured base URL.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Runs the interceptors, sends the request and turns non-2xx statuses
    /// into `ApiError::RemoteRejection`.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let mut request = builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        for interceptor in &self.interceptors {
            trace!("Applying '{}' interceptor.", interceptor.name());
            interceptor.intercept(&mut request)?;
        }

        let method = request.method().clone();
        let url = request.url().clone();
        debug!("Sending {} {}", method, url);

        let response = self.http.execute(request).await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            ApiError::from(e)
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        debug!("{} {} rejected with status {}", method, url, status);
        Err(ApiError::RemoteRejection {
            status,
            message: sanitize_body(&body),
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode_json(response).await
    }

    /// Posts JSON and ignores any response body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, path).json(body))
            .await
            .map(|_| ())
    }

    pub async fn post_json_response<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        decode_json(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path))
            .await
            .map(|_| ())
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
