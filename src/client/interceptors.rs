use std::sync::Arc;

use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Request;
use tracing::debug;

use super::errors::ApiError;
use crate::store::SessionStore;

/// A hook that may rewrite an outbound request just before it is sent.
pub trait Interceptor: Send + Sync {
    fn name(&self) -> &str;
    fn intercept(&self, request: &mut Request) -> Result<(), ApiError>;
}

/// Attaches `Authorization: Bearer <token>` when a session is stored.
///
/// The store is read on every request, never at construction, so a login
/// that happens after the client exists is picked up by the next request.
pub struct BearerInterceptor {
    store: Arc<dyn SessionStore>,
}

impl BearerInterceptor {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        BearerInterceptor { store }
    }
}

impl Interceptor for BearerInterceptor {
    fn name(&self) -> &str {
        "bearer"
    }

    fn intercept(&self, request: &mut Request) -> Result<(), ApiError> {
        match self.store.get() {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                    ApiError::InvalidRequest(
                        "stored session token is not a valid header value".to_string(),
                    )
                })?;
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            None => {
                debug!("No session token; sending {} unauthenticated.", request.url());
                request.headers_mut().remove(AUTHORIZATION);
            }
        }
        Ok(())
    }
}

/// Tags each request with a fresh `X-Request-Id` for backend correlation.
#[derive(Default)]
pub struct RequestIdInterceptor;

impl RequestIdInterceptor {
    pub const HEADER: &'static str = "x-request-id";
}

impl Interceptor for RequestIdInterceptor {
    fn name(&self) -> &str {
        "request-id"
    }

    fn intercept(&self, request: &mut Request) -> Result<(), ApiError> {
        let id = uuid::Uuid::new_v4().to_string();
        let value = HeaderValue::from_str(&id)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        request
            .headers_mut()
            .insert(HeaderName::from_static(Self::HEADER), value);
        Ok(())
    }
}
