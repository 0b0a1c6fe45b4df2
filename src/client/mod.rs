//! Outbound HTTP access to the dashboard backend.
//!
//! Every request passes through the configured interceptors right before it
//! is sent, which is where the session token is attached.

pub mod api_client;
pub mod errors;
pub mod interceptors;

pub use api_client::ApiClient;
pub use errors::ApiError;
pub use interceptors::{BearerInterceptor, Interceptor, RequestIdInterceptor};
