//! Shared application state.
//!
//! Everything a dashboard view needs to talk to the backend and to gate its
//! routes, built once at startup and cheap to clone.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::ConfigV1;
use crate::routes::Navigator;
use crate::store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// The single session store; the gate and the API client both read it.
    pub store: Arc<dyn SessionStore>,
    /// Route table plus auth gate.
    pub navigator: Arc<Navigator>,
    /// Backend client attaching the stored token to each request.
    pub client: Arc<ApiClient>,
}
