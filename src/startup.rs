//! Builds the application state from configuration.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::auth::AuthGate;
use crate::client::{ApiClient, ApiError};
use crate::config::ConfigV1;
use crate::routes::{Navigator, RouteTable, RouteTableError};
use crate::state::AppState;
use crate::store::create_store;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid route table: {0}")]
    Routes(#[from] RouteTableError),
    #[error("could not create API client: {0}")]
    Client(#[from] ApiError),
}

/// Wires the session store into the gate, the navigator and the API client.
/// All three share the same store instance.
pub fn build_state(config: Arc<ConfigV1>) -> Result<AppState, StartupError> {
    let store = create_store(&config.session_store);
    let gate = Arc::new(AuthGate::new(store.clone(), &config.auth));
    let table = RouteTable::from_config(&config.routes, &config.redirects, gate.roles())?;
    info!("Loaded {} routes.", table.len());

    let navigator = Arc::new(Navigator::new(table, gate, config.redirects.clone()));
    let client = Arc::new(ApiClient::new(&config.api, store.clone())?);
    info!("API client targeting {}", config.api.base_url);

    Ok(AppState {
        config,
        store,
        navigator,
        client,
    })
}
