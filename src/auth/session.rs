//! Login and logout: the only writers of the session store besides the
//! gate's clear-on-decode-failure.

use std::fmt;

use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::token_decoder::{decode_claims, DecodeError};
use crate::client::{ApiClient, ApiError};
use crate::models::Claims;
use crate::store::{SessionStore, StoreError};
use crate::utils::http_helpers::bearer_credential;

#[derive(Serialize, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("login response did not contain a token")]
    MissingToken,
    #[error("login returned an unusable token: {0}")]
    InvalidToken(#[from] DecodeError),
    #[error("could not persist session: {0}")]
    Store(#[from] StoreError),
}

/// Exchanges credentials for a token and stores it.
///
/// The token is taken from a JSON `token` field, or failing that from an
/// `Authorization: Bearer` response header. It must decode before anything
/// is written, so a bad response never replaces a working session.
pub async fn login(
    client: &ApiClient,
    store: &dyn SessionStore,
    login_path: &str,
    credentials: &Credentials,
) -> Result<Claims, LoginError> {
    debug!("Logging in as '{}'", credentials.username);
    let response = client
        .send(client.request(Method::POST, login_path).json(credentials))
        .await?;

    let header_token = response
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_credential)
        .map(str::to_string);
    let body = response.text().await.map_err(ApiError::from)?;
    let body_token = serde_json::from_str::<LoginResponse>(&body)
        .ok()
        .and_then(|r| r.token)
        .filter(|t| !t.is_empty());

    let token = body_token.or(header_token).ok_or(LoginError::MissingToken)?;
    let claims = decode_claims(&token)?;
    store.set(&token)?;

    info!(
        "Logged in as '{}' with role {:?}",
        claims.sub.as_deref().unwrap_or(&credentials.username),
        claims.role.as_deref()
    );
    Ok(claims)
}

/// Forgets the current session. Logging out twice is fine.
pub fn logout(store: &dyn SessionStore) -> Result<(), StoreError> {
    store.clear()?;
    info!("Logged out.");
    Ok(())
}
