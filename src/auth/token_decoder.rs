//! Decodes the payload segment of a compact `header.payload.signature` token.
//!
//! The signature is never checked here: the backend owns verification, and
//! the decoded claims are used for UI gating only.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use thiserror::Error;

use crate::models::Claims;

/// base64url (RFC 4648 §5); trailing `=` padding is accepted but not required.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token must have 3 dot-separated segments, found {0}")]
    Segments(usize),
    #[error("token {0} segment is empty")]
    EmptySegment(&'static str),
    #[error("token payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not a valid claims object: {0}")]
    Payload(String),
}

/// Extracts the claims carried in `token` without verifying it.
pub fn decode_claims(token: &str) -> Result<Claims, DecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, _signature] = segments.as_slice() else {
        return Err(DecodeError::Segments(segments.len()));
    };
    if header.is_empty() {
        return Err(DecodeError::EmptySegment("header"));
    }
    if payload.is_empty() {
        return Err(DecodeError::EmptySegment("payload"));
    }

    let bytes = PAYLOAD_ENGINE.decode(payload)?;
    serde_json::from_slice::<Claims>(&bytes).map_err(|e| DecodeError::Payload(e.to_string()))
}
