//! Client-side session gating: token decoding, the per-route gate, and the
//! login/logout flow.

pub mod gate;
pub mod session;
pub mod token_decoder;

pub use gate::{AuthGate, DenialReason};
pub use session::{login, logout, Credentials, LoginError};
pub use token_decoder::{decode_claims, DecodeError};
