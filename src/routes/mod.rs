//! Dashboard route table and navigation.
//!
//! Each configured route is either public or guarded by a set of roles.
//! Navigation consults the auth gate for guarded routes and turns a denial
//! into a redirect to the login or access-denied view.

mod navigator;
mod table;

pub use navigator::{Navigation, Navigator};
pub use table::{normalize_path, RouteAccess, RouteTable, RouteTableError};
