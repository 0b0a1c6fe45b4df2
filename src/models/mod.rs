pub mod claims;
pub mod route;

pub use claims::{Claims, Role, RoleRegistry};
pub use route::RouteGuardSpec;
