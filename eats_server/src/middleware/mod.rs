mod acl;
mod jwt;

pub use acl::{AclMiddlewareFactory, AclMiddlewareService};
pub use jwt::{access_token_from_request, JwtAuthFactory, JwtAuthService};
