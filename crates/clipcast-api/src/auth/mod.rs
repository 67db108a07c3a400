//! Bearer-token authentication: JWT issue/verify and the request extractor.

pub mod extract;
pub mod jwt;

pub use extract::AuthContext;
pub use jwt::{issue_token, verify_token, Claims};
