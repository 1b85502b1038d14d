pub mod auth;
pub mod response;

pub use auth::{basic_auth_middleware, AuthUser};
pub use response::ApiResponse;
