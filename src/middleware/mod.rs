pub mod auth;
pub mod response;

pub use auth::{basic_auth_middleware, AuthAccount};
pub use response::{ApiResponse, ApiResult};
