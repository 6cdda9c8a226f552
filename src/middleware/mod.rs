mod auth;
mod device;
mod error_handler;

pub use auth::{AUTH_PAGE, auth_middleware, auth_redirect_target, page_auth};
pub use device::{device_routing, skips_device_routing};
pub use error_handler::log_errors;
