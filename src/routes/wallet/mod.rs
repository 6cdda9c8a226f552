mod handler;
mod model;

pub use handler::{connect, disconnect, refresh, session, validate};
pub use model::{ConnectRequest, ValidateRequest, ValidateResponse};
