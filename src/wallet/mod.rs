// Client-side wallet session persisted in a cookie

pub mod model;
pub mod storage;
pub mod store;

pub use model::{WalletSession, is_valid_address};
pub use storage::{CookieStorage, MemoryStorage, SessionStorage};
pub use store::{RETENTION, WALLET_SESSION_COOKIE, WalletSessionStore};
