// Mocked backend services

pub mod balance;
pub mod retry;

pub use balance::{BalanceProvider, Balances, MockBalanceProvider};
pub use retry::{RequestKind, RetryPolicy, ServiceError};
