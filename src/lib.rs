use std::sync::Arc;

use config::Config;
use services::{BalanceProvider, MockBalanceProvider, RetryPolicy};

pub mod config;
pub mod device;
pub mod error;
pub mod middleware;
pub mod result;
pub mod router;
pub mod routes;
pub mod services;
pub mod utils;
pub mod wallet;

pub use router::create_router;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub balances: Arc<dyn BalanceProvider>,
    pub retry: RetryPolicy,
}

impl AppState {
    /// State backed by the mocked balance service.
    pub fn new(config: Config) -> Self {
        let balances = Arc::new(MockBalanceProvider::new(config.balance_delay()));
        Self {
            config,
            balances,
            retry: RetryPolicy::default(),
        }
    }
}
