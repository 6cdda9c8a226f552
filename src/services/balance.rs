use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::retry::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    pub matic_balance: String,
    pub usdt_balance: String,
}

#[async_trait]
pub trait BalanceProvider: Send + Sync {
    async fn balances(&self, address: &str, chain_id: u64) -> Result<Balances, ServiceError>;
}

/// Stand-in for the wallet balance backend: fixed balances after an artificial delay.
#[derive(Debug, Clone)]
pub struct MockBalanceProvider {
    delay: Duration,
}

impl MockBalanceProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl BalanceProvider for MockBalanceProvider {
    async fn balances(&self, address: &str, chain_id: u64) -> Result<Balances, ServiceError> {
        tracing::debug!("Mock balance lookup for {} on chain {}", address, chain_id);
        tokio::time::sleep(self.delay).await;
        Ok(Balances {
            matic_balance: "12.3456".to_string(),
            usdt_balance: "250.00".to_string(),
        })
    }
}
