use serde::{Deserialize, Serialize};

/// Connected wallet as persisted client-side. Timestamps are milliseconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WalletSession {
    pub address: String,
    pub chain_id: u64,
    pub matic_balance: String,
    pub usdt_balance: String,
    pub connected_at: i64,
    pub last_updated: i64,
    pub connector: String,
    pub saved_at: i64,
}

impl WalletSession {
    pub fn new(address: &str, chain_id: u64, connector: &str, now_ms: i64) -> Self {
        Self {
            address: address.to_string(),
            chain_id,
            matic_balance: "0".to_string(),
            usdt_balance: "0".to_string(),
            connected_at: now_ms,
            last_updated: now_ms,
            connector: connector.to_string(),
            saved_at: now_ms,
        }
    }

    pub fn matches_address(&self, address: &str) -> bool {
        self.address.eq_ignore_ascii_case(address)
    }
}

/// `0x` followed by 40 hex digits.
pub fn is_valid_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
