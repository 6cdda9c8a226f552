use std::time::Duration;

use chrono::Utc;

use super::model::{WalletSession, is_valid_address};
use super::storage::SessionStorage;

pub const WALLET_SESSION_COOKIE: &str = "web3-wallet-session";
pub const RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const RETENTION_MS: i64 = RETENTION.as_millis() as i64;

/// The single wallet session of one client. Last write wins.
pub struct WalletSessionStore<S> {
    storage: S,
}

impl<S: SessionStorage> WalletSessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn save(&mut self, session: WalletSession) -> Result<WalletSession, serde_json::Error> {
        self.save_at(session, Utc::now().timestamp_millis())
    }

    pub fn save_at(
        &mut self,
        mut session: WalletSession,
        now_ms: i64,
    ) -> Result<WalletSession, serde_json::Error> {
        session.saved_at = now_ms;
        let json = serde_json::to_string(&session)?;
        self.storage.set(WALLET_SESSION_COOKIE, json, RETENTION);
        Ok(session)
    }

    pub fn load(&mut self) -> Option<WalletSession> {
        self.load_at(Utc::now().timestamp_millis())
    }

    /// Corrupt, malformed or stale records are cleared and reported as absent.
    pub fn load_at(&mut self, now_ms: i64) -> Option<WalletSession> {
        let raw = self.storage.get(WALLET_SESSION_COOKIE)?;

        let session = match serde_json::from_str::<WalletSession>(&raw) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Discarding unreadable wallet session: {}", e);
                self.clear();
                return None;
            }
        };

        if !is_valid_address(&session.address) {
            tracing::warn!("Discarding wallet session with malformed address");
            self.clear();
            return None;
        }

        // savedAt is client-controlled: overflowing or future stamps count as corrupt.
        match now_ms.checked_sub(session.saved_at) {
            Some(age) if age < 0 => {
                tracing::warn!("Discarding wallet session saved in the future");
                self.clear();
                return None;
            }
            Some(age) if age > RETENTION_MS => {
                tracing::debug!("Wallet session for {} expired", session.address);
                self.clear();
                return None;
            }
            Some(_) => {}
            None => {
                tracing::warn!("Discarding wallet session with unusable savedAt");
                self.clear();
                return None;
            }
        }

        Some(session)
    }

    pub fn clear(&mut self) {
        self.storage.remove(WALLET_SESSION_COOKIE);
    }

    pub fn validate(&mut self, address: Option<&str>, chain_id: Option<u64>) -> bool {
        self.validate_at(address, chain_id, Utc::now().timestamp_millis())
    }

    pub fn validate_at(&mut self, address: Option<&str>, chain_id: Option<u64>, now_ms: i64) -> bool {
        let Some(mut session) = self.load_at(now_ms) else {
            return false;
        };

        if let Some(address) = address {
            if !session.matches_address(address) {
                tracing::info!("Wallet address changed, clearing session");
                self.clear();
                return false;
            }
        }

        if let Some(chain_id) = chain_id {
            if chain_id != session.chain_id {
                tracing::info!(
                    "Wallet {} switched chain {} -> {}",
                    session.address,
                    session.chain_id,
                    chain_id
                );
                session.chain_id = chain_id;
                session.last_updated = now_ms;
                if let Err(e) = self.save_at(session, now_ms) {
                    tracing::error!("Failed to persist chain switch: {}", e);
                    return false;
                }
            }
        }

        true
    }

    /// Balance refresh. Returns the updated session, or `None` when nothing is stored.
    pub fn update_balances(&mut self, matic: &str, usdt: &str) -> Option<WalletSession> {
        self.update_balances_at(matic, usdt, Utc::now().timestamp_millis())
    }

    pub fn update_balances_at(
        &mut self,
        matic: &str,
        usdt: &str,
        now_ms: i64,
    ) -> Option<WalletSession> {
        let mut session = self.load_at(now_ms)?;
        session.matic_balance = matic.to_string();
        session.usdt_balance = usdt.to_string();
        session.last_updated = now_ms;
        match self.save_at(session, now_ms) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::error!("Failed to persist balance refresh: {}", e);
                None
            }
        }
    }
}
