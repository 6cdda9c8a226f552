use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("connection interrupted: {0}")]
    ConnectionInterrupted(String),
    #[error("{0}")]
    Failed(String),
}

impl ServiceError {
    pub fn is_connection_interrupted(&self) -> bool {
        match self {
            ServiceError::ConnectionInterrupted(_) => true,
            ServiceError::Failed(message) => message
                .to_ascii_lowercase()
                .contains("connection interrupted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Query,
    Mutation,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub query_retries: u32,
    pub mutation_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            query_retries: 3,
            mutation_retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// `failures` counts the attempts that have failed so far, including this one.
    pub fn should_retry(&self, kind: RequestKind, failures: u32, error: &ServiceError) -> bool {
        if error.is_connection_interrupted() {
            return false;
        }
        let limit = match kind {
            RequestKind::Query => self.query_retries,
            RequestKind::Mutation => self.mutation_retries,
        };
        failures <= limit
    }

    pub fn backoff(&self, failures: u32) -> Duration {
        let factor = 2u32.saturating_pow(failures.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    pub async fn run<T, F, Fut>(&self, kind: RequestKind, mut op: F) -> Result<T, ServiceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let mut failures = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    failures += 1;
                    if !self.should_retry(kind, failures, &e) {
                        tracing::error!("{:?} failed after {} attempt(s): {}", kind, failures, e);
                        return Err(e);
                    }
                    let delay = self.backoff(failures);
                    tracing::warn!("{:?} failed ({}), retrying in {:?}", kind, e, delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
