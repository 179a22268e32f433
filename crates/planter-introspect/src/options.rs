use std::time::Duration;

/// Options that control how a schema is loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Upper bound on concurrent per-table column loads; also the pool size.
    pub max_concurrency: usize,
    /// How long to wait for a pooled connection.
    pub acquire_timeout: Duration,
}

impl LoadOptions {
    pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Effective concurrency, never below one.
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }

    /// Connection pool size matching the effective concurrency.
    pub fn pool_size(&self) -> u32 {
        u32::try_from(self.concurrency()).unwrap_or(u32::MAX)
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_concurrency: Self::DEFAULT_MAX_CONCURRENCY,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}
