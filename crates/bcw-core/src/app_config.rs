use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where profile data lives.
///
/// The hosted backend exposes the same tables two ways: through its REST
/// gateway (URL + service key) or as a plain Postgres connection string.
#[derive(Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Rest { url: String, service_key: String },
    Postgres { database_url: String },
}

impl StoreBackend {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            StoreBackend::Rest { .. } => "rest",
            StoreBackend::Postgres { .. } => "postgres",
        }
    }
}

impl std::fmt::Debug for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Rest { url, .. } => f
                .debug_struct("Rest")
                .field("url", url)
                .field("service_key", &"[redacted]")
                .finish(),
            StoreBackend::Postgres { .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"[redacted]")
                .finish(),
        }
    }
}

/// How often each scheduled job fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskIntervals {
    pub verification: Duration,
    pub growth: Duration,
    pub brand_stats: Duration,
    pub campaign_stats: Duration,
}

impl Default for TaskIntervals {
    fn default() -> Self {
        Self {
            verification: Duration::from_secs(10),
            growth: Duration::from_secs(60),
            brand_stats: Duration::from_secs(30),
            campaign_stats: Duration::from_secs(30),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub store: StoreBackend,
    pub webhook_url: Option<String>,
    pub http_timeout_secs: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub db_run_migrations: bool,
    pub intervals: TaskIntervals,
    pub scheduler_tick: Duration,
    pub provider_latency_ms: u64,
    pub provider_reject_marker: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("store", &self.store)
            .field(
                "webhook_url",
                &self.webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("db_run_migrations", &self.db_run_migrations)
            .field("intervals", &self.intervals)
            .field("scheduler_tick", &self.scheduler_tick)
            .field("provider_latency_ms", &self.provider_latency_ms)
            .field("provider_reject_marker", &self.provider_reject_marker)
            .finish()
    }
}
