//! Social metrics lookup.
//!
//! There is no real Instagram integration. [`SimulatedInstagram`] stands in
//! for one with random plausible figures and an artificial delay.

use std::ops::RangeInclusive;
use std::time::Duration;

use async_trait::async_trait;
use bcw_core::stats::round2;
use rand::Rng;
use thiserror::Error;

pub const FOLLOWERS_RANGE: RangeInclusive<i64> = 1_000..=50_000;
pub const ENGAGEMENT_RANGE: RangeInclusive<f64> = 1.5..=8.5;

/// Public figures for one social account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocialMetrics {
    pub followers: i64,
    pub engagement_rate: f64,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("metrics lookup for {handle} failed: {reason}")]
    Lookup { handle: String, reason: String },
}

#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Look up `handle`. `Ok(None)` means the account does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the lookup itself could not be made.
    async fn lookup(&self, handle: &str) -> Result<Option<SocialMetrics>, ProviderError>;
}

/// Randomised stand-in for the Instagram API.
#[derive(Debug, Clone)]
pub struct SimulatedInstagram {
    latency: Duration,
    reject_marker: String,
}

impl SimulatedInstagram {
    /// `reject_marker` is matched case-insensitively; an empty marker
    /// rejects nothing.
    pub fn new(latency: Duration, reject_marker: impl Into<String>) -> Self {
        Self {
            latency,
            reject_marker: reject_marker.into().to_lowercase(),
        }
    }

    fn rejects(&self, handle: &str) -> bool {
        !self.reject_marker.is_empty() && handle.to_lowercase().contains(&self.reject_marker)
    }
}

#[async_trait]
impl MetricsProvider for SimulatedInstagram {
    async fn lookup(&self, handle: &str) -> Result<Option<SocialMetrics>, ProviderError> {
        tracing::debug!(handle, "provider: querying simulated instagram");
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.rejects(handle) {
            return Ok(None);
        }

        let mut rng = rand::rng();
        Ok(Some(SocialMetrics {
            followers: rng.random_range(FOLLOWERS_RANGE),
            engagement_rate: round2(rng.random_range(ENGAGEMENT_RANGE)),
        }))
    }
}
