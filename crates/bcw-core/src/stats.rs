//! Snapshot rows and the simulated growth/activity math behind them.
//!
//! Every aggregate table is an append-only cumulative series: a new row is
//! the previous row's totals plus a non-negative increment, so consecutive
//! rows never decrease.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Simulated views produced by one completed application per cycle.
pub const VIEWS_PER_COMPLETED: RangeInclusive<i64> = 500..=2000;

/// Share of views that turn into likes.
pub const LIKE_RATIO: f64 = 0.10;

/// Organic follower gain per growth cycle.
pub const FOLLOWER_GROWTH: RangeInclusive<i64> = 10..=150;

/// Maximum absolute engagement change per growth cycle.
pub const ENGAGEMENT_DRIFT: f64 = 0.25;

pub const ENGAGEMENT_MIN: f64 = 0.0;
pub const ENGAGEMENT_MAX: f64 = 10.0;

/// A row of `stats_snapshots`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub user_id: Uuid,
    pub followers_count: i64,
    pub engagement_rate: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

/// A row of `brand_campaign_stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCampaignStat {
    pub brand_id: Uuid,
    pub total_views: i64,
    pub total_likes: i64,
    pub active_campaigns_count: i64,
    pub recorded_at: DateTime<Utc>,
}

impl BrandCampaignStat {
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals {
            views: self.total_views,
            likes: self.total_likes,
        }
    }
}

/// A row of `campaign_stats_snapshots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStat {
    pub campaign_id: Uuid,
    pub total_views: i64,
    pub total_likes: i64,
    pub recorded_at: DateTime<Utc>,
}

impl CampaignStat {
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals {
            views: self.total_views,
            likes: self.total_likes,
        }
    }
}

/// Cumulative view/like counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub views: i64,
    pub likes: i64,
}

impl Totals {
    pub const ZERO: Totals = Totals { views: 0, likes: 0 };

    #[must_use]
    pub fn accumulate(self, increment: Totals) -> Totals {
        Totals {
            views: self.views.saturating_add(increment.views.max(0)),
            likes: self.likes.saturating_add(increment.likes.max(0)),
        }
    }
}

/// Likes generated by `views` views, rounded half away from zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn likes_for(views: i64) -> i64 {
    (views as f64 * LIKE_RATIO).round() as i64
}

/// Draw one cycle's activity for `completed` finished applications.
///
/// Zero completed work yields a zero increment.
pub fn draw_activity_increment<R: Rng + ?Sized>(rng: &mut R, completed: u64) -> Totals {
    if completed == 0 {
        return Totals::ZERO;
    }
    let per_job = rng.random_range(VIEWS_PER_COMPLETED);
    let views = i64::try_from(completed)
        .unwrap_or(i64::MAX)
        .saturating_mul(per_job);
    Totals {
        views,
        likes: likes_for(views),
    }
}

/// New follower/engagement values after one growth cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthStep {
    pub followers: i64,
    pub engagement: Option<f64>,
}

/// Apply one cycle of simulated organic growth.
///
/// Followers only ever go up. Engagement drifts within
/// `±ENGAGEMENT_DRIFT`, stays inside `[0, 10]` and is rounded to two
/// decimals; a profile with no engagement figure keeps none.
pub fn draw_growth<R: Rng + ?Sized>(
    rng: &mut R,
    followers: i64,
    engagement: Option<f64>,
) -> GrowthStep {
    let gain = rng.random_range(FOLLOWER_GROWTH);
    let engagement = engagement.map(|current| {
        let drift = rng.random_range(-ENGAGEMENT_DRIFT..=ENGAGEMENT_DRIFT);
        round2((current + drift).clamp(ENGAGEMENT_MIN, ENGAGEMENT_MAX))
    });
    GrowthStep {
        followers: followers.max(0).saturating_add(gain),
        engagement,
    }
}

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
