//! Append-only snapshot tables: `stats_snapshots`, `brand_campaign_stats`
//! and `campaign_stats_snapshots`.
//!
//! Rows are only ever inserted; nothing here updates or deletes.

use bcw_core::{BrandCampaignStat, CampaignStat, StatsSnapshot};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `brand_campaign_stats` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandCampaignStatRow {
    pub brand_id: Uuid,
    pub total_views: i64,
    pub total_likes: i64,
    pub active_campaigns_count: i64,
    pub recorded_at: DateTime<Utc>,
}

impl From<BrandCampaignStatRow> for BrandCampaignStat {
    fn from(row: BrandCampaignStatRow) -> Self {
        BrandCampaignStat {
            brand_id: row.brand_id,
            total_views: row.total_views,
            total_likes: row.total_likes,
            active_campaigns_count: row.active_campaigns_count,
            recorded_at: row.recorded_at,
        }
    }
}

/// A row from the `campaign_stats_snapshots` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignStatRow {
    pub campaign_id: Uuid,
    pub total_views: i64,
    pub total_likes: i64,
    pub recorded_at: DateTime<Utc>,
}

impl From<CampaignStatRow> for CampaignStat {
    fn from(row: CampaignStatRow) -> Self {
        CampaignStat {
            campaign_id: row.campaign_id,
            total_views: row.total_views,
            total_likes: row.total_likes,
            recorded_at: row.recorded_at,
        }
    }
}

// ---------------------------------------------------------------------------
// stats_snapshots
// ---------------------------------------------------------------------------

/// Appends a follower/engagement snapshot for one profile.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_stats_snapshot(pool: &PgPool, snapshot: &StatsSnapshot) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO stats_snapshots (user_id, followers_count, engagement_rate, recorded_at) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(snapshot.user_id)
    .bind(snapshot.followers_count)
    .bind(snapshot.engagement_rate)
    .bind(snapshot.recorded_at)
    .execute(pool)
    .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// brand_campaign_stats
// ---------------------------------------------------------------------------

/// Returns the most recent brand-level snapshot, or `None` if the brand has none.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_brand_campaign_stat(
    pool: &PgPool,
    brand_id: Uuid,
) -> Result<Option<BrandCampaignStatRow>, DbError> {
    let row = sqlx::query_as::<_, BrandCampaignStatRow>(
        "SELECT brand_id, total_views, total_likes, active_campaigns_count, recorded_at \
         FROM brand_campaign_stats \
         WHERE brand_id = $1 \
         ORDER BY recorded_at DESC \
         LIMIT 1",
    )
    .bind(brand_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Appends a cumulative brand-level snapshot.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_brand_campaign_stat(
    pool: &PgPool,
    stat: &BrandCampaignStat,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO brand_campaign_stats \
           (brand_id, total_views, total_likes, active_campaigns_count, recorded_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(stat.brand_id)
    .bind(stat.total_views)
    .bind(stat.total_likes)
    .bind(stat.active_campaigns_count)
    .bind(stat.recorded_at)
    .execute(pool)
    .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// campaign_stats_snapshots
// ---------------------------------------------------------------------------

/// Returns the most recent snapshot for one campaign, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_campaign_stat(
    pool: &PgPool,
    campaign_id: Uuid,
) -> Result<Option<CampaignStatRow>, DbError> {
    let row = sqlx::query_as::<_, CampaignStatRow>(
        "SELECT campaign_id, total_views, total_likes, recorded_at \
         FROM campaign_stats_snapshots \
         WHERE campaign_id = $1 \
         ORDER BY recorded_at DESC \
         LIMIT 1",
    )
    .bind(campaign_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Appends a cumulative per-campaign snapshot.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_campaign_stat(pool: &PgPool, stat: &CampaignStat) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO campaign_stats_snapshots (campaign_id, total_views, total_likes, recorded_at) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(stat.campaign_id)
    .bind(stat.total_views)
    .bind(stat.total_likes)
    .bind(stat.recorded_at)
    .execute(pool)
    .await?;
    Ok(())
}
