//! Database operations for `campaigns` and `applications`.

use bcw_core::Campaign;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `campaigns` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignRow {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
}

impl From<CampaignRow> for Campaign {
    fn from(row: CampaignRow) -> Self {
        Campaign {
            id: row.id,
            brand_id: row.brand_id,
            title: row.title,
        }
    }
}

/// Returns every campaign.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_campaigns(pool: &PgPool) -> Result<Vec<CampaignRow>, DbError> {
    let rows = sqlx::query_as::<_, CampaignRow>(
        "SELECT id, brand_id, title FROM campaigns ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the campaigns owned by one brand.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_campaigns_for_brand(
    pool: &PgPool,
    brand_id: Uuid,
) -> Result<Vec<CampaignRow>, DbError> {
    let rows = sqlx::query_as::<_, CampaignRow>(
        "SELECT id, brand_id, title FROM campaigns WHERE brand_id = $1 ORDER BY id",
    )
    .bind(brand_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Counts applications with status `completed` across the given campaigns.
///
/// An empty campaign list short-circuits to zero without a round trip.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_completed_applications(
    pool: &PgPool,
    campaign_ids: &[Uuid],
) -> Result<u64, DbError> {
    if campaign_ids.is_empty() {
        return Ok(0);
    }

    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM applications \
         WHERE campaign_id = ANY($1) AND status = 'completed'",
    )
    .bind(campaign_ids)
    .fetch_one(pool)
    .await?;

    Ok(u64::try_from(count).unwrap_or(0))
}
