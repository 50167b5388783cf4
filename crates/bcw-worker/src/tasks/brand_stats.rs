//! Brand-level campaign aggregation.
//!
//! For each brand, completed applications across all of its campaigns drive
//! a simulated views/likes increment that is added onto the brand's last
//! cumulative snapshot. Brands with no completed work get no row that cycle.

use bcw_core::{draw_activity_increment, BrandCampaignStat, Profile, Role, Totals};
use chrono::Utc;
use uuid::Uuid;

use super::count_i64;
use crate::context::WorkerContext;
use crate::store::StoreError;

/// Outcome of one aggregation pass (brand or campaign level).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationReport {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Append one cumulative snapshot per brand that has completed applications.
///
/// # Errors
///
/// Returns [`StoreError`] if brand profiles cannot be listed.
pub async fn run(ctx: &WorkerContext) -> Result<AggregationReport, StoreError> {
    let brands = ctx.store.list_profiles_by_role(Role::Brand).await?;
    let mut report = AggregationReport::default();

    for brand in &brands {
        match aggregate_brand(ctx, brand).await {
            Ok(Some(stat)) => {
                tracing::info!(
                    brand_id = %brand.id,
                    total_views = stat.total_views,
                    total_likes = stat.total_likes,
                    active_campaigns = stat.active_campaigns_count,
                    "brand_stats: snapshot written"
                );
                report.written += 1;
            }
            Ok(None) => report.skipped += 1,
            Err(e) => {
                tracing::error!(
                    brand_id = %brand.id,
                    error = %e,
                    "brand_stats: aggregation failed; continuing with next"
                );
                report.failed += 1;
            }
        }
    }

    tracing::debug!(
        brands = brands.len(),
        written = report.written,
        "brand_stats: cycle complete"
    );
    Ok(report)
}

async fn aggregate_brand(
    ctx: &WorkerContext,
    brand: &Profile,
) -> Result<Option<BrandCampaignStat>, StoreError> {
    let campaigns = ctx.store.list_campaigns_for_brand(brand.id).await?;
    let campaign_ids: Vec<Uuid> = campaigns.iter().map(|c| c.id).collect();

    let completed = ctx
        .store
        .count_completed_applications(&campaign_ids)
        .await?;
    if completed == 0 {
        return Ok(None);
    }

    let previous = ctx
        .store
        .latest_brand_stat(brand.id)
        .await?
        .map_or(Totals::ZERO, |s| s.totals());
    let increment = draw_activity_increment(&mut rand::rng(), completed);
    let totals = previous.accumulate(increment);

    let stat = BrandCampaignStat {
        brand_id: brand.id,
        total_views: totals.views,
        total_likes: totals.likes,
        active_campaigns_count: count_i64(campaigns.len()),
        recorded_at: Utc::now(),
    };
    ctx.store.insert_brand_stat(&stat).await?;
    Ok(Some(stat))
}
