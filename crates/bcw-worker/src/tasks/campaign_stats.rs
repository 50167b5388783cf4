//! Per-campaign aggregation.
//!
//! Unlike the brand pass this writes a row for every campaign every cycle,
//! copying the previous totals when nothing completed, so each campaign's
//! series has no gaps.

use bcw_core::{draw_activity_increment, Campaign, CampaignStat, Totals};
use chrono::Utc;

use super::brand_stats::AggregationReport;
use crate::context::WorkerContext;
use crate::store::StoreError;

/// Append one cumulative snapshot per campaign.
///
/// # Errors
///
/// Returns [`StoreError`] if campaigns cannot be listed.
pub async fn run(ctx: &WorkerContext) -> Result<AggregationReport, StoreError> {
    let campaigns = ctx.store.list_campaigns().await?;
    let mut report = AggregationReport::default();

    for campaign in &campaigns {
        match aggregate_campaign(ctx, campaign).await {
            Ok(stat) => {
                tracing::debug!(
                    campaign_id = %campaign.id,
                    total_views = stat.total_views,
                    total_likes = stat.total_likes,
                    "campaign_stats: snapshot written"
                );
                report.written += 1;
            }
            Err(e) => {
                tracing::error!(
                    campaign_id = %campaign.id,
                    error = %e,
                    "campaign_stats: aggregation failed; continuing with next"
                );
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        campaigns = campaigns.len(),
        written = report.written,
        failed = report.failed,
        "campaign_stats: cycle complete"
    );
    Ok(report)
}

async fn aggregate_campaign(
    ctx: &WorkerContext,
    campaign: &Campaign,
) -> Result<CampaignStat, StoreError> {
    let completed = ctx
        .store
        .count_completed_applications(&[campaign.id])
        .await?;
    let previous = ctx
        .store
        .latest_campaign_stat(campaign.id)
        .await?
        .map_or(Totals::ZERO, |s| s.totals());
    let totals = previous.accumulate(draw_activity_increment(&mut rand::rng(), completed));

    let stat = CampaignStat {
        campaign_id: campaign.id,
        total_views: totals.views,
        total_likes: totals.likes,
        recorded_at: Utc::now(),
    };
    ctx.store.insert_campaign_stat(&stat).await?;
    Ok(stat)
}
