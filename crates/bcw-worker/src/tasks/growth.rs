//! Simulated organic growth for verified influencers.

use bcw_core::{draw_growth, Profile, StatsSnapshot};
use chrono::Utc;

use crate::context::WorkerContext;
use crate::store::StoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthReport {
    pub updated: usize,
    pub failed: usize,
}

/// Grow every verified influencer once and append a snapshot for each.
///
/// # Errors
///
/// Returns [`StoreError`] if the verified influencers cannot be listed.
pub async fn run(ctx: &WorkerContext) -> Result<GrowthReport, StoreError> {
    let influencers = ctx.store.list_verified_influencers().await?;
    let mut report = GrowthReport::default();

    if influencers.is_empty() {
        tracing::debug!("growth: no verified influencers");
        return Ok(report);
    }

    for profile in &influencers {
        match grow(ctx, profile).await {
            Ok(()) => report.updated += 1,
            Err(e) => {
                tracing::error!(
                    user_id = %profile.id,
                    error = %e,
                    "growth: update failed; continuing with next"
                );
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        updated = report.updated,
        failed = report.failed,
        "growth: cycle complete"
    );
    Ok(report)
}

async fn grow(ctx: &WorkerContext, profile: &Profile) -> Result<(), StoreError> {
    let step = draw_growth(
        &mut rand::rng(),
        profile.followers(),
        profile.engagement_rate,
    );

    ctx.store
        .update_metrics(profile.id, step.followers, step.engagement)
        .await?;
    ctx.store
        .insert_stats_snapshot(&StatsSnapshot {
            user_id: profile.id,
            followers_count: step.followers,
            engagement_rate: step.engagement,
            recorded_at: Utc::now(),
        })
        .await?;

    tracing::debug!(
        user_id = %profile.id,
        followers = step.followers,
        engagement = ?step.engagement,
        "growth: profile updated"
    );
    Ok(())
}
