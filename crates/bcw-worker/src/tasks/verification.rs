//! Verification of new signups.
//!
//! Brands are trusted and verified outright. Influencers need a social
//! handle that the metrics provider recognises; on success their first
//! metrics and an initial snapshot are written. The store write always
//! happens before the notification.

use bcw_core::{resolve_handle, Profile, Role, StatsSnapshot};
use bcw_notify::notify_best_effort;
use chrono::Utc;

use super::{messages, RecordError};
use crate::context::WorkerContext;
use crate::store::StoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub scanned: usize,
    pub verified: usize,
    /// Unknown role, or an influencer with no usable handle.
    pub skipped: usize,
    /// Provider found no account for the handle.
    pub rejected: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Verified,
    Skipped,
    Rejected,
}

/// Process every profile with `is_verified = false`.
///
/// # Errors
///
/// Returns [`StoreError`] if the unverified profiles cannot be listed.
pub async fn run(ctx: &WorkerContext) -> Result<VerificationReport, StoreError> {
    let profiles = ctx.store.list_unverified_profiles().await?;
    let mut report = VerificationReport::default();

    if profiles.is_empty() {
        tracing::debug!("verification: no new signups to verify");
        return Ok(report);
    }

    tracing::info!(
        count = profiles.len(),
        "verification: processing unverified profiles"
    );

    for profile in &profiles {
        report.scanned += 1;
        match verify_profile(ctx, profile).await {
            Ok(Outcome::Verified) => report.verified += 1,
            Ok(Outcome::Skipped) => report.skipped += 1,
            Ok(Outcome::Rejected) => report.rejected += 1,
            Err(e) => {
                tracing::error!(
                    user_id = %profile.id,
                    error = %e,
                    "verification: profile failed; continuing with next"
                );
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

async fn verify_profile(ctx: &WorkerContext, profile: &Profile) -> Result<Outcome, RecordError> {
    match profile.role {
        Role::Brand => verify_brand(ctx, profile).await,
        Role::Influencer => verify_influencer(ctx, profile).await,
        Role::Unknown => {
            tracing::debug!(user_id = %profile.id, "verification: unknown role; skipping");
            Ok(Outcome::Skipped)
        }
    }
}

async fn verify_brand(ctx: &WorkerContext, profile: &Profile) -> Result<Outcome, RecordError> {
    ctx.store.mark_verified(profile.id).await?;
    tracing::info!(
        user_id = %profile.id,
        name = profile.display_name(),
        "verification: brand verified"
    );
    notify_best_effort(ctx.notifier.as_ref(), &messages::brand_verified(profile)).await;
    Ok(Outcome::Verified)
}

async fn verify_influencer(
    ctx: &WorkerContext,
    profile: &Profile,
) -> Result<Outcome, RecordError> {
    let Some(resolved) = resolve_handle(profile) else {
        tracing::warn!(
            user_id = %profile.id,
            "verification: influencer has no usable social handle; skipping"
        );
        return Ok(Outcome::Skipped);
    };
    let handle = resolved.handle.as_str();

    if resolved.is_derived() {
        ctx.store.set_instagram_handle(profile.id, handle).await?;
        tracing::info!(
            user_id = %profile.id,
            handle,
            "verification: stored handle derived from name"
        );
    }

    let Some(metrics) = ctx.provider.lookup(handle).await? else {
        tracing::warn!(
            user_id = %profile.id,
            handle,
            "verification: no account found for handle"
        );
        notify_best_effort(
            ctx.notifier.as_ref(),
            &messages::account_not_found(profile, handle),
        )
        .await;
        return Ok(Outcome::Rejected);
    };

    ctx.store
        .record_verified_metrics(profile.id, metrics.followers, metrics.engagement_rate)
        .await?;
    ctx.store
        .insert_stats_snapshot(&StatsSnapshot {
            user_id: profile.id,
            followers_count: metrics.followers,
            engagement_rate: Some(metrics.engagement_rate),
            recorded_at: Utc::now(),
        })
        .await?;

    tracing::info!(
        user_id = %profile.id,
        handle,
        followers = metrics.followers,
        engagement = metrics.engagement_rate,
        "verification: influencer verified"
    );
    notify_best_effort(
        ctx.notifier.as_ref(),
        &messages::influencer_verified(profile, handle, &metrics),
    )
    .await;
    Ok(Outcome::Verified)
}

#[cfg(test)]
#[path = "verification_test.rs"]
mod tests;
