//! The four scheduled jobs.
//!
//! Each task reads a batch, processes records one at a time, and returns a
//! report. A failed batch read aborts the run with `Err`; a failed record is
//! logged, counted, and skipped.

pub mod brand_stats;
pub mod campaign_stats;
pub mod growth;
mod messages;
pub mod verification;

use thiserror::Error;

use crate::context::WorkerContext;
use crate::provider::ProviderError;
use crate::store::StoreError;

pub use brand_stats::AggregationReport;
pub use growth::GrowthReport;
pub use verification::VerificationReport;

/// A per-record failure. Never aborts a batch.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum TaskKind {
    Verification,
    Growth,
    BrandStats,
    CampaignStats,
}

impl TaskKind {
    /// Every task in the order a scheduler tick runs them.
    pub const ALL: [TaskKind; 4] = [
        TaskKind::Verification,
        TaskKind::Growth,
        TaskKind::BrandStats,
        TaskKind::CampaignStats,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Verification => "verification",
            TaskKind::Growth => "growth",
            TaskKind::BrandStats => "brand-stats",
            TaskKind::CampaignStats => "campaign-stats",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskReport {
    Verification(VerificationReport),
    Growth(GrowthReport),
    BrandStats(AggregationReport),
    CampaignStats(AggregationReport),
}

impl TaskReport {
    /// Records that hit a per-record error during the run.
    #[must_use]
    pub fn failed(&self) -> usize {
        match self {
            TaskReport::Verification(r) => r.failed,
            TaskReport::Growth(r) => r.failed,
            TaskReport::BrandStats(r) | TaskReport::CampaignStats(r) => r.failed,
        }
    }
}

/// Run one task to completion.
///
/// # Errors
///
/// Returns [`StoreError`] when the task's initial batch read fails.
pub async fn run_task(kind: TaskKind, ctx: &WorkerContext) -> Result<TaskReport, StoreError> {
    Ok(match kind {
        TaskKind::Verification => TaskReport::Verification(verification::run(ctx).await?),
        TaskKind::Growth => TaskReport::Growth(growth::run(ctx).await?),
        TaskKind::BrandStats => TaskReport::BrandStats(brand_stats::run(ctx).await?),
        TaskKind::CampaignStats => TaskReport::CampaignStats(campaign_stats::run(ctx).await?),
    })
}

/// Saturating `usize -> i64` for counts stored in BIGINT columns.
pub(crate) fn count_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
