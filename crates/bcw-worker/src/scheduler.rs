//! Fixed-interval job loop.
//!
//! One control loop owns every job. On each tick it runs the jobs that are
//! due, one after another in [`TaskKind::ALL`] order, and reschedules each
//! from the moment it finished. Jobs therefore never overlap and a slow
//! run pushes its own next run back instead of queueing a backlog.

use std::time::Duration;

use bcw_core::TaskIntervals;
use tokio::time::Instant;

use crate::context::WorkerContext;
use crate::tasks::{run_task, TaskKind};

/// One recurring job and when it is next due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicJob {
    pub kind: TaskKind,
    pub every: Duration,
    pub next_due: Instant,
}

impl PeriodicJob {
    fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }
}

#[derive(Debug)]
pub struct Scheduler {
    ctx: WorkerContext,
    jobs: Vec<PeriodicJob>,
    tick: Duration,
}

#[must_use]
pub fn interval_for(kind: TaskKind, intervals: &TaskIntervals) -> Duration {
    match kind {
        TaskKind::Verification => intervals.verification,
        TaskKind::Growth => intervals.growth,
        TaskKind::BrandStats => intervals.brand_stats,
        TaskKind::CampaignStats => intervals.campaign_stats,
    }
}

impl Scheduler {
    /// Build a scheduler for `only` (every task when empty). All jobs start
    /// out due.
    #[must_use]
    pub fn new(
        ctx: WorkerContext,
        intervals: &TaskIntervals,
        tick: Duration,
        only: &[TaskKind],
    ) -> Self {
        let now = Instant::now();
        let jobs = TaskKind::ALL
            .into_iter()
            .filter(|kind| only.is_empty() || only.contains(kind))
            .map(|kind| PeriodicJob {
                kind,
                every: interval_for(kind, intervals),
                next_due: now,
            })
            .collect();
        Self { ctx, jobs, tick }
    }

    #[must_use]
    pub fn jobs(&self) -> &[PeriodicJob] {
        &self.jobs
    }

    /// Run every job once regardless of schedule, in order.
    pub async fn run_all(&mut self) {
        for job in &mut self.jobs {
            execute(&self.ctx, job).await;
        }
    }

    /// Run the jobs that are due now. Returns how many ran.
    pub async fn run_due(&mut self) -> usize {
        let mut ran = 0;
        for job in &mut self.jobs {
            // Checked per job so a long run earlier in the tick can make a
            // later job due.
            if job.is_due(Instant::now()) {
                execute(&self.ctx, job).await;
                ran += 1;
            }
        }
        ran
    }

    /// Run all jobs at startup, then loop on the tick forever.
    pub async fn run(mut self) {
        tracing::info!(
            jobs = self.jobs.len(),
            tick_ms = u64::try_from(self.tick.as_millis()).unwrap_or(u64::MAX),
            "scheduler: starting"
        );
        self.run_all().await;
        loop {
            tokio::time::sleep(self.tick).await;
            self.run_due().await;
        }
    }
}

async fn execute(ctx: &WorkerContext, job: &mut PeriodicJob) {
    let started = Instant::now();
    tracing::debug!(task = %job.kind, "scheduler: starting run");

    match run_task(job.kind, ctx).await {
        Ok(report) => {
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            if report.failed() > 0 {
                tracing::warn!(task = %job.kind, elapsed_ms, ?report, "scheduler: run finished with failures");
            } else {
                tracing::debug!(task = %job.kind, elapsed_ms, ?report, "scheduler: run complete");
            }
        }
        Err(e) => {
            tracing::error!(task = %job.kind, error = %e, "scheduler: run aborted; retrying next cycle");
        }
    }

    job.next_due = Instant::now() + job.every;
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod tests;
