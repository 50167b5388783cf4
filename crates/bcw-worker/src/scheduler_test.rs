use std::sync::Arc;

use super::*;
use bcw_core::Role;

use crate::test_support::{context, profile, FixedProvider, MemoryStore, RecordingNotifier};

const VERIFY: &str = "list_unverified_profiles";
const GROWTH: &str = "list_verified_influencers";
const BRANDS: &str = "list_profiles_by_role";
const CAMPAIGNS: &str = "list_campaigns";

fn intervals() -> TaskIntervals {
    TaskIntervals {
        verification: Duration::from_secs(10),
        growth: Duration::from_secs(60),
        brand_stats: Duration::from_secs(30),
        campaign_stats: Duration::from_secs(30),
    }
}

fn scheduler(only: &[TaskKind]) -> (Scheduler, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let ctx = context(
        &store,
        Arc::new(RecordingNotifier::default()),
        Arc::new(FixedProvider::new(1, 1.0)),
    );
    let sched = Scheduler::new(ctx, &intervals(), Duration::from_secs(1), only);
    (sched, store)
}

fn drain_reads(store: &MemoryStore) -> Vec<&'static str> {
    std::mem::take(&mut store.state().reads)
}

#[tokio::test(start_paused = true)]
async fn startup_runs_every_job_in_fixed_order() {
    let (mut sched, store) = scheduler(&[]);

    sched.run_all().await;

    assert_eq!(drain_reads(&store), [VERIFY, GROWTH, BRANDS, CAMPAIGNS]);
}

#[tokio::test(start_paused = true)]
async fn only_due_jobs_run_on_a_tick() {
    let (mut sched, store) = scheduler(&[]);
    sched.run_all().await;
    drain_reads(&store);

    tokio::time::advance(Duration::from_secs(5)).await;
    assert_eq!(sched.run_due().await, 0);

    tokio::time::advance(Duration::from_secs(5)).await;
    assert_eq!(sched.run_due().await, 1);
    assert_eq!(drain_reads(&store), [VERIFY]);

    tokio::time::advance(Duration::from_secs(20)).await;
    sched.run_due().await;
    assert_eq!(drain_reads(&store), [VERIFY, BRANDS, CAMPAIGNS]);

    tokio::time::advance(Duration::from_secs(30)).await;
    sched.run_due().await;
    assert_eq!(drain_reads(&store), [VERIFY, GROWTH, BRANDS, CAMPAIGNS]);
}

#[tokio::test(start_paused = true)]
async fn next_run_is_measured_from_completion() {
    let (mut sched, _store) = scheduler(&[TaskKind::Growth]);
    let start = Instant::now();

    sched.run_all().await;

    let job = sched.jobs()[0];
    assert_eq!(job.kind, TaskKind::Growth);
    assert_eq!(job.next_due, start + Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn task_filter_limits_scheduled_jobs() {
    let (mut sched, store) = scheduler(&[TaskKind::CampaignStats, TaskKind::Verification]);

    let kinds: Vec<TaskKind> = sched.jobs().iter().map(|j| j.kind).collect();
    assert_eq!(kinds, [TaskKind::Verification, TaskKind::CampaignStats]);

    sched.run_all().await;
    assert_eq!(drain_reads(&store), [VERIFY, CAMPAIGNS]);
}

#[tokio::test(start_paused = true)]
async fn run_loop_keeps_firing_on_schedule() {
    let (sched, store) = scheduler(&[]);

    let _ = tokio::time::timeout(Duration::from_millis(35_500), sched.run()).await;

    let reads = drain_reads(&store);
    let count = |name: &str| reads.iter().filter(|r| **r == name).count();
    // Startup at t=0, then ticks: verification every 10s, aggregation every
    // 30s, growth not again before t=60.
    assert_eq!(count(VERIFY), 4);
    assert_eq!(count(GROWTH), 1);
    assert_eq!(count(BRANDS), 2);
    assert_eq!(count(CAMPAIGNS), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_read_skips_one_job_and_is_retried_next_tick() {
    let (mut sched, store) = scheduler(&[]);
    let brand = profile(Role::Brand);
    let brand_id = brand.id;
    {
        let mut state = store.state();
        state.profiles.push(brand);
        state.failing_reads.insert(VERIFY);
    }
    let start = Instant::now();

    sched.run_all().await;

    assert_eq!(drain_reads(&store), [VERIFY, GROWTH, BRANDS, CAMPAIGNS]);
    assert!(!store.profile(brand_id).is_verified);
    assert_eq!(sched.jobs()[0].kind, TaskKind::Verification);
    assert_eq!(sched.jobs()[0].next_due, start + Duration::from_secs(10));

    store.state().failing_reads.clear();
    tokio::time::advance(Duration::from_secs(10)).await;
    assert_eq!(sched.run_due().await, 1);

    assert_eq!(drain_reads(&store), [VERIFY]);
    assert!(store.profile(brand_id).is_verified);
}

#[test]
fn intervals_map_to_their_job() {
    let i = intervals();
    assert_eq!(interval_for(TaskKind::Verification, &i), Duration::from_secs(10));
    assert_eq!(interval_for(TaskKind::Growth, &i), Duration::from_secs(60));
    assert_eq!(interval_for(TaskKind::BrandStats, &i), Duration::from_secs(30));
    assert_eq!(interval_for(TaskKind::CampaignStats, &i), Duration::from_secs(30));
}
