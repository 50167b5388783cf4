//! In-memory store, notifier and provider doubles for task and scheduler tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bcw_core::{
    Application, ApplicationStatus, BrandCampaignStat, Campaign, CampaignStat, Profile, Role,
    StatsSnapshot,
};
use bcw_notify::{Notification, Notifier, NotifyError};
use uuid::Uuid;

use crate::context::WorkerContext;
use crate::provider::{MetricsProvider, ProviderError, SocialMetrics};
use crate::store::{ProfileStore, StoreError};

#[derive(Debug, Default)]
pub(crate) struct State {
    pub profiles: Vec<Profile>,
    pub snapshots: Vec<StatsSnapshot>,
    pub campaigns: Vec<Campaign>,
    pub applications: Vec<Application>,
    pub brand_stats: Vec<BrandCampaignStat>,
    pub campaign_stats: Vec<CampaignStat>,
    /// Batch-read method names in call order.
    pub reads: Vec<&'static str>,
    /// Profile ids whose writes fail.
    pub failing_profiles: HashSet<Uuid>,
    /// Batch-read method names that fail (still recorded in `reads`).
    pub failing_reads: HashSet<&'static str>,
}

impl State {
    fn record_read(&mut self, call: &'static str) -> Result<(), StoreError> {
        self.reads.push(call);
        if self.failing_reads.contains(call) {
            return Err(StoreError::Rest(bcw_rest::RestError::Status {
                method: "GET".to_string(),
                table: call.to_string(),
                status: 503,
                body: "unavailable".to_string(),
            }));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("store mutex poisoned")
    }

    pub fn profile(&self, id: Uuid) -> Profile {
        self.state()
            .profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .expect("profile exists")
    }

    fn write_profile(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut Profile),
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        let not_found = StoreError::NotFound {
            entity: "profile",
            id,
        };
        if state.failing_profiles.contains(&id) {
            return Err(not_found);
        }
        let profile = state
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(not_found)?;
        apply(profile);
        Ok(())
    }

    fn read_profiles(
        &self,
        call: &'static str,
        keep: impl Fn(&Profile) -> bool,
    ) -> Result<Vec<Profile>, StoreError> {
        let mut state = self.state();
        state.record_read(call)?;
        Ok(state.profiles.iter().filter(|p| keep(p)).cloned().collect())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn list_unverified_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        self.read_profiles("list_unverified_profiles", |p| !p.is_verified)
    }

    async fn list_verified_influencers(&self) -> Result<Vec<Profile>, StoreError> {
        self.read_profiles("list_verified_influencers", |p| {
            p.is_verified && p.role == Role::Influencer
        })
    }

    async fn list_profiles_by_role(&self, role: Role) -> Result<Vec<Profile>, StoreError> {
        self.read_profiles("list_profiles_by_role", |p| p.role == role)
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), StoreError> {
        self.write_profile(id, |p| p.is_verified = true)
    }

    async fn set_instagram_handle(&self, id: Uuid, handle: &str) -> Result<(), StoreError> {
        self.write_profile(id, |p| p.instagram_handle = Some(handle.to_string()))
    }

    async fn record_verified_metrics(
        &self,
        id: Uuid,
        followers_count: i64,
        engagement_rate: f64,
    ) -> Result<(), StoreError> {
        self.write_profile(id, |p| {
            p.is_verified = true;
            p.followers_count = Some(followers_count);
            p.engagement_rate = Some(engagement_rate);
        })
    }

    async fn update_metrics(
        &self,
        id: Uuid,
        followers_count: i64,
        engagement_rate: Option<f64>,
    ) -> Result<(), StoreError> {
        self.write_profile(id, |p| {
            p.followers_count = Some(followers_count);
            p.engagement_rate = engagement_rate;
        })
    }

    async fn insert_stats_snapshot(&self, snapshot: &StatsSnapshot) -> Result<(), StoreError> {
        self.state().snapshots.push(snapshot.clone());
        Ok(())
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError> {
        let mut state = self.state();
        state.record_read("list_campaigns")?;
        Ok(state.campaigns.clone())
    }

    async fn list_campaigns_for_brand(&self, brand_id: Uuid) -> Result<Vec<Campaign>, StoreError> {
        Ok(self
            .state()
            .campaigns
            .iter()
            .filter(|c| c.brand_id == brand_id)
            .cloned()
            .collect())
    }

    async fn count_completed_applications(
        &self,
        campaign_ids: &[Uuid],
    ) -> Result<u64, StoreError> {
        let count = self
            .state()
            .applications
            .iter()
            .filter(|a| a.status.is_completed() && campaign_ids.contains(&a.campaign_id))
            .count();
        Ok(count as u64)
    }

    async fn latest_brand_stat(
        &self,
        brand_id: Uuid,
    ) -> Result<Option<BrandCampaignStat>, StoreError> {
        Ok(self
            .state()
            .brand_stats
            .iter()
            .rev()
            .find(|s| s.brand_id == brand_id)
            .cloned())
    }

    async fn insert_brand_stat(&self, stat: &BrandCampaignStat) -> Result<(), StoreError> {
        self.state().brand_stats.push(stat.clone());
        Ok(())
    }

    async fn latest_campaign_stat(
        &self,
        campaign_id: Uuid,
    ) -> Result<Option<CampaignStat>, StoreError> {
        Ok(self
            .state()
            .campaign_stats
            .iter()
            .rev()
            .find(|s| s.campaign_id == campaign_id)
            .cloned())
    }

    async fn insert_campaign_stat(&self, stat: &CampaignStat) -> Result<(), StoreError> {
        self.state().campaign_stats.push(stat.clone());
        Ok(())
    }
}

/// Keeps every notification it is handed.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification.clone());
        Ok(())
    }
}

/// Rejects every message.
#[derive(Debug, Default)]
pub(crate) struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }
}

/// Instant provider that returns fixed metrics unless the handle is listed
/// as missing or broken.
#[derive(Debug)]
pub(crate) struct FixedProvider {
    pub metrics: SocialMetrics,
    pub missing: Vec<String>,
    pub broken: Vec<String>,
    lookups: Mutex<Vec<String>>,
}

impl FixedProvider {
    pub fn new(followers: i64, engagement_rate: f64) -> Self {
        Self {
            metrics: SocialMetrics {
                followers,
                engagement_rate,
            },
            missing: Vec::new(),
            broken: Vec::new(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn missing(mut self, handle: &str) -> Self {
        self.missing.push(handle.to_string());
        self
    }

    /// Lookups for `handle` fail with [`ProviderError::Lookup`].
    pub fn broken(mut self, handle: &str) -> Self {
        self.broken.push(handle.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("provider mutex poisoned").clone()
    }
}

#[async_trait]
impl MetricsProvider for FixedProvider {
    async fn lookup(&self, handle: &str) -> Result<Option<SocialMetrics>, ProviderError> {
        self.lookups
            .lock()
            .expect("provider mutex poisoned")
            .push(handle.to_string());
        if self.broken.iter().any(|b| b == handle) {
            return Err(ProviderError::Lookup {
                handle: handle.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        if self.missing.iter().any(|m| m == handle) {
            return Ok(None);
        }
        Ok(Some(self.metrics))
    }
}

pub(crate) fn context(
    store: &Arc<MemoryStore>,
    notifier: Arc<dyn Notifier>,
    provider: Arc<dyn MetricsProvider>,
) -> WorkerContext {
    let store: Arc<dyn ProfileStore> = store.clone();
    WorkerContext::new(store, notifier, provider)
}

pub(crate) fn profile(role: Role) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        role,
        is_verified: false,
        full_name: None,
        email: None,
        instagram_handle: None,
        tiktok_handle: None,
        followers_count: None,
        engagement_rate: None,
    }
}

pub(crate) fn campaign(brand_id: Uuid) -> Campaign {
    Campaign {
        id: Uuid::new_v4(),
        brand_id,
        title: "Spring launch".to_string(),
    }
}

pub(crate) fn application(campaign_id: Uuid, status: ApplicationStatus) -> Application {
    Application {
        campaign_id,
        status,
    }
}
