//! Storage seam for the worker.
//!
//! Tasks talk to [`ProfileStore`] only. Two backends implement it: the
//! hosted REST gateway ([`RestStore`]) and a direct Postgres pool
//! ([`PgStore`]).

mod postgres;
mod rest;

use async_trait::async_trait;
use bcw_core::{BrandCampaignStat, Campaign, CampaignStat, Profile, Role, StatsSnapshot};
use thiserror::Error;
use uuid::Uuid;

pub use postgres::PgStore;
pub use rest::RestStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error(transparent)]
    Db(#[from] bcw_db::DbError),

    #[error(transparent)]
    Rest(#[from] bcw_rest::RestError),
}

/// Every read and write the scheduled tasks perform.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Profiles with `is_verified = false`, any role.
    async fn list_unverified_profiles(&self) -> Result<Vec<Profile>, StoreError>;

    /// Influencers with `is_verified = true`.
    async fn list_verified_influencers(&self) -> Result<Vec<Profile>, StoreError>;

    async fn list_profiles_by_role(&self, role: Role) -> Result<Vec<Profile>, StoreError>;

    /// Set `is_verified = true` and nothing else.
    async fn mark_verified(&self, id: Uuid) -> Result<(), StoreError>;

    async fn set_instagram_handle(&self, id: Uuid, handle: &str) -> Result<(), StoreError>;

    /// Set `is_verified`, `followers_count` and `engagement_rate` in one write.
    async fn record_verified_metrics(
        &self,
        id: Uuid,
        followers_count: i64,
        engagement_rate: f64,
    ) -> Result<(), StoreError>;

    async fn update_metrics(
        &self,
        id: Uuid,
        followers_count: i64,
        engagement_rate: Option<f64>,
    ) -> Result<(), StoreError>;

    async fn insert_stats_snapshot(&self, snapshot: &StatsSnapshot) -> Result<(), StoreError>;

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError>;

    async fn list_campaigns_for_brand(&self, brand_id: Uuid) -> Result<Vec<Campaign>, StoreError>;

    /// Applications with status `completed` across `campaign_ids`.
    /// An empty slice counts zero.
    async fn count_completed_applications(&self, campaign_ids: &[Uuid])
        -> Result<u64, StoreError>;

    async fn latest_brand_stat(
        &self,
        brand_id: Uuid,
    ) -> Result<Option<BrandCampaignStat>, StoreError>;

    async fn insert_brand_stat(&self, stat: &BrandCampaignStat) -> Result<(), StoreError>;

    async fn latest_campaign_stat(
        &self,
        campaign_id: Uuid,
    ) -> Result<Option<CampaignStat>, StoreError>;

    async fn insert_campaign_stat(&self, stat: &CampaignStat) -> Result<(), StoreError>;
}
