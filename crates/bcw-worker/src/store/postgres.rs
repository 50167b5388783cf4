use async_trait::async_trait;
use bcw_core::{BrandCampaignStat, Campaign, CampaignStat, Profile, Role, StatsSnapshot};
use bcw_db::DbError;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ProfileStore, StoreError};

/// [`ProfileStore`] backed by a direct Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn profile_write(id: Uuid) -> impl FnOnce(DbError) -> StoreError {
    move |e| match e {
        DbError::NotFound => StoreError::NotFound {
            entity: "profile",
            id,
        },
        other => StoreError::Db(other),
    }
}

fn profiles(rows: Vec<bcw_db::ProfileRow>) -> Vec<Profile> {
    rows.into_iter().map(Profile::from).collect()
}

fn campaigns(rows: Vec<bcw_db::CampaignRow>) -> Vec<Campaign> {
    rows.into_iter().map(Campaign::from).collect()
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn list_unverified_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(profiles(bcw_db::list_unverified_profiles(&self.pool).await?))
    }

    async fn list_verified_influencers(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(profiles(bcw_db::list_verified_influencers(&self.pool).await?))
    }

    async fn list_profiles_by_role(&self, role: Role) -> Result<Vec<Profile>, StoreError> {
        Ok(profiles(bcw_db::list_profiles_by_role(&self.pool, role).await?))
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), StoreError> {
        bcw_db::mark_profile_verified(&self.pool, id)
            .await
            .map_err(profile_write(id))
    }

    async fn set_instagram_handle(&self, id: Uuid, handle: &str) -> Result<(), StoreError> {
        bcw_db::set_instagram_handle(&self.pool, id, handle)
            .await
            .map_err(profile_write(id))
    }

    async fn record_verified_metrics(
        &self,
        id: Uuid,
        followers_count: i64,
        engagement_rate: f64,
    ) -> Result<(), StoreError> {
        bcw_db::record_verified_metrics(&self.pool, id, followers_count, engagement_rate)
            .await
            .map_err(profile_write(id))
    }

    async fn update_metrics(
        &self,
        id: Uuid,
        followers_count: i64,
        engagement_rate: Option<f64>,
    ) -> Result<(), StoreError> {
        bcw_db::update_profile_metrics(&self.pool, id, followers_count, engagement_rate)
            .await
            .map_err(profile_write(id))
    }

    async fn insert_stats_snapshot(&self, snapshot: &StatsSnapshot) -> Result<(), StoreError> {
        Ok(bcw_db::insert_stats_snapshot(&self.pool, snapshot).await?)
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError> {
        Ok(campaigns(bcw_db::list_campaigns(&self.pool).await?))
    }

    async fn list_campaigns_for_brand(&self, brand_id: Uuid) -> Result<Vec<Campaign>, StoreError> {
        Ok(campaigns(
            bcw_db::list_campaigns_for_brand(&self.pool, brand_id).await?,
        ))
    }

    async fn count_completed_applications(
        &self,
        campaign_ids: &[Uuid],
    ) -> Result<u64, StoreError> {
        Ok(bcw_db::count_completed_applications(&self.pool, campaign_ids).await?)
    }

    async fn latest_brand_stat(
        &self,
        brand_id: Uuid,
    ) -> Result<Option<BrandCampaignStat>, StoreError> {
        let row = bcw_db::latest_brand_campaign_stat(&self.pool, brand_id).await?;
        Ok(row.map(BrandCampaignStat::from))
    }

    async fn insert_brand_stat(&self, stat: &BrandCampaignStat) -> Result<(), StoreError> {
        Ok(bcw_db::insert_brand_campaign_stat(&self.pool, stat).await?)
    }

    async fn latest_campaign_stat(
        &self,
        campaign_id: Uuid,
    ) -> Result<Option<CampaignStat>, StoreError> {
        let row = bcw_db::latest_campaign_stat(&self.pool, campaign_id).await?;
        Ok(row.map(CampaignStat::from))
    }

    async fn insert_campaign_stat(&self, stat: &CampaignStat) -> Result<(), StoreError> {
        Ok(bcw_db::insert_campaign_stat(&self.pool, stat).await?)
    }
}
