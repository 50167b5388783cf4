use async_trait::async_trait;
use bcw_core::{BrandCampaignStat, Campaign, CampaignStat, Profile, Role, StatsSnapshot};
use bcw_rest::{Filter, RestClient};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use super::{ProfileStore, StoreError};

const PROFILES: &str = "profiles";
const STATS_SNAPSHOTS: &str = "stats_snapshots";
const CAMPAIGNS: &str = "campaigns";
const APPLICATIONS: &str = "applications";
const BRAND_CAMPAIGN_STATS: &str = "brand_campaign_stats";
const CAMPAIGN_STATS_SNAPSHOTS: &str = "campaign_stats_snapshots";
const RECORDED_AT: &str = "recorded_at";

/// [`ProfileStore`] backed by the hosted REST gateway.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: RestClient,
}

impl RestStore {
    #[must_use]
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    async fn update_profile<B: Serialize + Sync + ?Sized>(
        &self,
        id: Uuid,
        body: &B,
    ) -> Result<(), StoreError> {
        let changed = self
            .client
            .update_by_id(PROFILES, &id.to_string(), body)
            .await?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "profile",
                id,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for RestStore {
    async fn list_unverified_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self
            .client
            .select(PROFILES, &[Filter::eq("is_verified", false)])
            .await?)
    }

    async fn list_verified_influencers(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self
            .client
            .select(
                PROFILES,
                &[
                    Filter::eq("role", Role::Influencer),
                    Filter::eq("is_verified", true),
                ],
            )
            .await?)
    }

    async fn list_profiles_by_role(&self, role: Role) -> Result<Vec<Profile>, StoreError> {
        Ok(self
            .client
            .select(PROFILES, &[Filter::eq("role", role)])
            .await?)
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), StoreError> {
        self.update_profile(id, &json!({ "is_verified": true })).await
    }

    async fn set_instagram_handle(&self, id: Uuid, handle: &str) -> Result<(), StoreError> {
        self.update_profile(id, &json!({ "instagram_handle": handle }))
            .await
    }

    async fn record_verified_metrics(
        &self,
        id: Uuid,
        followers_count: i64,
        engagement_rate: f64,
    ) -> Result<(), StoreError> {
        self.update_profile(
            id,
            &json!({
                "is_verified": true,
                "followers_count": followers_count,
                "engagement_rate": engagement_rate,
            }),
        )
        .await
    }

    async fn update_metrics(
        &self,
        id: Uuid,
        followers_count: i64,
        engagement_rate: Option<f64>,
    ) -> Result<(), StoreError> {
        self.update_profile(
            id,
            &json!({
                "followers_count": followers_count,
                "engagement_rate": engagement_rate,
            }),
        )
        .await
    }

    async fn insert_stats_snapshot(&self, snapshot: &StatsSnapshot) -> Result<(), StoreError> {
        Ok(self.client.insert(STATS_SNAPSHOTS, snapshot).await?)
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError> {
        Ok(self.client.select(CAMPAIGNS, &[]).await?)
    }

    async fn list_campaigns_for_brand(&self, brand_id: Uuid) -> Result<Vec<Campaign>, StoreError> {
        Ok(self
            .client
            .select(CAMPAIGNS, &[Filter::eq("brand_id", brand_id)])
            .await?)
    }

    async fn count_completed_applications(
        &self,
        campaign_ids: &[Uuid],
    ) -> Result<u64, StoreError> {
        if campaign_ids.is_empty() {
            return Ok(0);
        }
        Ok(self
            .client
            .count(
                APPLICATIONS,
                &[
                    Filter::is_in("campaign_id", campaign_ids),
                    Filter::eq("status", "completed"),
                ],
            )
            .await?)
    }

    async fn latest_brand_stat(
        &self,
        brand_id: Uuid,
    ) -> Result<Option<BrandCampaignStat>, StoreError> {
        Ok(self
            .client
            .select_latest(
                BRAND_CAMPAIGN_STATS,
                &[Filter::eq("brand_id", brand_id)],
                RECORDED_AT,
            )
            .await?)
    }

    async fn insert_brand_stat(&self, stat: &BrandCampaignStat) -> Result<(), StoreError> {
        Ok(self.client.insert(BRAND_CAMPAIGN_STATS, stat).await?)
    }

    async fn latest_campaign_stat(
        &self,
        campaign_id: Uuid,
    ) -> Result<Option<CampaignStat>, StoreError> {
        Ok(self
            .client
            .select_latest(
                CAMPAIGN_STATS_SNAPSHOTS,
                &[Filter::eq("campaign_id", campaign_id)],
                RECORDED_AT,
            )
            .await?)
    }

    async fn insert_campaign_stat(&self, stat: &CampaignStat) -> Result<(), StoreError> {
        Ok(self.client.insert(CAMPAIGN_STATS_SNAPSHOTS, stat).await?)
    }
}
