//! Live integration tests for bcw-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. Run with `DATABASE_URL` set and `--ignored`.

use bcw_core::{BrandCampaignStat, CampaignStat, Role, StatsSnapshot};
use bcw_db::{
    count_completed_applications, insert_brand_campaign_stat, insert_campaign_stat,
    insert_stats_snapshot, latest_brand_campaign_stat, latest_campaign_stat,
    list_campaigns_for_brand, list_profiles_by_role, list_unverified_profiles,
    list_verified_influencers, mark_profile_verified, record_verified_metrics,
    set_instagram_handle, update_profile_metrics, DbError,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_profile(pool: &sqlx::PgPool, role: &str, full_name: Option<&str>) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO profiles (role, full_name) VALUES ($1, $2) RETURNING id",
    )
    .bind(role)
    .bind(full_name)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_profile failed for role '{role}': {e}"))
}

async fn insert_campaign(pool: &sqlx::PgPool, brand_id: Uuid, title: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO campaigns (brand_id, title) VALUES ($1, $2) RETURNING id",
    )
    .bind(brand_id)
    .bind(title)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_campaign failed for '{title}': {e}"))
}

async fn insert_application(pool: &sqlx::PgPool, campaign_id: Uuid, status: &str) {
    sqlx::query("INSERT INTO applications (campaign_id, status) VALUES ($1, $2)")
        .bind(campaign_id)
        .bind(status)
        .execute(pool)
        .await
        .unwrap_or_else(|e| panic!("insert_application failed: {e}"));
}

// ---------------------------------------------------------------------------
// profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn verification_flow_updates_profile(pool: sqlx::PgPool) {
    let id = insert_profile(&pool, "influencer", Some("alice")).await;

    let unverified = list_unverified_profiles(&pool).await.unwrap();
    assert_eq!(unverified.len(), 1);

    set_instagram_handle(&pool, id, "@alice").await.unwrap();
    record_verified_metrics(&pool, id, 12_000, 4.2).await.unwrap();

    assert!(list_unverified_profiles(&pool).await.unwrap().is_empty());
    let verified = list_verified_influencers(&pool).await.unwrap();
    assert_eq!(verified.len(), 1);
    assert_eq!(verified[0].instagram_handle.as_deref(), Some("@alice"));
    assert_eq!(verified[0].followers_count, Some(12_000));

    update_profile_metrics(&pool, id, 12_100, None).await.unwrap();
    let verified = list_verified_influencers(&pool).await.unwrap();
    assert_eq!(verified[0].followers_count, Some(12_100));
    assert!(verified[0].engagement_rate.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn updates_on_missing_profile_report_not_found(pool: sqlx::PgPool) {
    let err = mark_profile_verified(&pool, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn list_profiles_by_role_filters(pool: sqlx::PgPool) {
    insert_profile(&pool, "brand", Some("Acme")).await;
    insert_profile(&pool, "influencer", Some("bob")).await;

    let brands = list_profiles_by_role(&pool, Role::Brand).await.unwrap();
    assert_eq!(brands.len(), 1);
    assert_eq!(brands[0].role, "brand");
}

// ---------------------------------------------------------------------------
// campaigns / applications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn completed_applications_are_counted_across_campaigns(pool: sqlx::PgPool) {
    let brand = insert_profile(&pool, "brand", Some("Acme")).await;
    let a = insert_campaign(&pool, brand, "A").await;
    let b = insert_campaign(&pool, brand, "B").await;
    insert_application(&pool, a, "completed").await;
    insert_application(&pool, a, "pending").await;
    insert_application(&pool, b, "completed").await;
    insert_application(&pool, b, "completed").await;

    let campaigns = list_campaigns_for_brand(&pool, brand).await.unwrap();
    assert_eq!(campaigns.len(), 2);

    let ids: Vec<Uuid> = campaigns.iter().map(|c| c.id).collect();
    assert_eq!(count_completed_applications(&pool, &ids).await.unwrap(), 3);
    assert_eq!(count_completed_applications(&pool, &[a]).await.unwrap(), 1);
    assert_eq!(count_completed_applications(&pool, &[]).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// snapshots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn latest_stat_is_most_recent_row(pool: sqlx::PgPool) {
    let brand = insert_profile(&pool, "brand", Some("Acme")).await;
    let campaign = insert_campaign(&pool, brand, "A").await;
    let earlier = Utc::now() - Duration::minutes(5);

    assert!(latest_brand_campaign_stat(&pool, brand).await.unwrap().is_none());

    for (views, at) in [(100, earlier), (250, Utc::now())] {
        insert_brand_campaign_stat(
            &pool,
            &BrandCampaignStat {
                brand_id: brand,
                total_views: views,
                total_likes: views / 10,
                active_campaigns_count: 1,
                recorded_at: at,
            },
        )
        .await
        .unwrap();
        insert_campaign_stat(
            &pool,
            &CampaignStat {
                campaign_id: campaign,
                total_views: views,
                total_likes: views / 10,
                recorded_at: at,
            },
        )
        .await
        .unwrap();
    }

    let latest = latest_brand_campaign_stat(&pool, brand).await.unwrap().unwrap();
    assert_eq!(latest.total_views, 250);
    let latest = latest_campaign_stat(&pool, campaign).await.unwrap().unwrap();
    assert_eq!(latest.total_likes, 25);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn stats_snapshot_is_appended(pool: sqlx::PgPool) {
    let id = insert_profile(&pool, "influencer", Some("carol")).await;
    insert_stats_snapshot(
        &pool,
        &StatsSnapshot {
            user_id: id,
            followers_count: 5_000,
            engagement_rate: Some(3.1),
            recorded_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stats_snapshots WHERE user_id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
