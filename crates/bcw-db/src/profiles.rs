//! Database operations for the `profiles` table.

use bcw_core::{Profile, Role};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{expect_one_row, DbError};

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub role: String,
    pub is_verified: bool,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub instagram_handle: Option<String>,
    pub tiktok_handle: Option<String>,
    pub followers_count: Option<i64>,
    pub engagement_rate: Option<f64>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            role: Role::from(row.role.as_str()),
            is_verified: row.is_verified,
            full_name: row.full_name,
            email: row.email,
            instagram_handle: row.instagram_handle,
            tiktok_handle: row.tiktok_handle,
            followers_count: row.followers_count,
            engagement_rate: row.engagement_rate,
        }
    }
}

const PROFILE_COLUMNS: &str = "id, role, is_verified, full_name, email, instagram_handle, \
                               tiktok_handle, followers_count, engagement_rate";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every profile still awaiting verification.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unverified_profiles(pool: &PgPool) -> Result<Vec<ProfileRow>, DbError> {
    let rows = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE is_verified = false ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns verified influencers, the population the growth job advances.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_verified_influencers(pool: &PgPool) -> Result<Vec<ProfileRow>, DbError> {
    let rows = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles \
         WHERE role = 'influencer' AND is_verified = true \
         ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns all profiles with the given role, verified or not.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_profiles_by_role(pool: &PgPool, role: Role) -> Result<Vec<ProfileRow>, DbError> {
    let rows = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE role = $1 ORDER BY id"
    ))
    .bind(role.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Flags a profile as verified without touching its metrics.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no profile has `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn mark_profile_verified(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE profiles SET is_verified = true WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    expect_one_row(&result)
}

/// Stores a handle inferred for the profile.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no profile has `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_instagram_handle(pool: &PgPool, id: Uuid, handle: &str) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE profiles SET instagram_handle = $2 WHERE id = $1")
        .bind(id)
        .bind(handle)
        .execute(pool)
        .await?;
    expect_one_row(&result)
}

/// Marks an influencer verified and writes their first metrics in one statement.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no profile has `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn record_verified_metrics(
    pool: &PgPool,
    id: Uuid,
    followers_count: i64,
    engagement_rate: f64,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE profiles \
         SET is_verified = true, followers_count = $2, engagement_rate = $3 \
         WHERE id = $1",
    )
    .bind(id)
    .bind(followers_count)
    .bind(engagement_rate)
    .execute(pool)
    .await?;
    expect_one_row(&result)
}

/// Overwrites a profile's cumulative metrics.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no profile has `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_profile_metrics(
    pool: &PgPool,
    id: Uuid,
    followers_count: i64,
    engagement_rate: Option<f64>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE profiles SET followers_count = $2, engagement_rate = $3 WHERE id = $1",
    )
    .bind(id)
    .bind(followers_count)
    .bind(engagement_rate)
    .execute(pool)
    .await?;
    expect_one_row(&result)
}
