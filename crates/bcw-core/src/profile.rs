//! User profiles and social handle resolution.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Account type chosen at signup.
///
/// Anything the worker does not recognise (admin accounts, typos, a null
/// column) maps to `Unknown` and is left alone by every task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Brand,
    Influencer,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Brand => "brand",
            Role::Influencer => "influencer",
            Role::Unknown => "unknown",
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "brand" => Role::Brand,
            "influencer" => Role::Influencer,
            _ => Role::Unknown,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_verified: bool,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub instagram_handle: Option<String>,
    #[serde(default)]
    pub tiktok_handle: Option<String>,
    #[serde(default)]
    pub followers_count: Option<i64>,
    #[serde(default)]
    pub engagement_rate: Option<f64>,
}

impl Profile {
    /// Follower count with a missing value read as zero.
    #[must_use]
    pub fn followers(&self) -> i64 {
        self.followers_count.unwrap_or(0)
    }

    /// Best human-readable label for log lines and notifications.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or(self.email.as_deref())
            .unwrap_or("(unnamed)")
    }
}

/// Where a resolved handle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleSource {
    Instagram,
    TikTok,
    /// Built from a single-word `full_name`; not yet stored on the profile.
    FullName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHandle {
    pub handle: String,
    pub source: HandleSource,
}

impl ResolvedHandle {
    /// True when the handle was inferred and should be written back.
    #[must_use]
    pub fn is_derived(&self) -> bool {
        self.source == HandleSource::FullName
    }
}

/// Pick the social handle to verify for a profile.
///
/// Precedence: stored Instagram handle, stored TikTok handle, then a handle
/// derived from `full_name`. Blank stored values are ignored. Returns `None`
/// when nothing usable exists; such profiles stay unverified.
#[must_use]
pub fn resolve_handle(profile: &Profile) -> Option<ResolvedHandle> {
    stored(profile.instagram_handle.as_deref())
        .map(|handle| ResolvedHandle {
            handle: handle.to_string(),
            source: HandleSource::Instagram,
        })
        .or_else(|| {
            stored(profile.tiktok_handle.as_deref()).map(|handle| ResolvedHandle {
                handle: handle.to_string(),
                source: HandleSource::TikTok,
            })
        })
        .or_else(|| {
            profile
                .full_name
                .as_deref()
                .and_then(handle_from_name)
                .map(|handle| ResolvedHandle {
                    handle,
                    source: HandleSource::FullName,
                })
        })
}

/// Derive a handle from a display name.
///
/// Only single-token names qualify: a name with inner whitespace is a real
/// name, not a username, and no handle can be inferred from it.
#[must_use]
pub fn handle_from_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.chars().any(char::is_whitespace) {
        return None;
    }
    let bare = trimmed.trim_start_matches('@');
    if bare.is_empty() {
        return None;
    }
    if trimmed.starts_with('@') {
        Some(trimmed.to_string())
    } else {
        Some(format!("@{trimmed}"))
    }
}

/// Reads an explicit JSON `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn stored(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
