//! Campaigns owned by brands and the applications influencers submit to them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::null_as_default;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub brand_id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

/// Lifecycle state of an application.
///
/// Stored as free text; values the worker does not know are carried
/// through unchanged in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Other(String),
}

impl ApplicationStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Completed => "completed",
            ApplicationStatus::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, ApplicationStatus::Completed)
    }
}

impl From<String> for ApplicationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => ApplicationStatus::Pending,
            "accepted" => ApplicationStatus::Accepted,
            "rejected" => ApplicationStatus::Rejected,
            "completed" => ApplicationStatus::Completed,
            _ => ApplicationStatus::Other(value),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(value: ApplicationStatus) -> Self {
        match value {
            ApplicationStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `applications`.
///
/// Both backends count completed applications inside the store, so this
/// type is only materialised by the in-memory store the task tests use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub campaign_id: Uuid,
    pub status: ApplicationStatus,
}
