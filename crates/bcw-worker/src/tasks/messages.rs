use bcw_core::Profile;
use bcw_notify::{Notification, COLOR_BRAND, COLOR_NOT_FOUND, COLOR_VERIFIED};

use crate::provider::SocialMetrics;

pub(super) fn brand_verified(profile: &Profile) -> Notification {
    let msg = Notification::new(
        "Brand verified",
        format!("{} can now publish campaigns.", profile.display_name()),
        COLOR_BRAND,
    );
    match profile.email.as_deref() {
        Some(email) => msg.field("Email", email, true),
        None => msg,
    }
}

pub(super) fn influencer_verified(
    profile: &Profile,
    handle: &str,
    metrics: &SocialMetrics,
) -> Notification {
    Notification::new(
        "Influencer verified",
        format!("{} passed the automatic audit.", profile.display_name()),
        COLOR_VERIFIED,
    )
    .field("Handle", handle, true)
    .field("Followers", metrics.followers, true)
    .field(
        "Engagement",
        format!("{:.2}%", metrics.engagement_rate),
        true,
    )
}

pub(super) fn account_not_found(profile: &Profile, handle: &str) -> Notification {
    Notification::new(
        "Account not found",
        format!("No Instagram account matched {handle}."),
        COLOR_NOT_FOUND,
    )
    .field("User", profile.display_name(), true)
    .field("Handle", handle, true)
}
