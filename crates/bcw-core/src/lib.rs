//! Shared domain types and configuration for the BrandConnect worker.

pub mod app_config;
pub mod campaign;
pub mod config;
pub mod profile;
pub mod stats;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, StoreBackend, TaskIntervals};
pub use campaign::{Application, ApplicationStatus, Campaign};
pub use config::{load_app_config, load_app_config_from_env};
pub use profile::{handle_from_name, resolve_handle, HandleSource, Profile, ResolvedHandle, Role};
pub use stats::{
    draw_activity_increment, draw_growth, likes_for, BrandCampaignStat, CampaignStat,
    GrowthStep, StatsSnapshot, Totals,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
