//! Domain types and configuration shared by the darazscout crates.

pub mod app_config;
pub mod config;
pub mod products;
pub mod session;

pub use app_config::{AppConfig, LlmModel};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{filter_by_stages, sort_products, FunnelStage, Product, SortKey};
pub use session::{ChatMessage, ChatRole, ScrapeStats, SessionState};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid funnel stage: {0}")]
    InvalidFunnelStage(String),

    #[error("invalid sort key: {0}")]
    InvalidSortKey(String),

    #[error("unsupported model: {0}")]
    InvalidModel(String),
}
