use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "JARCHIVE";

/// Runtime settings: built-in defaults, then `JARCHIVE_*` environment
/// variables. CLI flags are applied on top by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub output_dir: String,
    pub delay_secs: f64,
    pub season_delay_secs: f64,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub base_backoff_ms: u64,
    pub user_agent: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_builder(Config::builder().add_source(
            Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        ))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .set_default("base_url", "https://j-archive.com")?
            .set_default("output_dir", "output")?
            .set_default("delay_secs", 1.0)?
            .set_default("season_delay_secs", 1.5)?
            .set_default("timeout_secs", 30)?
            .set_default("max_retries", 3)?
            .set_default("base_backoff_ms", 2000)?
            .set_default(
                "user_agent",
                concat!("jarchive_scraper/", env!("CARGO_PKG_VERSION")),
            )?
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn game_url(&self, game_id: u32) -> String {
        format!(
            "{}/showgame.php?game_id={}",
            self.base_url.trim_end_matches('/'),
            game_id
        )
    }

    /// A full URL is used as-is; anything else is a season code ("42", "pcj").
    pub fn season_url(&self, season: &str) -> String {
        if season.starts_with("http") {
            season.to_string()
        } else {
            format!(
                "{}/showseason.php?season={}",
                self.base_url.trim_end_matches('/'),
                season
            )
        }
    }
}
