//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Feed gateway HTTP settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Operator-supplied file locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Streaming contact lookup settings
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Relevance scoring weights and thresholds
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Initial filter criteria
    #[serde(default)]
    pub filter: FilterConfig,

    /// Auto-refresh settings
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.gateway.base_url.trim().is_empty() {
            return Err(AppError::validation("gateway.base_url is empty"));
        }
        if self.gateway.user_agent.trim().is_empty() {
            return Err(AppError::validation("gateway.user_agent is empty"));
        }
        if self.gateway.timeout_secs == 0 {
            return Err(AppError::validation("gateway.timeout_secs must be > 0"));
        }
        if self.gateway.page_size == 0 {
            return Err(AppError::validation("gateway.page_size must be > 0"));
        }
        if self.lookup.chunk_size == 0 {
            return Err(AppError::validation("lookup.chunk_size must be > 0"));
        }
        if self.refresh.period_secs == 0 {
            return Err(AppError::validation("refresh.period_secs must be > 0"));
        }
        if self.paths.token_file.trim().is_empty() {
            return Err(AppError::validation("paths.token_file is empty"));
        }
        if self.paths.groups_file.trim().is_empty() {
            return Err(AppError::validation("paths.groups_file is empty"));
        }
        Ok(())
    }
}

/// Feed gateway HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the feed gateway
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Feed entries requested per page
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Delay between per-group requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            page_size: defaults::page_size(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Locations of operator-supplied files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Text file holding the access token
    #[serde(default = "defaults::token_file")]
    pub token_file: String,

    /// JSON array of group identifiers to monitor
    #[serde(default = "defaults::groups_file")]
    pub groups_file: String,

    /// Optional JSON array of scoring/filtering keywords
    #[serde(default)]
    pub keywords_file: Option<String>,

    /// Optional JSON array of exclude keywords
    #[serde(default)]
    pub exclude_keywords_file: Option<String>,

    /// Optional identifier-to-contact mapping file
    #[serde(default)]
    pub mapping_file: Option<String>,

    /// Directory for CSV/JSON reports
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            token_file: defaults::token_file(),
            groups_file: defaults::groups_file(),
            keywords_file: None,
            exclude_keywords_file: None,
            mapping_file: None,
            output_dir: defaults::output_dir(),
        }
    }
}

/// Streaming contact lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Window size in bytes for streaming reads of the mapping file
    #[serde(default = "defaults::chunk_size")]
    pub chunk_size: usize,

    /// Resolve contacts for all post authors after ingestion
    #[serde(default)]
    pub auto_resolve: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            chunk_size: defaults::chunk_size(),
            auto_resolve: false,
        }
    }
}

/// Relevance scoring weights and alert thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Points per keyword found in the post message
    #[serde(default = "defaults::keyword_points")]
    pub keyword_points: u32,

    /// Points per comment attached to the post
    #[serde(default = "defaults::comment_points")]
    pub comment_points: u32,

    /// Flat points when the post carries at least one image
    #[serde(default = "defaults::image_points")]
    pub image_points: u32,

    /// Score above which a newly created customer triggers an alert
    #[serde(default = "defaults::alert_threshold")]
    pub alert_threshold: u32,

    /// Score above which a post counts as high-scoring
    #[serde(default = "defaults::highlight_threshold")]
    pub highlight_threshold: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            keyword_points: defaults::keyword_points(),
            comment_points: defaults::comment_points(),
            image_points: defaults::image_points(),
            alert_threshold: defaults::alert_threshold(),
            highlight_threshold: defaults::highlight_threshold(),
        }
    }
}

/// Initial filter criteria applied to the working post collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Date window: all, today, week, or month
    #[serde(default)]
    pub date_window: DateWindow,

    /// Minimum score for inclusion
    #[serde(default)]
    pub min_score: u32,

    /// Free-text search query
    #[serde(default)]
    pub query: String,

    /// Apply the keyword allow/deny stage
    #[serde(default)]
    pub keywords_enabled: bool,

    /// Interpret allow-keywords as regular expressions
    #[serde(default)]
    pub regex_mode: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            date_window: DateWindow::All,
            min_score: 0,
            query: String::new(),
            keywords_enabled: false,
            regex_mode: false,
        }
    }
}

/// Date window for post filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateWindow {
    /// Maximum post age in whole days, or `None` for no limit.
    pub fn max_age_days(self) -> Option<i64> {
        match self {
            DateWindow::All => None,
            DateWindow::Today => Some(0),
            DateWindow::Week => Some(7),
            DateWindow::Month => Some(30),
        }
    }
}

/// Auto-refresh settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between automatic incremental ingestions
    #[serde(default = "defaults::refresh_period")]
    pub period_secs: u64,

    /// What an incremental ingestion does for a group with no stored cursor
    #[serde(default)]
    pub no_cursor_policy: NoCursorPolicy,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            period_secs: defaults::refresh_period(),
            no_cursor_policy: NoCursorPolicy::default(),
        }
    }
}

/// Behavior of an incremental ingestion for a group lacking a stored cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoCursorPolicy {
    /// Nothing to fetch; the group is skipped
    #[default]
    Skip,
    /// Fetch the first page again
    FirstPage,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (error, warn, info, debug, trace)
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Gateway defaults
    pub fn base_url() -> String {
        "https://graph.facebook.com/v19.0".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; leadwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn page_size() -> u32 {
        25
    }
    pub fn request_delay() -> u64 {
        100
    }

    // Path defaults
    pub fn token_file() -> String {
        "data/token.txt".into()
    }
    pub fn groups_file() -> String {
        "data/groups.json".into()
    }
    pub fn output_dir() -> String {
        "output".into()
    }

    // Lookup defaults
    pub fn chunk_size() -> usize {
        1024 * 1024
    }

    // Scoring defaults
    pub fn keyword_points() -> u32 {
        10
    }
    pub fn comment_points() -> u32 {
        2
    }
    pub fn image_points() -> u32 {
        5
    }
    pub fn alert_threshold() -> u32 {
        20
    }
    pub fn highlight_threshold() -> u32 {
        15
    }

    // Refresh defaults
    pub fn refresh_period() -> u64 {
        300
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_chunk_size() {
        let mut config = Config::default();
        config.lookup.chunk_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.gateway.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_refresh_period() {
        let mut config = Config::default();
        config.refresh.period_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn date_window_thresholds() {
        assert_eq!(DateWindow::All.max_age_days(), None);
        assert_eq!(DateWindow::Today.max_age_days(), Some(0));
        assert_eq!(DateWindow::Week.max_age_days(), Some(7));
        assert_eq!(DateWindow::Month.max_age_days(), Some(30));
    }

    #[test]
    fn no_cursor_policy_parses_kebab_case() {
        let config: Config = toml::from_str(
            r#"
            [refresh]
            no_cursor_policy = "first-page"
            "#,
        )
        .unwrap();
        assert_eq!(config.refresh.no_cursor_policy, NoCursorPolicy::FirstPage);
    }
}
