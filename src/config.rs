use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Bot configuration, usually loaded from `config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Command prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// The bot's own user id; when set, mentioning the bot also works as a prefix
    #[serde(default)]
    pub bot_user_id: Option<u64>,

    /// Longest text content sent as-is before rerouting through the paste service
    #[serde(default = "default_content_limit")]
    pub content_limit: usize,

    /// Base URL of the paste service
    #[serde(default = "default_paste_url")]
    pub paste_url: String,

    /// Base URL of FishBase
    #[serde(default = "default_fishbase_url")]
    pub fishbase_url: String,

    /// Search endpoint of LiveAquaria; the query is appended as a path segment
    #[serde(default = "default_liveaquaria_search_url")]
    pub liveaquaria_search_url: String,

    /// Site root of LiveAquaria, used to absolutise product images
    #[serde(default = "default_liveaquaria_site_url")]
    pub liveaquaria_site_url: String,

    /// Maximum number of search results shown
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// Idle timeout of paginated results (none keeps them open)
    #[serde(default)]
    pub paginator_timeout_secs: Option<u64>,

    /// Idle timeout of the equation keypad
    #[serde(default = "default_calculator_timeout")]
    pub calculator_timeout_secs: u64,

    /// Timeout for outbound HTTP requests
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            bot_user_id: None,
            content_limit: default_content_limit(),
            paste_url: default_paste_url(),
            fishbase_url: default_fishbase_url(),
            liveaquaria_search_url: default_liveaquaria_search_url(),
            liveaquaria_site_url: default_liveaquaria_site_url(),
            result_limit: default_result_limit(),
            paginator_timeout_secs: None,
            calculator_timeout_secs: default_calculator_timeout(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl BotConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply `AQUABOT_PREFIX` and `AQUABOT_PASTE_URL` overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(prefix) = lookup("AQUABOT_PREFIX").filter(|v| !v.is_empty()) {
            self.prefix = prefix;
        }
        if let Some(paste_url) = lookup("AQUABOT_PASTE_URL").filter(|v| !v.is_empty()) {
            self.paste_url = paste_url;
        }
        self
    }

    pub fn paginator_timeout(&self) -> Option<Duration> {
        self.paginator_timeout_secs.map(Duration::from_secs)
    }

    pub fn calculator_timeout(&self) -> Duration {
        Duration::from_secs(self.calculator_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_prefix() -> String {
    "a!".to_string()
}

fn default_content_limit() -> usize {
    4000
}

fn default_paste_url() -> String {
    "https://mystb.in".to_string()
}

fn default_fishbase_url() -> String {
    "https://fishbase.se".to_string()
}

fn default_liveaquaria_search_url() -> String {
    "https://aquarium-fish.liveaquaria.com/api/Search/".to_string()
}

fn default_liveaquaria_site_url() -> String {
    "https://www.liveaquaria.com".to_string()
}

fn default_result_limit() -> usize {
    10
}

fn default_calculator_timeout() -> u64 {
    300
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("aquabot/", env!("CARGO_PKG_VERSION")).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = BotConfig::from_json("{}").unwrap();
        assert_eq!(config.prefix, "a!");
        assert_eq!(config.content_limit, 4000);
        assert_eq!(config.paginator_timeout(), None);
        assert_eq!(config.calculator_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_partial_config() {
        let config = BotConfig::from_json(
            r#"{"prefix": "?", "bot_user_id": 42, "paginator_timeout_secs": 60}"#,
        )
        .unwrap();
        assert_eq!(config.prefix, "?");
        assert_eq!(config.bot_user_id, Some(42));
        assert_eq!(config.paginator_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.fishbase_url, "https://fishbase.se");
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = BotConfig::from_json("{prefix").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_overrides_skip_empty_values() {
        let config = BotConfig::default().with_overrides(|key| match key {
            "AQUABOT_PREFIX" => Some(String::new()),
            "AQUABOT_PASTE_URL" => Some("http://paste.local".to_string()),
            _ => None,
        });
        assert_eq!(config.prefix, "a!");
        assert_eq!(config.paste_url, "http://paste.local");
    }
}
