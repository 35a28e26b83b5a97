//! Persistent application configuration model and defaults.

use crate::backends::youtube::DEFAULT_API_BASE_URL;

pub const MAX_PAGE_SIZE: u32 = 50;

/// Root configuration persisted to `vidfind.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    /// YouTube Data API connection settings.
    #[serde(default)]
    pub youtube: YoutubeConfig,
    /// User-defined query profiles, merged over the built-ins.
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
}

/// YouTube Data API connection settings.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct YoutubeConfig {
    /// API key used when `YOUTUBE_API_KEY` is not set.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Results requested per search page (the API maximum is 50).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

/// Query profile declared in the config file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ProfileConfig {
    pub name: String,
    pub keyword: String,
    #[serde(default = "default_result_type")]
    pub result_type: String,
    #[serde(default = "default_order")]
    pub order: String,
    #[serde(default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub published_within_days: Option<u32>,
    #[serde(default = "default_search_part")]
    pub search_part: String,
    #[serde(default = "default_lookup_part")]
    pub lookup_part: String,
    pub required_count: usize,
    /// When set, only videos whose default audio language equals this tag are kept.
    #[serde(default)]
    pub audio_language: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_read_timeout_secs() -> u64 {
    15
}

fn default_result_type() -> String {
    "video".to_string()
}

fn default_order() -> String {
    "relevance".to_string()
}

fn default_search_part() -> String {
    "snippet".to_string()
}

fn default_lookup_part() -> String {
    "snippet".to_string()
}

fn non_empty_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Clamps numeric settings into supported ranges and normalizes blank optionals.
pub fn sanitize_config(config: Config) -> Config {
    let youtube = YoutubeConfig {
        api_key: config.youtube.api_key.trim().to_string(),
        page_size: config.youtube.page_size.clamp(1, MAX_PAGE_SIZE),
        connect_timeout_secs: config.youtube.connect_timeout_secs.max(1),
        read_timeout_secs: config.youtube.read_timeout_secs.max(1),
        ..config.youtube
    };
    let profiles = config
        .profiles
        .into_iter()
        .map(|profile| ProfileConfig {
            name: profile.name.trim().to_string(),
            region_code: non_empty_trimmed(profile.region_code),
            audio_language: non_empty_trimmed(profile.audio_language),
            ..profile
        })
        .collect();
    Config { youtube, profiles }
}

#[cfg(test)]
mod tests {
    use super::{sanitize_config, Config, MAX_PAGE_SIZE};

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: Config = toml::from_str("").expect("empty config should parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.youtube.page_size, MAX_PAGE_SIZE);
        assert_eq!(config.youtube.connect_timeout_secs, 5);
    }

    #[test]
    fn test_profile_defaults_fill_missing_fields() {
        let config: Config = toml::from_str(
            r#"
            [[profiles]]
            name = "rust-weekly"
            keyword = "rust lang"
            required_count = 25
            "#,
        )
        .expect("profile config should parse");
        let profile = &config.profiles[0];
        assert_eq!(profile.result_type, "video");
        assert_eq!(profile.order, "relevance");
        assert_eq!(profile.search_part, "snippet");
        assert_eq!(profile.region_code, None);
        assert_eq!(profile.audio_language, None);
    }

    #[test]
    fn test_sanitize_config_clamps_page_size_and_blank_optionals() {
        let mut config = Config::default();
        config.youtube.page_size = 500;
        config.youtube.api_key = "  key  ".to_string();
        config.profiles = toml::from_str::<Config>(
            r#"
            [[profiles]]
            name = " spaced "
            keyword = "k"
            required_count = 1
            region_code = "  "
            audio_language = "ja"
            "#,
        )
        .expect("profile config should parse")
        .profiles;

        let sanitized = sanitize_config(config);
        assert_eq!(sanitized.youtube.page_size, MAX_PAGE_SIZE);
        assert_eq!(sanitized.youtube.api_key, "key");
        assert_eq!(sanitized.profiles[0].name, "spaced");
        assert_eq!(sanitized.profiles[0].region_code, None);
        assert_eq!(sanitized.profiles[0].audio_language.as_deref(), Some("ja"));

        let mut config = Config::default();
        config.youtube.page_size = 0;
        assert_eq!(sanitize_config(config).youtube.page_size, 1);
    }
}
