//! API credential resolution.

use log::debug;

use crate::config::YoutubeConfig;

pub const API_KEY_ENV_VAR: &str = "YOUTUBE_API_KEY";

/// Source of the YouTube Data API key.
pub trait CredentialProvider {
    fn api_key(&self) -> Option<String>;
}

/// Environment variable first, then the config file value.
pub struct EnvThenConfigCredentials {
    env_value: Option<String>,
    config_value: String,
}

impl EnvThenConfigCredentials {
    pub fn from_env(config: &YoutubeConfig) -> Self {
        Self::new(std::env::var(API_KEY_ENV_VAR).ok(), config)
    }

    pub fn new(env_value: Option<String>, config: &YoutubeConfig) -> Self {
        Self {
            env_value,
            config_value: config.api_key.clone(),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl CredentialProvider for EnvThenConfigCredentials {
    fn api_key(&self) -> Option<String> {
        if let Some(key) = self.env_value.as_deref().and_then(non_blank) {
            debug!("Using api key from {}", API_KEY_ENV_VAR);
            return Some(key);
        }
        let key = non_blank(&self.config_value);
        if key.is_some() {
            debug!("Using api key from config file");
        }
        key
    }
}
