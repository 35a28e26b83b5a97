//! Error taxonomy shared by the collection core, the adapters and the CLI.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FindError>;

#[derive(Debug, Error)]
pub enum FindError {
    #[error("cannot find api key (set YOUTUBE_API_KEY or youtube.api_key in the config file)")]
    MissingCredential,

    #[error("{operation} failed: {detail}")]
    SourceUnavailable { operation: String, detail: String },

    #[error("can not get API result: the source returned no items")]
    NoResults,

    #[error("not exist find type: {0}")]
    UnknownProfile(String),

    #[error("invalid query profile: {0}")]
    InvalidProfile(String),

    #[error("collection cancelled before the quota was reached")]
    Cancelled,

    #[error("config error: {0}")]
    Config(String),
}

impl FindError {
    pub fn source_unavailable(operation: &str, detail: impl Into<String>) -> Self {
        FindError::SourceUnavailable {
            operation: operation.to_string(),
            detail: detail.into(),
        }
    }

    /// Process exit status used by the CLI for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            FindError::MissingCredential => 2,
            FindError::SourceUnavailable { .. } => 3,
            FindError::NoResults => 4,
            FindError::UnknownProfile(_) => 5,
            FindError::InvalidProfile(_) => 6,
            FindError::Cancelled => 7,
            FindError::Config(_) => 8,
        }
    }
}

impl From<toml::de::Error> for FindError {
    fn from(err: toml::de::Error) -> Self {
        FindError::Config(err.to_string())
    }
}

impl From<toml_edit::TomlError> for FindError {
    fn from(err: toml_edit::TomlError) -> Self {
        FindError::Config(err.to_string())
    }
}

impl From<std::io::Error> for FindError {
    fn from(err: std::io::Error) -> Self {
        FindError::Config(err.to_string())
    }
}
