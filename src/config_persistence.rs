use std::path::{Path, PathBuf};

use log::{info, warn};
use toml_edit::{value, DocumentMut, Item, Table};

use crate::config::{sanitize_config, Config};
use crate::error::{FindError, Result};

const CONFIG_FILE_NAME: &str = "vidfind.toml";

fn set_table_value_preserving_decor(table: &mut Table, key: &str, item: Item) {
    let existing_value_decor = table
        .get(key)
        .and_then(|current| current.as_value().map(|value| value.decor().clone()));
    table[key] = item;
    if let Some(existing_value_decor) = existing_value_decor {
        if let Some(next_value) = table[key].as_value_mut() {
            *next_value.decor_mut() = existing_value_decor;
        }
    }
}

fn ensure_section_table(document: &mut DocumentMut, key: &str) {
    let root = document.as_table_mut();
    let should_replace = !matches!(root.get(key), Some(item) if item.is_table());
    if should_replace {
        root.insert(key, Item::Table(Table::new()));
    }
}

/// Default location of the config file inside the platform config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}

pub fn config_template_text() -> &'static str {
    include_str!("../config/vidfind.default.toml")
}

/// Loads and sanitizes the config file. A missing file yields defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let config_content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!(
                "Config file not found. Using defaults. path={}",
                path.display()
            );
            return Ok(Config::default());
        }
        Err(err) => {
            return Err(FindError::Config(format!(
                "failed to read {}: {}",
                path.display(),
                err
            )))
        }
    };
    let config = toml::from_str::<Config>(&config_content)?;
    Ok(sanitize_config(config))
}

/// Writes the commented config template. Returns `false` when a file already exists.
pub fn init_config_file(path: &Path) -> Result<bool> {
    if path.exists() {
        warn!(
            "Config file already exists. Leaving it untouched. path={}",
            path.display()
        );
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, config_template_text())?;
    info!("Created config file. path={}", path.display());
    Ok(true)
}

/// Returns `existing_text` with `youtube.api_key` replaced, keeping comments and other keys.
pub fn serialize_api_key_with_preserved_comments(
    existing_text: &str,
    api_key: &str,
) -> Result<String> {
    let mut document = existing_text.parse::<DocumentMut>()?;
    ensure_section_table(&mut document, "youtube");
    if let Some(youtube) = document["youtube"].as_table_mut() {
        set_table_value_preserving_decor(youtube, "api_key", value(api_key.trim()));
    }
    let updated = document.to_string();
    toml::from_str::<Config>(&updated)?;
    Ok(updated)
}

pub fn persist_api_key(path: &Path, api_key: &str) -> Result<()> {
    let existing_text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            config_template_text().to_string()
        }
        Err(err) => return Err(err.into()),
    };
    let config_text = serialize_api_key_with_preserved_comments(&existing_text, api_key)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, config_text)?;
    info!("Stored api key in config file. path={}", path.display());
    Ok(())
}
