//! Configuration management for Blogcast
//!
//! Configuration is TOML by default. Files ending in `.json` are read as JSON
//! so existing `social_config.json` files keep working.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, Result};

/// Platforms shared to when neither the command line nor the config says otherwise
pub const DEFAULT_PLATFORMS: [&str; 3] = ["twitter", "bluesky", "linkedin"];

const LOCAL_CONFIG: &str = "blogcast.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub defaults: DefaultsConfig,
    pub twitter: Option<TwitterConfig>,
    pub bluesky: Option<BlueskyConfig>,
    pub linkedin: Option<LinkedInConfig>,
    pub templates: HashMap<String, TemplateConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL posts are published under, without a trailing slash
    pub base_url: String,
    pub content_dir: String,
    pub history_file: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://blog.example.com".to_string(),
            content_dir: "content/posts".to_string(),
            history_file: "posted_posts.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub platforms: Vec<String>,
    /// How many of the newest posts are considered per run
    pub limit: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            platforms: DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect(),
            limit: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitterConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub access_token: Option<String>,
    pub access_token_secret: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueskyConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    /// PDS base URL, `https://bsky.social` when unset
    pub service: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInConfig {
    pub access_token: Option<String>,
    /// `urn:li:person:<id>`; looked up from the token when unset
    pub author_urn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub format: Option<String>,
    pub limit: Option<usize>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from_path(&resolve_config_path())
    }

    /// Load configuration from a specific path
    ///
    /// A missing file is not an error: the default configuration is returned
    /// and every platform will report missing credentials when used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file not found: {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content).map_err(ConfigError::ParseJson)?;
        Ok(config)
    }

    /// Content directory with `~` and environment variables expanded
    pub fn content_dir(&self) -> PathBuf {
        expand_path(&self.site.content_dir)
    }

    /// History file path with `~` and environment variables expanded
    pub fn history_path(&self) -> PathBuf {
        expand_path(&self.site.history_file)
    }
}

fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}

/// Resolve the configuration file path
///
/// `BLOGCAST_CONFIG` wins, then `./blogcast.toml` when present, then
/// `blogcast/config.toml` under the XDG config directory. Without a config
/// directory the local `blogcast.toml` path is used even if it is missing.
pub fn resolve_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("BLOGCAST_CONFIG") {
        return PathBuf::from(shellexpand::tilde(&path).to_string());
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return local;
    }

    user_config_path(dirs::config_dir())
}

fn user_config_path(config_dir: Option<PathBuf>) -> PathBuf {
    match config_dir {
        Some(dir) => dir.join("blogcast").join("config.toml"),
        None => PathBuf::from(LOCAL_CONFIG),
    }
}
