use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable that overrides `api.url`
pub const API_URL_ENV: &str = "BLOGTUI_API_URL";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  /// Custom title for header (defaults to the API host if not set)
  pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_api_url")]
  pub url: String,
  /// Request timeout; requests wait indefinitely when unset
  pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      url: default_api_url(),
      timeout_secs: None,
    }
  }
}

impl ApiConfig {
  /// Parse and validate the configured base URL.
  pub fn base_url(&self) -> Result<Url> {
    let url = Url::parse(&self.url).map_err(|e| eyre!("Invalid API url '{}': {}", self.url, e))?;
    if url.cannot_be_a_base() {
      return Err(eyre!("API url '{}' cannot be used as a base", self.url));
    }
    Ok(url)
  }
}

fn default_api_url() -> String {
  "http://localhost:3001".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Seconds before a cached response is refetched on the next view mount
  #[serde(default = "default_stale_secs")]
  pub stale_secs: u64,
  /// Extra attempts after a failed fetch
  #[serde(default = "default_retry")]
  pub retry: u32,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      stale_secs: default_stale_secs(),
      retry: default_retry(),
    }
  }
}

impl CacheConfig {
  pub fn stale_time(&self) -> Duration {
    Duration::from_secs(self.stale_secs)
  }
}

fn default_stale_secs() -> u64 {
  60
}

fn default_retry() -> u32 {
  1
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./blogtui.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/blogtui/config.yaml
  ///
  /// Falls back to defaults when no file exists. `BLOGTUI_API_URL`
  /// overrides the file's API url.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    if let Ok(url) = std::env::var(API_URL_ENV) {
      config.api.url = url;
    }

    config.api.base_url()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("blogtui.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("blogtui").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    // An empty file deserializes to unit, not an empty map
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Header title: configured title or the API host
  pub fn display_title(&self) -> String {
    if let Some(title) = &self.title {
      return title.clone();
    }
    self
      .api
      .base_url()
      .ok()
      .and_then(|u| {
        u.host_str().map(|h| match u.port() {
          Some(port) => format!("{}:{}", h, port),
          None => h.to_string(),
        })
      })
      .unwrap_or_else(|| self.api.url.clone())
  }
}
