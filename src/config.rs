use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::pagination::DEFAULT_PAGE_LIMIT;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  /// Page size for paginated listings
  #[serde(default = "default_page_limit")]
  pub page_limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the chat API, e.g. https://api-APPID.sendbird.com/v3
  pub url: Url,
  pub user_agent: Option<String>,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_page_limit() -> u32 {
  DEFAULT_PAGE_LIMIT
}

fn default_timeout_secs() -> u64 {
  30
}

impl ApiConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./lazychat.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/lazychat/config.yaml
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

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/lazychat/config.yaml"
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("lazychat.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("lazychat").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Invalid config file {}: {}", path.display(), e))
  }

  /// Parse and validate a YAML document.
  pub fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;

    match config.api.url.scheme() {
      "http" | "https" => {}
      other => return Err(eyre!("API url must be http(s), got '{}'", other)),
    }
    if config.page_limit == 0 {
      return Err(eyre!("page_limit must be positive"));
    }

    Ok(config)
  }

  /// Get the chat session token from environment variables.
  ///
  /// Checks LAZYCHAT_SESSION_TOKEN first, then SENDBIRD_SESSION_KEY as fallback.
  pub fn get_session_token() -> Result<String> {
    std::env::var("LAZYCHAT_SESSION_TOKEN")
      .or_else(|_| std::env::var("SENDBIRD_SESSION_KEY"))
      .map_err(|_| {
        eyre!(
          "Session token not found. Set LAZYCHAT_SESSION_TOKEN or SENDBIRD_SESSION_KEY environment variable."
        )
      })
  }
}
