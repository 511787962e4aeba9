use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::constants;

/// User preferences persisted to `prefs.toml` in the platform config dir.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
  pub endpoint: Option<String>,
  pub max_per_page: Option<u32>,
  pub theme_name: Option<String>,
  /// External player launched while the overlay is open. Empty disables it.
  pub player_command: Option<String>,
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "mediasearch") {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(&config_file) {
        match Self::parse(&content) {
          Some(config) => return config,
          None => warn!(path = %config_file.display(), "prefs: ignoring unreadable prefs file"),
        }
      }
    }
    Self::default()
  }

  fn parse(content: &str) -> Option<Self> {
    toml::from_str(content).ok()
  }

  pub fn save(&self) {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "mediasearch") {
      let config_dir = proj_dirs.config_dir();
      if std::fs::create_dir_all(config_dir).is_ok() {
        let config_file = config_dir.join("prefs.toml");
        if let Ok(content) = toml::to_string(self) {
          let _ = std::fs::write(config_file, content);
        }
      }
    }
  }

  /// Search endpoint, CLI override first, then prefs, then the embedded default.
  pub fn resolve_endpoint(&self, cli: Option<&str>) -> String {
    cli
      .map(str::to_string)
      .or_else(|| self.endpoint.clone())
      .unwrap_or_else(|| constants().search_endpoint.clone())
  }

  pub fn resolve_max_per_page(&self, cli: Option<u32>) -> u32 {
    cli.or(self.max_per_page).filter(|n| *n > 0).unwrap_or(constants().max_per_page)
  }

  /// `None` when the user disabled the external player with an empty command.
  pub fn resolve_player_command(&self) -> Option<String> {
    let cmd = self.player_command.clone().unwrap_or_else(|| constants().player_command.clone());
    let cmd = cmd.trim().to_string();
    if cmd.is_empty() { None } else { Some(cmd) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_partial_prefs() {
    let config = Config::parse("theme_name = \"Paper\"\nmax_per_page = 5\n").unwrap();
    assert_eq!(config.theme_name.as_deref(), Some("Paper"));
    assert_eq!(config.max_per_page, Some(5));
    assert_eq!(config.endpoint, None);
  }

  #[test]
  fn parse_garbage_is_rejected() {
    assert!(Config::parse("max_per_page = \"many\"").is_none());
  }

  #[test]
  fn endpoint_precedence() {
    let config = Config { endpoint: Some("http://prefs/search".to_string()), ..Config::default() };
    assert_eq!(config.resolve_endpoint(Some("http://cli/search")), "http://cli/search");
    assert_eq!(config.resolve_endpoint(None), "http://prefs/search");
    assert_eq!(Config::default().resolve_endpoint(None), constants().search_endpoint);
  }

  #[test]
  fn max_per_page_ignores_zero() {
    let config = Config { max_per_page: Some(0), ..Config::default() };
    assert_eq!(config.resolve_max_per_page(None), constants().max_per_page);
    assert_eq!(config.resolve_max_per_page(Some(7)), 7);
  }

  #[test]
  fn empty_player_command_disables_player() {
    let config = Config { player_command: Some("  ".to_string()), ..Config::default() };
    assert_eq!(config.resolve_player_command(), None);
    assert_eq!(Config::default().resolve_player_command(), Some(constants().player_command.clone()));
  }
}
