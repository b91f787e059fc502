use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use backoffice_core::{
    ItemType, Msg, Resource, SortDirection, SortKey, StatusFilter, TypeFilter, DEFAULT_PAGE_SIZE,
};
use backoffice_engine::ClientSettings;
use backoffice_logging::{parse_level, LevelFilter};
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

pub const CONFIG_PATH_ENV: &str = "BACKOFFICE_CONFIG";
pub const API_URL_ENV: &str = "BACKOFFICE_API_URL";
pub const TOKEN_ENV: &str = "BACKOFFICE_TOKEN";
const DEFAULT_CONFIG_PATH: &str = "./backoffice.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration in {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
    #[error("unknown item type {0:?}")]
    ItemType(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let settings = ClientSettings::default();
        Self {
            base_url: settings.base_url,
            bearer_token: settings.bearer_token,
            connect_timeout_ms: settings.connect_timeout.as_millis() as u64,
            request_timeout_ms: settings.request_timeout.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Driver configuration, read from a RON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub resource: Resource,
    pub page_size: usize,
    pub log_level: String,
    pub log_destination: LogDestination,
    pub search: Option<String>,
    pub status: Option<String>,
    pub item_type: Option<String>,
    pub sort: Option<SortConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            resource: Resource::default(),
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
            log_destination: LogDestination::default(),
            search: None,
            status: None,
            item_type: None,
            sort: None,
        }
    }
}

impl AppConfig {
    /// Reads `$BACKOFFICE_CONFIG` (or `./backoffice.ron`) and applies the
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(TOKEN_ENV).filter(|value| !value.trim().is_empty()) {
            self.api.bearer_token = Some(token);
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api.base_url.clone(),
            bearer_token: self.api.bearer_token.clone(),
            connect_timeout: Duration::from_millis(self.api.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.api.request_timeout_ms),
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        parse_level(&self.log_level).ok_or_else(|| ConfigError::LogLevel(self.log_level.clone()))
    }

    /// Messages that put a fresh page into the configured starting view.
    pub fn initial_messages(&self) -> Result<Vec<Msg>, ConfigError> {
        let mut messages = Vec::new();
        if let Some(search) = &self.search {
            messages.push(Msg::SearchChanged(search.clone()));
        }
        if let Some(status) = &self.status {
            messages.push(Msg::StatusFilterChanged(StatusFilter::Only(status.clone())));
        }
        if let Some(name) = &self.item_type {
            let item_type: ItemType = name
                .parse()
                .map_err(|_| ConfigError::ItemType(name.clone()))?;
            messages.push(Msg::TypeFilterChanged(TypeFilter::Only(item_type)));
        }
        if let Some(sort) = self.sort {
            messages.push(Msg::SortRequested(sort.key));
            // A repeated request on the same key flips the direction.
            if sort.direction == SortDirection::Descending {
                messages.push(Msg::SortRequested(sort.key));
            }
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.page_size, 10);
        assert_eq!(config.resource, Resource::Annonces);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backoffice.ron");
        fs::write(
            &path,
            r#"(
                api: (base_url: "https://admin.example.org/api", bearer_token: Some("t0k")),
                resource: dons,
                page_size: 25,
                log_destination: Both,
                sort: Some((key: created_at, direction: descending)),
            )"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();

        assert_eq!(config.resource, Resource::Dons);
        assert_eq!(config.page_size, 25);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.api.bearer_token.as_deref(), Some("t0k"));
        assert_eq!(config.api.request_timeout_ms, 30_000);
        assert_eq!(config.log_level, "info");
        assert_eq!(
            config.sort,
            Some(SortConfig {
                key: SortKey::CreatedAt,
                direction: SortDirection::Descending
            })
        );
    }

    #[test]
    fn broken_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backoffice.ron");
        fs::write(&path, "(page_size: \"ten\")").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn environment_overrides_api_access() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            API_URL_ENV => Some("https://staging.example.org/api".to_string()),
            TOKEN_ENV => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config.api.base_url, "https://staging.example.org/api");
        assert_eq!(config.api.bearer_token, None);

        let settings = config.client_settings();
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn initial_messages_follow_the_config() {
        let config = AppConfig {
            search: Some("lampe".to_string()),
            item_type: Some("don".to_string()),
            sort: Some(SortConfig {
                key: SortKey::Title,
                direction: SortDirection::Descending,
            }),
            ..AppConfig::default()
        };

        assert_eq!(
            config.initial_messages().unwrap(),
            vec![
                Msg::SearchChanged("lampe".to_string()),
                Msg::TypeFilterChanged(TypeFilter::Only(ItemType::Donation)),
                Msg::SortRequested(SortKey::Title),
                Msg::SortRequested(SortKey::Title),
            ]
        );

        let bad = AppConfig {
            item_type: Some("spaceship".to_string()),
            ..AppConfig::default()
        };
        assert!(matches!(bad.initial_messages(), Err(ConfigError::ItemType(_))));
    }

    #[test]
    fn log_level_is_validated() {
        let mut config = AppConfig::default();
        assert_eq!(config.log_level().unwrap(), LevelFilter::Info);
        config.log_level = "chatty".to_string();
        assert!(config.log_level().is_err());
    }
}
