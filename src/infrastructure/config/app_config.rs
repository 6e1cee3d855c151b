//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;
use crate::application::services::pagination::{DEFAULT_PAGE_SIZE, PagerConfig};
use crate::application::services::weather_service::DEFAULT_CITY;
use crate::domain::entities::{COURSES_COLLECTION, CREATED_AT_FIELD};

pub(crate) const APP_NAME: &str = "campusdesk";
pub(crate) const APP_QUALIFIER: &str = "edu";
pub(crate) const APP_ORGANIZATION: &str = "campusdesk";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI
/// arguments.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Serve courses from an in-memory sample catalogue.
    #[serde(skip)]
    pub offline: bool,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Firebase project settings.
    #[serde(default)]
    pub firebase: FirebaseConfig,

    /// Course browser settings.
    #[serde(default)]
    pub courses: CoursesConfig,

    /// Weather settings.
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Session settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Firebase project settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Web API key of the project.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Firebase project id.
    #[serde(default)]
    pub project_id: Option<String>,

    /// Firestore database id.
    #[serde(default = "default_database")]
    pub database: String,
}

/// Course browser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursesConfig {
    /// Records per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Field courses are ordered by.
    #[serde(default = "default_sort_field")]
    pub sort_field: String,

    /// Count the collection with every page fetch.
    #[serde(default = "default_true")]
    pub refresh_total: bool,

    /// Hide the catalogue from signed-out users.
    #[serde(default)]
    pub require_auth: bool,
}

impl Default for CoursesConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: default_sort_field(),
            refresh_total: true,
            require_auth: false,
        }
    }
}

impl CoursesConfig {
    /// Pager settings for the courses collection.
    #[must_use]
    pub fn pager_config(&self) -> PagerConfig {
        PagerConfig::new(COURSES_COLLECTION)
            .with_page_size(self.page_size)
            .with_sort_field(self.sort_field.clone())
            .with_refresh_total(self.refresh_total)
            .with_require_auth(self.require_auth)
    }
}

/// Weather widget settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// `OpenWeatherMap` API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the weather API.
    #[serde(default = "default_weather_url")]
    pub base_url: String,

    /// City shown when nothing was looked up before.
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Minutes a cached reading stays valid.
    #[serde(default = "default_cache_minutes")]
    pub cache_minutes: i64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_url(),
            default_city: default_city(),
            cache_minutes: default_cache_minutes(),
        }
    }
}

/// Session persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Keep the refresh token in the system keyring between runs.
    #[serde(default = "default_true")]
    pub persist: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { persist: true }
    }
}

fn default_true() -> bool {
    true
}

fn default_database() -> String {
    "(default)".to_string()
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_sort_field() -> String {
    CREATED_AT_FIELD.to_string()
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

const fn default_cache_minutes() -> i64 {
    30
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_key) = args.firebase_api_key {
            self.firebase.api_key = Some(api_key);
        }
        if let Some(project_id) = args.firebase_project_id {
            self.firebase.project_id = Some(project_id);
        }
        if let Some(api_key) = args.weather_api_key {
            self.weather.api_key = Some(api_key);
        }
        if let Some(page_size) = args.page_size {
            self.courses.page_size = page_size;
        }
        if let Some(require_auth) = args.require_auth {
            self.courses.require_auth = require_auth;
        }
        if args.no_persist_session {
            self.session.persist = false;
        }
        self.offline = args.offline;
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("campusdesk.log"))
    }

    /// Returns the directory of the weather cache.
    #[must_use]
    pub fn default_cache_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.cache_dir().join("weather"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            offline: false,
            log_level: LogLevel::Info,
            firebase: FirebaseConfig {
                database: default_database(),
                ..FirebaseConfig::default()
            },
            courses: CoursesConfig::default(),
            weather: WeatherConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [firebase]
            api_key = "AIza-test"
            project_id = "campus-1234"

            [courses]
            page_size = 25
            require_auth = true
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.firebase.project_id.as_deref(), Some("campus-1234"));
        assert_eq!(config.firebase.database, "(default)");
        assert_eq!(config.courses.page_size, 25);
        assert_eq!(config.courses.sort_field, "created_at");
        assert!(config.courses.refresh_total);
        assert_eq!(config.weather.default_city, "London");
        assert_eq!(config.weather.cache_minutes, 30);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.courses.page_size, 15);
        assert!(!config.courses.require_auth);
        assert!(config.session.persist);
        assert!(config.weather.api_key.is_none());
    }

    #[test]
    fn test_args_override_file() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "campusdesk",
            "--page-size",
            "5",
            "--no-persist-session",
            "--offline",
        ]);

        config.merge_with_args(args);

        assert_eq!(config.courses.page_size, 5);
        assert!(!config.session.persist);
        assert!(config.offline);
    }

    #[test]
    fn test_pager_config_from_courses() {
        let courses = CoursesConfig {
            page_size: 10,
            require_auth: true,
            ..CoursesConfig::default()
        };
        let pager = courses.pager_config();

        assert_eq!(pager.collection, "courses");
        assert_eq!(pager.page_size, 10);
        assert!(pager.require_auth);
    }
}
