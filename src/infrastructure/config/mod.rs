//! Application configuration.

/// Settings file types.
pub mod app_config;
/// Command line arguments.
pub mod args;
/// State kept between runs.
pub mod state_config;
/// Reading and writing the files.
pub mod storage;

pub use app_config::{
    AppConfig, CoursesConfig, FirebaseConfig, LogLevel, SessionConfig, WeatherConfig,
};
pub use args::CliArgs;
pub use state_config::StateConfig;
pub use storage::{ConfigError, StorageManager};
