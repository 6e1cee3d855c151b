use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "campusdesk",
    version,
    about = "Browse and manage university courses from the terminal",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Firebase web API key.
    #[arg(long, env = "FIREBASE_API_KEY", hide_env_values = true)]
    pub firebase_api_key: Option<String>,

    /// Firebase project id.
    #[arg(long, env = "FIREBASE_PROJECT_ID")]
    pub firebase_project_id: Option<String>,

    /// `OpenWeatherMap` API key.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub weather_api_key: Option<String>,

    /// Courses shown per page.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: Option<u32>,

    /// Hide the course catalogue until signed in.
    #[arg(long)]
    pub require_auth: Option<bool>,

    /// Do not keep the session in the system keyring.
    #[arg(long)]
    pub no_persist_session: bool,

    /// Browse a built-in sample catalogue instead of Firestore.
    #[arg(long)]
    pub offline: bool,
}
