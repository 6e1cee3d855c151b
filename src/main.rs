use std::sync::Arc;

use chrono::Duration;
use clap::Parser;
use color_eyre::eyre::{OptionExt, Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use campusdesk::application::services::{CollectionFetcher, SessionService, WeatherService};
use campusdesk::application::use_cases::{
    AddCourseUseCase, GetCourseUseCase, LoginUseCase, RemoveCoursesUseCase,
};
use campusdesk::domain::ports::{
    Clock, DocumentStorePort, IdTokenSource, KeyValueCachePort, SystemClock,
};
use campusdesk::infrastructure::{
    AppConfig, CliArgs, DiskKeyValueCache, FirebaseAuthClient, FirestoreClient, FirestoreConfig,
    KeyringSessionStorage, MemoryDocumentStore, MemoryKeyValueCache, OpenWeatherClient,
    StateConfig, StorageManager,
};
use campusdesk::presentation::{App, AppOptions, BackendServices};

/// Courses seeded into the offline catalogue.
const OFFLINE_COURSES: usize = 42;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config() -> Result<(AppConfig, StorageManager)> {
    let args = CliArgs::parse();
    let storage = StorageManager::new().wrap_err("failed to locate the config directory")?;
    let mut config = storage
        .load_config(args.config.as_deref())
        .wrap_err("failed to load configuration")?;
    config.merge_with_args(args);
    Ok((config, storage))
}

fn document_store(
    config: &AppConfig,
    tokens: Arc<dyn IdTokenSource>,
) -> Result<Arc<dyn DocumentStorePort>> {
    if config.offline {
        info!(courses = OFFLINE_COURSES, "Using the offline course catalogue");
        let store = MemoryDocumentStore::new();
        store.seed_courses(OFFLINE_COURSES);
        return Ok(Arc::new(store));
    }

    let project_id = config
        .firebase
        .project_id
        .clone()
        .ok_or_eyre("no Firebase project configured; set FIREBASE_PROJECT_ID or use --offline")?;
    let firestore = FirestoreConfig::new(project_id)
        .with_database(config.firebase.database.clone())
        .with_api_key(config.firebase.api_key.clone());

    Ok(Arc::new(FirestoreClient::new(firestore)?.with_token_source(tokens)))
}

async fn weather_cache() -> Arc<dyn KeyValueCachePort> {
    let Some(dir) = AppConfig::default_cache_dir() else {
        warn!("No cache directory available, caching weather in memory");
        return Arc::new(MemoryKeyValueCache::default());
    };
    match DiskKeyValueCache::new(dir).await {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            warn!(error = %e, "Failed to open weather cache, caching in memory");
            Arc::new(MemoryKeyValueCache::default())
        }
    }
}

async fn create_app(config: &AppConfig, state: &StateConfig) -> Result<App> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let auth = Arc::new(FirebaseAuthClient::new(
        config.firebase.api_key.clone().unwrap_or_default(),
    )?);
    let session = Arc::new(
        SessionService::new(auth, Arc::new(KeyringSessionStorage::new()))
            .with_persistence(config.session.persist),
    );
    let gate = session.subscribe();

    let store = document_store(config, session.clone())?;
    let courses = CollectionFetcher::new(store.clone(), config.courses.pager_config())
        .with_auth_gate(gate.clone());

    let weather_api = OpenWeatherClient::new(
        config.weather.base_url.clone(),
        config.weather.api_key.clone(),
    )?;
    let weather = WeatherService::new(Arc::new(weather_api), weather_cache().await, clock.clone())
        .with_ttl(Duration::minutes(config.weather.cache_minutes));

    let services = BackendServices {
        login: LoginUseCase::new(session.clone()),
        session,
        courses: Arc::new(courses),
        add_course: AddCourseUseCase::new(store.clone(), gate.clone(), clock),
        remove_courses: RemoveCoursesUseCase::new(store.clone(), gate),
        get_course: GetCourseUseCase::new(store),
        weather: Arc::new(weather),
    };

    let options = AppOptions {
        initial_city: state
            .last_city
            .clone()
            .unwrap_or_else(|| config.weather.default_city.clone()),
        restore_session: config.session.persist,
    };

    Ok(App::new(services, &options))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let (config, storage) = load_config()?;
    init_logging(&config)?;
    info!(version = campusdesk::VERSION, offline = config.offline, "Starting campusdesk");

    let mut state = storage.load_state().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load saved state");
        StateConfig::default()
    });

    let app = create_app(&config, &state).await?;

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    let last_city = result?;
    state.last_city = Some(last_city).filter(|city| !city.is_empty());
    if let Err(e) = storage.save_state(&state) {
        warn!(error = %e, "Failed to save state");
    }

    Ok(())
}
