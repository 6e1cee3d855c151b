//! Application services.

/// Randomized budget reports.
pub mod budget_service;
/// Cursor-based paging over a collection.
pub mod pagination;
/// Signed-in state and its persistence.
pub mod session_service;
/// Cached weather lookups.
pub mod weather_service;

pub use budget_service::{BudgetService, generate_budget};
pub use pagination::{CollectionFetcher, Navigation, PageView, PagerConfig};
pub use session_service::{SessionService, Subscription};
pub use weather_service::{DEFAULT_CITY, WeatherService};
