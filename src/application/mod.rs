//! Application layer with services, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Stateful application services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{LoginMode, LoginRequest, LoginResponse};
pub use services::{BudgetService, CollectionFetcher, SessionService, WeatherService};
pub use use_cases::{AddCourseUseCase, GetCourseUseCase, LoginUseCase, RemoveCoursesUseCase};
