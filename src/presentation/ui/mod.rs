//! UI screens.

mod app;
mod backend;
mod budget_screen;
mod courses_screen;
mod login_screen;
mod weather_screen;

pub use app::{App, AppOptions};
pub use backend::{Action, Backend, BackendCommand, BackendServices};
pub use budget_screen::{BudgetAction, BudgetScreen};
pub use courses_screen::{CoursesAction, CoursesScreen};
pub use login_screen::{LoginAction, LoginScreen, LoginState};
pub use weather_screen::{WeatherAction, WeatherScreen};
