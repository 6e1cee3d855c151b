//! Domain entity definitions.

mod budget;
mod course;
mod document;
mod session;
mod user;
mod weather;

pub use budget::{BudgetCategory, BudgetReport};
pub use course::{COURSES_COLLECTION, CREATED_AT_FIELD, Course, NewCourse};
pub use document::{
    Document, DocumentId, DocumentSnapshot, FieldValue, Fields, FromDocument, PageCursor,
};
pub use session::{AuthSession, SecretToken};
pub use user::User;
pub use weather::{CurrentWeather, Forecast, ForecastSample};
