//! Add course use case implementation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::services::pagination::AuthGate;
use crate::domain::entities::{COURSES_COLLECTION, DocumentId, NewCourse};
use crate::domain::errors::CourseError;
use crate::domain::ports::{Clock, DocumentStorePort};

/// Stores a new course on behalf of the signed-in user.
#[derive(Clone)]
pub struct AddCourseUseCase {
    store: Arc<dyn DocumentStorePort>,
    auth: AuthGate,
    clock: Arc<dyn Clock>,
}

impl AddCourseUseCase {
    /// Creates the use case.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStorePort>, auth: AuthGate, clock: Arc<dyn Clock>) -> Self {
        Self { store, auth, clock }
    }

    /// Rejects blank fields locally, then stores the course, stamping its creation time.
    ///
    /// # Errors
    /// Returns error if signed out, a field is blank or the store fails.
    pub async fn execute(&self, course: NewCourse) -> Result<DocumentId, CourseError> {
        if self.auth.borrow().is_none() {
            return Err(CourseError::NotSignedIn);
        }
        if let Some(field) = course.first_blank_field() {
            return Err(CourseError::BlankField { field });
        }

        let fields = course.into_fields(self.clock.now());
        let id = self
            .store
            .add(COURSES_COLLECTION, fields)
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to add course"))?;

        info!(course_id = %id, "Course added");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tokio::sync::watch;

    use crate::domain::entities::{CREATED_AT_FIELD, FieldValue, User};
    use crate::domain::ports::mocks::{ManualClock, MockDocumentStore};

    fn use_case(
        store: &Arc<MockDocumentStore>,
        user: Option<User>,
    ) -> (AddCourseUseCase, watch::Sender<Option<User>>) {
        let (tx, rx) = watch::channel(user);
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap(),
        ));
        (AddCourseUseCase::new(store.clone(), rx, clock), tx)
    }

    #[tokio::test]
    async fn test_adds_course_with_timestamp() {
        let store = MockDocumentStore::with_courses(0);
        let (use_case, _tx) = use_case(&store, Some(User::new("u1", "ada@uni.edu")));

        let id = use_case
            .execute(NewCourse::new(" Compilers ", "Parsing and codegen", "Dr. Aho"))
            .await
            .unwrap();

        let doc = store.get(COURSES_COLLECTION, &id).await.unwrap();
        assert_eq!(doc.str_field("title"), Some("Compilers"));
        assert_eq!(
            doc.field(CREATED_AT_FIELD),
            Some(&FieldValue::Timestamp(
                Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap()
            ))
        );
    }

    #[tokio::test]
    async fn test_requires_sign_in() {
        let store = MockDocumentStore::with_courses(0);
        let (use_case, _tx) = use_case(&store, None);

        let err = use_case
            .execute(NewCourse::new("a", "b", "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, CourseError::NotSignedIn));
        assert!(store.inner().is_empty(COURSES_COLLECTION));
    }

    #[tokio::test]
    async fn test_rejects_blank_field() {
        let store = MockDocumentStore::with_courses(0);
        let (use_case, _tx) = use_case(&store, Some(User::new("u1", "ada@uni.edu")));

        let err = use_case
            .execute(NewCourse::new("Title", "Desc", "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, CourseError::BlankField { field: "instructor" }));
        assert_eq!(
            err.to_string(),
            "course instructor is empty (checked locally, nothing was saved)"
        );
        assert!(store.inner().is_empty(COURSES_COLLECTION));
    }
}
