//! Course detail use case implementation.

use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::{COURSES_COLLECTION, Course, DocumentId, FromDocument};
use crate::domain::errors::CourseError;
use crate::domain::ports::DocumentStorePort;

/// Loads a single course for the detail view.
#[derive(Clone)]
pub struct GetCourseUseCase {
    store: Arc<dyn DocumentStorePort>,
}

impl GetCourseUseCase {
    /// Creates the use case.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStorePort>) -> Self {
        Self { store }
    }

    /// # Errors
    /// Returns a store `NotFound` error when the course does not exist.
    pub async fn execute(&self, id: &DocumentId) -> Result<Course, CourseError> {
        debug!(course_id = %id, "Loading course");
        let document = self.store.get(COURSES_COLLECTION, id).await?;
        Ok(Course::from_document(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::StoreError;
    use crate::domain::ports::mocks::MockDocumentStore;

    #[tokio::test]
    async fn test_loads_existing_course() {
        let use_case = GetCourseUseCase::new(MockDocumentStore::with_courses(3));
        let course = use_case.execute(&DocumentId::new("course-002")).await.unwrap();
        assert_eq!(course.title(), "Course 002");
    }

    #[tokio::test]
    async fn test_missing_course_is_not_found() {
        let use_case = GetCourseUseCase::new(MockDocumentStore::with_courses(3));
        let err = use_case.execute(&DocumentId::new("nope")).await.unwrap_err();
        assert!(matches!(err, CourseError::Store(StoreError::NotFound { .. })));
    }
}
