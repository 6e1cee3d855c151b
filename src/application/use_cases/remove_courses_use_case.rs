//! Remove courses use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::services::pagination::AuthGate;
use crate::domain::entities::{COURSES_COLLECTION, DocumentId};
use crate::domain::errors::CourseError;
use crate::domain::ports::DocumentStorePort;

/// Deletes the courses selected in the browser.
#[derive(Clone)]
pub struct RemoveCoursesUseCase {
    store: Arc<dyn DocumentStorePort>,
    auth: AuthGate,
}

impl RemoveCoursesUseCase {
    /// Creates the use case.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStorePort>, auth: AuthGate) -> Self {
        Self { store, auth }
    }

    /// Deletes `ids` one after another, stopping at the first failure.
    /// Returns how many were removed.
    ///
    /// # Errors
    /// Returns [`CourseError::PartialRemoval`] when some deletes succeeded
    /// before one failed.
    pub async fn execute(&self, ids: &[DocumentId]) -> Result<usize, CourseError> {
        if self.auth.borrow().is_none() {
            return Err(CourseError::NotSignedIn);
        }

        for (removed, id) in ids.iter().enumerate() {
            debug!(course_id = %id, "Deleting course");
            if let Err(source) = self.store.delete(COURSES_COLLECTION, id).await {
                warn!(course_id = %id, removed, error = %source, "Course removal stopped");
                return Err(if removed == 0 {
                    CourseError::Store(source)
                } else {
                    CourseError::PartialRemoval { removed, source }
                });
            }
        }

        info!(count = ids.len(), "Courses removed");
        Ok(ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::watch;

    use crate::domain::entities::User;
    use crate::domain::ports::mocks::MockDocumentStore;

    fn ids(numbers: &[usize]) -> Vec<DocumentId> {
        numbers
            .iter()
            .map(|n| DocumentId::new(format!("course-{n:03}")))
            .collect()
    }

    fn signed_in() -> AuthGate {
        watch::channel(Some(User::new("u1", "ada@uni.edu"))).1
    }

    #[tokio::test]
    async fn test_removes_all_selected() {
        let store = MockDocumentStore::with_courses(5);
        let use_case = RemoveCoursesUseCase::new(store.clone(), signed_in());

        assert_eq!(use_case.execute(&ids(&[1, 3])).await.unwrap(), 2);
        assert_eq!(store.inner().len(COURSES_COLLECTION), 3);
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let store = MockDocumentStore::with_courses(5);
        store.fail_delete_after(2);
        let use_case = RemoveCoursesUseCase::new(store.clone(), signed_in());

        let err = use_case.execute(&ids(&[1, 2, 3, 4])).await.unwrap_err();

        assert!(matches!(err, CourseError::PartialRemoval { removed: 2, .. }));
        assert!(store.inner().contains(COURSES_COLLECTION, &DocumentId::new("course-003")));
        assert!(store.inner().contains(COURSES_COLLECTION, &DocumentId::new("course-004")));
    }

    #[tokio::test]
    async fn test_first_delete_failure_is_store_error() {
        let store = MockDocumentStore::with_courses(2);
        store.fail_delete_after(0);
        let use_case = RemoveCoursesUseCase::new(store, signed_in());

        let err = use_case.execute(&ids(&[1])).await.unwrap_err();
        assert!(matches!(err, CourseError::Store(_)));
    }

    #[tokio::test]
    async fn test_requires_sign_in() {
        let store = MockDocumentStore::with_courses(2);
        let (_tx, rx) = watch::channel(None);
        let use_case = RemoveCoursesUseCase::new(store.clone(), rx);

        let err = use_case.execute(&ids(&[1])).await.unwrap_err();
        assert!(matches!(err, CourseError::NotSignedIn));
        assert_eq!(store.inner().len(COURSES_COLLECTION), 2);
    }
}
