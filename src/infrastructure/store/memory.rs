//! In-memory document store.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use parking_lot::RwLock;
use tracing::trace;

use crate::domain::entities::{
    COURSES_COLLECTION, Document, DocumentId, DocumentSnapshot, FieldValue, Fields, NewCourse,
    PageCursor,
};
use crate::domain::errors::StoreError;
use crate::domain::ports::{DocumentStorePort, PageQuery};

type Collection = BTreeMap<DocumentId, Fields>;

/// Document store kept in process memory.
///
/// Orders and pages results like the hosted store does: documents lacking the
/// order field are left out, ties on the order field break on document id.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryDocumentStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a document under a fixed id, replacing any previous one.
    pub fn insert(&self, collection: &str, id: impl Into<DocumentId>, fields: Fields) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.into(), fields);
    }

    /// Fills the courses collection with `count` sample courses whose
    /// creation times increase with their index.
    pub fn seed_courses(&self, count: usize) {
        let epoch = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).single().unwrap_or_default();
        for i in 0..count {
            let number = i + 1;
            let course = NewCourse::new(
                format!("Course {number:03}"),
                format!("Syllabus of course {number}"),
                format!("Lecturer {}", number % 7 + 1),
            );
            let created_at = epoch + Duration::minutes(i64::try_from(i).unwrap_or(i64::MAX));
            self.insert(
                COURSES_COLLECTION,
                format!("course-{number:03}"),
                course.into_fields(created_at),
            );
        }
    }

    /// Number of documents in a collection.
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections.read().get(collection).map_or(0, BTreeMap::len)
    }

    /// Whether `collection` holds no documents.
    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Whether `collection` holds `id`.
    #[must_use]
    pub fn contains(&self, collection: &str, id: &DocumentId) -> bool {
        self.collections
            .read()
            .get(collection)
            .is_some_and(|docs| docs.contains_key(id))
    }
}

fn position_cmp(value: &FieldValue, id: &DocumentId, cursor: &PageCursor) -> Ordering {
    let by_value = cursor
        .sort_value()
        .map_or(Ordering::Greater, |bound| value.store_cmp(bound));
    by_value.then_with(|| id.cmp(cursor.document_id()))
}

#[async_trait]
impl DocumentStorePort for MemoryDocumentStore {
    async fn list_page(&self, query: &PageQuery) -> Result<Vec<DocumentSnapshot>, StoreError> {
        let collections = self.collections.read();
        let Some(docs) = collections.get(&query.collection) else {
            return Ok(Vec::new());
        };

        let mut ordered: Vec<(&DocumentId, &Fields, &FieldValue)> = docs
            .iter()
            .filter_map(|(id, fields)| fields.get(&query.order_by).map(|v| (id, fields, v)))
            .collect();
        ordered.sort_by(|a, b| a.2.store_cmp(b.2).then_with(|| a.0.cmp(b.0)));

        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let page: Vec<DocumentSnapshot> = ordered
            .into_iter()
            .filter(|(id, _, value)| {
                query
                    .start_after
                    .as_ref()
                    .is_none_or(|cursor| position_cmp(value, id, cursor) == Ordering::Greater)
            })
            .take(limit)
            .map(|(id, fields, value)| DocumentSnapshot {
                document: Document::new(id.clone(), fields.clone()),
                cursor: PageCursor::new(Some(value.clone()), id.clone()),
            })
            .collect();

        trace!(collection = %query.collection, returned = page.len(), "Listed page");
        Ok(page)
    }

    async fn count_all(&self, collection: &str) -> Result<u64, StoreError> {
        Ok(self.len(collection) as u64)
    }

    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Document, StoreError> {
        self.collections
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id.clone(), fields.clone()))
            .ok_or_else(|| StoreError::not_found(collection, id.as_str()))
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        let id = DocumentId::new(uuid::Uuid::new_v4().simple().to_string());
        self.insert(collection, id.clone(), fields);
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        if let Some(docs) = self.collections.write().get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}
