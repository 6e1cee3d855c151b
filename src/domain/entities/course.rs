//! Course entity.

use chrono::{DateTime, Utc};

use super::document::{Document, DocumentId, FieldValue, Fields, FromDocument};

/// Collection holding course documents.
pub const COURSES_COLLECTION: &str = "courses";
/// Field courses are ordered by.
pub const CREATED_AT_FIELD: &str = "created_at";

/// A course as displayed in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: DocumentId,
    title: String,
    description: String,
    instructor: String,
    created_at: Option<DateTime<Utc>>,
}

impl Course {
    /// Creates a course.
    #[must_use]
    pub fn new(
        id: impl Into<DocumentId>,
        title: impl Into<String>,
        description: impl Into<String>,
        instructor: impl Into<String>,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            instructor: instructor.into(),
            created_at,
        }
    }

    /// Store id.
    #[must_use]
    pub const fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Course title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Course description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Name of the instructor.
    #[must_use]
    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    /// When the course was added, if recorded.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl FromDocument for Course {
    fn from_document(document: Document) -> Self {
        let text = |name: &str| document.str_field(name).unwrap_or_default().to_string();
        Self {
            title: text("title"),
            description: text("description"),
            instructor: text("instructor"),
            created_at: document
                .field(CREATED_AT_FIELD)
                .and_then(FieldValue::as_timestamp),
            id: document.id,
        }
    }
}

/// Course form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCourse {
    /// Course title.
    pub title: String,
    /// Course description.
    pub description: String,
    /// Name of the instructor.
    pub instructor: String,
}

impl NewCourse {
    /// Creates form input.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        instructor: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            instructor: instructor.into(),
        }
    }

    /// Returns the name of the first blank field, if any.
    #[must_use]
    pub fn first_blank_field(&self) -> Option<&'static str> {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("instructor", &self.instructor),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    /// Converts the form into stored fields, stamping the creation time.
    #[must_use]
    pub fn into_fields(self, created_at: DateTime<Utc>) -> Fields {
        let mut fields = Fields::new();
        fields.insert("title".into(), self.title.trim().into());
        fields.insert("description".into(), self.description.trim().into());
        fields.insert("instructor".into(), self.instructor.trim().into());
        fields.insert(CREATED_AT_FIELD.into(), created_at.into());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_document_reads_fields() {
        let created = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();
        let fields = NewCourse::new("Databases", "Relational theory", "Dr. Codd").into_fields(created);
        let course = Course::from_document(Document::new("db101", fields));

        assert_eq!(course.id().as_str(), "db101");
        assert_eq!(course.title(), "Databases");
        assert_eq!(course.instructor(), "Dr. Codd");
        assert_eq!(course.created_at(), Some(created));
    }

    #[test]
    fn test_from_document_is_lenient() {
        let mut fields = Fields::new();
        fields.insert("title".into(), FieldValue::Integer(7));
        let course = Course::from_document(Document::new("x", fields));

        assert_eq!(course.title(), "");
        assert_eq!(course.description(), "");
        assert!(course.created_at().is_none());
    }

    #[test]
    fn test_first_blank_field() {
        assert_eq!(NewCourse::new("a", "b", "c").first_blank_field(), None);
        assert_eq!(
            NewCourse::new("a", "  ", "").first_blank_field(),
            Some("description")
        );
    }
}
