use serde::{Deserialize, Serialize};
use shelf_kernel::record::{nullable, present};
use shelf_kernel::validation::{length, non_empty, optional};
use shelf_kernel::{Patch, Record, Validate, ValidationError};
use time::OffsetDateTime;
use utoipa::ToSchema;

const TITLE_MIN: usize = 10;
const AUTHOR_MIN: usize = 10;
const AUTHOR_MAX: usize = 100;

/// A book as stored in the `books` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Book {
    /// Unique identifier for the book
    pub id: String,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// ISBN of the book, if known
    pub isbn: Option<String>,
    /// When the entry was created
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Book {
    /// Build a new, not yet persisted book. The store assigns the id.
    pub fn from_new(input: NewBook, now: OffsetDateTime) -> Self {
        Self {
            id: String::new(),
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            created_at: now,
        }
    }
}

impl Record for Book {
    const KIND: &'static str = "book";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn restore_immutable(&mut self, original: &Self) {
        self.id.clone_from(&original.id);
        self.created_at = original.created_at;
    }
}

/// Request model for creating a new book.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewBook {
    /// Title of the book, at least 10 characters
    pub title: String,
    /// Author of the book, 10 to 100 characters
    pub author: String,
    /// ISBN of the book
    #[serde(default)]
    pub isbn: Option<String>,
}

impl Validate for NewBook {
    fn validate(&self) -> Result<(), ValidationError> {
        length("title", &self.title, TITLE_MIN, None)?;
        length("author", &self.author, AUTHOR_MIN, Some(AUTHOR_MAX))?;
        optional(self.isbn.as_deref(), |isbn| non_empty("isbn", isbn))
    }
}

/// Partial update of a book. Absent fields are left untouched; `isbn: null`
/// clears the ISBN, `null` for any other field is rejected.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookPatch {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub isbn: Option<Option<String>>,
}

impl Validate for BookPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        optional(self.title.as_deref(), |title| length("title", title, TITLE_MIN, None))?;
        optional(self.author.as_deref(), |author| {
            length("author", author, AUTHOR_MIN, Some(AUTHOR_MAX))
        })?;
        optional(self.isbn.as_ref().and_then(Option::as_deref), |isbn| {
            non_empty("isbn", isbn)
        })
    }
}

impl Patch<Book> for BookPatch {
    fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(isbn) = self.isbn {
            book.isbn = isbn;
        }
    }

    fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.isbn.is_none()
    }
}

/// Response to a successful create.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookCreated {
    pub detail: String,
    pub book: Book,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookList {
    pub books: Vec<Book>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_kernel::merge;
    use time::macros::datetime;

    fn orwell() -> Book {
        Book {
            id: "1".into(),
            title: "Nineteen Eighty-Four".into(),
            author: "George Orwell".into(),
            isbn: Some("1234567890".into()),
            created_at: datetime!(2024-01-01 09:00 UTC),
        }
    }

    #[test]
    fn title_patch_keeps_author_and_id() {
        let patch = BookPatch {
            title: Some("1984 (Updated)".into()),
            ..BookPatch::default()
        };
        let merged = merge(&orwell(), patch, datetime!(2024-03-01 09:00 UTC));

        assert_eq!(merged.id, "1");
        assert_eq!(merged.title, "1984 (Updated)");
        assert_eq!(merged.author, "George Orwell");
        assert_eq!(merged.isbn.as_deref(), Some("1234567890"));
        assert_eq!(merged.created_at, orwell().created_at);
    }

    #[test]
    fn id_in_patch_body_is_ignored() {
        let patch: BookPatch =
            serde_json::from_str(r#"{"id": "999", "created_at": "2000-01-01T00:00:00Z"}"#).unwrap();
        assert!(patch.is_empty());

        let merged = merge(&orwell(), patch, datetime!(2024-03-01 09:00 UTC));
        assert_eq!(merged, orwell());
    }

    #[test]
    fn null_title_is_rejected() {
        let err = serde_json::from_str::<BookPatch>(r#"{"title": null}"#).unwrap_err();
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn null_isbn_clears_it() {
        let patch: BookPatch = serde_json::from_str(r#"{"isbn": null}"#).unwrap();
        let merged = merge(&orwell(), patch, datetime!(2024-03-01 09:00 UTC));
        assert_eq!(merged.isbn, None);
    }

    #[test]
    fn new_book_rules() {
        let valid = NewBook {
            title: "A Great Book".into(),
            author: "George Orwell".into(),
            isbn: Some("1234567890".into()),
        };
        assert!(valid.validate().is_ok());

        let short_title = NewBook {
            title: "1984".into(),
            ..valid.clone()
        };
        assert_eq!(short_title.validate().unwrap_err().field(), "title");

        let long_author = NewBook {
            author: "x".repeat(101),
            ..valid
        };
        assert_eq!(long_author.validate().unwrap_err().field(), "author");
    }

    #[test]
    fn patch_rules_apply_to_present_fields_only() {
        assert!(BookPatch::default().validate().is_ok());

        let bad = BookPatch {
            author: Some("Orwell".into()),
            ..BookPatch::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn serializes_created_at_as_rfc3339() {
        let value = serde_json::to_value(orwell()).unwrap();
        assert_eq!(value["created_at"], "2024-01-01T09:00:00Z");
    }
}
