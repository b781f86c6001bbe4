use serde::{Deserialize, Serialize};
use shelf_kernel::record::present;
use shelf_kernel::validation::{length, non_empty, optional, range};
use shelf_kernel::{Patch, Record, Validate, ValidationError};
use time::OffsetDateTime;
use utoipa::ToSchema;

const RATING_MIN: f64 = 1.0;
const RATING_MAX: f64 = 5.0;
const COMMENT_MIN: usize = 20;

/// A user's rating and comment on a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Review {
    /// Unique identifier for the review
    pub id: String,
    /// The user who wrote the review
    pub user_id: String,
    /// The book being reviewed
    pub book_id: String,
    /// Rating from 1 to 5
    pub rating: f64,
    pub comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Review {
    /// Build an unsaved review of `book_id`. The path decides the book, not
    /// the body.
    pub fn from_new(input: NewReview, book_id: String, now: OffsetDateTime) -> Self {
        Self {
            id: String::new(),
            user_id: input.user_id,
            book_id,
            rating: input.rating,
            comment: input.comment,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Review {
    const KIND: &'static str = "review";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn restore_immutable(&mut self, original: &Self) {
        self.id.clone_from(&original.id);
        self.user_id.clone_from(&original.user_id);
        self.book_id.clone_from(&original.book_id);
        self.created_at = original.created_at;
    }

    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }
}

/// Request model for reviewing a book.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewReview {
    pub user_id: String,
    /// Optional; must match the book in the path when given
    #[serde(default)]
    pub book_id: Option<String>,
    /// 1.0 to 5.0
    pub rating: f64,
    /// At least 20 characters
    pub comment: String,
}

impl NewReview {
    /// True when the body names a book other than `book_id`.
    pub fn conflicts_with(&self, book_id: &str) -> bool {
        self.book_id.as_deref().is_some_and(|body| body != book_id)
    }
}

impl Validate for NewReview {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("user_id", &self.user_id)?;
        optional(self.book_id.as_deref(), |book_id| non_empty("book_id", book_id))?;
        range("rating", self.rating, RATING_MIN, RATING_MAX)?;
        length("comment", &self.comment, COMMENT_MIN, None)
    }
}

/// Partial update of a review. Author and book are fixed at creation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReviewPatch {
    #[serde(default, deserialize_with = "present")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub comment: Option<String>,
}

impl Validate for ReviewPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        optional(self.rating.as_ref(), |rating| {
            range("rating", *rating, RATING_MIN, RATING_MAX)
        })?;
        optional(self.comment.as_deref(), |comment| {
            length("comment", comment, COMMENT_MIN, None)
        })
    }
}

impl Patch<Review> for ReviewPatch {
    fn apply(self, review: &mut Review) {
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
        if let Some(comment) = self.comment {
            review.comment = comment;
        }
    }

    fn is_empty(&self) -> bool {
        self.rating.is_none() && self.comment.is_none()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewCreated {
    pub detail: String,
    pub review: Review,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub reviews: Vec<Review>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_kernel::merge;
    use time::macros::datetime;

    fn review() -> Review {
        Review {
            id: "r-1".into(),
            user_id: "u-1".into(),
            book_id: "b-1".into(),
            rating: 4.0,
            comment: "Bleak, sharp and still relevant today.".into(),
            created_at: datetime!(2024-01-01 00:00 UTC),
            updated_at: datetime!(2024-01-01 00:00 UTC),
        }
    }

    #[test]
    fn owner_and_book_cannot_be_patched() {
        let patch: ReviewPatch = serde_json::from_str(
            r#"{"user_id": "u-2", "book_id": "b-2", "rating": 2.5}"#,
        )
        .unwrap();
        let now = datetime!(2024-06-01 00:00 UTC);
        let merged = merge(&review(), patch, now);

        assert_eq!(merged.user_id, "u-1");
        assert_eq!(merged.book_id, "b-1");
        assert_eq!(merged.rating, 2.5);
        assert_eq!(merged.comment, review().comment);
        assert_eq!(merged.updated_at, now);
    }

    #[test]
    fn rating_bounds() {
        let mut input = NewReview {
            user_id: "u-1".into(),
            book_id: None,
            rating: 5.0,
            comment: "A long enough comment here.".into(),
        };
        assert!(input.validate().is_ok());

        input.rating = 5.5;
        assert_eq!(input.validate().unwrap_err().field(), "rating");

        input.rating = f64::NAN;
        assert!(input.validate().is_err());

        let patch = ReviewPatch {
            rating: Some(0.5),
            ..ReviewPatch::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn short_comment_is_rejected() {
        let input = NewReview {
            user_id: "u-1".into(),
            book_id: None,
            rating: 3.0,
            comment: "Too short".into(),
        };
        assert_eq!(input.validate().unwrap_err().field(), "comment");
    }

    #[test]
    fn body_book_must_match_path() {
        let mut input = NewReview {
            user_id: "u-1".into(),
            book_id: Some("b-1".into()),
            rating: 3.0,
            comment: "A long enough comment here.".into(),
        };
        assert!(!input.conflicts_with("b-1"));
        assert!(input.conflicts_with("b-2"));

        input.book_id = None;
        assert!(!input.conflicts_with("b-2"));
    }
}
