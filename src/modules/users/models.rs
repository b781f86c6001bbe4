use serde::{Deserialize, Serialize};
use shelf_kernel::record::present;
use shelf_kernel::validation::{email, length, optional};
use shelf_kernel::{Patch, Record, Validate, ValidationError};
use time::OffsetDateTime;
use utoipa::ToSchema;

const USERNAME_MIN: usize = 5;
const USERNAME_MAX: usize = 50;

/// A registered reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    /// Unique identifier for the user
    pub id: String,
    /// The name of the user
    pub username: String,
    /// User's email address
    pub email: String,
    /// When the entry was created
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the entry was last modified
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn from_new(input: NewUser, now: OffsetDateTime) -> Self {
        Self {
            id: String::new(),
            username: input.username,
            email: input.email,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for User {
    const KIND: &'static str = "user";

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

    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }
}

/// Request model for registering a user.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewUser {
    /// 5 to 50 characters
    pub username: String,
    pub email: String,
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ValidationError> {
        length("username", &self.username, USERNAME_MIN, Some(USERNAME_MAX))?;
        email("email", &self.email)
    }
}

/// Partial update of a user.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserPatch {
    #[serde(default, deserialize_with = "present")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<String>,
}

impl Validate for UserPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        optional(self.username.as_deref(), |username| {
            length("username", username, USERNAME_MIN, Some(USERNAME_MAX))
        })?;
        optional(self.email.as_deref(), |value| email("email", value))
    }
}

impl Patch<User> for UserPatch {
    fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
    }

    fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserCreated {
    pub detail: String,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub users: Vec<User>,
}
