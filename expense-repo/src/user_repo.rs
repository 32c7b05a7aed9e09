use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type UserId = i32;

pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Username and email of the user created by the initial migration.
pub const SAMPLE_USER: (&str, &str) = ("testuser", "test@example.com");

#[async_trait]
pub trait UserRepo: Sync + Send {
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError>;

    /// Looks up the user whose username and email both match.
    async fn find_user(&self, username: &str, email: &str) -> Result<Option<User>, UserRepoError>;

    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError>;

    /// Deletes the user together with all of their expenses.
    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepoError>;
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
        }
    }

    pub fn validate(&self) -> Result<(), UserRepoError> {
        if self.username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(UserRepoError::InvalidUser(format!(
                "username is longer than {} characters",
                MAX_USERNAME_LENGTH
            )));
        }
        if self.email.chars().count() > MAX_EMAIL_LENGTH {
            return Err(UserRepoError::InvalidUser(format!(
                "email is longer than {} characters",
                MAX_EMAIL_LENGTH
            )));
        }
        Ok(())
    }

    pub fn to_user(self, user_id: UserId, created_at: DateTime<Utc>) -> User {
        User {
            user_id,
            username: self.username,
            email: self.email,
            created_at,
        }
    }
}

#[derive(Error, Debug)]
pub enum UserRepoError {
    #[error("User {0} not found")]
    UserNotFound(UserId),
    #[error("Username {0} is already taken")]
    UsernameTaken(String),
    #[error("Email {0} is already registered")]
    EmailTaken(String),
    #[error("Invalid user: {0}")]
    InvalidUser(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
