use crate::sqlx_repo::{violated_constraint, SQLxRepo, EMAIL_CONSTRAINT, USERNAME_CONSTRAINT};
use crate::user_repo::{NewUser, User, UserId, UserRepo, UserRepoError};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as};
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct UserEntry {
    user_id: i32,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<UserEntry> for User {
    fn from(value: UserEntry) -> Self {
        User {
            user_id: value.user_id,
            username: value.username,
            email: value.email,
            created_at: value.created_at,
        }
    }
}

#[async_trait]
impl UserRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError> {
        let user: Option<UserEntry> = query_as("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to get user {}", user_id))?;
        user.map(|u| u.into())
            .ok_or(UserRepoError::UserNotFound(user_id))
    }

    #[instrument(skip(self))]
    async fn find_user(&self, username: &str, email: &str) -> Result<Option<User>, UserRepoError> {
        let user: Option<UserEntry> =
            query_as("SELECT * FROM users WHERE username = $1 AND email = $2")
                .bind(username)
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Unable to look up user {}", username))?;
        Ok(user.map(|u| u.into()))
    }

    #[instrument(skip(self))]
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError> {
        new_user.validate()?;
        let result: Result<UserEntry, sqlx::Error> =
            query_as("INSERT INTO users(username, email) VALUES ($1, $2) RETURNING *")
                .bind(&new_user.username)
                .bind(&new_user.email)
                .fetch_one(&self.pool)
                .await;

        let error = match result {
            Ok(user) => return Ok(user.into()),
            Err(e) => e,
        };
        let constraint = violated_constraint(&error).map(str::to_owned);
        match constraint.as_deref() {
            Some(USERNAME_CONSTRAINT) => Err(UserRepoError::UsernameTaken(new_user.username)),
            Some(EMAIL_CONSTRAINT) => Err(UserRepoError::EmailTaken(new_user.email)),
            _ => Err(anyhow::Error::new(error)
                .context(format!("Unable to create user {}", new_user.username))
                .into()),
        }
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepoError> {
        // expenses go with the user through ON DELETE CASCADE
        let result = query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete user {}", user_id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserRepoError::UserNotFound(user_id))
        }
    }
}
