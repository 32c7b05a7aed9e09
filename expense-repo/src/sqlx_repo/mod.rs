mod expense_repo;
mod user_repo;

use crate::expense_repo::ExpenseRepo;
use crate::user_repo::UserRepo;
use crate::HealthCheck;
use anyhow::Context;
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::{query, Pool, Postgres};
use std::sync::Arc;
use tracing::{info, instrument};

/// Schema of the `users` and `expenses` tables.
pub static MIGRATOR: Migrator = sqlx::migrate!();

pub(crate) const USERNAME_CONSTRAINT: &str = "users_username_key";
pub(crate) const EMAIL_CONSTRAINT: &str = "users_email_key";
pub(crate) const EXPENSE_USER_CONSTRAINT: &str = "expenses_user_id_fkey";

pub struct SQLxRepo {
    pool: Pool<Postgres>,
}

impl SQLxRepo {
    pub fn new(pool: Pool<Postgres>) -> SQLxRepo {
        SQLxRepo { pool }
    }

    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), anyhow::Error> {
        MIGRATOR
            .run(&self.pool)
            .await
            .context("Unable to run migrations")?;
        info!("Database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for SQLxRepo {
    async fn check(&self) -> bool {
        query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

/// Name of the constraint a failed statement violated, if any.
pub(crate) fn violated_constraint(error: &sqlx::Error) -> Option<&str> {
    error.as_database_error().and_then(|e| e.constraint())
}

pub async fn create_repos(
    database_url: String,
    max_pool_size: u32,
) -> Result<(Arc<dyn UserRepo>, Arc<dyn ExpenseRepo>, Arc<dyn HealthCheck>), anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_pool_size)
        .connect(&database_url)
        .await
        .context("Unable to connect to database")?;

    let repo = Arc::new(SQLxRepo::new(pool));
    repo.run_migrations().await?;

    let user_repo: Arc<dyn UserRepo> = repo.clone();
    let expense_repo: Arc<dyn ExpenseRepo> = repo.clone();
    let health_check: Arc<dyn HealthCheck> = repo;
    Ok((user_repo, expense_repo, health_check))
}
