pub mod generator;
pub mod test_user;

use expense_repo::expense_repo::ExpenseRepo;
use expense_repo::user_repo::UserRepo;
use serde::Deserialize;
use std::env;
use std::fs;
use std::sync::Arc;
use tracing::warn;

#[derive(Deserialize)]
struct TestConfig {
    database_url: String,
}

#[derive(Debug)]
pub enum RepoType {
    SQLx,
    Mem,
}

/// Database used by the SQLx cases, from `config_test.toml` or `TEST_DATABASE_URL`.
pub fn test_database_url() -> Option<String> {
    if let Ok(config) = fs::read_to_string("config_test.toml") {
        let config: TestConfig = toml::from_str(config.as_str()).unwrap();
        return Some(config.database_url);
    }
    env::var("TEST_DATABASE_URL").ok()
}

pub async fn build_repos(repo_type: RepoType) -> Option<(Arc<dyn UserRepo>, Arc<dyn ExpenseRepo>)> {
    match repo_type {
        RepoType::SQLx => {
            let Some(database_url) = test_database_url() else {
                warn!("No test database configured, skipping");
                return None;
            };
            let (user_repo, expense_repo, _health_check) =
                expense_repo::sqlx_repo::create_repos(database_url, 2)
                    .await
                    .unwrap();
            Some((user_repo, expense_repo))
        }
        RepoType::Mem => {
            let (user_repo, expense_repo, _health_check) = expense_repo::mem_repo::create_repos();
            Some((user_repo, expense_repo))
        }
    }
}

/// Builds the repos for a test case, returning early when the backend is unavailable.
macro_rules! repos_or_skip {
    ($repo_type:expr) => {
        match utils::build_repos($repo_type).await {
            Some(repos) => repos,
            None => return,
        }
    };
}
