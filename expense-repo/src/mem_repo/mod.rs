use crate::expense_repo::{Expense, ExpenseRepo};
use crate::user_repo::{NewUser, User, UserId, UserRepo, SAMPLE_USER};
use crate::HealthCheck;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

mod expense_repo;
mod user_repo;

/// Rows keyed the same way the tables are: users by `user_id`, expenses by
/// `(user_id, user_expense_id)`.
struct State {
    users: BTreeMap<UserId, User>,
    expenses: BTreeMap<(UserId, i32), Expense>,
    next_user_id: UserId,
}

/// In-memory store that enforces the same constraints as the Postgres schema.
pub struct MemRepo {
    state: RwLock<State>,
}

impl MemRepo {
    pub fn new() -> MemRepo {
        let mut state = State {
            users: BTreeMap::new(),
            expenses: BTreeMap::new(),
            next_user_id: 1,
        };
        let (username, email) = SAMPLE_USER;
        let sample_user = NewUser::new(username, email).to_user(state.next_user_id, Utc::now());
        state.users.insert(sample_user.user_id, sample_user);
        state.next_user_id += 1;

        MemRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

impl Default for MemRepo {
    fn default() -> Self {
        MemRepo::new()
    }
}

#[async_trait]
impl HealthCheck for MemRepo {
    async fn check(&self) -> bool {
        self.read_lock().is_ok()
    }
}

pub fn create_repos() -> (
    Arc<dyn UserRepo>,
    Arc<dyn ExpenseRepo>,
    Arc<dyn HealthCheck>,
) {
    let repo = Arc::new(MemRepo::new());
    let user_repo: Arc<dyn UserRepo> = repo.clone();
    let expense_repo: Arc<dyn ExpenseRepo> = repo.clone();
    let health_check: Arc<dyn HealthCheck> = repo;

    (user_repo, expense_repo, health_check)
}
