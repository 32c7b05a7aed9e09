use expense_repo::user_repo::{NewUser, User, UserRepo};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub fn unique_new_user() -> NewUser {
    let id = Uuid::new_v4();
    NewUser::new(format!("user-{}", id), format!("{}@example.com", id))
}

#[allow(dead_code)]
pub struct TestUser {
    pub user: User,
    repo: Arc<dyn UserRepo>,
}

#[allow(dead_code)]
impl TestUser {
    pub async fn new(user_repo: &Arc<dyn UserRepo>) -> TestUser {
        let user = user_repo.create_user(unique_new_user()).await.unwrap();
        info!(user_id = user.user_id, username = %user.username, "Created user");
        TestUser {
            user,
            repo: user_repo.clone(),
        }
    }

    pub fn id(&self) -> i32 {
        self.user.user_id
    }

    pub async fn delete(&self) {
        self.repo.delete_user(self.user.user_id).await.unwrap()
    }
}
