use crate::mem_repo::MemRepo;
use crate::user_repo::UserRepoError::{EmailTaken, UserNotFound, UsernameTaken};
use crate::user_repo::{NewUser, User, UserId, UserRepo, UserRepoError};
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl UserRepo for MemRepo {
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .users
            .get(&user_id)
            .cloned()
            .ok_or(UserNotFound(user_id))
    }

    async fn find_user(&self, username: &str, email: &str) -> Result<Option<User>, UserRepoError> {
        let read_guard = self.read_lock()?;

        let user = read_guard
            .users
            .values()
            .find(|u| u.username == username && u.email == email)
            .cloned();
        Ok(user)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError> {
        new_user.validate()?;
        let mut write_guard = self.write_lock()?;

        if write_guard
            .users
            .values()
            .any(|u| u.username == new_user.username)
        {
            return Err(UsernameTaken(new_user.username));
        }
        if write_guard.users.values().any(|u| u.email == new_user.email) {
            return Err(EmailTaken(new_user.email));
        }

        let user_id = write_guard.next_user_id;
        write_guard.next_user_id += 1;

        let user = new_user.to_user(user_id, Utc::now());
        write_guard.users.insert(user_id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.users.remove(&user_id).is_none() {
            return Err(UserNotFound(user_id));
        }
        write_guard.expenses.retain(|(owner, _), _| *owner != user_id);
        Ok(())
    }
}
