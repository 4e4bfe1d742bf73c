use async_trait::async_trait;

use super::users_model::{NewUser, User};
use crate::errors::Result;

/// Persistence contract for user accounts.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Inserts a user. A taken email fails with `DatabaseError::UniqueViolation`.
    async fn create(&self, new_user: NewUser) -> Result<User>;

    /// Looks up a user by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn get_by_id(&self, user_id: &str) -> Result<User>;
}
