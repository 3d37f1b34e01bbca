use async_trait::async_trait;

use crate::error::UsersError;
use crate::model::{NewUser, User, UserId, UserUpdate};

/// API of the users module that other crates can use.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// List every stored user. An empty store yields an empty vector.
    async fn list_users(&self) -> Result<Vec<User>, UsersError>;

    /// Create a user; the store assigns the id.
    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersError>;

    /// Replace the mutable fields of an existing user.
    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, UsersError>;

    /// Permanently delete a user.
    async fn delete_user(&self, id: UserId) -> Result<(), UsersError>;
}
