use async_trait::async_trait;

use crate::error::Result;
use crate::models::User;

// Expose the Postgres service module
pub mod postgres;

/// UserService trait defining the operations every transport needs
#[async_trait]
pub trait UserService: Send + Sync + 'static {
    /// Lists every user in the store
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Overwrites the user with the given store id and returns it with the id set
    async fn update_user(&self, id: i32, user: User) -> Result<User>;

    /// Inserts a user and returns the id assigned by the store
    async fn create_user(&self, user: User) -> Result<i32>;
}
