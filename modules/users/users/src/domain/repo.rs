use async_trait::async_trait;
use thiserror::Error;
use users_sdk::{User, UserId};

/// Record handed to the store on create. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub gender: String,
    pub hobbies: Vec<String>,
}

/// Mutable fields written by an update. Email and id are not among them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub gender: String,
    pub hobbies: Vec<String>,
}

/// Failures reported by a repository implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or the connection attempt failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// A write violated the unique index on `email`.
    #[error("duplicate key for email '{email}'")]
    DuplicateKey { email: String },

    #[error("store error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn connection(message: impl ToString) -> Self {
        Self::Connection {
            message: message.to_string(),
        }
    }

    pub fn backend(message: impl ToString) -> Self {
        Self::Backend {
            message: message.to_string(),
        }
    }
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Every stored user, at most `limit` of them, in store order.
    async fn list_all(&self, limit: u32) -> Result<Vec<User>, StoreError>;
    /// Insert a new document; the store assigns the id.
    async fn insert(&self, record: NewUserRecord) -> Result<User, StoreError>;
    /// Overwrite the mutable fields of `id` and return the post-update record.
    /// `None` when no document has that id.
    async fn replace(&self, id: UserId, fields: UserFields) -> Result<Option<User>, StoreError>;
    /// Delete by id. Returns true if a document was removed.
    async fn delete(&self, id: UserId) -> Result<bool, StoreError>;
}
