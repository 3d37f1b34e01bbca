use thiserror::Error;
use users_sdk::UserId;

use crate::domain::repo::StoreError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: UserId },

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("All fields required")]
    MissingFields { fields: Vec<&'static str> },

    #[error("Password hashing failed: {message}")]
    PasswordHash { message: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(id: UserId) -> Self {
        Self::UserNotFound { id }
    }

    pub fn email_already_exists(email: String) -> Self {
        Self::EmailAlreadyExists { email }
    }

    pub fn missing_fields(fields: Vec<&'static str>) -> Self {
        Self::MissingFields { fields }
    }

    pub fn password_hash(message: impl Into<String>) -> Self {
        Self::PasswordHash {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey { email } => Self::EmailAlreadyExists { email },
            StoreError::Connection { message } => Self::StoreUnavailable { message },
            StoreError::Backend { message } => Self::Database { message },
        }
    }
}
