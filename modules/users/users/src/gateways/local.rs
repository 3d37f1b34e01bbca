use async_trait::async_trait;
use std::sync::Arc;
use users_sdk::{NewUser, User, UserId, UserUpdate, UsersApi, UsersError};

use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the UsersApi trait that delegates to the domain service
pub struct UsersLocalClient {
    service: Arc<Service>,
}

impl UsersLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersApi for UsersLocalClient {
    async fn list_users(&self) -> Result<Vec<User>, UsersError> {
        self.service.list_users().await.map_err(map_domain_error)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersError> {
        self.service
            .create_user(new_user)
            .await
            .map_err(map_domain_error)
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, UsersError> {
        self.service
            .update_user(id, update)
            .await
            .map_err(map_domain_error)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UsersError> {
        self.service.delete_user(id).await.map_err(map_domain_error)
    }
}

/// Map domain errors to contract errors
fn map_domain_error(domain_error: DomainError) -> UsersError {
    match domain_error {
        DomainError::UserNotFound { id } => UsersError::not_found(id),
        DomainError::EmailAlreadyExists { email } => UsersError::conflict(email),
        e @ DomainError::MissingFields { .. } => UsersError::validation(e.to_string()),
        DomainError::StoreUnavailable { message } => UsersError::unavailable(message),
        DomainError::PasswordHash { .. } | DomainError::Database { .. } => UsersError::internal(),
    }
}
