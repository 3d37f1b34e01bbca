use std::sync::Arc;

use tracing::{debug, info, instrument};
use users_sdk::{NewUser, User, UserId, UserUpdate};

use crate::domain::error::DomainError;
use crate::domain::ports::PasswordHasher;
use crate::domain::repo::{NewUserRecord, UserFields, UsersRepository};

/// Domain service with business rules for user management.
/// Depends only on the repository and hasher ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    hasher: Arc<dyn PasswordHasher>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_list_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_list_size: 1000,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        repo: Arc<dyn UsersRepository>,
        hasher: Arc<dyn PasswordHasher>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            hasher,
            config,
        }
    }

    #[instrument(name = "users.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        debug!("Listing users");

        let users = self.repo.list_all(self.config.max_list_size).await?;

        debug!("Successfully listed {} users", users.len());
        Ok(users)
    }

    #[instrument(
        name = "users.service.create_user",
        skip(self, new_user),
        fields(email = %new_user.email)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        require_fields(&[
            ("firstName", &new_user.first_name),
            ("lastName", &new_user.last_name),
            ("email", &new_user.email),
            ("password", &new_user.password),
            ("gender", &new_user.gender),
        ], &new_user.hobbies)?;

        let password_hash = self.hash_password(new_user.password).await?;
        let record = NewUserRecord {
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            password_hash,
            gender: new_user.gender,
            hobbies: new_user.hobbies,
        };

        let user = self.repo.insert(record).await?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    #[instrument(
        name = "users.service.update_user",
        skip(self, update),
        fields(user_id = %id)
    )]
    pub async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, DomainError> {
        info!("Updating user");

        require_fields(&[
            ("firstName", &update.first_name),
            ("lastName", &update.last_name),
            ("email", &update.email),
            ("password", &update.password),
            ("gender", &update.gender),
        ], &update.hobbies)?;

        let password_hash = self.hash_password(update.password).await?;
        // The stored email stays as created.
        let fields = UserFields {
            first_name: update.first_name,
            last_name: update.last_name,
            password_hash,
            gender: update.gender,
            hobbies: update.hobbies,
        };

        let user = self
            .repo
            .replace(id, fields)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        info!("Successfully updated user");
        Ok(user)
    }

    #[instrument(
        name = "users.service.delete_user",
        skip(self),
        fields(user_id = %id)
    )]
    pub async fn delete_user(&self, id: UserId) -> Result<(), DomainError> {
        info!("Deleting user");

        let deleted = self.repo.delete(id).await?;
        if !deleted {
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully deleted user");
        Ok(())
    }

    async fn hash_password(&self, password: String) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::password_hash(e.to_string()))?
            .map_err(DomainError::password_hash)
    }
}

/// Every text field must be non-blank and at least one hobby selected, none of them blank.
fn require_fields(text: &[(&'static str, &String)], hobbies: &[String]) -> Result<(), DomainError> {
    let mut missing: Vec<&'static str> = text
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if hobbies.is_empty() || hobbies.iter().any(|h| h.trim().is_empty()) {
        missing.push("hobbies");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        debug!(?missing, "Rejecting request with missing fields");
        Err(DomainError::missing_fields(missing))
    }
}
