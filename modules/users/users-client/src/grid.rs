//! Users grid controller: the registration form plus a table of cached
//! records with edit and delete per row.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{info, warn};
use users_sdk::{User, UserId, UsersError};

use crate::form::RegistrationForm;
use crate::store::UsersStore;

#[derive(Error, Debug)]
pub enum GridError {
    /// Client-side validation blocked the submission.
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(BTreeMap<String, String>),

    #[error(transparent)]
    Api(#[from] UsersError),
}

pub struct UsersGrid {
    store: UsersStore,
    form: RegistrationForm,
    editing: Option<UserId>,
}

impl UsersGrid {
    pub fn new(store: UsersStore) -> Self {
        Self {
            store,
            form: RegistrationForm::default(),
            editing: None,
        }
    }

    pub fn store(&self) -> &UsersStore {
        &self.store
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.form
    }

    /// Record currently selected for editing.
    pub fn editing(&self) -> Option<UserId> {
        self.editing
    }

    /// Cached records for display.
    pub fn rows(&self) -> Vec<User> {
        self.store.snapshot().users
    }

    /// Load the initial list.
    pub async fn load(&self) -> Result<(), UsersError> {
        self.store.fetch_users().await.map(|_| ())
    }

    /// Validate and submit the form: update when a record is selected for
    /// editing, create otherwise. On success the form and selection are
    /// cleared and the list is refreshed.
    pub async fn submit(&mut self) -> Result<User, GridError> {
        let errors = self.form.validate_fields();
        if !errors.is_empty() {
            return Err(GridError::Invalid(errors));
        }

        let user = match self.editing {
            Some(id) => {
                info!(user_id = %id, "Submitting update");
                self.store.update_user(id, self.form.to_update()).await?
            }
            None => {
                info!("Submitting new user");
                self.store.add_user(self.form.to_new_user()).await?
            }
        }
        .into_inner();

        self.form.clear();
        self.editing = None;
        self.refresh().await;
        Ok(user)
    }

    /// Select a cached record for editing. Returns false if it is not cached.
    pub fn begin_edit(&mut self, id: UserId) -> bool {
        let Some(user) = self.rows().into_iter().find(|u| u.id == id) else {
            return false;
        };
        self.form = RegistrationForm::from_user(&user);
        self.editing = Some(id);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.form.clear();
        self.editing = None;
    }

    /// Delete a row, then refresh the list.
    pub async fn delete(&mut self, id: UserId) -> Result<(), UsersError> {
        self.store.delete_user(id).await?;
        if self.editing == Some(id) {
            self.cancel_edit();
        }
        self.refresh().await;
        Ok(())
    }

    async fn refresh(&self) {
        // The store records the failure for display.
        if let Err(e) = self.store.fetch_users().await {
            warn!("Refreshing users failed: {}", e);
        }
    }
}
