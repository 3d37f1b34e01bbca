//! MongoDB adapter for the users repository port.
//!
//! [`MongoStore`] owns the lazily established connection. It is created once
//! at startup and shared; the first operation connects, later operations
//! reuse the cached database handle. A failed attempt is not cached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};
use users_sdk::{User, UserId};

use crate::domain::repo::{NewUserRecord, StoreError, UserFields, UsersRepository};
use crate::infra::storage::entity::UserDocument;

pub const DATABASE_NAME: &str = "userDB";
pub const USERS_COLLECTION: &str = "users";

const DUPLICATE_KEY_CODE: i32 = 11000;
const APP_NAME: &str = "user-registry";

#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Connection string; `None` makes every operation fail with a connection error.
    pub url: Option<String>,
    /// Bound on server selection and connect, so operations fail fast
    /// instead of waiting for an unreachable server.
    pub server_selection_timeout: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: None,
            server_selection_timeout: Duration::from_millis(5000),
        }
    }
}

pub struct MongoStore {
    settings: StoreSettings,
    db: OnceCell<Database>,
}

impl MongoStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            settings,
            db: OnceCell::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.db.initialized()
    }

    /// Connected database handle. Concurrent first callers share one attempt.
    pub async fn ensure_connected(&self) -> Result<&Database, StoreError> {
        if let Some(db) = self.db.get() {
            debug!("Already connected");
            return Ok(db);
        }
        self.db.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<Database, StoreError> {
        let url = self
            .settings
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| StoreError::connection("database connection string is not configured"))?;

        info!("No active connection, initiating connection");

        let mut options = ClientOptions::parse(url)
            .await
            .map_err(StoreError::connection)?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(self.settings.server_selection_timeout);
        options.connect_timeout = Some(self.settings.server_selection_timeout);

        let client = Client::with_options(options).map_err(StoreError::connection)?;
        let db = client.database(DATABASE_NAME);

        if let Err(e) = db.run_command(doc! { "ping": 1 }).await {
            warn!(error = %e, "Database ping failed");
            return Err(StoreError::connection(e));
        }

        ensure_indexes(&db).await?;

        info!(database = DATABASE_NAME, "Connected to database");
        Ok(db)
    }
}

async fn ensure_indexes(db: &Database) -> Result<(), StoreError> {
    let index = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    db.collection::<UserDocument>(USERS_COLLECTION)
        .create_index(index)
        .await
        .map_err(|e| map_error(e, None))?;
    Ok(())
}

fn map_error(e: MongoError, email: Option<&str>) -> StoreError {
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY_CODE => {
            StoreError::DuplicateKey {
                email: email.unwrap_or_default().to_string(),
            }
        }
        ErrorKind::Command(ce) if ce.code == DUPLICATE_KEY_CODE => StoreError::DuplicateKey {
            email: email.unwrap_or_default().to_string(),
        },
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => StoreError::connection(&e),
        _ => StoreError::backend(&e),
    }
}

/// Repository over the `users` collection.
#[derive(Clone)]
pub struct MongoUsersRepository {
    store: Arc<MongoStore>,
}

impl MongoUsersRepository {
    pub fn new(store: Arc<MongoStore>) -> Self {
        Self { store }
    }

    async fn collection(&self) -> Result<Collection<UserDocument>, StoreError> {
        let db = self.store.ensure_connected().await?;
        Ok(db.collection::<UserDocument>(USERS_COLLECTION))
    }
}

#[async_trait]
impl UsersRepository for MongoUsersRepository {
    #[instrument(name = "users.mongo.list_all", skip(self))]
    async fn list_all(&self, limit: u32) -> Result<Vec<User>, StoreError> {
        let coll = self.collection().await?;
        let docs: Vec<UserDocument> = coll
            .find(doc! {})
            .limit(i64::from(limit))
            .await
            .map_err(|e| map_error(e, None))?
            .try_collect()
            .await
            .map_err(|e| map_error(e, None))?;

        docs.into_iter().map(UserDocument::into_user).collect()
    }

    #[instrument(name = "users.mongo.insert", skip(self, record), fields(email = %record.email))]
    async fn insert(&self, record: NewUserRecord) -> Result<User, StoreError> {
        let coll = self.collection().await?;
        let mut document = UserDocument::from_record(record);

        let result = coll
            .insert_one(&document)
            .await
            .map_err(|e| map_error(e, Some(&document.email)))?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::backend("inserted id is not an ObjectId"))?;

        document.id = Some(id);
        document.into_user()
    }

    #[instrument(name = "users.mongo.replace", skip(self, fields), fields(user_id = %id))]
    async fn replace(&self, id: UserId, fields: UserFields) -> Result<Option<User>, StoreError> {
        let coll = self.collection().await?;
        let oid: ObjectId = id.into();
        let update = doc! {
            "$set": {
                "firstName": fields.first_name,
                "lastName": fields.last_name,
                "password": fields.password_hash,
                "gender": fields.gender,
                "hobbies": fields.hobbies,
            }
        };

        let updated = coll
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| map_error(e, None))?;

        updated.map(UserDocument::into_user).transpose()
    }

    #[instrument(name = "users.mongo.delete", skip(self), fields(user_id = %id))]
    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        let coll = self.collection().await?;
        let oid: ObjectId = id.into();
        let result = coll
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(|e| map_error(e, None))?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_url_is_a_connection_error_and_not_cached() {
        let store = MongoStore::new(StoreSettings::default());

        let first = store.ensure_connected().await;
        assert!(matches!(first, Err(StoreError::Connection { .. })));
        assert!(!store.is_connected());

        let second = store.ensure_connected().await;
        assert!(matches!(second, Err(StoreError::Connection { .. })));
    }

    #[tokio::test]
    async fn malformed_url_is_a_connection_error() {
        let store = MongoStore::new(StoreSettings {
            url: Some("not-a-mongodb-uri".into()),
            ..StoreSettings::default()
        });
        assert!(matches!(
            store.ensure_connected().await,
            Err(StoreError::Connection { .. })
        ));
    }

    #[tokio::test]
    async fn repository_surfaces_connection_errors() {
        let repo = MongoUsersRepository::new(Arc::new(MongoStore::new(StoreSettings::default())));
        let err = repo.list_all(10).await.unwrap_err();
        assert!(matches!(err, StoreError::Connection { .. }));
    }
}
