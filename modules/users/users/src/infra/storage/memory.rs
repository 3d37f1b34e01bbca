//! In-process repository with the same semantics as the MongoDB adapter.
//! Backs tests and the server's `--mock` mode.

use async_trait::async_trait;
use bson::oid::ObjectId;
use parking_lot::RwLock;
use users_sdk::{User, UserId};

use crate::domain::repo::{NewUserRecord, StoreError, UserFields, UsersRepository};
use crate::infra::storage::entity::UserDocument;

#[derive(Default)]
pub struct InMemoryUsersRepository {
    docs: RwLock<Vec<UserDocument>>,
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored documents, including password hashes.
    pub fn documents(&self) -> Vec<UserDocument> {
        self.docs.read().clone()
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn list_all(&self, limit: u32) -> Result<Vec<User>, StoreError> {
        self.docs
            .read()
            .iter()
            .take(limit as usize)
            .cloned()
            .map(UserDocument::into_user)
            .collect()
    }

    async fn insert(&self, record: NewUserRecord) -> Result<User, StoreError> {
        let mut docs = self.docs.write();
        if docs.iter().any(|d| d.email == record.email) {
            return Err(StoreError::DuplicateKey {
                email: record.email,
            });
        }

        let mut document = UserDocument::from_record(record);
        document.id = Some(ObjectId::new());
        docs.push(document.clone());
        document.into_user()
    }

    async fn replace(&self, id: UserId, fields: UserFields) -> Result<Option<User>, StoreError> {
        let oid: ObjectId = id.into();
        let mut docs = self.docs.write();
        let Some(doc) = docs.iter_mut().find(|d| d.id == Some(oid)) else {
            return Ok(None);
        };

        doc.first_name = fields.first_name;
        doc.last_name = fields.last_name;
        doc.password = fields.password_hash;
        doc.gender = fields.gender;
        doc.hobbies = fields.hobbies;
        doc.clone().into_user().map(Some)
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        let oid: ObjectId = id.into();
        let mut docs = self.docs.write();
        let before = docs.len();
        docs.retain(|d| d.id != Some(oid));
        Ok(docs.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str) -> NewUserRecord {
        NewUserRecord {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: email.into(),
            password_hash: "hash".into(),
            gender: "female".into(),
            hobbies: vec!["reading".into(), "coding".into()],
        }
    }

    fn fields(first_name: &str) -> UserFields {
        UserFields {
            first_name: first_name.into(),
            last_name: "Lee".into(),
            password_hash: "hash2".into(),
            gender: "female".into(),
            hobbies: vec!["reading".into()],
        }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids_and_enforces_unique_email() {
        let repo = InMemoryUsersRepository::new();
        let a = repo.insert(record("a@x.io")).await.unwrap();
        let b = repo.insert(record("b@x.io")).await.unwrap();
        assert_ne!(a.id, b.id);

        let err = repo.insert(record("a@x.io")).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateKey {
                email: "a@x.io".into()
            }
        );
        assert_eq!(repo.list_all(100).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn replace_returns_post_update_record_and_keeps_email() {
        let repo = InMemoryUsersRepository::new();
        let user = repo.insert(record("a@x.io")).await.unwrap();

        let updated = repo.replace(user.id, fields("Anne")).await.unwrap().unwrap();
        assert_eq!(updated.id, user.id);
        assert_eq!(updated.first_name, "Anne");
        assert_eq!(updated.email, "a@x.io");
        assert_eq!(repo.documents()[0].password, "hash2");
    }

    #[tokio::test]
    async fn replace_and_delete_report_missing_ids() {
        let repo = InMemoryUsersRepository::new();
        let id = UserId::generate();
        assert_eq!(repo.replace(id, fields("x")).await.unwrap(), None);
        assert!(!repo.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_document() {
        let repo = InMemoryUsersRepository::new();
        let user = repo.insert(record("a@x.io")).await.unwrap();
        assert!(repo.delete(user.id).await.unwrap());
        assert!(repo.list_all(100).await.unwrap().is_empty());
        assert!(!repo.delete(user.id).await.unwrap());
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let repo = InMemoryUsersRepository::new();
        for i in 0..5 {
            repo.insert(record(&format!("u{i}@x.io"))).await.unwrap();
        }
        assert_eq!(repo.list_all(3).await.unwrap().len(), 3);
    }
}
