use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use users_sdk::User;

use crate::domain::repo::{NewUserRecord, StoreError};

/// Shape of a document in the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password: String,
    pub gender: String,
    #[serde(default)]
    pub hobbies: Vec<String>,
}

impl UserDocument {
    pub fn from_record(record: NewUserRecord) -> Self {
        Self {
            id: None,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            password: record.password_hash,
            gender: record.gender,
            hobbies: record.hobbies,
        }
    }

    /// Public view of the document. Fails for documents that were never stored.
    pub fn into_user(self) -> Result<User, StoreError> {
        let id = self
            .id
            .ok_or_else(|| StoreError::backend("document has no _id"))?;
        Ok(User {
            id: id.into(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            gender: self.gender,
            hobbies: self.hobbies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_and_object_id() {
        let oid = ObjectId::parse_str("65f1a2b3c4d5e6f708192a3b").unwrap();
        let doc = UserDocument {
            id: Some(oid),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@x.io".into(),
            password: "$argon2id$...".into(),
            gender: "female".into(),
            hobbies: vec!["reading".into()],
        };

        let bson_doc = bson::to_document(&doc).unwrap();
        assert_eq!(bson_doc.get_object_id("_id").unwrap(), oid);
        assert_eq!(bson_doc.get_str("firstName").unwrap(), "Ann");
        assert_eq!(bson_doc.get_str("lastName").unwrap(), "Lee");
        assert!(bson_doc.get_array("hobbies").is_ok());
    }

    #[test]
    fn unsaved_document_omits_id_and_cannot_become_user() {
        let doc = UserDocument::from_record(NewUserRecord {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@x.io".into(),
            password_hash: "h".into(),
            gender: "female".into(),
            hobbies: vec![],
        });

        let bson_doc = bson::to_document(&doc).unwrap();
        assert!(!bson_doc.contains_key("_id"));
        assert!(matches!(doc.into_user(), Err(StoreError::Backend { .. })));
    }
}
