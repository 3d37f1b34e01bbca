use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use thiserror::Error;

/// Store-assigned user identifier.
///
/// Rendered as 24 lowercase hex characters, the textual form of a document
/// store ObjectId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(ObjectId);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid userId: '{0}'")]
pub struct InvalidUserId(pub String);

impl UserId {
    /// Fresh identifier; used by stores that assign ids themselves.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn parse(s: &str) -> Result<Self, InvalidUserId> {
        if s.len() != 24 {
            return Err(InvalidUserId(s.to_owned()));
        }
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidUserId(s.to_owned()))
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for UserId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl From<UserId> for ObjectId {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl FromStr for UserId {
    type Err = InvalidUserId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Pure user model for inter-module communication (no serde).
/// The password never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: String,
    pub hobbies: Vec<String>,
}

/// Data for creating a new user. `password` is plaintext as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub gender: String,
    pub hobbies: Vec<String>,
}

/// Full record submitted for an update.
///
/// `email` is carried because the update request requires it, but the stored
/// email is never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub gender: String,
    pub hobbies: Vec<String>,
}
