use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use users_sdk::{NewUser, User, UserUpdate};

pub const MSG_USER_CREATED: &str = "User is created";
pub const MSG_USER_UPDATED: &str = "User updated successfully";
pub const MSG_USER_DELETED: &str = "User deleted Successfully";

/// REST DTO for user representation. The password is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Store-assigned id, 24 hex characters.
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: String,
    pub hobbies: Vec<String>,
}

/// REST DTO for creating a new user. Every field is required; absent ones are
/// reported together as a single validation problem.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub gender: Option<String>,
    pub hobbies: Option<Vec<String>>,
}

/// REST DTO for replacing a user. `email` is required but never reassigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserReq {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub gender: Option<String>,
    pub hobbies: Option<Vec<String>>,
}

/// REST DTO for deleting a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DeleteUserReq {
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

/// REST DTO for user list response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListDto {
    pub users: Vec<UserDto>,
    pub status_code: u16,
}

/// Response carrying a confirmation message and the affected user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelopeDto {
    pub message: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub message: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            gender: user.gender,
            hobbies: user.hobbies,
        }
    }
}

/// Values that count as absent when blank.
trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Blank for Vec<String> {
    /// A list is blank when empty or when any entry is blank.
    fn is_blank(&self) -> bool {
        self.is_empty() || self.iter().any(|h| h.is_blank())
    }
}

/// Collects the names of absent or blank fields while unwrapping present ones.
#[derive(Default)]
struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    fn take<T: Default + Blank>(&mut self, name: &'static str, value: Option<T>) -> T {
        match value.filter(|v| !v.is_blank()) {
            Some(v) => v,
            None => {
                self.missing.push(name);
                T::default()
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, Vec<&'static str>> {
        if self.missing.is_empty() {
            Ok(value)
        } else {
            Err(self.missing)
        }
    }
}

impl CreateUserReq {
    /// Contract model, or the JSON names of the absent or blank fields.
    pub fn into_new_user(self) -> Result<NewUser, Vec<&'static str>> {
        let mut req = Required::default();
        let new_user = NewUser {
            first_name: req.take("firstName", self.first_name),
            last_name: req.take("lastName", self.last_name),
            email: req.take("email", self.email),
            password: req.take("password", self.password),
            gender: req.take("gender", self.gender),
            hobbies: req.take("hobbies", self.hobbies),
        };
        req.finish(new_user)
    }
}

impl UpdateUserReq {
    /// Raw id plus contract model, or the JSON names of the absent or blank fields.
    pub fn into_update(self) -> Result<(String, UserUpdate), Vec<&'static str>> {
        let mut req = Required::default();
        let id = req.take("_id", self.id);
        let update = UserUpdate {
            first_name: req.take("firstName", self.first_name),
            last_name: req.take("lastName", self.last_name),
            email: req.take("email", self.email),
            password: req.take("password", self.password),
            gender: req.take("gender", self.gender),
            hobbies: req.take("hobbies", self.hobbies),
        };
        req.finish((id, update))
    }
}
