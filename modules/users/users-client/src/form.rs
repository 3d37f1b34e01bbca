//! Registration form model and its client-side validation rules.

use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::{Validate, ValidateEmail, ValidationError};
use users_sdk::{NewUser, User, UserUpdate};

pub const GENDERS: [&str; 3] = ["male", "female", "other"];
pub const HOBBIES: [&str; 4] = ["reading", "coding", "playing", "traveling"];

const MIN_PASSWORD_LEN: usize = 6;
const MIN_HOBBIES: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct RegistrationForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
    #[validate(custom(function = "validate_hobbies"))]
    pub hobbies: Vec<String>,
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut e = ValidationError::new(code);
    e.message = Some(Cow::Borrowed(message));
    e
}

fn validate_email(email: &String) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(invalid("required", "Email is required"));
    }
    if !email.validate_email() {
        return Err(invalid("email", "Invalid email"));
    }
    Ok(())
}

fn validate_password(password: &String) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(invalid("required", "Password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid("length", "Password must be at least 6 characters"));
    }
    Ok(())
}

fn validate_gender(gender: &String) -> Result<(), ValidationError> {
    if gender.is_empty() {
        return Err(invalid("required", "Gender is required"));
    }
    if !GENDERS.contains(&gender.as_str()) {
        return Err(invalid("choice", "Gender must be male, female or other"));
    }
    Ok(())
}

fn validate_hobbies(hobbies: &Vec<String>) -> Result<(), ValidationError> {
    if hobbies.iter().any(|h| !HOBBIES.contains(&h.as_str())) {
        return Err(invalid("choice", "Unknown hobby selected"));
    }
    if hobbies.len() < MIN_HOBBIES {
        return Err(invalid("length", "Select at least two hobbies"));
    }
    Ok(())
}

impl RegistrationForm {
    /// Prefill from a stored record. The password is never cached, so it
    /// starts blank and must be entered again.
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password: String::new(),
            gender: user.gender.clone(),
            hobbies: user.hobbies.clone(),
        }
    }

    /// First message per invalid field, keyed by field name. Empty when valid.
    pub fn validate_fields(&self) -> BTreeMap<String, String> {
        let Err(errors) = self.validate() else {
            return BTreeMap::new();
        };
        errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                let message = errs.first()?.message.as_ref()?.to_string();
                Some((field.to_string(), message))
            })
            .collect()
    }

    /// Toggle a hobby checkbox.
    pub fn toggle_hobby(&mut self, hobby: &str) {
        if let Some(pos) = self.hobbies.iter().position(|h| h == hobby) {
            self.hobbies.remove(pos);
        } else {
            self.hobbies.push(hobby.to_string());
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            gender: self.gender.clone(),
            hobbies: self.hobbies.clone(),
        }
    }

    pub fn to_update(&self) -> UserUpdate {
        UserUpdate {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            gender: self.gender.clone(),
            hobbies: self.hobbies.clone(),
        }
    }
}
