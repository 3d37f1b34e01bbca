//! Argon2id password hashing.
//!
//! Each call draws a random salt from the OS and produces a PHC-format string
//! (`$argon2id$v=19$m=19456,t=2,p=1$...`), which is what the store persists.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher as _, SaltString},
    Argon2,
};

use crate::domain::ports::PasswordHasher;

#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| format!("Failed to hash password: {e}"))
    }
}
