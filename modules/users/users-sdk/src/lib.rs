//! Public contract of the users module.
//!
//! Transport-agnostic models, the [`UsersApi`] trait and the error type that
//! other crates consume. The server-side module implements the trait
//! in-process; `users-client` implements it over HTTP.

pub mod api;
pub mod error;
pub mod model;

pub use api::UsersApi;
pub use error::UsersError;
pub use model::{InvalidUserId, NewUser, User, UserId, UserUpdate};
