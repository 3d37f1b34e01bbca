//! Client side of the user registry.
//!
//! - [`RestUsersClient`]: [`UsersApi`](users_sdk::UsersApi) over HTTP
//! - [`UsersStore`]: client data store with sequenced async actions
//! - [`RegistrationForm`] and [`UsersGrid`]: form validation and the
//!   submit/edit/delete flow of the users grid

pub mod form;
pub mod gateway;
pub mod grid;
pub mod store;

pub use form::{RegistrationForm, GENDERS, HOBBIES};
pub use gateway::{RestUsersClient, DEFAULT_BASE_URL};
pub use grid::{GridError, UsersGrid};
pub use store::{Outcome, UsersState, UsersStore};
