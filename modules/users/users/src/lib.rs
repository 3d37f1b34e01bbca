// === PUBLIC CONTRACT ===
// The contract lives in `users-sdk`; re-exported so callers need a single import.
pub use users_sdk as contract;
pub use users_sdk::{NewUser, User, UserId, UserUpdate, UsersApi, UsersError};

// === MODULE DEFINITION ===
pub mod module;
pub use module::UsersModule;

// === INTERNAL MODULES ===
// WARNING: These modules are internal implementation details!
// They are exposed for the server binary and for tests. Other crates should
// depend on the contract only.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
