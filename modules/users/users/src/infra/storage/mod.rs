pub mod entity;
pub mod memory;
pub mod mongo;

pub use memory::InMemoryUsersRepository;
pub use mongo::{MongoStore, MongoUsersRepository, StoreSettings};
