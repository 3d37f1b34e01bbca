//! Response types shared by REST handlers.

pub mod problem;
pub mod response;
