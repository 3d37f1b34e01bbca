//! HTTP utilities: request ids, trace spans and the outgoing client.

pub mod client;
pub mod request_id;
