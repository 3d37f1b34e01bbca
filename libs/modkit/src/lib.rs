//! # ModKit
//!
//! Shared HTTP building blocks for the registry services:
//!
//! - RFC 9457 Problem Details responses ([`Problem`], [`ProblemResponse`])
//! - small JSON response helpers
//! - request-id propagation and the per-request trace span
//! - a traced outgoing HTTP client ([`TracedClient`])

pub mod api;
pub mod http;

pub use api::problem::{
    bad_request, conflict, internal_error, not_found, FieldError, Problem, ProblemResponse,
    APPLICATION_PROBLEM_JSON,
};
pub use http::client::TracedClient;
pub use http::request_id::{XRequestId, REQUEST_ID_HEADER};
