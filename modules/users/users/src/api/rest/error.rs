use std::convert::Infallible;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::{request::Parts, StatusCode};
use modkit::api::problem::{FieldError, Problem, ProblemResponse};
use modkit::{XRequestId, REQUEST_ID_HEADER};

use crate::domain::error::DomainError;

/// Request details stamped onto every problem body.
#[derive(Debug, Clone, Default)]
pub struct ProblemCtx {
    pub instance: String,
    pub request_id: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for ProblemCtx {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .extensions
            .get::<XRequestId>()
            .map(|r| r.0.clone())
            .or_else(|| {
                parts
                    .headers
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned)
            });
        // Nested routers see the path with their prefix stripped.
        let instance = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path().to_owned(), |o| o.0.path().to_owned());
        Ok(Self {
            instance,
            request_id,
        })
    }
}

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    ctx: &ProblemCtx,
) -> ProblemResponse {
    let mut problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.user-registry.dev/{}", code))
        .with_code(code)
        .with_instance(ctx.instance.as_str());
    if let Some(id) = &ctx.request_id {
        problem = problem.with_request_id(id.as_str());
    }
    ProblemResponse(problem)
}

pub fn malformed_body(rejection: &JsonRejection, ctx: &ProblemCtx) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "USERS_MALFORMED_BODY",
        "Malformed request body",
        rejection.body_text(),
        ctx,
    )
}

pub fn missing_fields(fields: &[&'static str], ctx: &ProblemCtx) -> ProblemResponse {
    let errors = fields
        .iter()
        .map(|f| FieldError {
            detail: format!("{f} is required"),
            pointer: format!("/{f}"),
        })
        .collect();
    let mut resp = from_parts(
        StatusCode::BAD_REQUEST,
        "USERS_VALIDATION",
        "Validation error",
        "All fields required",
        ctx,
    );
    resp.0 = resp.0.with_errors(errors);
    resp
}

pub fn user_id_required(ctx: &ProblemCtx) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "USERS_ID_REQUIRED",
        "Validation error",
        "User id required",
        ctx,
    )
}

pub fn invalid_user_id(ctx: &ProblemCtx) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "USERS_INVALID_ID",
        "Validation error",
        "Invalid userId",
        ctx,
    )
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, ctx: &ProblemCtx) -> ProblemResponse {
    match e {
        DomainError::UserNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "USERS_NOT_FOUND",
            "Not found",
            "User not found",
            ctx,
        ),
        DomainError::EmailAlreadyExists { email } => from_parts(
            StatusCode::CONFLICT,
            "USERS_EMAIL_CONFLICT",
            "Email already exists",
            format!("Email '{}' is already in use", email),
            ctx,
        ),
        DomainError::MissingFields { fields } => missing_fields(fields, ctx),
        DomainError::StoreUnavailable { .. } | DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                ctx,
            )
        }
        DomainError::PasswordHash { .. } => {
            tracing::error!(error = ?e, "Password hashing failed");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Internal error",
                "An internal error occurred",
                ctx,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use users_sdk::UserId;

    fn ctx() -> ProblemCtx {
        ProblemCtx {
            instance: "/api/users".into(),
            request_id: Some("rid-1".into()),
        }
    }

    #[test]
    fn not_found_maps_to_404_with_context() {
        let resp = map_domain_error(&DomainError::user_not_found(UserId::generate()), &ctx());
        assert_eq!(resp.0.status, 404);
        assert_eq!(resp.0.detail, "User not found");
        assert_eq!(resp.0.code, "USERS_NOT_FOUND");
        assert_eq!(resp.0.instance, "/api/users");
        assert_eq!(resp.0.request_id.as_deref(), Some("rid-1"));
    }

    #[test]
    fn database_errors_hide_details() {
        let resp = map_domain_error(&DomainError::database("E11001 secret internals"), &ctx());
        assert_eq!(resp.0.status, 500);
        assert!(!resp.0.detail.contains("secret"));
    }

    #[test]
    fn missing_fields_lists_pointers() {
        let resp = missing_fields(&["firstName", "hobbies"], &ctx());
        assert_eq!(resp.0.status, 400);
        assert_eq!(resp.0.detail, "All fields required");
        let pointers: Vec<_> = resp.0.errors.iter().map(|e| e.pointer.as_str()).collect();
        assert_eq!(pointers, vec!["/firstName", "/hobbies"]);
    }
}
