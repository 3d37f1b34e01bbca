use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, response::Response, Extension, Json};
use modkit::api::problem::{Problem, ProblemResponse};
use modkit::api::response::{created_json, no_content, ok_json};
use tracing::{error, info, warn};
use users_sdk::UserId;

use crate::api::rest::dto::{
    CreateUserReq, DeleteUserReq, MessageDto, UpdateUserReq, UserDto, UserEnvelopeDto,
    UserListDto, MSG_USER_CREATED, MSG_USER_DELETED, MSG_USER_UPDATED,
};
use crate::api::rest::error::{
    invalid_user_id, malformed_body, map_domain_error, missing_fields, user_id_required,
    ProblemCtx,
};
use crate::domain::service::Service;

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    operation_id = "users.list_users",
    responses(
        (status = 200, description = "List of users", body = UserListDto),
        (status = 204, description = "No users stored"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_users(
    ctx: ProblemCtx,
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Response, ProblemResponse> {
    info!("Listing users");

    match svc.list_users().await {
        Ok(users) if users.is_empty() => Ok(no_content()),
        Ok(users) => Ok(ok_json(UserListDto {
            users: users.into_iter().map(UserDto::from).collect(),
            status_code: 200,
        })),
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    operation_id = "users.create_user",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "Created user", body = UserEnvelopeDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Conflict", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_user(
    ctx: ProblemCtx,
    Extension(svc): Extension<Arc<Service>>,
    payload: Result<Json<CreateUserReq>, JsonRejection>,
) -> Result<Response, ProblemResponse> {
    let Json(req_body) = payload.map_err(|rej| {
        warn!("Rejected create body: {}", rej.body_text());
        malformed_body(&rej, &ctx)
    })?;
    let new_user = req_body
        .into_new_user()
        .map_err(|missing| missing_fields(&missing, &ctx))?;

    info!(email = %new_user.email, "Creating user");

    match svc.create_user(new_user).await {
        Ok(user) => Ok(created_json(UserEnvelopeDto {
            message: MSG_USER_CREATED.to_string(),
            user: UserDto::from(user),
        })),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Replace the mutable fields of a user
#[utoipa::path(
    patch,
    path = "/api/users",
    tag = "users",
    operation_id = "users.update_user",
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "Updated user", body = UserEnvelopeDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_user(
    ctx: ProblemCtx,
    Extension(svc): Extension<Arc<Service>>,
    payload: Result<Json<UpdateUserReq>, JsonRejection>,
) -> Result<Response, ProblemResponse> {
    let Json(req_body) = payload.map_err(|rej| {
        warn!("Rejected update body: {}", rej.body_text());
        malformed_body(&rej, &ctx)
    })?;
    let (raw_id, update) = req_body
        .into_update()
        .map_err(|missing| missing_fields(&missing, &ctx))?;
    let id = UserId::parse(&raw_id).map_err(|_| invalid_user_id(&ctx))?;

    info!("Updating user {}", id);

    match svc.update_user(id, update).await {
        Ok(user) => Ok(ok_json(UserEnvelopeDto {
            message: MSG_USER_UPDATED.to_string(),
            user: UserDto::from(user),
        })),
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Delete a user by id
#[utoipa::path(
    delete,
    path = "/api/users",
    tag = "users",
    operation_id = "users.delete_user",
    request_body = DeleteUserReq,
    responses(
        (status = 200, description = "User deleted", body = MessageDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_user(
    ctx: ProblemCtx,
    Extension(svc): Extension<Arc<Service>>,
    payload: Result<Json<DeleteUserReq>, JsonRejection>,
) -> Result<Response, ProblemResponse> {
    let Json(req_body) = payload.map_err(|rej| {
        warn!("Rejected delete body: {}", rej.body_text());
        malformed_body(&rej, &ctx)
    })?;
    let raw_id = req_body
        .id
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| user_id_required(&ctx))?;
    let id = UserId::parse(&raw_id).map_err(|_| invalid_user_id(&ctx))?;

    info!("Deleting user {}", id);

    match svc.delete_user(id).await {
        Ok(()) => Ok(ok_json(MessageDto {
            message: MSG_USER_DELETED.to_string(),
        })),
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}
