use modkit::api::problem::{FieldError, Problem};
use utoipa::OpenApi;

use crate::api::rest::dto::{
    CreateUserReq, DeleteUserReq, MessageDto, UpdateUserReq, UserDto, UserEnvelopeDto,
    UserListDto,
};
use crate::api::rest::handlers;

#[derive(OpenApi)]
#[openapi(
    info(title = "User Registry API", description = "CRUD over registered users"),
    paths(
        handlers::list_users,
        handlers::create_user,
        handlers::update_user,
        handlers::delete_user
    ),
    components(schemas(
        UserDto,
        UserListDto,
        UserEnvelopeDto,
        MessageDto,
        CreateUserReq,
        UpdateUserReq,
        DeleteUserReq,
        Problem,
        FieldError
    )),
    tags((name = "users", description = "User registration and management"))
)]
pub struct UsersApiDoc;
