use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use utoipa::OpenApi;

use crate::api::rest::handlers;
use crate::api::rest::openapi::UsersApiDoc;
use crate::domain::service::Service;

/// Mount the users routes under `base_path` and the OpenAPI document at
/// `/openapi.json`.
pub fn register_routes(router: Router, service: Arc<Service>, base_path: &str) -> Router {
    let users = Router::new()
        .route(
            "/users",
            get(handlers::list_users)
                .post(handlers::create_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .layer(Extension(service));

    let router = if base_path.is_empty() || base_path == "/" {
        router.merge(users)
    } else {
        router.nest(base_path, users)
    };

    router.route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(UsersApiDoc::openapi())
}
