#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use users::api::rest::routes;
use users::domain::ports::PasswordHasher;
use users::domain::repo::{NewUserRecord, StoreError, UserFields, UsersRepository};
use users::domain::service::{Service, ServiceConfig};
use users::infra::storage::InMemoryUsersRepository;
use users::{User, UserId};

/// Deterministic hasher so tests do not pay for Argon2.
pub struct TestHasher;

impl PasswordHasher for TestHasher {
    fn hash(&self, password: &str) -> Result<String, String> {
        Ok(format!("hashed:{password}"))
    }
}

/// Repository whose every call fails as if the database were unreachable.
pub struct UnreachableRepository;

#[async_trait]
impl UsersRepository for UnreachableRepository {
    async fn list_all(&self, _limit: u32) -> Result<Vec<User>, StoreError> {
        Err(StoreError::connection("server selection timeout at 10.0.0.7:27017"))
    }

    async fn insert(&self, _record: NewUserRecord) -> Result<User, StoreError> {
        Err(StoreError::connection("server selection timeout at 10.0.0.7:27017"))
    }

    async fn replace(&self, _id: UserId, _fields: UserFields) -> Result<Option<User>, StoreError> {
        Err(StoreError::connection("server selection timeout at 10.0.0.7:27017"))
    }

    async fn delete(&self, _id: UserId) -> Result<bool, StoreError> {
        Err(StoreError::connection("server selection timeout at 10.0.0.7:27017"))
    }
}

pub fn service_with(repo: Arc<dyn UsersRepository>) -> Arc<Service> {
    Arc::new(Service::new(
        repo,
        Arc::new(TestHasher),
        ServiceConfig::default(),
    ))
}

pub fn in_memory() -> (Arc<InMemoryUsersRepository>, Router) {
    let repo = Arc::new(InMemoryUsersRepository::new());
    let router = routes::register_routes(Router::new(), service_with(repo.clone()), "/api");
    (repo, router)
}

pub fn unreachable() -> Router {
    routes::register_routes(
        Router::new(),
        service_with(Arc::new(UnreachableRepository)),
        "/api",
    )
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub fn ann() -> Value {
    serde_json::json!({
        "firstName": "Ann",
        "lastName": "Lee",
        "email": "ann@x.io",
        "password": "secret1",
        "gender": "female",
        "hobbies": ["reading", "coding"]
    })
}
