//! [`UsersApi`] implementation over the registry's REST surface.

use async_trait::async_trait;
use modkit::{Problem, TracedClient};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;
use users_sdk::{NewUser, User, UserId, UserUpdate, UsersApi, UsersError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserWire {
    #[serde(rename = "_id")]
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    gender: String,
    #[serde(default)]
    hobbies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ListWire {
    users: Vec<UserWire>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeWire {
    user: UserWire,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserBody<'a> {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    password: &'a str,
    gender: &'a str,
    hobbies: &'a [String],
}

#[derive(Debug, Serialize)]
struct IdBody {
    #[serde(rename = "_id")]
    id: String,
}

impl TryFrom<UserWire> for User {
    type Error = UsersError;

    fn try_from(w: UserWire) -> Result<Self, Self::Error> {
        let id = UserId::parse(&w.id).map_err(|e| {
            warn!("Server returned malformed id: {}", e);
            UsersError::internal()
        })?;
        Ok(User {
            id,
            first_name: w.first_name,
            last_name: w.last_name,
            email: w.email,
            gender: w.gender,
            hobbies: w.hobbies,
        })
    }
}

/// REST client for `/users` under a base URL such as `http://host:3000/api/`.
#[derive(Clone)]
pub struct RestUsersClient {
    http: TracedClient,
    users_url: Url,
}

impl RestUsersClient {
    /// Client for a server on this machine at [`DEFAULT_BASE_URL`].
    pub fn local() -> Result<Self, url::ParseError> {
        Self::new(DEFAULT_BASE_URL)
    }

    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Self::with_client(TracedClient::default(), base_url)
    }

    pub fn with_client(http: TracedClient, base_url: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let users_url = base.join("users")?;
        Ok(Self { http, users_url })
    }

    pub fn users_url(&self) -> &Url {
        &self.users_url
    }

    async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        body: Option<&B>,
    ) -> Result<reqwest::Response, UsersError> {
        let mut builder = self.http.request(method, self.users_url.as_str());
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.http
            .send(builder)
            .await
            .map_err(|e| UsersError::unavailable(e.to_string()))
    }
}

/// What the caller knew when the request was made, used to fill error variants.
#[derive(Default)]
struct Context<'a> {
    id: Option<UserId>,
    email: Option<&'a str>,
}

async fn error_from(resp: reqwest::Response, ctx: Context<'_>) -> UsersError {
    let status = resp.status();
    let detail = match resp.json::<Problem>().await {
        Ok(p) => p.detail,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Something went wrong")
            .to_string(),
    };
    debug!(status = status.as_u16(), %detail, "Request rejected");

    match (status, ctx) {
        (StatusCode::BAD_REQUEST, _) => UsersError::validation(detail),
        (StatusCode::NOT_FOUND, Context { id: Some(id), .. }) => UsersError::not_found(id),
        (StatusCode::CONFLICT, Context { email: Some(email), .. }) => UsersError::conflict(email),
        (StatusCode::SERVICE_UNAVAILABLE, _) => UsersError::unavailable(detail),
        _ => UsersError::internal(),
    }
}

async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, UsersError> {
    resp.json::<T>().await.map_err(|e| {
        warn!("Failed to decode response: {}", e);
        UsersError::internal()
    })
}

#[async_trait]
impl UsersApi for RestUsersClient {
    async fn list_users(&self) -> Result<Vec<User>, UsersError> {
        let resp = self.call::<()>(Method::GET, None).await?;
        match resp.status() {
            StatusCode::NO_CONTENT => Ok(Vec::new()),
            s if s.is_success() => decode::<ListWire>(resp)
                .await?
                .users
                .into_iter()
                .map(User::try_from)
                .collect(),
            _ => Err(error_from(resp, Context::default()).await),
        }
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersError> {
        let body = UserBody {
            id: None,
            first_name: &new_user.first_name,
            last_name: &new_user.last_name,
            email: &new_user.email,
            password: &new_user.password,
            gender: &new_user.gender,
            hobbies: &new_user.hobbies,
        };
        let resp = self.call(Method::POST, Some(&body)).await?;
        if resp.status().is_success() {
            decode::<EnvelopeWire>(resp).await?.user.try_into()
        } else {
            let ctx = Context {
                email: Some(&new_user.email),
                ..Context::default()
            };
            Err(error_from(resp, ctx).await)
        }
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, UsersError> {
        let body = UserBody {
            id: Some(id.to_string()),
            first_name: &update.first_name,
            last_name: &update.last_name,
            email: &update.email,
            password: &update.password,
            gender: &update.gender,
            hobbies: &update.hobbies,
        };
        let resp = self.call(Method::PATCH, Some(&body)).await?;
        if resp.status().is_success() {
            decode::<EnvelopeWire>(resp).await?.user.try_into()
        } else {
            let ctx = Context {
                id: Some(id),
                email: Some(&update.email),
            };
            Err(error_from(resp, ctx).await)
        }
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UsersError> {
        let body = IdBody { id: id.to_string() };
        let resp = self.call(Method::DELETE, Some(&body)).await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            let ctx = Context {
                id: Some(id),
                ..Context::default()
            };
            Err(error_from(resp, ctx).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const ID: &str = "65f1a2b3c4d5e6f708192a3b";

    fn user_json(first_name: &str) -> serde_json::Value {
        json!({
            "_id": ID,
            "firstName": first_name,
            "lastName": "Lee",
            "email": "ann@x.io",
            "gender": "female",
            "hobbies": ["reading", "coding"]
        })
    }

    fn client(server: &MockServer) -> RestUsersClient {
        RestUsersClient::new(&server.url("/api")).unwrap()
    }

    fn problem(status: u16, detail: &str) -> serde_json::Value {
        json!({
            "type": "about:blank", "title": "x", "status": status,
            "detail": detail, "instance": "/api/users", "code": "X"
        })
    }

    #[test]
    fn base_url_gets_a_trailing_slash() {
        let c = RestUsersClient::new("http://localhost:3000/api").unwrap();
        assert_eq!(c.users_url().as_str(), "http://localhost:3000/api/users");
        let d = RestUsersClient::local().unwrap();
        assert_eq!(d.users_url().as_str(), "http://localhost:3000/api/users");
    }

    #[tokio::test]
    async fn list_decodes_users_and_treats_204_as_empty() {
        let server = MockServer::start();
        let mut ok = server.mock(|when, then| {
            when.method(GET).path("/api/users");
            then.status(200)
                .json_body(json!({ "users": [user_json("Ann")], "statusCode": 200 }));
        });

        let users = client(&server).list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id.to_string(), ID);
        assert_eq!(users[0].first_name, "Ann");
        ok.assert();
        ok.delete();

        server.mock(|when, then| {
            when.method(GET).path("/api/users");
            then.status(204);
        });
        assert!(client(&server).list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_posts_camel_case_body() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/api/users")
                .header("content-type", "application/json")
                .json_body(json!({
                    "firstName": "Ann", "lastName": "Lee", "email": "ann@x.io",
                    "password": "secret1", "gender": "female", "hobbies": ["reading", "coding"]
                }));
            then.status(201)
                .json_body(json!({ "message": "User is created", "user": user_json("Ann") }));
        });

        let user = client(&server)
            .create_user(NewUser {
                first_name: "Ann".into(),
                last_name: "Lee".into(),
                email: "ann@x.io".into(),
                password: "secret1".into(),
                gender: "female".into(),
                hobbies: vec!["reading".into(), "coding".into()],
            })
            .await
            .unwrap();
        assert_eq!(user.email, "ann@x.io");
        m.assert();
    }

    #[tokio::test]
    async fn problem_statuses_map_to_contract_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/api/users");
            then.status(404).json_body(problem(404, "User not found"));
        });
        server.mock(|when, then| {
            when.method(PATCH).path("/api/users");
            then.status(400).json_body(problem(400, "All fields required"));
        });
        server.mock(|when, then| {
            when.method(POST).path("/api/users");
            then.status(409).json_body(problem(409, "Email 'ann@x.io' is already in use"));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/users");
            then.status(500).json_body(problem(500, "An internal database error occurred"));
        });

        let c = client(&server);
        let id = UserId::parse(ID).unwrap();

        assert_eq!(c.delete_user(id).await.unwrap_err(), UsersError::not_found(id));
        assert_eq!(
            c.update_user(id, UserUpdate::default()).await.unwrap_err(),
            UsersError::validation("All fields required")
        );
        let new_user = NewUser {
            email: "ann@x.io".into(),
            ..NewUser::default()
        };
        assert_eq!(
            c.create_user(new_user).await.unwrap_err(),
            UsersError::conflict("ann@x.io")
        );
        assert_eq!(c.list_users().await.unwrap_err(), UsersError::internal());
    }

    #[tokio::test]
    async fn transport_failures_are_unavailable() {
        let c = RestUsersClient::new("http://127.0.0.1:1/api/").unwrap();
        assert!(matches!(
            c.list_users().await,
            Err(UsersError::Unavailable { .. })
        ));
    }
}
