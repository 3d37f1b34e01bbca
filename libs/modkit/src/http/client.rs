//! Traced HTTP client.
//!
//! Wraps `reqwest::Client` so every outgoing request runs inside an
//! `outgoing_http` span and carries an `x-request-id` header that the
//! server side picks up for log correlation.

use reqwest::header::HeaderValue;
use tracing::{field::Empty, Instrument};

use crate::http::request_id::REQUEST_ID_HEADER;

#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Start a request; finish it with [`TracedClient::send`].
    pub fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }

    /// Build and execute a request inside an `outgoing_http` span.
    pub async fn send(&self, builder: reqwest::RequestBuilder) -> reqwest::Result<reqwest::Response> {
        let mut req = builder.build()?;

        if !req.headers().contains_key(REQUEST_ID_HEADER) {
            if let Ok(v) = HeaderValue::from_str(&nanoid::nanoid!()) {
                req.headers_mut().insert(REQUEST_ID_HEADER, v);
            }
        }
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("n/a")
            .to_owned();

        let span = tracing::info_span!(
            "outgoing_http",
            http.method = %req.method(),
            http.url = %req.url(),
            request_id = %request_id,
            http.status_code = Empty,
            error = Empty,
        );

        let response = self.inner.execute(req).instrument(span.clone()).await?;

        let status = response.status();
        span.record("http.status_code", status.as_u16());
        if status.is_client_error() || status.is_server_error() {
            span.record("error", true);
        }

        Ok(response)
    }

    pub async fn get(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        self.send(self.inner.get(url)).await
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

impl From<reqwest::Client> for TracedClient {
    fn from(c: reqwest::Client) -> Self {
        Self::new(c)
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}
