//! HTTP plumbing: a side-effect free transport ([`ApiClient`]) and the
//! session-aware handle the pages use ([`Api`]).

use std::rc::Rc;

use gloo_net::http::{Method, RequestBuilder, Response};
use log::{error, log, warn, Level};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use yew::Callback;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not authorized (HTTP {status})")]
    Unauthorized { status: u16, message: Option<String> },
    #[error("resource not found")]
    NotFound,
    #[error("{}", http_text(.status, .message))]
    Http { status: u16, message: Option<String> },
    #[error("unexpected response: {0}")]
    Decode(String),
}

fn http_text(status: &u16, message: &Option<String>) -> String {
    message.clone().unwrap_or_else(|| format!("HTTP {status}"))
}

impl From<gloo_net::Error> for ApiError {
    fn from(e: gloo_net::Error) -> Self {
        match e {
            gloo_net::Error::SerdeError(e) => ApiError::Decode(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Maps a non-2xx response to an error, keeping the backend `message` if any.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());
        match status {
            401 | 403 => ApiError::Unauthorized { status, message },
            404 => ApiError::NotFound,
            _ => ApiError::Http { status, message },
        }
    }

    /// Message the backend attached to the failure, if it sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message, .. } | ApiError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/* -------------------------------------------------------------------------- */
/*                                 transport                                  */
/* -------------------------------------------------------------------------- */

/// Level of the per-request and per-response records; kept visible in release builds.
pub const TRAFFIC_LEVEL: Level = Level::Info;

/// Log line for an outgoing request. Says whether a bearer is attached, never what it is.
fn request_line(method: &Method, url: &str, token: Option<&str>) -> String {
    format!("→ {method} {url} bearer={}", if token.is_some() { "yes" } else { "no" })
}

/// Builds, sends and checks requests. Knows nothing about sessions or routing:
/// the bearer token is an explicit argument and auth failures come back as
/// [`ApiError::Unauthorized`].
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        log!(TRAFFIC_LEVEL, "{}", request_line(&method, &url, token));

        let mut builder = RequestBuilder::new(&url)
            .method(method)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", &format!("Bearer {token}"));
        }

        let sent = match body {
            Some(b) => builder.json(b)?.send().await,
            None => builder.send().await,
        };
        let resp = sent.map_err(|e| {
            error!("✗ {url}: {e}");
            ApiError::from(e)
        })?;

        let status = resp.status();
        if resp.ok() {
            log!(TRAFFIC_LEVEL, "← {status} {url}");
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &text);
        warn!("← {status} {url}: {err}");
        Err(err)
    }
}

/* -------------------------------------------------------------------------- */
/*                           handle lié à la session                          */
/* -------------------------------------------------------------------------- */

/// Where the current bearer token comes from.
pub trait TokenSource {
    fn token(&self) -> Option<String>;
}

/// What pages call. Reads the token per request and reports every
/// `Unauthorized` result once to the session listener before returning it.
#[derive(Clone)]
pub struct Api {
    client: ApiClient,
    tokens: Rc<dyn TokenSource>,
    on_auth_lost: Callback<u16>,
}

impl Api {
    pub fn new(client: ApiClient, tokens: Rc<dyn TokenSource>, on_auth_lost: Callback<u16>) -> Self {
        Self {
            client,
            tokens,
            on_auth_lost,
        }
    }

    async fn call<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let token = self.tokens.token();
        let result = self.client.send(method, path, token.as_deref(), body).await;
        if let Err(ApiError::Unauthorized { status, .. }) = &result {
            self.on_auth_lost.emit(*status);
        }
        result
    }

    async fn decode<U: DeserializeOwned>(resp: Response) -> Result<U, ApiError> {
        resp.json::<U>().await.map_err(ApiError::from)
    }

    pub async fn get<U: DeserializeOwned>(&self, path: &str) -> Result<U, ApiError> {
        Self::decode(self.call(Method::GET, path, None::<&()>).await?).await
    }

    pub async fn post<B, U>(&self, path: &str, body: &B) -> Result<U, ApiError>
    where
        B: Serialize + ?Sized,
        U: DeserializeOwned,
    {
        Self::decode(self.call(Method::POST, path, Some(body)).await?).await
    }

    /// POST whose response body is ignored.
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.call(Method::POST, path, Some(body)).await.map(|_| ())
    }

    pub async fn put_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.call(Method::PUT, path, Some(body)).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.call(Method::DELETE, path, None::<&()>).await.map(|_| ())
    }

    /// DELETE carrying a JSON body (schedule unassignment).
    pub async fn delete_with<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.call(Method::DELETE, path, Some(body)).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path() {
        let c = ApiClient::new("http://localhost:8080/api/");
        assert_eq!(c.url("/inventory"), "http://localhost:8080/api/inventory");
        assert_eq!(c.url("boms/3/lines"), "http://localhost:8080/api/boms/3/lines");
    }

    #[test]
    fn traffic_is_logged_in_release_builds() {
        assert!(TRAFFIC_LEVEL <= crate::config::log_level(false));
        assert!(TRAFFIC_LEVEL <= crate::config::log_level(true));
    }

    #[test]
    fn request_line_hides_the_token() {
        let line = request_line(&Method::GET, "http://h/api/inventory", Some("secret.jwt"));
        assert_eq!(line, "→ GET http://h/api/inventory bearer=yes");
        assert_eq!(request_line(&Method::POST, "http://h/api/auth/login", None), "→ POST http://h/api/auth/login bearer=no");
    }

    #[test]
    fn auth_statuses_become_unauthorized() {
        assert_eq!(
            ApiError::from_status(401, ""),
            ApiError::Unauthorized { status: 401, message: None }
        );
        assert_eq!(
            ApiError::from_status(403, r#"{"message":"Bad credentials"}"#),
            ApiError::Unauthorized {
                status: 403,
                message: Some("Bad credentials".into())
            }
        );
    }

    #[test]
    fn keeps_backend_message() {
        let err = ApiError::from_status(400, r#"{"message":"Ref code already exists"}"#);
        assert_eq!(err.backend_message(), Some("Ref code already exists"));
        assert_eq!(err.to_string(), "Ref code already exists");
    }

    #[test]
    fn without_backend_message() {
        let err = ApiError::from_status(500, "<html>oops</html>");
        assert_eq!(err, ApiError::Http { status: 500, message: None });
        assert_eq!(err.backend_message(), None);
        assert_eq!(err.to_string(), "HTTP 500");
        assert_eq!(ApiError::from_status(404, ""), ApiError::NotFound);
        assert_eq!(ApiError::from_status(502, r#"{"message":"  "}"#).backend_message(), None);
    }
}
