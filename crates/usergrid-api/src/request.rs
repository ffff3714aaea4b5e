// Request executor
//
// Every call the crate makes funnels through `RequestExecutor`: it prefixes
// `{org}/{app}/` onto the caller's path, attaches the session's bearer token,
// serializes an optional JSON body, and hands back status + raw body.
// Deciding what counts as failure is left to the caller via `RawResponse`.

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::Error;
use crate::session::Session;
use crate::transport::TransportConfig;

/// Typed "no body" for calls that send none.
pub const NO_BODY: Option<&()> = None;

/// Characters of a bad body quoted in a deserialization error.
const PREVIEW_CHARS: usize = 200;

// ── Error response shape from the service ────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    error: String,
    #[serde(default, alias = "description")]
    error_description: Option<String>,
    #[serde(default)]
    exception: Option<String>,
}

// ── Raw response ─────────────────────────────────────────────────────

/// Status and body of one HTTP exchange, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    /// Any 2xx counts as success.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Pass a successful response through, or turn a failed one into
    /// [`Error::Api`].
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.into_error())
        }
    }

    /// Interpret this response as the service's error payload.
    ///
    /// Bodies that are not a well-formed error payload still produce an
    /// `Error::Api`, with the status reason as the code and the raw body
    /// as the description.
    pub fn into_error(self) -> Error {
        let status = self.status.as_u16();
        match serde_json::from_str::<ErrorResponse>(&self.body) {
            Ok(err) => Error::Api {
                status,
                error: err.error,
                description: err.error_description.unwrap_or_default(),
                exception: err.exception,
            },
            Err(_) => Error::Api {
                status,
                error: self
                    .status
                    .canonical_reason()
                    .unwrap_or("unknown")
                    .to_owned(),
                description: self.body,
                exception: None,
            },
        }
    }

    /// Deserialize the body regardless of status.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.body).map_err(|e| {
            let preview: String = self.body.chars().take(PREVIEW_CHARS).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: self.body.clone(),
            }
        })
    }

    /// Check status, then deserialize.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, Error> {
        self.error_for_status()?.json()
    }
}

// ── Executor ─────────────────────────────────────────────────────────

/// Builds and sends requests against one organization/application.
#[derive(Debug)]
pub struct RequestExecutor {
    http: reqwest::Client,
    session: Arc<Session>,
}

impl RequestExecutor {
    /// Create an executor with an HTTP client built from `transport`.
    pub fn new(session: Arc<Session>, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, session })
    }

    /// Create an executor around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, session: Arc<Session>) -> Self {
        Self { http, session }
    }

    /// The session whose token this executor attaches.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Send `method path` with an optional JSON body.
    ///
    /// `None` sends no body and no content type at all, which is not the
    /// same as serializing an empty value. Non-success statuses are
    /// returned, not raised.
    pub async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<RawResponse, Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.execute_with_params(method, path, &[], body).await
    }

    /// [`execute`](Self::execute) plus query parameters, which are encoded
    /// by the executor (unlike `path`).
    pub async fn execute_with_params<B>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<RawResponse, Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.session.url(path)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if !params.is_empty() {
            builder = builder.query(params);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder).await
    }

    /// Send a request and deserialize a successful body into `T`.
    pub async fn execute_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.execute(method, path, body).await?.into_json()
    }

    /// Submit form fields and file parts as `multipart/form-data`.
    pub async fn execute_multipart(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<RawResponse, Error> {
        let url = self.session.url(path)?;
        debug!("{method} {url} (multipart)");

        let builder = self.http.request(method, url).multipart(form);
        self.send(builder).await
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<RawResponse, Error> {
        let resp = self.session.apply_auth(builder).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        trace!(%status, bytes = body.len(), "response received");
        Ok(RawResponse { status, body })
    }
}

// ── Path helpers ─────────────────────────────────────────────────────

/// Join path segments with single slashes, ignoring empty segments.
pub(crate) fn resource_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
