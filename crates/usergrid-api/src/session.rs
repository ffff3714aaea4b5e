// Per-client session state
//
// Organization, application, and base URL are fixed at construction; the
// bearer token is the one piece of mutable state, replaced by login and
// read by every request.

use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// The public Usergrid endpoint, used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://api.usergrid.com/";

/// Everything needed to build a [`crate::Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, e.g. `http://api.usergrid.com/`.
    pub base_url: String,
    pub organization: String,
    pub application: String,
    pub transport: TransportConfig,
}

impl ClientConfig {
    /// Config for `organization`/`application` on the public endpoint.
    pub fn new(organization: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            organization: organization.into(),
            application: application.into(),
            transport: TransportConfig::default(),
        }
    }

    /// Point the client at a different deployment.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}

/// Session shared by the request executor and every manager of one client.
///
/// At most one bearer token is held at a time. It is only ever replaced by
/// an explicit [`set_token`](Self::set_token) (login) or
/// [`clear_token`](Self::clear_token); requests already in flight when the
/// token changes may carry either value.
#[derive(Debug)]
pub struct Session {
    base_url: Url,
    organization: String,
    application: String,
    token: RwLock<Option<SecretString>>,
}

impl Session {
    pub fn new(
        base_url: &str,
        organization: impl Into<String>,
        application: impl Into<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            organization: organization.into(),
            application: application.into(),
            token: RwLock::new(None),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        Self::new(
            &config.base_url,
            config.organization.as_str(),
            config.application.as_str(),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    // ── URL building ─────────────────────────────────────────────────

    /// Absolute URL for a resource path: `{base}/{org}/{app}/{path}`.
    ///
    /// `path` is expected to be escaped already; only a leading `/` is
    /// normalized away.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let full = format!("{base}/{}/{}/{path}", self.organization, self.application);
        Ok(Url::parse(&full)?)
    }

    // ── Token management ─────────────────────────────────────────────

    /// Replace the bearer token used by all subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        debug!("storing bearer token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drop the bearer token; subsequent requests go out unauthenticated.
    pub fn clear_token(&self) {
        debug!("clearing bearer token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// A copy of the current bearer token, if any.
    pub fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Attach `Authorization: Bearer …` when a token is held.
    pub(crate) fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_org_app_and_path() {
        let session = Session::new("http://api.usergrid.com", "acme", "sandbox").unwrap();
        assert_eq!(
            session.url("/users/jdoe").unwrap().as_str(),
            "http://api.usergrid.com/acme/sandbox/users/jdoe"
        );
        assert_eq!(
            session.url("users").unwrap().as_str(),
            "http://api.usergrid.com/acme/sandbox/users"
        );
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let session = Session::new("https://baas.example.com/api/", "acme", "sandbox").unwrap();
        assert_eq!(
            session.url("groups/admins/users").unwrap().as_str(),
            "https://baas.example.com/api/acme/sandbox/groups/admins/users"
        );
    }

    #[test]
    fn token_is_replaced_not_accumulated() {
        let session = Session::new(DEFAULT_BASE_URL, "acme", "sandbox").unwrap();
        assert!(!session.is_authenticated());

        session.set_token(SecretString::from("first"));
        session.set_token(SecretString::from("second"));
        assert_eq!(session.token().unwrap().expose_secret(), "second");

        session.clear_token();
        assert!(session.token().is_none());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = Session::new("not a url", "acme", "sandbox").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
