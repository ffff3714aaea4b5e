// Authentication manager
//
// Exchanges credentials for a bearer token at `{org}/{app}/token` and
// stores it in the shared session. A failed login leaves whatever token
// was there before in place.

use std::sync::Arc;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::request::RequestExecutor;

/// Which kind of principal is logging in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// Organization client id + secret.
    Organization,
    /// Application client id + secret.
    #[default]
    Application,
    /// Application user, username + password.
    User,
}

impl AuthType {
    /// OAuth grant used for this principal.
    pub fn grant_type(self) -> &'static str {
        match self {
            Self::Organization | Self::Application => "client_credentials",
            Self::User => "password",
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Login and password management.
#[derive(Debug)]
pub struct AuthenticationManager {
    request: Arc<RequestExecutor>,
}

impl AuthenticationManager {
    pub fn new(request: Arc<RequestExecutor>) -> Self {
        Self { request }
    }

    /// Obtain a bearer token and make every later request carry it.
    ///
    /// `POST /token`. Users send `grant_type=password`; organizations and
    /// applications send `grant_type=client_credentials`.
    pub async fn login(
        &self,
        login_id: &str,
        secret: &SecretString,
        auth_type: AuthType,
    ) -> Result<(), Error> {
        let body = match auth_type {
            AuthType::User => json!({
                "grant_type": auth_type.grant_type(),
                "username": login_id,
                "password": secret.expose_secret(),
            }),
            AuthType::Organization | AuthType::Application => json!({
                "grant_type": auth_type.grant_type(),
                "client_id": login_id,
                "client_secret": secret.expose_secret(),
            }),
        };

        debug!(?auth_type, "logging in");
        let resp: TokenResponse = self
            .request
            .execute_json(Method::POST, "token", Some(&body))
            .await?;

        let token = resp
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication {
                message: "token endpoint returned no access_token".into(),
            })?;

        self.request.session().set_token(SecretString::from(token));
        debug!(?auth_type, expires_in = ?resp.expires_in, "login successful");
        Ok(())
    }

    /// Change a user's password. The session token is left as is.
    ///
    /// `POST /users/{username}/password` with `{"oldpassword", "newpassword"}`.
    pub async fn change_password(
        &self,
        username: &str,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), Error> {
        let path = format!("users/{username}/password");
        let body = json!({
            "oldpassword": old_password.expose_secret(),
            "newpassword": new_password.expose_secret(),
        });

        debug!(username, "changing password");
        self.request
            .execute(Method::POST, &path, Some(&body))
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn grant_types() {
        assert_eq!(AuthType::User.grant_type(), "password");
        assert_eq!(AuthType::Application.grant_type(), "client_credentials");
        assert_eq!(AuthType::Organization.grant_type(), "client_credentials");
    }

    #[test]
    fn auth_type_is_snake_case_on_the_wire() {
        let parsed: AuthType = serde_json::from_str("\"organization\"").unwrap();
        assert_eq!(parsed, AuthType::Organization);
        assert_eq!(serde_json::to_string(&AuthType::User).unwrap(), "\"user\"");
    }
}
