use thiserror::Error;

/// Top-level error type for the `usergrid-api` crate.
///
/// Transport failures are passed through untouched; everything the remote
/// service reports as a non-success status lands in [`Error::Api`] with the
/// fields of its error payload.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote API ──────────────────────────────────────────────────
    /// Non-success response, carrying the service's error payload.
    ///
    /// Wire shape: `{"error": "...", "error_description": "...", "exception": "..."}`.
    #[error("Usergrid API error (HTTP {status}): {error}: {description}")]
    Api {
        status: u16,
        error: String,
        description: String,
        exception: Option<String>,
    },

    /// The token endpoint answered successfully but handed back no token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Local I/O ───────────────────────────────────────────────────
    /// A file needed for an upload could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if the service reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Returns `true` if the service rejected the caller's credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. } | Self::Authentication { .. })
    }

    /// HTTP status of a remote error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Extract the service error code (e.g. `service_resource_not_found`).
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { error, .. } => Some(error.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> Error {
        Error::Api {
            status,
            error: "service_resource_not_found".into(),
            description: "Service resource not found".into(),
            exception: None,
        }
    }

    #[test]
    fn not_found_is_keyed_on_status() {
        assert!(api(404).is_not_found());
        assert!(!api(400).is_not_found());
        assert_eq!(api(404).status(), Some(404));
    }

    #[test]
    fn local_failures_carry_no_status() {
        let io = Error::Io {
            path: "/tmp/cert.p12".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(!io.is_not_found());
        assert_eq!(io.status(), None);

        let tls = Error::Tls("bad pem".into());
        assert!(!tls.is_not_found());
        assert_eq!(tls.status(), None);
    }

    #[test]
    fn error_code_comes_from_payload() {
        assert_eq!(api(404).api_error_code(), Some("service_resource_not_found"));
        let auth = Error::Authentication {
            message: "no token".into(),
        };
        assert_eq!(auth.api_error_code(), None);
        assert!(auth.is_unauthorized());
    }
}
