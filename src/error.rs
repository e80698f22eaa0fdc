//! Error types for the credential, token and report stages
//!
//! `Display` describes only the failing step; the cause is reachable through
//! `source()` and rendered by the caller walking the chain.

use std::fmt;
use std::path::PathBuf;

/// Failure while loading the service account key file.
#[derive(Debug)]
pub enum CredentialError {
    /// The key file could not be read
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The key file was read but is not a usable service account key
    Parse {
        path: PathBuf,
        source: KeyParseError,
    },
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Read { path, .. } => {
                write!(f, "error reading key file '{}'", path.display())
            }
            CredentialError::Parse { path, .. } => {
                write!(f, "error parsing key file '{}'", path.display())
            }
        }
    }
}

impl std::error::Error for CredentialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CredentialError::Read { source, .. } => Some(source),
            CredentialError::Parse { source, .. } => Some(source),
        }
    }
}

/// Why a key file's contents were rejected.
#[derive(Debug)]
pub enum KeyParseError {
    Json(serde_json::Error),
    /// `type` was present but not `service_account`
    WrongType(String),
    /// A required field was present but empty
    EmptyField(&'static str),
    /// `private_key` held no PEM private key block
    Pem(String),
    /// The PEM block did not decode into an RSA signing key
    Rsa(String),
}

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyParseError::Json(_) => write!(f, "invalid JSON"),
            KeyParseError::WrongType(t) => {
                write!(f, "expected a service_account key, found type '{}'", t)
            }
            KeyParseError::EmptyField(name) => write!(f, "field '{}' is empty", name),
            KeyParseError::Pem(msg) => write!(f, "invalid private key PEM: {}", msg),
            KeyParseError::Rsa(msg) => write!(f, "invalid RSA private key: {}", msg),
        }
    }
}

impl std::error::Error for KeyParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KeyParseError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for KeyParseError {
    fn from(err: serde_json::Error) -> Self {
        KeyParseError::Json(err)
    }
}

/// The HTTP exchange itself failed (DNS, TLS, connection, I/O).
#[derive(Debug)]
pub struct TransportError {
    pub url: String,
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TransportError {
            url: url.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request to {} failed", self.url)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Failure obtaining an access token.
#[derive(Debug)]
pub enum AuthError {
    Sign(String),
    Encode(serde_json::Error),
    Form(serde_urlencoded::ser::Error),
    Transport(TransportError),
    /// The token endpoint answered with a non-success status
    Rejected { status: u16, body: String },
    Decode(serde_json::Error),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Sign(msg) => write!(f, "failed to sign token assertion: {}", msg),
            AuthError::Encode(_) => write!(f, "failed to encode token assertion"),
            AuthError::Form(_) => write!(f, "failed to encode token request"),
            AuthError::Transport(_) => write!(f, "token exchange failed"),
            AuthError::Rejected { status, body } => {
                write!(f, "token endpoint returned {}: {}", status, body.trim())
            }
            AuthError::Decode(_) => write!(f, "invalid token response"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Encode(e) | AuthError::Decode(e) => Some(e),
            AuthError::Form(e) => Some(e),
            AuthError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for AuthError {
    fn from(err: TransportError) -> Self {
        AuthError::Transport(err)
    }
}

/// Failure fetching the report.
#[derive(Debug)]
pub enum ReportFetchError {
    Auth(AuthError),
    Encode(serde_json::Error),
    Transport(TransportError),
    /// The reporting service answered with a non-success status
    Api { status: u16, message: String },
    Decode(serde_json::Error),
    /// The response breaks the row/column alignment the printer relies on
    MalformedResponse {
        report: usize,
        row: usize,
        detail: String,
    },
}

impl fmt::Display for ReportFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFetchError::Auth(_) => write!(f, "error authorizing report request"),
            ReportFetchError::Encode(_) => write!(f, "error encoding report request"),
            ReportFetchError::Transport(_) => write!(f, "report request not delivered"),
            ReportFetchError::Api { status, message } => {
                write!(f, "Analytics Reporting API returned {}: {}", status, message)
            }
            ReportFetchError::Decode(_) => write!(f, "error decoding Analytics report"),
            ReportFetchError::MalformedResponse {
                report,
                row,
                detail,
            } => write!(
                f,
                "malformed Analytics report (report {}, row {}): {}",
                report, row, detail
            ),
        }
    }
}

impl std::error::Error for ReportFetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportFetchError::Auth(e) => Some(e),
            ReportFetchError::Encode(e) | ReportFetchError::Decode(e) => Some(e),
            ReportFetchError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AuthError> for ReportFetchError {
    fn from(err: AuthError) -> Self {
        ReportFetchError::Auth(err)
    }
}

impl From<TransportError> for ReportFetchError {
    fn from(err: TransportError) -> Self {
        ReportFetchError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn chain(err: &dyn Error) -> Vec<String> {
        let mut out = vec![err.to_string()];
        let mut next = err.source();
        while let Some(e) = next {
            out.push(e.to_string());
            next = e.source();
        }
        out
    }

    #[test]
    fn test_read_error_names_cause_once() {
        let err = CredentialError::Read {
            path: PathBuf::from("/keys/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let rendered = chain(&err).join(": ");
        assert_eq!(rendered, "error reading key file '/keys/missing.json': gone");
    }

    #[test]
    fn test_transport_chain_names_cause_once() {
        let err = ReportFetchError::Auth(AuthError::Transport(TransportError::new(
            "https://oauth2.example.test/token",
            "connection refused",
        )));
        let rendered = chain(&err).join(": ");
        assert_eq!(
            rendered,
            "error authorizing report request: token exchange failed: \
             request to https://oauth2.example.test/token failed: connection refused"
        );
        assert_eq!(rendered.matches("connection refused").count(), 1);
    }
}
