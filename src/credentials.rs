//! Service account key loading.
//!
//! Reads the JSON key downloaded from the cloud console and turns it into an
//! [`AuthenticatedClient`]. Nothing here touches the network; the first token
//! is fetched lazily by the report call.

use std::io::Cursor;
use std::path::Path;

use log::{debug, info};
use ring::signature::RsaKeyPair;
use serde::Deserialize;

use crate::auth::{AuthenticatedClient, JwtTokenSource};
use crate::config::{ANALYTICS_READONLY_SCOPE, DEFAULT_TOKEN_URI};
use crate::error::{CredentialError, KeyParseError};
use crate::transport::UreqTransport;

const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// The subset of a service account key file this tool uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyParseError> {
        let key: ServiceAccountKey = serde_json::from_slice(bytes)?;

        if let Some(ref t) = key.key_type {
            if t != SERVICE_ACCOUNT_TYPE {
                return Err(KeyParseError::WrongType(t.clone()));
            }
        }
        if key.client_email.trim().is_empty() {
            return Err(KeyParseError::EmptyField("client_email"));
        }
        if key.private_key.trim().is_empty() {
            return Err(KeyParseError::EmptyField("private_key"));
        }

        Ok(key)
    }

    pub fn token_uri(&self) -> &str {
        self.token_uri
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_TOKEN_URI)
    }

    pub fn signing_key(&self) -> Result<RsaKeyPair, KeyParseError> {
        parse_private_key(&self.private_key)
    }

    /// Token source for `scope` backed by this key.
    pub fn token_source(&self, scope: &str) -> Result<JwtTokenSource, KeyParseError> {
        Ok(JwtTokenSource::new(
            self.client_email.as_str(),
            self.token_uri(),
            scope,
            self.signing_key()?,
        ))
    }
}

/// Decode the first PKCS#8 or PKCS#1 RSA key found in `pem`.
pub fn parse_private_key(pem: &str) -> Result<RsaKeyPair, KeyParseError> {
    let mut reader = Cursor::new(pem.as_bytes());
    loop {
        let item =
            rustls_pemfile::read_one(&mut reader).map_err(|e| KeyParseError::Pem(e.to_string()))?;
        match item {
            Some(rustls_pemfile::Item::Pkcs8Key(der)) => {
                return RsaKeyPair::from_pkcs8(der.secret_pkcs8_der())
                    .map_err(|e| KeyParseError::Rsa(e.to_string()));
            }
            Some(rustls_pemfile::Item::Pkcs1Key(der)) => {
                return RsaKeyPair::from_der(der.secret_pkcs1_der())
                    .map_err(|e| KeyParseError::Rsa(e.to_string()));
            }
            Some(_) => continue,
            None => return Err(KeyParseError::Pem("no private key block found".to_string())),
        }
    }
}

/// Read and parse the key at `path`.
pub fn read_key_file(path: &Path) -> Result<ServiceAccountKey, CredentialError> {
    let bytes = std::fs::read(path).map_err(|source| CredentialError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ServiceAccountKey::from_slice(&bytes).map_err(|source| CredentialError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the key at `path` and build a read-only Analytics token source from it.
pub fn load_token_source(path: &Path) -> Result<JwtTokenSource, CredentialError> {
    let key = read_key_file(path)?;
    debug!(
        "Loaded key {} for {}",
        key.private_key_id.as_deref().unwrap_or("<unnamed>"),
        key.client_email
    );
    key.token_source(ANALYTICS_READONLY_SCOPE)
        .map_err(|source| CredentialError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Load the key at `path` and bind it to the default HTTP transport.
pub fn load_client(path: impl AsRef<Path>) -> Result<AuthenticatedClient, CredentialError> {
    let path = path.as_ref();
    let tokens = load_token_source(path)?;
    info!("Using service account {}", tokens.client_email());
    Ok(AuthenticatedClient::new(UreqTransport::new(), tokens))
}
