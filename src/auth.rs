//! OAuth2 JWT bearer flow for service accounts.
//!
//! [`JwtTokenSource`] signs an RS256 assertion with the service account key,
//! trades it for an access token at the key's token endpoint and keeps the
//! token until shortly before it expires. [`AuthenticatedClient`] pairs a
//! token source with a transport so callers only ever see authorized POSTs.

use std::cell::RefCell;

use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use log::{debug, trace};
use ring::rand::SystemRandom;
use ring::signature::RsaKeyPair;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, ReportFetchError};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens this close to expiry are treated as already expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

pub trait TokenSource {
    /// Return a bearer token, fetching a fresh one through `transport` if needed.
    fn access_token(&self, transport: &dyn HttpTransport) -> Result<String, AuthError>;
}

/// A fixed bearer token; never refreshed.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn access_token(&self, _transport: &dyn HttpTransport) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

#[derive(Serialize)]
struct JwtHeader {
    alg: &'static str,
    typ: &'static str,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

pub struct JwtTokenSource {
    client_email: String,
    token_uri: String,
    scope: String,
    key_pair: RsaKeyPair,
    rng: SystemRandom,
    cached: RefCell<Option<CachedToken>>,
}

impl JwtTokenSource {
    pub fn new(
        client_email: impl Into<String>,
        token_uri: impl Into<String>,
        scope: impl Into<String>,
        key_pair: RsaKeyPair,
    ) -> Self {
        JwtTokenSource {
            client_email: client_email.into(),
            token_uri: token_uri.into(),
            scope: scope.into(),
            key_pair,
            rng: SystemRandom::new(),
            cached: RefCell::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Build the signed `header.claims.signature` assertion for `now`.
    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = JwtClaims {
            iss: &self.client_email,
            scope: &self.scope,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let header = JwtHeader {
            alg: "RS256",
            typ: "JWT",
        };

        let header_b64 =
            BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).map_err(AuthError::Encode)?);
        let claims_b64 =
            BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).map_err(AuthError::Encode)?);
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        // RSASSA-PKCS1-v1_5 with SHA-256
        let mut signature = vec![0; self.key_pair.public().modulus_len()];
        self.key_pair
            .sign(
                &ring::signature::RSA_PKCS1_SHA256,
                &self.rng,
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|e| AuthError::Sign(e.to_string()))?;

        Ok(format!(
            "{}.{}",
            signing_input,
            BASE64_URL_SAFE_NO_PAD.encode(&signature)
        ))
    }

    fn exchange(
        &self,
        transport: &dyn HttpTransport,
        now: DateTime<Utc>,
    ) -> Result<CachedToken, AuthError> {
        let jwt = self.assertion(now)?;
        let request = HttpRequest::form(
            self.token_uri.as_str(),
            &[("grant_type", JWT_BEARER_GRANT), ("assertion", jwt.as_str())],
        )
        .map_err(AuthError::Form)?;

        debug!(
            "Exchanging JWT assertion for {} at {}",
            self.client_email, self.token_uri
        );
        let response = transport.post(&request)?;
        if !response.is_success() {
            return Err(AuthError::Rejected {
                status: response.status,
                body: response.body,
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&response.body).map_err(AuthError::Decode)?;
        let lifetime = token
            .expires_in
            .unwrap_or(ASSERTION_LIFETIME_SECS)
            .clamp(0, ASSERTION_LIFETIME_SECS);
        trace!("Access token valid for {}s", lifetime);
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(lifetime),
        })
    }
}

impl TokenSource for JwtTokenSource {
    fn access_token(&self, transport: &dyn HttpTransport) -> Result<String, AuthError> {
        let now = Utc::now();
        if let Some(cached) = self.cached.borrow().as_ref() {
            if cached.is_fresh(now) {
                return Ok(cached.access_token.clone());
            }
        }

        let token = self.exchange(transport, now)?;
        let access_token = token.access_token.clone();
        *self.cached.borrow_mut() = Some(token);
        Ok(access_token)
    }
}

/// A transport bound to a service identity.
pub struct AuthenticatedClient {
    transport: Box<dyn HttpTransport>,
    tokens: Box<dyn TokenSource>,
}

impl AuthenticatedClient {
    pub fn new(
        transport: impl HttpTransport + 'static,
        tokens: impl TokenSource + 'static,
    ) -> Self {
        AuthenticatedClient {
            transport: Box::new(transport),
            tokens: Box::new(tokens),
        }
    }

    pub fn access_token(&self) -> Result<String, AuthError> {
        self.tokens.access_token(&*self.transport)
    }

    /// Send `request` with a bearer token attached. Token failures surface
    /// before anything is sent to `request.url`.
    pub fn send(&self, request: HttpRequest) -> Result<HttpResponse, ReportFetchError> {
        let token = self.access_token()?;
        let request = request.bearer_auth(&token);
        Ok(self.transport.post(&request)?)
    }
}
