//! Minimal blocking HTTP seam.
//!
//! Both the token exchange and the report call go through [`HttpTransport`],
//! so tests can swap in a recording fake and never touch the network.

use std::rc::Rc;

use crate::error::TransportError;

const USER_AGENT: &str = concat!("analytics_report/", env!("CARGO_PKG_VERSION"));

/// A POST request with a fully encoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub content_type: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    pub fn json(url: impl Into<String>, body: String) -> Self {
        HttpRequest {
            url: url.into(),
            content_type: "application/json",
            headers: Vec::new(),
            body,
        }
    }

    pub fn form(
        url: impl Into<String>,
        params: &[(&str, &str)],
    ) -> Result<Self, serde_urlencoded::ser::Error> {
        Ok(HttpRequest {
            url: url.into(),
            content_type: "application/x-www-form-urlencoded",
            headers: Vec::new(),
            body: serde_urlencoded::to_string(params)?,
        })
    }

    pub fn bearer_auth(mut self, token: &str) -> Self {
        self.headers
            .push(("Authorization".to_string(), format!("Bearer {}", token)));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed exchange, whatever the status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait HttpTransport {
    /// Perform one request. Non-2xx statuses are returned as responses;
    /// only failures to complete the exchange are errors.
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).post(request)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for Rc<T> {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).post(request)
    }
}

/// ureq-backed transport using the library's default timeouts.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        UreqTransport {
            agent: ureq::AgentBuilder::new().user_agent(USER_AGENT).build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut call = self
            .agent
            .post(&request.url)
            .set("Content-Type", request.content_type)
            .set("Accept", "application/json");
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }

        let response = match call.send_string(&request.body) {
            Ok(response) => response,
            // ureq reports 4xx/5xx as errors; callers want the status and body
            Err(ureq::Error::Status(_, response)) => response,
            Err(e) => return Err(TransportError::new(&request.url, e.to_string())),
        };

        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| TransportError::new(&request.url, e))?;
        Ok(HttpResponse { status, body })
    }
}
