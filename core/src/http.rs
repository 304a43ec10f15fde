//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses transport outcomes without
//! ever touching the network. The host executes the actual I/O and reports
//! either an `HttpResponse` or a `TransportError` back to the matching
//! `QualtiveClient::parse_*` method.
//!
//! Bodies are raw bytes because attachment uploads carry binary data.

use std::time::Duration;

use thiserror::Error;

/// Timeout every Qualtive request is executed with.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Content type of every JSON body sent to the API.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `QualtiveClient::build_*` methods. `url` is absolute; for the
/// upload step it is the pre-signed URL handed out by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// The exchange produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// DNS, TLS, timeout, reset and every other network level failure.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The exchange was aborted before a response or an error was observed.
    #[error("request cancelled")]
    Cancelled,
}

/// What the host reports back after executing an `HttpRequest`.
pub type TransportOutcome = Result<HttpResponse, TransportError>;
