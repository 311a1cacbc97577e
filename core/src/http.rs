//! HTTP exchange types described as plain data.
//!
//! # Design
//! `HttpRequest` is what the dispatcher hands to a `Transport` once the URL
//! has passed the safety gate and the body has been parsed. `HttpResponse` is
//! what the transport hands back. Neither type knows about sockets, so a host
//! that performs its own I/O can sit between `Dispatcher::prepare` and
//! `Dispatcher::finish` without linking an HTTP client.
//!
//! All fields use owned types so values can cross the C boundary without
//! lifetime concerns.

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::headers::HeaderMap;

/// HTTP method. Any token is accepted; the common verbs get their own
/// variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Other(String),
}

impl HttpMethod {
    /// Upper-case `method` and map it onto a variant.
    pub fn parse(method: &str) -> Self {
        let upper = method.trim().to_ascii_uppercase();
        match upper.as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            _ => HttpMethod::Other(upper),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Other(m) => m,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request ready for a `Transport`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    /// Parsed request body. The transport serializes it back to canonical
    /// JSON, whatever the method.
    pub json: Option<Value>,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl HttpRequest {
    /// Canonical JSON bytes for the body, if any.
    pub fn json_bytes(&self) -> Option<Vec<u8>> {
        self.json.as_ref().and_then(|v| serde_json::to_vec(v).ok())
    }
}

/// A response as returned by a `Transport`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub headers: HeaderMap,
    pub body: String,
}
