//! The network seam.
//!
//! # Design
//! The dispatcher never talks to sockets itself; it hands a validated
//! `HttpRequest` to a `Transport`. `UreqTransport` is the production
//! implementation. Tests plug in fakes to prove that rejected requests never
//! reach the network.

use std::io;

use ureq::http;

use crate::error::TransportError;
use crate::headers::HeaderMap;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP exchange. Implementations must enforce
/// `HttpRequest::timeout`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by `ureq`.
///
/// Status codes are returned as data rather than errors, any method token is
/// allowed, and a body is sent whenever the request carries one, GET included.
#[derive(Debug, Clone, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }

    fn agent(request: &HttpRequest) -> ureq::Agent {
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .timeout_global(Some(request.timeout))
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = Self::agent(request);

        let mut builder = http::Request::builder()
            .method(request.method.as_str())
            .uri(wire_url(&request.url)?);
        for (key, value) in request.headers.iter() {
            builder = builder.header(key, value);
        }
        if let Some(ua) = &request.user_agent {
            if !request.headers.contains_ignore_case("user-agent") {
                builder = builder.header("User-Agent", ua.as_str());
            }
        }

        let response = match request.json_bytes() {
            Some(bytes) => {
                if !request.headers.contains_ignore_case("content-type") {
                    builder = builder.header("Content-Type", "application/json");
                }
                let req = builder
                    .body(bytes)
                    .map_err(|e| TransportError::Other(e.to_string()))?;
                agent.run(req)
            }
            None => {
                let req = builder
                    .body(())
                    .map_err(|e| TransportError::Other(e.to_string()))?;
                agent.run(req)
            }
        }
        .map_err(classify)?;

        let (parts, mut body) = response.into_parts();
        let bytes = body
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(classify)?;

        let mut headers = HeaderMap::new();
        for (name, value) in parts.headers.iter() {
            headers.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }

        Ok(HttpResponse {
            status: parts.status.as_u16(),
            reason: parts.status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Percent-encode `raw` into a form `http::Uri` accepts. The fragment is
/// dropped since it never goes on the wire.
pub(crate) fn wire_url(raw: &str) -> Result<String, TransportError> {
    let mut parsed =
        ::url::Url::parse(raw.trim()).map_err(|e| TransportError::Other(e.to_string()))?;
    parsed.set_fragment(None);
    if let Some(query) = parsed.query() {
        // the WHATWG query set leaves these alone; `http::Uri` does not
        let encoded = query
            .chars()
            .fold(String::with_capacity(query.len()), |mut out, c| {
                match c {
                    '{' | '}' | '|' | '\\' | '^' | '`' | '[' | ']' => {
                        out.push_str(&format!("%{:02X}", c as u32));
                    }
                    _ => out.push(c),
                }
                out
            });
        parsed.set_query(Some(&encoded));
    }
    Ok(parsed.into())
}

fn classify(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportError::Connect(err.to_string())
        }
        ureq::Error::Io(ref io_err) => match io_err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportError::Timeout,
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::AddrNotAvailable => TransportError::Connect(err.to_string()),
            _ => TransportError::Other(err.to_string()),
        },
        other => TransportError::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_filter_query_is_encoded() {
        let url = wire_url(r#"http://localhost:8080/anything?filter={"a":1}"#).unwrap();
        assert_eq!(url, "http://localhost:8080/anything?filter=%7B%22a%22:1%7D");
        assert!(url.parse::<http::Uri>().is_ok());
    }

    #[test]
    fn path_characters_are_encoded() {
        let url = wire_url("https://api.example.com/a b/{id}/café").unwrap();
        assert_eq!(url, "https://api.example.com/a%20b/%7Bid%7D/caf%C3%A9");
        assert!(url.parse::<http::Uri>().is_ok());
    }

    #[test]
    fn plain_urls_pass_through() {
        assert_eq!(
            wire_url("  https://api.github.com/users/octocat?per_page=5#top ").unwrap(),
            "https://api.github.com/users/octocat?per_page=5"
        );
    }

    #[test]
    fn timeouts_are_classified() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert_eq!(classify(err), TransportError::Timeout);
    }

    #[test]
    fn refused_connections_are_classified() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(matches!(classify(err), TransportError::Connect(_)));
        assert!(matches!(classify(ureq::Error::HostNotFound), TransportError::Connect(_)));
    }

    #[test]
    fn everything_else_is_other() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::InvalidData, "garbled"));
        assert!(matches!(classify(err), TransportError::Other(_)));
    }
}
