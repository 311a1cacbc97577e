//! Validate, send and classify one HTTP exchange.
//!
//! # Design
//! `Dispatcher` holds only an immutable `DispatcherConfig` and a `Transport`,
//! so one instance can serve any number of threads. Each call is split the
//! same way the rest of the crate is: `prepare` turns a caller `Request` into
//! an `HttpRequest` (safety gate and body parsing, no I/O), the transport
//! executes it, and `finish` shapes the `HttpResponse` into an `Exchange`.
//! `send` is the three steps glued together with timing and error mapping.
//! There is no retry; one failed attempt is reported as is.

use std::time::{Duration, Instant};

use crate::config::{DispatcherConfig, AUDIT_URL_PREFIX_CHARS};
use crate::error::{bounded, truncate_chars, DispatchError};
use crate::headers::HeaderMap;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::payload::{is_json_content_type, parse_body, pretty_print};
use crate::transport::{Transport, UreqTransport};

/// What the caller wants sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: String,
    pub body: Option<String>,
    pub headers: HeaderMap,
    /// Whole seconds; `None` or zero means the dispatcher default.
    pub timeout_secs: Option<u64>,
}

impl Request {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body: None,
            headers: HeaderMap::new(),
            timeout_secs: None,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// Colour bucket the shell uses for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Warning,
    Danger,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Warning,
            _ => StatusClass::Danger,
        }
    }
}

/// Line count above which a JSON body is no longer syntax-coloured.
pub const MAX_HIGHLIGHT_LINES: usize = 1000;

/// A completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub status: u16,
    pub reason: String,
    pub elapsed: Duration,
    pub headers: HeaderMap,
    /// Pretty-printed when `is_json` is set, raw otherwise.
    pub body: String,
    pub is_json: bool,
}

impl Exchange {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn status_class(&self) -> StatusClass {
        StatusClass::of(self.status)
    }

    /// Whether a viewer should syntax-colour the body. Large bodies are shown
    /// plain.
    pub fn should_highlight(&self) -> bool {
        self.is_json && self.body.split('\n').count() <= MAX_HIGHLIGHT_LINES
    }

    pub fn status_line(&self) -> String {
        format!(
            "Status: {} {} | Time: {:.3}s",
            self.status,
            self.reason,
            self.elapsed_seconds()
        )
    }
}

/// Stateless request dispatcher.
#[derive(Debug, Clone)]
pub struct Dispatcher<T = UreqTransport> {
    config: DispatcherConfig,
    transport: T,
}

impl Dispatcher<UreqTransport> {
    pub fn new(config: DispatcherConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl Default for Dispatcher<UreqTransport> {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn with_transport(config: DispatcherConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Send `request` and classify the outcome.
    pub fn send(&self, request: &Request) -> Result<Exchange, DispatchError> {
        let prepared = self.prepare(request)?;
        let timeout_secs = prepared.timeout.as_secs();

        let started = Instant::now();
        let outcome = self.transport.execute(&prepared);
        let elapsed = started.elapsed();

        match outcome {
            Ok(response) => {
                tracing::debug!(
                    method = %prepared.method,
                    status = response.status,
                    elapsed_secs = elapsed.as_secs_f64(),
                    "request completed"
                );
                Ok(self.finish(response, elapsed))
            }
            Err(err) => {
                tracing::debug!(method = %prepared.method, error = %err, "request failed");
                Err(DispatchError::from_transport(err, timeout_secs))
            }
        }
    }

    /// Run the safety gate and parse the body. Performs no I/O.
    pub fn prepare(&self, request: &Request) -> Result<HttpRequest, DispatchError> {
        if !self.config.url_policy.is_safe(&request.url) {
            tracing::warn!(
                url_prefix = truncate_chars(&request.url, AUDIT_URL_PREFIX_CHARS),
                "rejected unsafe url"
            );
            return Err(DispatchError::InvalidUrl);
        }

        let json = match request.body.as_deref() {
            Some(body) => parse_body(body).map_err(|e| DispatchError::InvalidJson(bounded(&e.0)))?,
            None => None,
        };

        let timeout_secs = self.config.effective_timeout(request.timeout_secs);
        Ok(HttpRequest {
            method: HttpMethod::parse(&request.method),
            url: request.url.trim().to_string(),
            headers: request.headers.clone(),
            json,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: self.config.user_agent.clone(),
        })
    }

    /// Shape a transport response into an `Exchange`.
    pub fn finish(&self, response: HttpResponse, elapsed: Duration) -> Exchange {
        let is_json = response
            .headers
            .get_ignore_case("content-type")
            .is_some_and(is_json_content_type);
        let body = if is_json {
            pretty_print(&response.body)
        } else {
            response.body
        };

        Exchange {
            status: response.status,
            reason: response.reason,
            elapsed,
            headers: response.headers,
            body,
            is_json,
        }
    }
}
