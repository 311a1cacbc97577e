//! Request-handling core for the NanoMan HTTP workbench.
//!
//! # Overview
//! Validates URLs, parses request bodies and header text, sends one HTTP
//! exchange with a hard timeout, and classifies the outcome into either an
//! `Exchange` or a `DispatchError` whose message is ready for display. The
//! desktop shell owns windows, colouring and threading; it calls into this
//! crate and renders what comes back.
//!
//! # Design
//! - `Dispatcher` is stateless apart from immutable config and a `Transport`.
//! - `url::is_safe` runs before anything else; a rejected URL never reaches
//!   the network.
//! - `prepare` / `finish` expose the I/O boundary so a host that owns its own
//!   HTTP stack can skip `UreqTransport`.
//! - `history` and `presets` serve the shell only; the dispatcher uses
//!   neither.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod headers;
pub mod history;
pub mod http;
pub mod payload;
pub mod presets;
pub mod transport;
pub mod url;

pub use config::DispatcherConfig;
pub use dispatch::{Dispatcher, Exchange, Request, StatusClass, MAX_HIGHLIGHT_LINES};
pub use error::{DispatchError, TransportError};
pub use headers::{parse_headers, parse_headers_opt, HeaderMap};
pub use history::{History, HistoryEntry};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use payload::{parse_body, pretty_print, PayloadError};
pub use presets::Catalog;
pub use transport::{Transport, UreqTransport};
pub use crate::url::{is_safe, UrlPolicy};
