//! A micro HTTP/1.x message head parser
//!
//! This crate turns raw request and response heads into validated, strongly typed
//! values and writes them back out. It covers the start line, the header block and
//! structured `Content-Type` values; message bodies and connection management are
//! left to the caller.
//!
//! # Features
//!
//! - HTTP/1.0 and HTTP/1.1 request lines and status lines
//! - Ordered, case-insensitive header fields with multi-value lookup
//! - Media type parsing with quoted parameter values
//! - Precise errors: every grammar error carries the offending fragment and its byte
//!   offset
//! - Configurable limits and compatibility policies via [`config::ParserConfig`]
//! - `tokio_util` codecs for streaming input
//!
//! # Example
//!
//! ```
//! use micro_http_parser::factory::HttpParser;
//! use micro_http_parser::protocol::header::HeaderKey;
//!
//! let parser = HttpParser::default();
//!
//! let request = parser
//!     .parse_request(b"GET /test HTTP/1.1\r\nHost: localhost\r\nAccept: text/html\r\n\r\n")
//!     .unwrap();
//! assert_eq!(request.method(), http::Method::GET);
//! assert_eq!(request.target().path(), "/test");
//! assert_eq!(request.headers().get_first(&HeaderKey::HOST), Some("localhost"));
//!
//! let response = parser
//!     .parse_response(b"HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n")
//!     .unwrap();
//! let media_type = response.headers().content_type().unwrap().unwrap();
//! assert_eq!(media_type.essence(), "text/html");
//! assert_eq!(media_type.charset(), Some("UTF-8"));
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: message types, headers, media types and errors
//! - [`codec`]: the wire grammar plus streaming decoders and encoder
//! - [`factory`]: version bound parsing and serialization
//! - [`config`]: limits and compatibility policies
//!
//! # Error Handling
//!
//! - [`protocol::ParseError`]: every parse and validation failure
//! - [`protocol::HttpError`]: what the streaming codecs return, a parse error or an io
//!   error
//!
//! Parsing fails fast: the first error is returned and nothing partial is produced.
//!
//! # Limits
//!
//! By default a head may not exceed 8KB and may not carry more than 64 fields. Both
//! are configurable.

pub mod codec;
pub mod config;
pub mod factory;
pub mod protocol;

mod utils;
