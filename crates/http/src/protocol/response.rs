//! HTTP response head types.

use std::fmt;

use http::StatusCode;

use crate::protocol::header::HeaderBlock;
use crate::protocol::request::{build_headers, keep_alive};
use crate::protocol::{HttpVersion, ParseError};

/// Lowest status code accepted on the wire.
pub const MIN_STATUS: u16 = 100;
/// Highest status code accepted on the wire.
pub const MAX_STATUS: u16 = 599;

/// `HTTP-version SP status-code SP [ reason-phrase ]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub version: HttpVersion,
    pub status: StatusCode,
    pub reason: String,
}

impl StatusLine {
    /// The reason phrase, or the canonical one for the status when the phrase is empty.
    pub fn reason_or_canonical(&self) -> &str {
        match self.reason.as_str() {
            "" => self.status.canonical_reason().unwrap_or(""),
            reason => reason,
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.version, self.status.as_str(), self.reason)
    }
}

/// A complete, validated response head.
#[derive(Debug, Clone)]
pub struct Response {
    line: StatusLine,
    headers: HeaderBlock,
    head_len: Option<usize>,
}

impl Response {
    pub(crate) fn from_parts(line: StatusLine, headers: HeaderBlock, head_len: Option<usize>) -> Self {
        Self { line, headers, head_len }
    }

    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    pub fn line(&self) -> &StatusLine {
        &self.line
    }

    pub fn status(&self) -> StatusCode {
        self.line.status
    }

    pub fn reason(&self) -> &str {
        &self.line.reason
    }

    pub fn version(&self) -> HttpVersion {
        self.line.version
    }

    pub fn headers(&self) -> &HeaderBlock {
        &self.headers
    }

    /// Number of input bytes the head occupied, `None` for built responses.
    pub fn head_len(&self) -> Option<usize> {
        self.head_len
    }

    pub fn keep_alive(&self) -> bool {
        keep_alive(self.version(), &self.headers)
    }

    pub fn into_parts(self) -> (StatusLine, HeaderBlock) {
        (self.line, self.headers)
    }

    /// Converts into an `http::Response`, attaching `body`. The reason phrase is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if a header is not accepted by the `http` crate.
    pub fn into_http<B>(self, body: B) -> Result<http::Response<B>, http::Error> {
        let headers = self.headers.to_header_map()?;
        let mut response =
            http::Response::builder().status(self.line.status).version(self.line.version.into()).body(body)?;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

impl PartialEq for Response {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line && self.headers == other.headers
    }
}

impl Eq for Response {}

/// Builds a [`Response`] programmatically.
///
/// When no reason is set the canonical phrase of the status is used.
#[derive(Debug)]
pub struct ResponseBuilder {
    version: HttpVersion,
    status: u16,
    reason: Option<String>,
    headers: Vec<(String, String)>,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self { version: HttpVersion::Http11, status: 200, reason: None, headers: Vec::new() }
    }
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn version(mut self, version: HttpVersion) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn reason<R: Into<String>>(mut self, reason: R) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Validates the parts and assembles the response.
    ///
    /// # Errors
    ///
    /// - [`ParseError::MalformedStatusLine`] if the status is outside 100..=599 or the
    ///   reason contains control characters
    /// - [`ParseError::MalformedHeaderKey`] / [`ParseError::MalformedHeaderField`] for
    ///   a bad header
    pub fn build(self) -> Result<Response, ParseError> {
        let status = status_code(self.status).ok_or_else(|| ParseError::malformed_status_line(self.status.to_string(), 0))?;
        let reason = match self.reason {
            Some(reason) => {
                if let Some(pos) = reason.bytes().position(|b| !is_reason_byte(b)) {
                    return Err(ParseError::malformed_status_line(&reason, pos));
                }
                reason
            }
            None => status.canonical_reason().unwrap_or("").to_owned(),
        };
        let line = StatusLine { version: self.version, status, reason };
        let headers = build_headers(self.headers)?;
        Ok(Response::from_parts(line, headers, None))
    }
}

/// Range-checked conversion to a `StatusCode`.
pub(crate) fn status_code(code: u16) -> Option<StatusCode> {
    if !(MIN_STATUS..=MAX_STATUS).contains(&code) {
        return None;
    }
    StatusCode::from_u16(code).ok()
}

/// `HTAB / SP / VCHAR / obs-text`
#[inline]
pub(crate) fn is_reason_byte(b: u8) -> bool {
    b == b'\t' || b == b' ' || (0x21..=0x7e).contains(&b) || b >= 0x80
}
