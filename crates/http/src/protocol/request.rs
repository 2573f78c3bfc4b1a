//! HTTP request head types.
//!
//! A [`Request`] is a [`RequestLine`] plus a [`HeaderBlock`]. Requests are only
//! produced complete: either by a successful parse or by [`RequestBuilder::build`],
//! which validates every part with the same grammar the parser uses.

use std::fmt;

use http::uri::{Authority, PathAndQuery};
use http::{Method, Uri};

use crate::protocol::header::{HeaderBlock, HeaderField, HeaderKey};
use crate::protocol::{HttpVersion, ParseError};
use crate::utils::ensure;

/// The request-target of a request line (RFC 9112 section 3.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    /// `absolute-path [ "?" query ]`, used by most requests
    Origin(PathAndQuery),
    /// a full URI, used when talking to a proxy
    Absolute(Uri),
    /// `host:port`, only for CONNECT
    Authority(Authority),
    /// `*`, only for server-wide OPTIONS
    Asterisk,
}

impl RequestTarget {
    /// Parses `raw` in the forms allowed for `method`.
    ///
    /// CONNECT only accepts authority-form with an explicit port. Every other method
    /// accepts origin-form and absolute-form; OPTIONS also accepts `*`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidRequestTarget`] with an offset relative to `raw`.
    pub fn parse(method: &Method, raw: &[u8]) -> Result<RequestTarget, ParseError> {
        ensure!(!raw.is_empty(), ParseError::invalid_request_target(raw, 0, "empty request target"));
        if let Some(pos) = raw.iter().position(|b| !b.is_ascii_graphic()) {
            return Err(ParseError::invalid_request_target(raw, pos, "request target must be visible ASCII"));
        }
        if let Some(pos) = raw.iter().position(|b| *b == b'#') {
            return Err(ParseError::invalid_request_target(raw, pos, "request target must not carry a fragment"));
        }

        if method == Method::CONNECT {
            return Self::parse_authority_form(raw);
        }

        match raw {
            b"*" if method == Method::OPTIONS => Ok(RequestTarget::Asterisk),
            b"*" => Err(ParseError::invalid_request_target(raw, 0, "asterisk-form is only allowed for OPTIONS")),
            [b'/', ..] => PathAndQuery::try_from(raw)
                .ok()
                .map(RequestTarget::Origin)
                .ok_or_else(|| ParseError::invalid_request_target(raw, 0, "invalid origin-form")),
            _ => Self::parse_absolute_form(raw),
        }
    }

    fn parse_authority_form(raw: &[u8]) -> Result<RequestTarget, ParseError> {
        const NOT_AUTHORITY: &str = "CONNECT requires authority-form host:port";

        if let Some(pos) = raw.iter().position(|b| matches!(b, b'/' | b'?' | b'@')) {
            return Err(ParseError::invalid_request_target(raw, pos, NOT_AUTHORITY));
        }
        let authority = Authority::try_from(raw).ok().ok_or_else(|| ParseError::invalid_request_target(raw, 0, NOT_AUTHORITY))?;
        ensure!(!authority.host().is_empty(), ParseError::invalid_request_target(raw, 0, NOT_AUTHORITY));
        ensure!(authority.port_u16().is_some(), ParseError::invalid_request_target(raw, raw.len(), NOT_AUTHORITY));
        Ok(RequestTarget::Authority(authority))
    }

    fn parse_absolute_form(raw: &[u8]) -> Result<RequestTarget, ParseError> {
        match Uri::try_from(raw) {
            Ok(uri) if uri.scheme().is_some() && uri.authority().is_some() => Ok(RequestTarget::Absolute(uri)),
            Ok(uri) if uri.scheme().is_none() && uri.authority().is_some() => {
                Err(ParseError::invalid_request_target(raw, 0, "authority-form is only allowed for CONNECT"))
            }
            _ => Err(ParseError::invalid_request_target(raw, 0, "unrecognized request target form")),
        }
    }

    /// The path component, `*` for asterisk-form and empty for authority-form.
    pub fn path(&self) -> &str {
        match self {
            RequestTarget::Origin(path_and_query) => path_and_query.path(),
            RequestTarget::Absolute(uri) => uri.path(),
            RequestTarget::Authority(_) => "",
            RequestTarget::Asterisk => "*",
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            RequestTarget::Origin(path_and_query) => path_and_query.query(),
            RequestTarget::Absolute(uri) => uri.query(),
            RequestTarget::Authority(_) | RequestTarget::Asterisk => None,
        }
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestTarget::Origin(path_and_query) => fmt::Display::fmt(path_and_query, f),
            RequestTarget::Absolute(uri) => fmt::Display::fmt(uri, f),
            RequestTarget::Authority(authority) => fmt::Display::fmt(authority, f),
            RequestTarget::Asterisk => f.write_str("*"),
        }
    }
}

/// `method SP request-target SP HTTP-version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub target: RequestTarget,
    pub version: HttpVersion,
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.target, self.version)
    }
}

/// A complete, validated request head.
#[derive(Debug, Clone)]
pub struct Request {
    line: RequestLine,
    headers: HeaderBlock,
    head_len: Option<usize>,
}

impl Request {
    pub(crate) fn from_parts(line: RequestLine, headers: HeaderBlock, head_len: Option<usize>) -> Self {
        Self { line, headers, head_len }
    }

    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    pub fn line(&self) -> &RequestLine {
        &self.line
    }

    /// Returns a reference to the request's HTTP method.
    pub fn method(&self) -> &Method {
        &self.line.method
    }

    pub fn target(&self) -> &RequestTarget {
        &self.line.target
    }

    pub fn version(&self) -> HttpVersion {
        self.line.version
    }

    pub fn headers(&self) -> &HeaderBlock {
        &self.headers
    }

    /// Number of input bytes the head occupied, terminator included.
    ///
    /// Body bytes, if any, start at this offset of the parsed buffer. `None` for
    /// requests that were built rather than parsed.
    pub fn head_len(&self) -> Option<usize> {
        self.head_len
    }

    /// Whether the connection stays open after this request.
    ///
    /// HTTP/1.1 is persistent unless `Connection: close` is present; HTTP/1.0 only
    /// with `Connection: keep-alive`.
    pub fn keep_alive(&self) -> bool {
        keep_alive(self.version(), &self.headers)
    }

    pub fn into_parts(self) -> (RequestLine, HeaderBlock) {
        (self.line, self.headers)
    }

    /// Converts into an `http::Request`, attaching `body`.
    ///
    /// # Errors
    ///
    /// Returns an error if a header is not accepted by the `http` crate.
    pub fn into_http<B>(self, body: B) -> Result<http::Request<B>, http::Error> {
        let headers = self.headers.to_header_map()?;
        let mut request = http::Request::builder()
            .method(self.line.method)
            .uri(self.line.target.to_string())
            .version(self.line.version.into())
            .body(body)?;
        *request.headers_mut() = headers;
        Ok(request)
    }
}

pub(crate) fn keep_alive(version: HttpVersion, headers: &HeaderBlock) -> bool {
    if version.persistent_by_default() {
        !headers.has_connection_option("close")
    } else {
        headers.has_connection_option("keep-alive")
    }
}

/// Requests compare by line and headers; where they were parsed from does not matter.
impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line && self.headers == other.headers
    }
}

impl Eq for Request {}

/// Builds a [`Request`] programmatically.
///
/// Every part is checked when [`RequestBuilder::build`] runs, so a built request can
/// always be serialized.
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    target: String,
    version: HttpVersion,
    headers: Vec<(String, String)>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self { method: Method::GET, target: "/".to_owned(), version: HttpVersion::Http11, headers: Vec::new() }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn target<T: Into<String>>(mut self, target: T) -> Self {
        self.target = target.into();
        self
    }

    #[must_use]
    pub fn version(mut self, version: HttpVersion) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Validates the parts and assembles the request.
    ///
    /// # Errors
    ///
    /// - [`ParseError::InvalidRequestTarget`] if the target does not suit the method
    /// - [`ParseError::MalformedHeaderKey`] / [`ParseError::MalformedHeaderField`] for
    ///   a bad header
    pub fn build(self) -> Result<Request, ParseError> {
        let target = RequestTarget::parse(&self.method, self.target.as_bytes())?;
        let line = RequestLine { method: self.method, target, version: self.version };
        let headers = build_headers(self.headers)?;
        Ok(Request::from_parts(line, headers, None))
    }
}

pub(crate) fn build_headers(headers: Vec<(String, String)>) -> Result<HeaderBlock, ParseError> {
    let mut block = HeaderBlock::with_capacity(headers.len());
    for (key, value) in headers {
        block.append(HeaderField::new(HeaderKey::parse(&key)?, value)?);
    }
    Ok(block)
}
