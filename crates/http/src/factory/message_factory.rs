use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::codec::header::{encode_request_head, encode_response_head, HeaderDecoder};
use crate::codec::line::{parse_request_line, parse_status_line};
use crate::config::ParserConfig;
use crate::protocol::{HttpVersion, ParseError, Request, Response};
use crate::utils::{ensure, find_crlf, skip_empty_lines};

/// Parses and serializes message heads of one HTTP version.
///
/// A head is parsed in two steps: the start line, then the header block. The first
/// error stops the parse and nothing partial is returned. Offsets in errors are
/// relative to the buffer handed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFactory {
    version: HttpVersion,
    config: ParserConfig,
}

impl MessageFactory {
    pub fn new(version: HttpVersion, config: ParserConfig) -> Self {
        Self { version, config }
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses a request head from the start of `buf`.
    ///
    /// Empty lines before the request line are skipped (RFC 9112 section 2.2). Bytes
    /// after the head are left alone; [`Request::head_len`] tells where they start.
    ///
    /// # Errors
    ///
    /// - [`ParseError::TruncatedHeaders`] if `buf` ends before the empty line
    /// - [`ParseError::MalformedRequestLine`] / [`ParseError::InvalidRequestTarget`]
    ///   for a bad request line
    /// - [`ParseError::UnsupportedVersion`] if the version is not this factory's
    /// - any header block error, see [`ParseError`]
    pub fn parse_request(&self, buf: &[u8]) -> Result<Request, ParseError> {
        self.decode_request(buf).inspect_err(|e| debug!(version = %self.version, cause = %e, "rejected request head"))
    }

    fn decode_request(&self, buf: &[u8]) -> Result<Request, ParseError> {
        let start = skip_empty_lines(buf);
        let line_end = self.start_line_end(buf, start)?;
        let line = parse_request_line(&buf[start..line_end], &[self.version]).map_err(|e| e.at(start))?;
        let (headers, head_len) = HeaderDecoder::new(self.config).decode(buf, line_end + 2)?;

        trace!(head_len, header_count = headers.len(), "parsed request head");
        Ok(Request::from_parts(line, headers, Some(head_len)))
    }

    /// Parses a response head from the start of `buf`.
    ///
    /// # Errors
    ///
    /// - [`ParseError::TruncatedHeaders`] if `buf` ends before the empty line
    /// - [`ParseError::MalformedStatusLine`] for a bad status line, including a
    ///   status code outside 100..=599
    /// - [`ParseError::UnsupportedVersion`] if the version is not this factory's
    /// - any header block error, see [`ParseError`]
    pub fn parse_response(&self, buf: &[u8]) -> Result<Response, ParseError> {
        self.decode_response(buf).inspect_err(|e| debug!(version = %self.version, cause = %e, "rejected response head"))
    }

    fn decode_response(&self, buf: &[u8]) -> Result<Response, ParseError> {
        let line_end = self.start_line_end(buf, 0)?;
        let line = parse_status_line(&buf[..line_end], &[self.version])?;
        let (headers, head_len) = HeaderDecoder::new(self.config).decode(buf, line_end + 2)?;

        trace!(head_len, header_count = headers.len(), "parsed response head");
        Ok(Response::from_parts(line, headers, Some(head_len)))
    }

    /// Writes the request head in wire form.
    ///
    /// The output always parses back to an equal request through this factory.
    ///
    /// # Panics
    ///
    /// Panics if the request's version is not this factory's version.
    pub fn serialize_request(&self, request: &Request) -> Bytes {
        assert_eq!(request.version(), self.version, "request version does not match the {} factory", self.version);
        let mut dst = BytesMut::new();
        encode_request_head(request, &mut dst);
        dst.freeze()
    }

    /// Writes the response head in wire form.
    ///
    /// # Panics
    ///
    /// Panics if the response's version is not this factory's version.
    pub fn serialize_response(&self, response: &Response) -> Bytes {
        assert_eq!(response.version(), self.version, "response version does not match the {} factory", self.version);
        let mut dst = BytesMut::new();
        encode_response_head(response, &mut dst);
        dst.freeze()
    }

    /// Index of the CRLF ending the start line that begins at `start`.
    fn start_line_end(&self, buf: &[u8], start: usize) -> Result<usize, ParseError> {
        let max_bytes = self.config.max_header_bytes;
        match find_crlf(buf, start) {
            Some(end) => {
                ensure!(end + 2 <= max_bytes, ParseError::too_large_header(end + 2, max_bytes));
                Ok(end)
            }
            None => {
                ensure!(buf.len() <= max_bytes, ParseError::too_large_header(buf.len(), max_bytes));
                Err(ParseError::truncated_headers(&buf[start..], buf.len()))
            }
        }
    }
}
