//! Streaming request head decoder.
//!
//! [`RequestHeadDecoder`] plugs an [`HttpParser`] into `tokio_util::codec`, so a
//! `FramedRead` over any `AsyncRead` yields one [`Request`] per head.
//!
//! # Example
//!
//! ```no_run
//! use micro_http_parser::codec::RequestHeadDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestHeadDecoder::new();
//! let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n"[..]);
//! let request = decoder.decode(&mut buffer);
//! ```

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::contains_head_terminator;
use crate::factory::HttpParser;
use crate::protocol::{HttpError, ParseError, Request};
use crate::utils::{ensure, skip_empty_lines};

/// Decodes request heads from a byte stream.
///
/// Only the head is consumed from the buffer. Body bytes are left in place; a caller
/// expecting a body takes them before decoding the next head.
#[derive(Debug, Clone, Default)]
pub struct RequestHeadDecoder {
    parser: HttpParser,
}

impl RequestHeadDecoder {
    /// Creates a decoder accepting every known version with the default config.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_parser(parser: HttpParser) -> Self {
        Self { parser }
    }
}

impl Decoder for RequestHeadDecoder {
    type Item = Request;
    type Error = HttpError;

    /// Returns `Ok(None)` until a complete head is buffered, then removes exactly the
    /// head bytes from `src`.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let max_bytes = self.parser.registry().config().max_header_bytes;
        if !contains_head_terminator(src) {
            ensure!(src.len() <= max_bytes, ParseError::too_large_header(src.len(), max_bytes).into());
            return Ok(None);
        }

        match self.parser.parse_request(src) {
            Ok(request) => {
                let head_len = request.head_len().unwrap_or(src.len());
                trace!(head_len, remaining = src.len() - head_len, "decoded request head");
                src.advance(head_len);
                Ok(Some(request))
            }
            Err(ParseError::TruncatedHeaders { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }
        // blank lines between requests are not an error
        if skip_empty_lines(src) == src.len() {
            src.clear();
            return Ok(None);
        }
        Err(ParseError::truncated_headers(&src[..], src.len()).into())
    }
}
