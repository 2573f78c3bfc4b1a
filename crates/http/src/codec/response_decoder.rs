use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::contains_head_terminator;
use crate::factory::HttpParser;
use crate::protocol::{HttpError, ParseError, Response};
use crate::utils::ensure;

/// Decodes response heads from a byte stream, the client side counterpart of
/// [`RequestHeadDecoder`](crate::codec::RequestHeadDecoder).
#[derive(Debug, Clone, Default)]
pub struct ResponseHeadDecoder {
    parser: HttpParser,
}

impl ResponseHeadDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_parser(parser: HttpParser) -> Self {
        Self { parser }
    }
}

impl Decoder for ResponseHeadDecoder {
    type Item = Response;
    type Error = HttpError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let max_bytes = self.parser.registry().config().max_header_bytes;
        if !contains_head_terminator(src) {
            ensure!(src.len() <= max_bytes, ParseError::too_large_header(src.len(), max_bytes).into());
            return Ok(None);
        }

        match self.parser.parse_response(src) {
            Ok(response) => {
                let head_len = response.head_len().unwrap_or(src.len());
                trace!(head_len, status = response.status().as_u16(), "decoded response head");
                src.advance(head_len);
                Ok(Some(response))
            }
            Err(ParseError::TruncatedHeaders { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(response) => Ok(Some(response)),
            None if src.is_empty() => Ok(None),
            None => Err(ParseError::truncated_headers(&src[..], src.len()).into()),
        }
    }
}
