//! Header block decoder.
//!
//! Consumes `*( field-line CRLF ) CRLF` starting right after the start line. Lines are
//! located by scanning for CRLF; a bare LF is never a line terminator and ends up
//! rejected as a forbidden value byte.
//!
//! # Limits
//!
//! Both limits come from [`ParserConfig`]:
//!
//! - `max_headers` bounds the number of fields, continuation lines not counted
//! - `max_header_bytes` bounds the whole head, start line and terminator included
//!
//! # Obsolete line folding
//!
//! A line starting with SP or HTAB continues the previous field. It is rejected by
//! default and joined onto the previous value with [`ObsFold::Unfold`].

use tracing::{trace, warn};

use crate::config::{ObsFold, ParserConfig};
use crate::protocol::header::{is_continuation, HeaderBlock, HeaderField};
use crate::protocol::ParseError;
use crate::utils::{ensure, find_crlf};

/// Decoder for the header block of a message head.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeaderDecoder {
    config: ParserConfig,
}

impl HeaderDecoder {
    pub(crate) fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Decodes the header block of `buf` starting at `start`.
    ///
    /// Returns the fields and the offset just past the terminating empty line. Error
    /// offsets are relative to `buf`.
    ///
    /// # Errors
    ///
    /// - [`ParseError::TruncatedHeaders`] if `buf` ends before the empty line
    /// - [`ParseError::MalformedHeaderField`] / [`ParseError::MalformedHeaderKey`] for
    ///   a bad line, including a rejected continuation line
    /// - [`ParseError::TooManyHeaders`] / [`ParseError::TooLargeHeader`] when a limit
    ///   is exceeded
    pub(crate) fn decode(&self, buf: &[u8], start: usize) -> Result<(HeaderBlock, usize), ParseError> {
        let max_bytes = self.config.max_header_bytes;
        let mut headers = HeaderBlock::new();
        let mut pos = start;

        loop {
            let Some(line_end) = find_crlf(buf, pos) else {
                ensure!(buf.len() <= max_bytes, ParseError::too_large_header(buf.len(), max_bytes));
                return Err(ParseError::truncated_headers(&buf[pos..], buf.len()));
            };
            let next = line_end + 2;
            ensure!(next <= max_bytes, ParseError::too_large_header(next, max_bytes));

            let line = &buf[pos..line_end];
            if line.is_empty() {
                trace!(header_count = headers.len(), head_len = next, "parsed header block");
                return Ok((headers, next));
            }

            if is_continuation(line) {
                self.unfold(&mut headers, line, pos)?;
            } else {
                ensure!(headers.len() < self.config.max_headers, ParseError::too_many_headers(self.config.max_headers));
                let field = HeaderField::parse(line).map_err(|e| e.at(pos))?;
                headers.append(field.with_duplicate_params(self.config.duplicate_params));
            }
            pos = next;
        }
    }

    fn unfold(&self, headers: &mut HeaderBlock, line: &[u8], pos: usize) -> Result<(), ParseError> {
        let folded = || ParseError::malformed_header_field(line, 0).at(pos);

        ensure!(self.config.obs_fold == ObsFold::Unfold, folded());
        let field = headers.last_mut().ok_or_else(folded)?;

        if let Some(i) = line.iter().position(|b| matches!(b, b'\r' | b'\n' | b'\0')) {
            return Err(ParseError::malformed_header_field(line, i).at(pos));
        }
        let continuation =
            std::str::from_utf8(line).map_err(|e| ParseError::malformed_header_field(line, e.valid_up_to()).at(pos))?;

        warn!(offset = pos, key = %field.key(), "unfolding obsolete line folding");
        field.unfold(continuation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::header::HeaderKey;
    use indoc::indoc;

    fn decode(config: ParserConfig, text: &str) -> Result<(HeaderBlock, usize), ParseError> {
        HeaderDecoder::new(config).decode(text.as_bytes(), 0)
    }

    fn crlf(text: &str) -> String {
        text.replace('\n', "\r\n")
    }

    #[test]
    fn from_curl() {
        let text = crlf(indoc! {r##"
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        123"##});

        let (headers, end) = decode(ParserConfig::default(), &text).unwrap();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get_first(&HeaderKey::HOST), Some("127.0.0.1:8080"));
        assert_eq!(headers.get_first(&HeaderKey::USER_AGENT), Some("curl/7.79.1"));
        assert_eq!(&text[end..], "123");
    }

    #[test]
    fn empty_block() {
        let (headers, end) = decode(ParserConfig::default(), "\r\n").unwrap();
        assert!(headers.is_empty());
        assert_eq!(end, 2);
    }

    #[test]
    fn offsets_are_buffer_relative() {
        let text = "GET / HTTP/1.1\r\nHost: a\r\nBad Key: b\r\n\r\n";
        let result = HeaderDecoder::new(ParserConfig::default()).decode(text.as_bytes(), 16);
        // "Bad Key" starts at 25, the space is 3 bytes in
        assert!(matches!(result, Err(ParseError::MalformedHeaderKey { offset: 28, .. })), "got {result:?}");
    }

    #[test]
    fn truncated() {
        for text in ["Host: a\r\n", "Host: a", "Host: a\r\nAccept: */*\r"] {
            let result = decode(ParserConfig::default(), text);
            assert!(matches!(result, Err(ParseError::TruncatedHeaders { .. })), "{text:?}: got {result:?}");
            assert_eq!(result.err().and_then(|e| e.offset()), Some(text.len()));
        }
    }

    #[test]
    fn obs_fold_rejected_by_default() {
        let text = "X-Folded: first\r\n second\r\n\r\n";
        let result = decode(ParserConfig::default(), text);
        assert!(matches!(result, Err(ParseError::MalformedHeaderField { offset: 17, .. })), "got {result:?}");
    }

    #[test]
    fn obs_fold_unfolded_when_enabled() {
        let config = ParserConfig::default().obs_fold(ObsFold::Unfold);
        let text = "X-Folded: first\r\n  second\r\n\tthird\r\nHost: a\r\n\r\n";
        let (headers, _) = decode(config, text).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get_str("x-folded").next(), Some("first second third"));
    }

    #[test]
    fn continuation_without_field() {
        let config = ParserConfig::default().obs_fold(ObsFold::Unfold);
        let result = decode(config, " orphan\r\n\r\n");
        assert!(matches!(result, Err(ParseError::MalformedHeaderField { offset: 0, .. })), "got {result:?}");
    }

    #[test]
    fn too_many_headers() {
        let config = ParserConfig::default().max_headers(2);
        assert!(decode(config, "A: 1\r\nB: 2\r\n\r\n").is_ok());
        let result = decode(config, "A: 1\r\nB: 2\r\nC: 3\r\n\r\n");
        assert_eq!(result, Err(ParseError::too_many_headers(2)));
    }

    #[test]
    fn too_large_header() {
        let config = ParserConfig::default().max_header_bytes(16);
        let result = decode(config, "X-Long: aaaaaaaaaaaaaaaa\r\n\r\n");
        assert_eq!(result, Err(ParseError::too_large_header(26, 16)));

        let result = decode(config, "X-Long: aaaaaaaaaaaaaaaa");
        assert_eq!(result, Err(ParseError::too_large_header(24, 16)));
    }

    #[test]
    fn bare_lf_is_not_a_terminator() {
        let result = decode(ParserConfig::default(), "Host: a\nAccept: b\r\n\r\n");
        assert!(matches!(result, Err(ParseError::MalformedHeaderField { offset: 7, .. })), "got {result:?}");
    }
}
