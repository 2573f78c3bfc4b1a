use std::io;
use thiserror::Error;

/// Errors surfaced by the streaming codecs.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("parse error: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl HttpError {
    /// Returns the parse error, if this is one.
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            HttpError::Parse { source } => Some(source),
            HttpError::Io { .. } => None,
        }
    }
}

/// Errors raised while parsing (or validating) a message head.
///
/// Grammar errors carry the offending raw fragment and the byte offset at which it
/// starts. Offsets are relative to the buffer handed to the parser, except for
/// [`ParseError::MalformedMediaType`] which is relative to the header value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request line at byte {offset}: {fragment:?}")]
    MalformedRequestLine { fragment: String, offset: usize },

    #[error("malformed status line at byte {offset}: {fragment:?}")]
    MalformedStatusLine { fragment: String, offset: usize },

    #[error("unsupported http version {fragment:?} at byte {offset}")]
    UnsupportedVersion { fragment: String, offset: usize },

    #[error("invalid request target {fragment:?} at byte {offset}: {reason}")]
    InvalidRequestTarget { fragment: String, offset: usize, reason: &'static str },

    #[error("malformed header key at byte {offset}: {fragment:?}")]
    MalformedHeaderKey { fragment: String, offset: usize },

    #[error("malformed header field at byte {offset}: {fragment:?}")]
    MalformedHeaderField { fragment: String, offset: usize },

    #[error("header block truncated at byte {offset}, missing blank line terminator")]
    TruncatedHeaders { fragment: String, offset: usize },

    #[error("malformed media type at byte {offset}: {fragment:?}")]
    MalformedMediaType { fragment: String, offset: usize },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },
}

fn lossy<F: AsRef<[u8]>>(fragment: F) -> String {
    String::from_utf8_lossy(fragment.as_ref()).into_owned()
}

impl ParseError {
    pub fn malformed_request_line<F: AsRef<[u8]>>(fragment: F, offset: usize) -> Self {
        Self::MalformedRequestLine { fragment: lossy(fragment), offset }
    }

    pub fn malformed_status_line<F: AsRef<[u8]>>(fragment: F, offset: usize) -> Self {
        Self::MalformedStatusLine { fragment: lossy(fragment), offset }
    }

    pub fn unsupported_version<F: AsRef<[u8]>>(fragment: F, offset: usize) -> Self {
        Self::UnsupportedVersion { fragment: lossy(fragment), offset }
    }

    pub fn invalid_request_target<F: AsRef<[u8]>>(fragment: F, offset: usize, reason: &'static str) -> Self {
        Self::InvalidRequestTarget { fragment: lossy(fragment), offset, reason }
    }

    pub fn malformed_header_key<F: AsRef<[u8]>>(fragment: F, offset: usize) -> Self {
        Self::MalformedHeaderKey { fragment: lossy(fragment), offset }
    }

    pub fn malformed_header_field<F: AsRef<[u8]>>(fragment: F, offset: usize) -> Self {
        Self::MalformedHeaderField { fragment: lossy(fragment), offset }
    }

    pub fn truncated_headers<F: AsRef<[u8]>>(fragment: F, offset: usize) -> Self {
        Self::TruncatedHeaders { fragment: lossy(fragment), offset }
    }

    pub fn malformed_media_type<F: AsRef<[u8]>>(fragment: F, offset: usize) -> Self {
        Self::MalformedMediaType { fragment: lossy(fragment), offset }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    /// The byte offset of the offending fragment, if this is a grammar error.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::MalformedRequestLine { offset, .. }
            | Self::MalformedStatusLine { offset, .. }
            | Self::UnsupportedVersion { offset, .. }
            | Self::InvalidRequestTarget { offset, .. }
            | Self::MalformedHeaderKey { offset, .. }
            | Self::MalformedHeaderField { offset, .. }
            | Self::TruncatedHeaders { offset, .. }
            | Self::MalformedMediaType { offset, .. } => Some(*offset),
            Self::TooLargeHeader { .. } | Self::TooManyHeaders { .. } => None,
        }
    }

    /// The raw text that failed to parse, if this is a grammar error.
    pub fn fragment(&self) -> Option<&str> {
        match self {
            Self::MalformedRequestLine { fragment, .. }
            | Self::MalformedStatusLine { fragment, .. }
            | Self::UnsupportedVersion { fragment, .. }
            | Self::InvalidRequestTarget { fragment, .. }
            | Self::MalformedHeaderKey { fragment, .. }
            | Self::MalformedHeaderField { fragment, .. }
            | Self::TruncatedHeaders { fragment, .. }
            | Self::MalformedMediaType { fragment, .. } => Some(fragment),
            Self::TooLargeHeader { .. } | Self::TooManyHeaders { .. } => None,
        }
    }

    /// Shifts the offset by `base`, used when a sub-parser worked on a slice of the input.
    #[must_use]
    pub(crate) fn at(mut self, base: usize) -> Self {
        match &mut self {
            Self::MalformedRequestLine { offset, .. }
            | Self::MalformedStatusLine { offset, .. }
            | Self::UnsupportedVersion { offset, .. }
            | Self::InvalidRequestTarget { offset, .. }
            | Self::MalformedHeaderKey { offset, .. }
            | Self::MalformedHeaderField { offset, .. }
            | Self::TruncatedHeaders { offset, .. } => *offset += base,
            // media type offsets stay relative to the header value
            Self::MalformedMediaType { .. } | Self::TooLargeHeader { .. } | Self::TooManyHeaders { .. } => {}
        }
        self
    }
}
