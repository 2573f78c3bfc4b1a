use std::borrow::Cow;
use std::fmt;

use once_cell::sync::OnceCell;

use crate::config::DuplicateParams;
use crate::protocol::header::HeaderKey;
use crate::protocol::media_type::{MediaType, MediaTypeParser};
use crate::protocol::ParseError;
use crate::utils::{is_ows, trim_ows};

/// A single `name: value` header field.
///
/// The value has its surrounding optional whitespace removed. A structured view of
/// the value as a media type is parsed on first request and cached; the cache plays
/// no part in equality. Fields produced by a parser carry that parser's duplicate
/// parameter policy for the media type view.
#[derive(Clone)]
pub struct HeaderField {
    key: HeaderKey,
    value: String,
    duplicate_params: DuplicateParams,
    media_type: OnceCell<MediaType>,
}

impl HeaderField {
    /// Creates a field from an already validated key and a value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedHeaderField`] if the value contains CR, LF or NUL.
    pub fn new<V: Into<String>>(key: HeaderKey, value: V) -> Result<HeaderField, ParseError> {
        let value = value.into();
        if let Some(pos) = value.bytes().position(is_forbidden_value_byte) {
            return Err(ParseError::malformed_header_field(&value, pos));
        }
        Ok(Self::new_unchecked(key, trim_ows(&value).to_owned()))
    }

    pub(crate) fn new_unchecked(key: HeaderKey, value: String) -> HeaderField {
        HeaderField { key, value, duplicate_params: DuplicateParams::default(), media_type: OnceCell::new() }
    }

    #[must_use]
    pub(crate) fn with_duplicate_params(mut self, duplicate_params: DuplicateParams) -> Self {
        self.duplicate_params = duplicate_params;
        self
    }

    /// Parses one header line (without its CRLF).
    ///
    /// The line is split on the first colon; the name must be a token with no
    /// whitespace before the colon, and the value is trimmed of optional whitespace.
    ///
    /// # Errors
    ///
    /// - [`ParseError::MalformedHeaderField`] if there is no colon, the line is not
    ///   UTF-8, or the value contains CR, LF or NUL
    /// - [`ParseError::MalformedHeaderKey`] if the name is not a token
    pub fn parse<L: AsRef<[u8]>>(line: L) -> Result<HeaderField, ParseError> {
        let line = line.as_ref();
        let colon = line.iter().position(|b| *b == b':').ok_or_else(|| ParseError::malformed_header_field(line, 0))?;

        let key = HeaderKey::parse(&line[..colon])?;

        let raw_value = &line[colon + 1..];
        let value_offset = colon + 1;
        if let Some(pos) = raw_value.iter().position(|b| is_forbidden_value_byte(*b)) {
            return Err(ParseError::malformed_header_field(line, value_offset + pos));
        }
        let value = std::str::from_utf8(raw_value).map_err(|e| ParseError::malformed_header_field(line, value_offset + e.valid_up_to()))?;

        Ok(Self::new_unchecked(key, trim_ows(value).to_owned()))
    }

    pub fn key(&self) -> &HeaderKey {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Appends an obs-fold continuation line, joined with a single space.
    pub(crate) fn unfold(&mut self, continuation: &str) {
        let continuation = trim_ows(continuation);
        if continuation.is_empty() {
            return;
        }
        if !self.value.is_empty() {
            self.value.push(' ');
        }
        self.value.push_str(continuation);
        self.media_type = OnceCell::new();
    }

    /// The value parsed as a media type.
    ///
    /// Duplicate parameters follow the policy of the parser that produced this field,
    /// or are all kept for fields built by hand. The result is cached, later calls
    /// return the same instance.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedMediaType`] if the value is not a media type.
    pub fn media_type(&self) -> Result<&MediaType, ParseError> {
        self.media_type.get_or_try_init(|| MediaTypeParser::new(self.duplicate_params).parse(&self.value))
    }

    /// Same as [`HeaderField::media_type`] with an explicit duplicate parameter policy.
    ///
    /// Only the field's own policy is served from the cache; any other policy parses
    /// the value again.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedMediaType`] if the value is not a media type, or
    /// if `duplicate_params` is [`DuplicateParams::Reject`] and a parameter repeats.
    pub fn media_type_with(&self, duplicate_params: DuplicateParams) -> Result<Cow<'_, MediaType>, ParseError> {
        if duplicate_params == self.duplicate_params {
            return self.media_type().map(Cow::Borrowed);
        }
        MediaTypeParser::new(duplicate_params).parse(&self.value).map(Cow::Owned)
    }

    pub fn into_parts(self) -> (HeaderKey, String) {
        (self.key, self.value)
    }
}

/// CR, LF and NUL may never appear inside a field value (RFC 9110 section 5.5).
#[inline]
fn is_forbidden_value_byte(b: u8) -> bool {
    matches!(b, b'\r' | b'\n' | b'\0')
}

/// Returns true if `line` is an obs-fold continuation line.
#[inline]
pub(crate) fn is_continuation(line: &[u8]) -> bool {
    line.first().is_some_and(|b| is_ows(*b))
}

impl PartialEq for HeaderField {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl Eq for HeaderField {}

impl fmt::Debug for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HeaderField").field(&self.key).field(&self.value).finish()
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_ows() {
        let field = HeaderField::parse("Host: \t localhost:8080 \t").unwrap();
        assert_eq!(field.key(), &HeaderKey::HOST);
        assert_eq!(field.value(), "localhost:8080");

        let field = HeaderField::parse("Host:localhost:8080").unwrap();
        assert_eq!(field.value(), "localhost:8080");
    }

    #[test]
    fn parse_splits_on_first_colon() {
        let field = HeaderField::parse("Referer: http://a.example:81/x").unwrap();
        assert_eq!(field.value(), "http://a.example:81/x");
    }

    #[test]
    fn parse_empty_value() {
        let field = HeaderField::parse("X-Empty:").unwrap();
        assert_eq!(field.value(), "");
    }

    #[test]
    fn missing_colon() {
        let result = HeaderField::parse("Host localhost");
        assert!(matches!(result, Err(ParseError::MalformedHeaderField { offset: 0, .. })), "got {result:?}");
    }

    #[test]
    fn whitespace_before_colon_is_a_key_error() {
        let result = HeaderField::parse("Host : localhost");
        assert!(matches!(result, Err(ParseError::MalformedHeaderKey { offset: 4, .. })), "got {result:?}");
    }

    #[test]
    fn forbidden_value_bytes() {
        let result = HeaderField::parse(b"X-A: a\0b");
        assert!(matches!(result, Err(ParseError::MalformedHeaderField { offset: 6, .. })), "got {result:?}");

        let result = HeaderField::new(HeaderKey::HOST, "a\r\nX-Injected: 1");
        assert!(matches!(result, Err(ParseError::MalformedHeaderField { offset: 1, .. })), "got {result:?}");
    }

    #[test]
    fn invalid_utf8_value() {
        let result = HeaderField::parse(b"X-A: ab\xff");
        assert!(matches!(result, Err(ParseError::MalformedHeaderField { offset: 7, .. })), "got {result:?}");
    }

    #[test]
    fn unfold_joins_with_single_space() {
        let mut field = HeaderField::parse("X-Folded: first").unwrap();
        field.unfold("   second  ");
        field.unfold("\t");
        field.unfold("\tthird");
        assert_eq!(field.value(), "first second third");
    }

    #[test]
    fn media_type_is_cached_and_ignored_by_eq() {
        let field = HeaderField::parse("Content-Type: text/html; charset=UTF-8").unwrap();
        let first = field.media_type().unwrap();
        let second = field.media_type().unwrap();
        assert!(std::ptr::eq(first, second));

        let fresh = HeaderField::parse("content-type: text/html; charset=UTF-8").unwrap();
        assert_eq!(field, fresh);
    }

    #[test]
    fn media_type_follows_field_policy() {
        let field = HeaderField::parse("Content-Type: text/plain; a=1; a=2").unwrap();
        assert_eq!(field.media_type().unwrap().params().count(), 2);

        let field = HeaderField::parse("Content-Type: text/plain; a=1; a=2").unwrap().with_duplicate_params(DuplicateParams::Reject);
        assert!(matches!(field.media_type(), Err(ParseError::MalformedMediaType { .. })));
    }

    #[test]
    fn explicit_policy_bypasses_cached_media_type() {
        let field = HeaderField::parse("Content-Type: text/plain; a=1; a=2").unwrap();
        assert_eq!(field.media_type().unwrap().params().count(), 2);

        let result = field.media_type_with(DuplicateParams::Reject);
        assert!(matches!(result, Err(ParseError::MalformedMediaType { .. })), "got {result:?}");

        let last_wins = field.media_type_with(DuplicateParams::LastWins).unwrap();
        assert!(matches!(last_wins, Cow::Owned(_)));
        assert_eq!(last_wins.params().collect::<Vec<_>>(), vec![("a", "2")]);

        let cached = field.media_type_with(DuplicateParams::PreserveAll).unwrap();
        assert!(matches!(cached, Cow::Borrowed(_)));
        assert!(std::ptr::eq(cached.as_ref(), field.media_type().unwrap()));
    }

    #[test]
    fn media_type_errors_are_not_cached() {
        let field = HeaderField::parse("Content-Type: text/").unwrap();
        assert!(matches!(field.media_type(), Err(ParseError::MalformedMediaType { .. })));
        assert!(matches!(field.media_type(), Err(ParseError::MalformedMediaType { .. })));
    }
}
