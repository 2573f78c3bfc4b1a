//! Media types as carried by `Content-Type`.
//!
//! Grammar (RFC 9110 section 8.3.1):
//!
//! ```text
//! media-type = type "/" subtype *( OWS ";" OWS parameter )
//! parameter  = token "=" ( token / quoted-string )
//! ```
//!
//! Type, subtype and parameter names are case-insensitive and stored lower-cased.
//! Parameter values keep their case; quoted-string values are stored unescaped.

use std::fmt;
use std::str::FromStr;

use crate::config::DuplicateParams;
use crate::protocol::ParseError;
use crate::utils::{ensure, is_ows, is_tchar, is_token};

/// A parsed media type such as `text/html; charset=UTF-8`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    /// `type/subtype`, lower-cased
    essence: String,
    slash: usize,
    params: Vec<(String, String)>,
}

impl MediaType {
    /// Creates a media type without parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedMediaType`] if either part is not a token.
    pub fn new(type_: &str, subtype: &str) -> Result<MediaType, ParseError> {
        ensure!(is_token(type_), ParseError::malformed_media_type(type_, 0));
        ensure!(is_token(subtype), ParseError::malformed_media_type(subtype, 0));
        Ok(MediaType::from_parts(type_, subtype))
    }

    fn from_parts(type_: &str, subtype: &str) -> MediaType {
        let mut essence = String::with_capacity(type_.len() + subtype.len() + 1);
        essence.push_str(type_);
        essence.push('/');
        essence.push_str(subtype);
        essence.make_ascii_lowercase();
        MediaType { essence, slash: type_.len(), params: Vec::new() }
    }

    /// Appends a parameter. The name is lower-cased.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedMediaType`] if the name is not a token or the
    /// value contains control characters other than HTAB.
    pub fn with_param(mut self, name: &str, value: &str) -> Result<MediaType, ParseError> {
        ensure!(is_token(name), ParseError::malformed_media_type(name, 0));
        if let Some(pos) = value.bytes().position(|b| !is_qdtext_or_escapable(b)) {
            return Err(ParseError::malformed_media_type(value, pos));
        }
        self.params.push((name.to_ascii_lowercase(), value.to_owned()));
        Ok(self)
    }

    /// Parses `text`, keeping every duplicate parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedMediaType`] on any grammar violation.
    pub fn parse(text: &str) -> Result<MediaType, ParseError> {
        MediaTypeParser::default().parse(text)
    }

    /// The top-level type, e.g. `text`.
    pub fn type_(&self) -> &str {
        &self.essence[..self.slash]
    }

    /// The subtype, e.g. `html`.
    pub fn subtype(&self) -> &str {
        &self.essence[self.slash + 1..]
    }

    /// `type/subtype` without parameters.
    pub fn essence(&self) -> &str {
        &self.essence
    }

    /// All parameters in encounter order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// The first value of parameter `name`, ignoring case.
    pub fn param<'a>(&'a self, name: &str) -> Option<&'a str> {
        self.params.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
    }

    /// Every value of parameter `name`, ignoring case, in encounter order.
    pub fn params_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.params.iter().filter(move |(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
    }

    /// Returns true if some parameter name occurs more than once.
    pub fn has_duplicate_params(&self) -> bool {
        self.params.iter().enumerate().any(|(i, (name, _))| self.params[..i].iter().any(|(prev, _)| prev == name))
    }

    pub fn charset(&self) -> Option<&str> {
        self.param("charset")
    }

    /// Compares the essence with a registered `mime` constant such as `mime::TEXT_HTML`.
    pub fn essence_matches(&self, mime: &mime::Mime) -> bool {
        self.essence.eq_ignore_ascii_case(mime.essence_str())
    }

    /// Converts into a `mime::Mime`.
    ///
    /// # Errors
    ///
    /// Fails if the `mime` crate rejects the serialized form, e.g. for duplicate
    /// parameters.
    pub fn to_mime(&self) -> Result<mime::Mime, mime::FromStrError> {
        self.to_string().parse()
    }
}

impl FromStr for MediaType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::parse(s)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.essence)?;
        for (name, value) in &self.params {
            write!(f, "; {name}=")?;
            if is_token(value) {
                f.write_str(value)?;
            } else {
                write_quoted(f, value)?;
            }
        }
        Ok(())
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

/// HTAB, SP, VCHAR and obs-text: anything that may appear escaped in a quoted-string.
#[inline]
const fn is_qdtext_or_escapable(b: u8) -> bool {
    b == b'\t' || (b >= 0x20 && b != 0x7f)
}

/// Media type parser with a duplicate parameter policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaTypeParser {
    duplicate_params: DuplicateParams,
}

impl MediaTypeParser {
    pub fn new(duplicate_params: DuplicateParams) -> Self {
        Self { duplicate_params }
    }

    /// Parses `text`. Surrounding OWS is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedMediaType`] with the offset of the first
    /// offending byte when:
    /// - type or subtype is empty or not a token
    /// - a `;` is not followed by a parameter
    /// - a parameter has no `=`, an empty name or an empty unquoted value
    /// - a quoted-string is unterminated or contains a control character
    /// - a parameter name repeats and the policy is [`DuplicateParams::Reject`]
    pub fn parse(&self, text: &str) -> Result<MediaType, ParseError> {
        let mut cursor = Cursor { text, pos: 0 };
        cursor.skip_ows();

        let type_ = cursor.token();
        ensure!(!type_.is_empty() && cursor.eat(b'/'), cursor.error());
        let subtype = cursor.token();
        ensure!(!subtype.is_empty(), cursor.error());

        let mut media_type = MediaType::from_parts(type_, subtype);

        loop {
            cursor.skip_ows();
            if cursor.at_end() {
                break;
            }
            ensure!(cursor.eat(b';'), cursor.error());
            cursor.skip_ows();

            let name_start = cursor.pos;
            let name = cursor.token().to_ascii_lowercase();
            ensure!(!name.is_empty() && cursor.eat(b'='), cursor.error());
            let value = if cursor.peek() == Some(b'"') {
                cursor.quoted_string()?
            } else {
                let token = cursor.token();
                ensure!(!token.is_empty(), cursor.error());
                token.to_owned()
            };

            self.push_param(&mut media_type, name, value, text, name_start)?;
        }

        Ok(media_type)
    }

    fn push_param(&self, media_type: &mut MediaType, name: String, value: String, text: &str, offset: usize) -> Result<(), ParseError> {
        let existing = media_type.params.iter_mut().find(|(n, _)| *n == name);
        match (existing, self.duplicate_params) {
            (None, _) | (Some(_), DuplicateParams::PreserveAll) => media_type.params.push((name, value)),
            (Some(param), DuplicateParams::LastWins) => param.1 = value,
            (Some(_), DuplicateParams::Reject) => return Err(ParseError::malformed_media_type(text, offset)),
        }
        Ok(())
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ows(&mut self) {
        while self.peek().is_some_and(is_ows) {
            self.pos += 1;
        }
    }

    fn token(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_tchar) {
            self.pos += 1;
        }
        // tchar is ASCII, so both ends are char boundaries
        &self.text[start..self.pos]
    }

    /// Consumes a quoted-string starting at the opening quote and returns it unescaped.
    fn quoted_string(&mut self) -> Result<String, ParseError> {
        let open = self.pos;
        self.pos += 1;
        let mut value = Vec::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::malformed_media_type(self.text, open)),
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek() {
                        Some(b) if is_qdtext_or_escapable(b) => value.push(b),
                        _ => return Err(self.error()),
                    }
                }
                Some(b) if is_qdtext_or_escapable(b) => value.push(b),
                Some(_) => return Err(self.error()),
            }
            self.pos += 1;
        }
        // only ASCII bytes were dropped, so the remaining bytes are still UTF-8
        String::from_utf8(value).ok().ok_or_else(|| ParseError::malformed_media_type(self.text, open))
    }

    fn error(&self) -> ParseError {
        ParseError::malformed_media_type(self.text, self.pos)
    }
}
