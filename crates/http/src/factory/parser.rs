use triomphe::Arc;

use crate::factory::{MessageFactory, VersionRegistry};
use crate::protocol::{Message, ParseError, Request, Response};
use crate::utils::{find_crlf, skip_empty_lines};

/// Version-agnostic entry point over a shared [`VersionRegistry`].
///
/// The parser peeks at the version token, picks the registered factory and delegates
/// to it, so callers need not know the version up front. Cloning only bumps a
/// reference count.
#[derive(Debug, Clone)]
pub struct HttpParser {
    registry: Arc<VersionRegistry>,
}

impl HttpParser {
    pub fn new(registry: VersionRegistry) -> Self {
        Self { registry: Arc::new(registry) }
    }

    pub fn registry(&self) -> &VersionRegistry {
        &self.registry
    }

    /// Parses a request head of any registered version.
    ///
    /// # Errors
    ///
    /// See [`MessageFactory::parse_request`].
    pub fn parse_request(&self, buf: &[u8]) -> Result<Request, ParseError> {
        let start = skip_empty_lines(buf);
        // the version is the last token of the request line
        let token = find_crlf(buf, start).map(|end| &buf[start..end]).and_then(|line| line.rsplit(|b| *b == b' ').next());
        self.factory_for(token)?.parse_request(buf)
    }

    /// Parses a response head of any registered version.
    ///
    /// # Errors
    ///
    /// See [`MessageFactory::parse_response`].
    pub fn parse_response(&self, buf: &[u8]) -> Result<Response, ParseError> {
        let token = buf.split(|b| *b == b' ').next();
        self.factory_for(token)?.parse_response(buf)
    }

    /// Parses a head without knowing whether it is a request or a response.
    ///
    /// A head starting with `HTTP/` is a response; no method can start that way since
    /// `/` is not a token character.
    ///
    /// # Errors
    ///
    /// See [`HttpParser::parse_request`] and [`HttpParser::parse_response`].
    pub fn parse_message(&self, buf: &[u8]) -> Result<Message, ParseError> {
        if buf.starts_with(b"HTTP/") {
            self.parse_response(buf).map(Message::Response)
        } else {
            self.parse_request(buf).map(Message::Request)
        }
    }

    /// Falls back to the newest factory when the token is unknown; it then reports
    /// the exact error for the line.
    fn factory_for(&self, token: Option<&[u8]>) -> Result<&MessageFactory, ParseError> {
        token
            .and_then(|token| self.registry.lookup(token))
            .or_else(|| self.registry.latest())
            .ok_or_else(|| ParseError::unsupported_version(token.unwrap_or_default(), 0))
    }
}

impl Default for HttpParser {
    fn default() -> Self {
        Self::new(VersionRegistry::new())
    }
}

impl From<VersionRegistry> for HttpParser {
    fn from(registry: VersionRegistry) -> Self {
        Self::new(registry)
    }
}
