use std::fmt;

/// A supported HTTP protocol version.
///
/// Each variant is bound to one [`MessageFactory`] inside a [`VersionRegistry`].
///
/// [`MessageFactory`]: crate::factory::MessageFactory
/// [`VersionRegistry`]: crate::factory::VersionRegistry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpVersion {
    Http10,
    Http11,
}

impl HttpVersion {
    /// All versions this crate knows how to parse.
    pub const ALL: [HttpVersion; 2] = [HttpVersion::Http10, HttpVersion::Http11];

    /// The wire token, e.g. `HTTP/1.1`.
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpVersion::Http10 => "HTTP/1.0",
            HttpVersion::Http11 => "HTTP/1.1",
        }
    }

    /// Matches a wire token exactly. Version tokens are case-sensitive.
    pub fn from_token(token: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str().as_bytes() == token)
    }

    /// Whether connections default to persistent for this version.
    pub const fn persistent_by_default(self) -> bool {
        matches!(self, HttpVersion::Http11)
    }
}

/// Returns true if `token` has the `HTTP/DIGIT.DIGIT` shape of RFC 9112 section 2.3,
/// whether or not the version is supported.
pub(crate) fn is_version_shaped(token: &[u8]) -> bool {
    matches!(token, [b'H', b'T', b'T', b'P', b'/', major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit())
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpVersion> for http::Version {
    fn from(version: HttpVersion) -> Self {
        match version {
            HttpVersion::Http10 => http::Version::HTTP_10,
            HttpVersion::Http11 => http::Version::HTTP_11,
        }
    }
}

impl TryFrom<http::Version> for HttpVersion {
    type Error = http::Version;

    fn try_from(version: http::Version) -> Result<Self, Self::Error> {
        match version {
            http::Version::HTTP_10 => Ok(HttpVersion::Http10),
            http::Version::HTTP_11 => Ok(HttpVersion::Http11),
            // http2 and http3 have no textual message head
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token() {
        assert_eq!(HttpVersion::from_token(b"HTTP/1.1"), Some(HttpVersion::Http11));
        assert_eq!(HttpVersion::from_token(b"HTTP/1.0"), Some(HttpVersion::Http10));
        assert_eq!(HttpVersion::from_token(b"HTTP/1.2"), None);
        assert_eq!(HttpVersion::from_token(b"http/1.1"), None);
        assert_eq!(HttpVersion::from_token(b"HTTP1.1"), None);
    }

    #[test]
    fn test_version_shape() {
        assert!(is_version_shaped(b"HTTP/1.1"));
        assert!(is_version_shaped(b"HTTP/2.0"));
        assert!(!is_version_shaped(b"HTTP/1.10"));
        assert!(!is_version_shaped(b"HTTP/1"));
        assert!(!is_version_shaped(b"HTTP/x.1"));
    }

    #[test]
    fn test_http_version_conversion() {
        assert_eq!(http::Version::from(HttpVersion::Http10), http::Version::HTTP_10);
        assert_eq!(HttpVersion::try_from(http::Version::HTTP_11), Ok(HttpVersion::Http11));
        assert_eq!(HttpVersion::try_from(http::Version::HTTP_2), Err(http::Version::HTTP_2));
    }
}
