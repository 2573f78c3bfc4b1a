//! Header field names.
//!
//! A [`HeaderKey`] compares and hashes ASCII case-insensitively. Registered names are
//! available as associated constants and [`HeaderKey::parse`] resolves a raw token to
//! the registered instance when one exists, so `content-type` on the wire becomes
//! [`HeaderKey::CONTENT_TYPE`]. Unregistered names keep the spelling they arrived with.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use once_cell::sync::Lazy;

use crate::protocol::ParseError;
use crate::utils::{ensure, is_tchar};

/// The name of a header field.
#[derive(Clone)]
pub struct HeaderKey {
    name: Cow<'static, str>,
}

macro_rules! known_headers {
    ($( ($const_name: ident, $http_name: expr) ),+ $(,)?) => {
        $(
            #[doc = concat!("The `", $http_name, "` header.")]
            pub const $const_name: HeaderKey = HeaderKey::from_static($http_name);
        )+

        /// Every registered header name.
        pub const KNOWN: &'static [HeaderKey] = &[$( HeaderKey::$const_name ),+];
    };
}

impl HeaderKey {
    known_headers!(
        (ACCEPT, "Accept"),
        (ACCEPT_CHARSET, "Accept-Charset"),
        (ACCEPT_ENCODING, "Accept-Encoding"),
        (ACCEPT_LANGUAGE, "Accept-Language"),
        (ACCEPT_RANGES, "Accept-Ranges"),
        (AGE, "Age"),
        (ALLOW, "Allow"),
        (AUTHORIZATION, "Authorization"),
        (CACHE_CONTROL, "Cache-Control"),
        (CONNECTION, "Connection"),
        (CONTENT_DISPOSITION, "Content-Disposition"),
        (CONTENT_ENCODING, "Content-Encoding"),
        (CONTENT_LANGUAGE, "Content-Language"),
        (CONTENT_LENGTH, "Content-Length"),
        (CONTENT_LOCATION, "Content-Location"),
        (CONTENT_RANGE, "Content-Range"),
        (CONTENT_TYPE, "Content-Type"),
        (COOKIE, "Cookie"),
        (DATE, "Date"),
        (ETAG, "ETag"),
        (EXPECT, "Expect"),
        (EXPIRES, "Expires"),
        (FORWARDED, "Forwarded"),
        (FROM, "From"),
        (HOST, "Host"),
        (IF_MATCH, "If-Match"),
        (IF_MODIFIED_SINCE, "If-Modified-Since"),
        (IF_NONE_MATCH, "If-None-Match"),
        (IF_RANGE, "If-Range"),
        (IF_UNMODIFIED_SINCE, "If-Unmodified-Since"),
        (KEEP_ALIVE, "Keep-Alive"),
        (LAST_MODIFIED, "Last-Modified"),
        (LOCATION, "Location"),
        (MAX_FORWARDS, "Max-Forwards"),
        (ORIGIN, "Origin"),
        (PRAGMA, "Pragma"),
        (PROXY_AUTHENTICATE, "Proxy-Authenticate"),
        (PROXY_AUTHORIZATION, "Proxy-Authorization"),
        (RANGE, "Range"),
        (REFERER, "Referer"),
        (RETRY_AFTER, "Retry-After"),
        (SERVER, "Server"),
        (SET_COOKIE, "Set-Cookie"),
        (TE, "TE"),
        (TRAILER, "Trailer"),
        (TRANSFER_ENCODING, "Transfer-Encoding"),
        (UPGRADE, "Upgrade"),
        (USER_AGENT, "User-Agent"),
        (VARY, "Vary"),
        (VIA, "Via"),
        (WWW_AUTHENTICATE, "WWW-Authenticate"),
    );

    /// Creates a key from a static name without validation.
    ///
    /// The name must be a valid token; this is meant for constants.
    pub const fn from_static(name: &'static str) -> HeaderKey {
        HeaderKey { name: Cow::Borrowed(name) }
    }

    /// Parses a header name token.
    ///
    /// Registered names resolve to their canonical instance, anything else is kept
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedHeaderKey`] if `token` is empty or contains a
    /// byte outside the RFC 9110 token grammar. The offset points at the first bad byte.
    pub fn parse<T: AsRef<[u8]>>(token: T) -> Result<HeaderKey, ParseError> {
        let token = token.as_ref();
        ensure!(!token.is_empty(), ParseError::malformed_header_key(token, 0));
        if let Some(pos) = token.iter().position(|b| !is_tchar(*b)) {
            return Err(ParseError::malformed_header_key(token, pos));
        }

        // all tchar, so this is ASCII
        let name = String::from_utf8_lossy(token);
        if let Some(known) = Self::lookup(&name) {
            return Ok(known.clone());
        }
        Ok(HeaderKey { name: Cow::Owned(name.into_owned()) })
    }

    /// Looks `name` up in the registry of well-known headers, ignoring case.
    pub fn lookup(name: &str) -> Option<&'static HeaderKey> {
        // bucketed by length, so a lookup compares a handful of names without allocating
        static REGISTRY: Lazy<HashMap<usize, Vec<&'static HeaderKey>>> = Lazy::new(|| {
            let mut registry: HashMap<usize, Vec<&'static HeaderKey>> = HashMap::new();
            for key in HeaderKey::KNOWN {
                registry.entry(key.name.len()).or_default().push(key);
            }
            registry
        });

        REGISTRY.get(&name.len())?.iter().copied().find(|key| key.name.eq_ignore_ascii_case(name))
    }

    /// The name as it will be written on the wire.
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Returns true if this is one of the registered names.
    pub fn is_known(&self) -> bool {
        Self::lookup(&self.name).is_some()
    }
}

impl PartialEq for HeaderKey {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for HeaderKey {}

impl PartialEq<str> for HeaderKey {
    fn eq(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for HeaderKey {
    fn eq(&self, other: &&str) -> bool {
        self.name.eq_ignore_ascii_case(other)
    }
}

impl Hash for HeaderKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.name.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl AsRef<str> for HeaderKey {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for HeaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for HeaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.name, f)
    }
}

impl TryFrom<&str> for HeaderKey {
    type Error = ParseError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        HeaderKey::parse(name)
    }
}

impl TryFrom<&HeaderKey> for http::HeaderName {
    type Error = http::header::InvalidHeaderName;

    fn try_from(key: &HeaderKey) -> Result<Self, Self::Error> {
        http::HeaderName::from_bytes(key.as_str().as_bytes())
    }
}

impl From<&http::HeaderName> for HeaderKey {
    fn from(name: &http::HeaderName) -> Self {
        match Self::lookup(name.as_str()) {
            Some(known) => known.clone(),
            None => HeaderKey { name: Cow::Owned(name.as_str().to_owned()) },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of(key: &HeaderKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn case_insensitive_identity() {
        let a = HeaderKey::parse("X-Request-Id").unwrap();
        let b = HeaderKey::parse("x-request-ID").unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, HeaderKey::parse("X-Request-Ids").unwrap());
        assert_eq!(a, "X-REQUEST-ID");
    }

    #[test]
    fn known_names_are_interned() {
        let key = HeaderKey::parse("content-TYPE").unwrap();
        assert_eq!(key, HeaderKey::CONTENT_TYPE);
        assert_eq!(key.as_str(), "Content-Type");
        assert!(key.is_known());

        let custom = HeaderKey::parse("x-custom").unwrap();
        assert_eq!(custom.as_str(), "x-custom");
        assert!(!custom.is_known());
    }

    #[test]
    fn registry_covers_every_constant() {
        for key in HeaderKey::KNOWN {
            assert!(HeaderKey::parse(key.as_str()).is_ok(), "{key} should be a valid token");
            assert_eq!(HeaderKey::lookup(&key.as_str().to_uppercase()), Some(key));
        }
    }

    #[test]
    fn lookup_matches_whole_name_ignoring_case() {
        assert_eq!(HeaderKey::lookup("hOsT"), Some(&HeaderKey::HOST));
        assert_eq!(HeaderKey::lookup("te"), Some(&HeaderKey::TE));
        assert_eq!(HeaderKey::lookup("Hosts"), None);
        assert_eq!(HeaderKey::lookup("Hxst"), None);
        assert_eq!(HeaderKey::lookup("Hos"), None);
        assert_eq!(HeaderKey::lookup(""), None);
        assert_eq!(HeaderKey::lookup("h\u{f6}s"), None);
    }

    #[test]
    fn rejects_non_tokens() {
        assert!(matches!(HeaderKey::parse(""), Err(ParseError::MalformedHeaderKey { offset: 0, .. })));
        assert!(matches!(HeaderKey::parse("Ho st"), Err(ParseError::MalformedHeaderKey { offset: 2, .. })));
        assert!(matches!(HeaderKey::parse("Host:"), Err(ParseError::MalformedHeaderKey { offset: 4, .. })));
        assert!(matches!(HeaderKey::parse("@"), Err(ParseError::MalformedHeaderKey { .. })));
        assert!(matches!(HeaderKey::parse("a\tb"), Err(ParseError::MalformedHeaderKey { .. })));
        assert!(matches!(HeaderKey::parse("caf\u{e9}"), Err(ParseError::MalformedHeaderKey { offset: 3, .. })));
    }

    #[test]
    fn http_header_name_interop() {
        let name = http::HeaderName::try_from(&HeaderKey::USER_AGENT).unwrap();
        assert_eq!(name, http::header::USER_AGENT);
        assert_eq!(HeaderKey::from(&http::header::HOST).as_str(), "Host");
        assert_eq!(HeaderKey::from(&http::HeaderName::from_static("x-trace")).as_str(), "x-trace");
    }
}
