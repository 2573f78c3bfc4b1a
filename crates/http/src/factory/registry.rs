use crate::config::ParserConfig;
use crate::factory::MessageFactory;
use crate::protocol::HttpVersion;

/// The set of HTTP versions a parser accepts, one [`MessageFactory`] each.
///
/// A registry is built once, explicitly, and never changes afterwards. Share it
/// between threads through [`HttpParser`](crate::factory::HttpParser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRegistry {
    factories: Vec<MessageFactory>,
    config: ParserConfig,
}

impl VersionRegistry {
    /// Registers every known version with the default config.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Registers every known version with `config`.
    pub fn with_config(config: ParserConfig) -> Self {
        Self::with_versions(&HttpVersion::ALL, config)
    }

    /// Registers only `versions`; messages of any other version are rejected as
    /// unsupported.
    pub fn with_versions(versions: &[HttpVersion], config: ParserConfig) -> Self {
        let mut versions = versions.to_vec();
        versions.sort_unstable();
        versions.dedup();
        let factories = versions.into_iter().map(|version| MessageFactory::new(version, config)).collect();
        Self { factories, config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// The factory bound to `version`, if registered.
    pub fn factory(&self, version: HttpVersion) -> Option<&MessageFactory> {
        self.factories.iter().find(|factory| factory.version() == version)
    }

    /// The factory for a wire token such as `HTTP/1.1`. Tokens are case-sensitive.
    pub fn lookup(&self, token: &[u8]) -> Option<&MessageFactory> {
        HttpVersion::from_token(token).and_then(|version| self.factory(version))
    }

    /// Registered versions, oldest first.
    pub fn versions(&self) -> impl Iterator<Item = HttpVersion> + '_ {
        self.factories.iter().map(MessageFactory::version)
    }

    /// The newest registered factory.
    pub(crate) fn latest(&self) -> Option<&MessageFactory> {
        self.factories.last()
    }
}

impl Default for VersionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_all_versions() {
        let registry = VersionRegistry::new();
        assert_eq!(registry.versions().collect::<Vec<_>>(), vec![HttpVersion::Http10, HttpVersion::Http11]);
        assert_eq!(registry.factory(HttpVersion::Http10).map(MessageFactory::version), Some(HttpVersion::Http10));
        assert_eq!(registry.latest().map(MessageFactory::version), Some(HttpVersion::Http11));
    }

    #[test]
    fn lookup_by_token() {
        let registry = VersionRegistry::new();
        assert_eq!(registry.lookup(b"HTTP/1.1").map(MessageFactory::version), Some(HttpVersion::Http11));
        assert!(registry.lookup(b"HTTP/2.0").is_none());
        assert!(registry.lookup(b"http/1.1").is_none());
    }

    #[test]
    fn restricted_versions() {
        let config = ParserConfig::default().max_headers(8);
        let registry = VersionRegistry::with_versions(&[HttpVersion::Http11, HttpVersion::Http11], config);
        assert_eq!(registry.versions().collect::<Vec<_>>(), vec![HttpVersion::Http11]);
        assert!(registry.lookup(b"HTTP/1.0").is_none());
        assert_eq!(registry.factory(HttpVersion::Http11).map(|f| f.config().max_headers), Some(8));
    }
}
