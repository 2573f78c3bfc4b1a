//! Parser configuration.
//!
//! [`ParserConfig`] groups the resource limits and the two compatibility policies the
//! grammar leaves open: obsolete line folding in header blocks and duplicate media type
//! parameters. A config is handed to [`VersionRegistry::with_config`] once at startup
//! and is immutable afterwards.
//!
//! [`VersionRegistry::with_config`]: crate::factory::VersionRegistry::with_config

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default maximum size in bytes of a message head
pub const DEFAULT_MAX_HEADER_BYTES: usize = 8 * 1024;

/// Default maximum number of header fields
pub const DEFAULT_MAX_HEADERS: usize = 64;

/// How a header line beginning with SP or HTAB is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum ObsFold {
    /// Reject the line as a malformed header field (RFC 9112 section 5.2).
    #[default]
    Reject,
    /// Join the continuation onto the previous field value with a single space.
    Unfold,
}

/// How repeated media type parameter names are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum DuplicateParams {
    /// Keep every occurrence in encounter order and let the caller decide.
    #[default]
    PreserveAll,
    /// Keep only the last occurrence, at the position of the first one.
    LastWins,
    /// Fail with a malformed media type error.
    Reject,
}

/// Limits and compatibility policies applied by every parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ParserConfig {
    /// Upper bound on the size of a message head, terminator included.
    pub max_header_bytes: usize,
    /// Upper bound on the number of header fields.
    pub max_headers: usize,
    /// Treatment of obs-fold continuation lines.
    pub obs_fold: ObsFold,
    /// Treatment of repeated media type parameters in parsed fields.
    pub duplicate_params: DuplicateParams,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
            max_headers: DEFAULT_MAX_HEADERS,
            obs_fold: ObsFold::default(),
            duplicate_params: DuplicateParams::default(),
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn max_header_bytes(mut self, max_header_bytes: usize) -> Self {
        self.max_header_bytes = max_header_bytes;
        self
    }

    #[must_use]
    pub fn max_headers(mut self, max_headers: usize) -> Self {
        self.max_headers = max_headers;
        self
    }

    #[must_use]
    pub fn obs_fold(mut self, obs_fold: ObsFold) -> Self {
        self.obs_fold = obs_fold;
        self
    }

    #[must_use]
    pub fn duplicate_params(mut self, duplicate_params: DuplicateParams) -> Self {
        self.duplicate_params = duplicate_params;
        self
    }
}
