//! Version-bound parsing and serialization.
//!
//! - [`MessageFactory`] parses and serializes the heads of one HTTP version
//! - [`VersionRegistry`] holds one factory per supported version
//! - [`HttpParser`] is a shareable façade that picks the factory from the bytes
//!
//! ```
//! use micro_http_parser::factory::HttpParser;
//!
//! let parser = HttpParser::default();
//! let request = parser.parse_request(b"GET /test HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
//! assert_eq!(request.target().path(), "/test");
//! ```

mod message_factory;
mod parser;
mod registry;

pub use message_factory::MessageFactory;
pub use parser::HttpParser;
pub use registry::VersionRegistry;
