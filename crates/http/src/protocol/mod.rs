//! Core HTTP/1.x message head types.
//!
//! - **Versions** ([`HttpVersion`]): the protocol versions this crate understands
//! - **Headers** ([`header`]): ordered, case-insensitive header fields
//! - **Media types** ([`MediaType`]): structured `Content-Type` values
//! - **Requests** ([`Request`], [`RequestLine`], [`RequestTarget`])
//! - **Responses** ([`Response`], [`StatusLine`])
//! - **Errors** ([`ParseError`], [`HttpError`])
//!
//! Every message type here is immutable once built; the only ways to obtain one are
//! a successful parse or a builder, both of which validate the full grammar.

mod error;
pub use error::HttpError;
pub use error::ParseError;

mod version;
pub use version::HttpVersion;
pub(crate) use version::is_version_shaped;

pub mod header;

mod media_type;
pub use media_type::MediaType;
pub use media_type::MediaTypeParser;

mod request;
pub use request::Request;
pub use request::RequestBuilder;
pub use request::RequestLine;
pub use request::RequestTarget;

mod response;
pub use response::Response;
pub use response::ResponseBuilder;
pub use response::StatusLine;
pub use response::{MAX_STATUS, MIN_STATUS};
pub(crate) use response::{is_reason_byte, status_code};

mod message;
pub use message::Message;
