//! Wire level encoding and decoding of message heads.
//!
//! - Start lines are handled by the `line` grammar
//! - Header blocks are handled by the [`header`] module
//! - [`RequestHeadDecoder`] and [`ResponseHeadDecoder`] adapt parsing to
//!   `tokio_util::codec::Decoder` for streaming input
//! - [`HeadEncoder`] writes heads through `tokio_util::codec::Encoder`
//!
//! # Example
//!
//! ```no_run
//! use micro_http_parser::codec::{HeadEncoder, RequestHeadDecoder};
//! use micro_http_parser::protocol::Response;
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::BytesMut;
//!
//! // Decode incoming request
//! let mut decoder = RequestHeadDecoder::new();
//! let mut request_buffer = BytesMut::new();
//! let request = decoder.decode(&mut request_buffer);
//!
//! // Encode outgoing response head
//! let mut encoder = HeadEncoder::new();
//! let mut response_buffer = BytesMut::new();
//! let response = Response::builder().status(204).build().unwrap();
//! encoder.encode(response, &mut response_buffer).unwrap();
//! ```

pub(crate) mod header;
pub(crate) mod line;

mod head_encoder;
mod request_decoder;
mod response_decoder;

pub use head_encoder::HeadEncoder;
pub use request_decoder::RequestHeadDecoder;
pub use response_decoder::ResponseHeadDecoder;

/// Every complete head ends with CRLF CRLF.
pub(crate) fn contains_head_terminator(buf: &[u8]) -> bool {
    buf.windows(4).any(|w| w == b"\r\n\r\n")
}
