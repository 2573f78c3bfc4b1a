//! Header block processing.
//!
//! - `HeaderDecoder` turns the lines after the start line into a [`HeaderBlock`],
//!   enforcing the configured limits and folding policy
//! - the encoder functions write a complete head back to bytes
//!
//! [`HeaderBlock`]: crate::protocol::header::HeaderBlock

mod header_decoder;
mod header_encoder;

pub(crate) use header_decoder::HeaderDecoder;
pub(crate) use header_encoder::{encode_request_head, encode_response_head};
