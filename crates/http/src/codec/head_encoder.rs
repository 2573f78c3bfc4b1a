use bytes::BytesMut;
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::codec::header::{encode_request_head, encode_response_head};
use crate::protocol::{HttpError, Message, Request, Response};

/// Writes message heads into a `FramedWrite`.
///
/// Heads are written exactly as [`MessageFactory`](crate::factory::MessageFactory)
/// serializes them. Encoding cannot fail on its own; the error type only carries the
/// io errors of the underlying sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadEncoder;

impl HeadEncoder {
    pub fn new() -> Self {
        HeadEncoder
    }
}

impl Encoder<Request> for HeadEncoder {
    type Error = HttpError;

    fn encode(&mut self, item: Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        <Self as Encoder<&Request>>::encode(self, &item, dst)
    }
}

impl Encoder<&Request> for HeadEncoder {
    type Error = HttpError;

    fn encode(&mut self, item: &Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let before = dst.len();
        encode_request_head(item, dst);
        trace!(head_len = dst.len() - before, method = %item.method(), "encoded request head");
        Ok(())
    }
}

impl Encoder<Response> for HeadEncoder {
    type Error = HttpError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        <Self as Encoder<&Response>>::encode(self, &item, dst)
    }
}

impl Encoder<&Response> for HeadEncoder {
    type Error = HttpError;

    fn encode(&mut self, item: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let before = dst.len();
        encode_response_head(item, dst);
        trace!(head_len = dst.len() - before, status = item.status().as_u16(), "encoded response head");
        Ok(())
    }
}

impl Encoder<Message> for HeadEncoder {
    type Error = HttpError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Message::Request(request) => <Self as Encoder<&Request>>::encode(self, &request, dst),
            Message::Response(response) => <Self as Encoder<&Response>>::encode(self, &response, dst),
        }
    }
}
