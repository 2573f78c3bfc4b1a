use crate::protocol::header::HeaderBlock;
use crate::protocol::{HttpVersion, Request, Response};

/// Either side of an HTTP exchange.
///
/// Produced when the caller does not know up front whether the bytes hold a request
/// or a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Request(Request),
    Response(Response),
}

impl Message {
    #[inline]
    pub fn is_request(&self) -> bool {
        matches!(self, Message::Request(_))
    }

    #[inline]
    pub fn is_response(&self) -> bool {
        matches!(self, Message::Response(_))
    }

    pub fn version(&self) -> HttpVersion {
        match self {
            Message::Request(request) => request.version(),
            Message::Response(response) => response.version(),
        }
    }

    pub fn headers(&self) -> &HeaderBlock {
        match self {
            Message::Request(request) => request.headers(),
            Message::Response(response) => response.headers(),
        }
    }

    pub fn head_len(&self) -> Option<usize> {
        match self {
            Message::Request(request) => request.head_len(),
            Message::Response(response) => response.head_len(),
        }
    }

    pub fn into_request(self) -> Option<Request> {
        match self {
            Message::Request(request) => Some(request),
            Message::Response(_) => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            Message::Request(_) => None,
            Message::Response(response) => Some(response),
        }
    }
}

impl From<Request> for Message {
    fn from(request: Request) -> Self {
        Message::Request(request)
    }
}

impl From<Response> for Message {
    fn from(response: Response) -> Self {
        Message::Response(response)
    }
}
