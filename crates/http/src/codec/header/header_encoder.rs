//! Message head encoder.
//!
//! Writes the canonical wire form: start line, one `key: value` line per field in
//! block order, then the empty line. Keys keep the spelling they were stored with and
//! values are written trimmed, so every head produced here parses back to an equal
//! message.

use bytes::{BufMut, BytesMut};

use crate::protocol::header::HeaderBlock;
use crate::protocol::{Request, Response};

/// Extra room reserved for the start line on top of the header block.
const START_LINE_RESERVE: usize = 64;

pub(crate) fn encode_request_head(request: &Request, dst: &mut BytesMut) {
    let line = request.line();
    let target = line.target.to_string();
    dst.reserve(START_LINE_RESERVE + target.len() + encoded_len(request.headers()));

    dst.put_slice(line.method.as_str().as_bytes());
    dst.put_u8(b' ');
    dst.put_slice(target.as_bytes());
    dst.put_u8(b' ');
    dst.put_slice(line.version.as_str().as_bytes());
    dst.put_slice(b"\r\n");
    encode_headers(request.headers(), dst);
}

pub(crate) fn encode_response_head(response: &Response, dst: &mut BytesMut) {
    let line = response.line();
    dst.reserve(START_LINE_RESERVE + line.reason.len() + encoded_len(response.headers()));

    dst.put_slice(line.version.as_str().as_bytes());
    dst.put_u8(b' ');
    dst.put_slice(line.status.as_str().as_bytes());
    dst.put_u8(b' ');
    dst.put_slice(line.reason.as_bytes());
    dst.put_slice(b"\r\n");
    encode_headers(response.headers(), dst);
}

fn encode_headers(headers: &HeaderBlock, dst: &mut BytesMut) {
    for field in headers {
        dst.put_slice(field.key().as_str().as_bytes());
        dst.put_slice(b": ");
        dst.put_slice(field.value().as_bytes());
        dst.put_slice(b"\r\n");
    }
    dst.put_slice(b"\r\n");
}

fn encoded_len(headers: &HeaderBlock) -> usize {
    headers.iter().map(|field| field.key().as_str().len() + field.value().len() + 4).sum::<usize>() + 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use indoc::indoc;

    #[test]
    fn request_head() {
        let request = Request::builder()
            .method(Method::POST)
            .target("/submit?x=1")
            .header("Host", "example.com")
            .header("x-custom", "  padded  ")
            .build()
            .unwrap();

        let mut dst = BytesMut::new();
        encode_request_head(&request, &mut dst);

        let expected = indoc! {"
            POST /submit?x=1 HTTP/1.1
            Host: example.com
            x-custom: padded

        "}
        .replace('\n', "\r\n");
        assert_eq!(&dst[..], expected.as_bytes());
    }

    #[test]
    fn response_head_keeps_empty_reason_separator() {
        let response = Response::builder().status(299).build().unwrap();
        let mut dst = BytesMut::new();
        encode_response_head(&response, &mut dst);
        assert_eq!(&dst[..], b"HTTP/1.1 299 \r\n\r\n");
    }

    #[test]
    fn known_keys_use_canonical_spelling() {
        let response = Response::builder().status(200).header("content-length", "0").build().unwrap();
        let mut dst = BytesMut::new();
        encode_response_head(&response, &mut dst);
        assert_eq!(&dst[..], b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
    }
}
