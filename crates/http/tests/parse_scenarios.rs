use http::Method;
use indoc::indoc;
use micro_http_parser::config::{DuplicateParams, ObsFold, ParserConfig};
use micro_http_parser::factory::{HttpParser, VersionRegistry};
use micro_http_parser::protocol::header::HeaderKey;
use micro_http_parser::protocol::{HttpVersion, MediaType, ParseError, Request, Response};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::TRACE).with_test_writer().try_init();
}

fn crlf(text: &str) -> String {
    text.replace('\n', "\r\n")
}

fn registry() -> VersionRegistry {
    VersionRegistry::new()
}

#[test]
fn simple_get_without_headers() {
    init_tracing();
    let factory = registry().factory(HttpVersion::Http11).cloned().unwrap();

    let request = factory.parse_request(b"GET /test HTTP/1.1\r\n\r\n").unwrap();

    assert_eq!(request.method(), Method::GET);
    assert_eq!(request.target().to_string(), "/test");
    assert_eq!(request.version(), HttpVersion::Http11);
    assert!(request.headers().is_empty());
}

#[test]
fn content_type_header_is_parsed_on_demand() {
    init_tracing();
    let parser = HttpParser::default();

    let request = parser.parse_request(b"GET /x HTTP/1.1\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n").unwrap();

    let fields: Vec<_> = request.headers().iter().map(|field| (field.key().as_str(), field.value())).collect();
    assert_eq!(fields, vec![("Content-Type", "text/html; charset=UTF-8")]);

    let media_type = request.headers().content_type().unwrap().unwrap();
    assert_eq!(media_type.type_(), "text");
    assert_eq!(media_type.subtype(), "html");
    assert_eq!(media_type.params().collect::<Vec<_>>(), vec![("charset", "UTF-8")]);
}

#[test]
fn missing_version_is_malformed() {
    init_tracing();
    let result = HttpParser::default().parse_request(b"GET /x\r\n\r\n");
    assert!(matches!(result, Err(ParseError::MalformedRequestLine { .. })), "got {result:?}");
}

#[test]
fn unterminated_header_block_is_truncated() {
    init_tracing();
    let parser = HttpParser::default();

    let result = parser.parse_request(b"GET /x HTTP/1.1\r\nHost: example.com\r\nAccept: */*\r\n");
    assert!(matches!(result, Err(ParseError::TruncatedHeaders { .. })), "got {result:?}");

    let result = parser.parse_response(b"HTTP/1.1 200 OK\r\nServer: x\r\n");
    assert!(matches!(result, Err(ParseError::TruncatedHeaders { .. })), "got {result:?}");
}

#[test]
fn status_code_boundaries() {
    let parser = HttpParser::default();
    for code in ["099", "600"] {
        let raw = format!("HTTP/1.1 {code} Whatever\r\n\r\n");
        let result = parser.parse_response(raw.as_bytes());
        assert!(matches!(result, Err(ParseError::MalformedStatusLine { .. })), "{code}: got {result:?}");
    }
    for code in [100, 599] {
        let raw = format!("HTTP/1.1 {code} Whatever\r\n\r\n");
        assert_eq!(parser.parse_response(raw.as_bytes()).unwrap().status().as_u16(), code);
    }
}

#[test]
fn case_variant_lookups_return_all_values_in_order() {
    let text = crlf(indoc! {"
        GET / HTTP/1.1
        Accept: text/html
        Host: example.com
        ACCEPT: application/json
        accept: */*

    "});
    let request = HttpParser::default().parse_request(text.as_bytes()).unwrap();

    let expected = vec!["text/html", "application/json", "*/*"];
    for name in ["Accept", "accept", "ACCEPT", "aCcEpT"] {
        let key = HeaderKey::parse(name).unwrap();
        assert_eq!(request.headers().get(&key).collect::<Vec<_>>(), expected, "{name}");
    }
}

#[test]
fn request_round_trip() {
    let parser = HttpParser::default();
    let factory = parser.registry().factory(HttpVersion::Http11).unwrap();

    for text in [
        "GET /test HTTP/1.1\r\n\r\n",
        "OPTIONS * HTTP/1.1\r\nHost: example.com\r\n\r\n",
        "CONNECT example.com:443 HTTP/1.1\r\nHost: example.com:443\r\n\r\n",
        "GET http://example.com/a/b?c=d HTTP/1.1\r\nhost: example.com\r\nX-Trace:  1 \r\n\r\n",
        "POST /form HTTP/1.1\r\nContent-Type: multipart/form-data; boundary=\"a b\"\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\n",
    ] {
        let request = parser.parse_request(text.as_bytes()).unwrap();
        let bytes = factory.serialize_request(&request);
        let reparsed = parser.parse_request(&bytes).unwrap();
        assert_eq!(reparsed, request, "{text:?}");
        assert_eq!(factory.serialize_request(&reparsed), bytes, "{text:?}");
    }
}

#[test]
fn response_round_trip() {
    let parser = HttpParser::default();
    let factory = parser.registry().factory(HttpVersion::Http10).unwrap();

    let text = crlf(indoc! {r#"
        HTTP/1.0 301 Moved Permanently
        Location: http://example.com/new
        Content-Type: text/html; charset="utf-8"
        Content-Length: 0

    "#});
    let response = parser.parse_response(text.as_bytes()).unwrap();
    assert_eq!(response.version(), HttpVersion::Http10);
    assert!(!response.keep_alive());

    let bytes = factory.serialize_response(&response);
    assert_eq!(parser.parse_response(&bytes).unwrap(), response);
}

#[test]
fn built_messages_serialize_and_parse_back() {
    let parser = HttpParser::default();
    let factory = parser.registry().factory(HttpVersion::Http11).unwrap();

    let request = Request::builder()
        .method(Method::PUT)
        .target("/items/7")
        .header("Host", "example.com")
        .header("Content-Type", "application/json")
        .build()
        .unwrap();
    let reparsed = parser.parse_request(&factory.serialize_request(&request)).unwrap();
    assert_eq!(reparsed, request);
    assert!(reparsed.head_len().is_some());

    let response = Response::builder().status(418).reason("I'm a teapot").header("Content-Length", "0").build().unwrap();
    let reparsed = parser.parse_response(&factory.serialize_response(&response)).unwrap();
    assert_eq!(reparsed, response);
}

#[test]
fn media_type_round_trip() {
    for text in [
        "text/html",
        "text/html; charset=UTF-8",
        r#"multipart/form-data; boundary="----boundary with spaces""#,
        r#"application/x-thing; a=1; a=2; note="say \"hi\"""#,
    ] {
        let media_type = MediaType::parse(text).unwrap();
        let reparsed = MediaType::parse(&media_type.to_string()).unwrap();
        assert_eq!(reparsed, media_type, "{text}");
    }
}

#[test]
fn config_changes_compatibility_policies() {
    init_tracing();
    let text = crlf(indoc! {"
        HTTP/1.1 200 OK
        Content-Type: text/plain; charset=ascii;
          charset=utf-8

    "});

    let strict = HttpParser::default();
    let result = strict.parse_response(text.as_bytes());
    assert!(matches!(result, Err(ParseError::MalformedHeaderField { .. })), "got {result:?}");

    let config = ParserConfig::default().obs_fold(ObsFold::Unfold).duplicate_params(DuplicateParams::LastWins);
    let lenient = HttpParser::new(VersionRegistry::with_config(config));
    let response = lenient.parse_response(text.as_bytes()).unwrap();
    let media_type = response.headers().content_type().unwrap().unwrap();
    assert_eq!(media_type.params().collect::<Vec<_>>(), vec![("charset", "utf-8")]);

    let config = ParserConfig::default().obs_fold(ObsFold::Unfold).duplicate_params(DuplicateParams::Reject);
    let rejecting = HttpParser::new(VersionRegistry::with_config(config));
    let response = rejecting.parse_response(text.as_bytes()).unwrap();
    assert!(matches!(response.headers().content_type(), Err(ParseError::MalformedMediaType { .. })));
}

#[test]
fn error_offsets_point_into_the_input() {
    let text = b"GET / HTTP/1.1\r\nHost: a\r\nX-Bad: a\0b\r\n\r\n";
    let error = HttpParser::default().parse_request(text).unwrap_err();
    let offset = error.offset().unwrap();
    assert_eq!(text[offset], b'\0');
}

#[test]
fn parser_is_shared_across_threads() {
    let parser = HttpParser::default();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parser = parser.clone();
            std::thread::spawn(move || {
                let text = format!("GET /thread/{i} HTTP/1.1\r\n\r\n");
                parser.parse_request(text.as_bytes()).unwrap().target().to_string()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("/thread/{i}"));
    }
}
