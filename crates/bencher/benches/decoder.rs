use std::hint::black_box;
use std::mem::MaybeUninit;

use bencher::{TestCase, TestFile};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use micro_http_parser::codec::RequestHeadDecoder;
use micro_http_parser::factory::HttpParser;
use tokio_util::bytes::BytesMut;
use tokio_util::codec::Decoder;

static SMALL_HEADER: TestFile = TestFile::new("get_small.txt", include_str!("../resources/request/get_small.txt"));
static LARGE_HEADER: TestFile = TestFile::new("get_large.txt", include_str!("../resources/request/get_large.txt"));
static RESPONSE_HEADER: TestFile = TestFile::new("ok_html.txt", include_str!("../resources/response/ok_html.txt"));

const MAX_HEADER_NUM: usize = 64;

fn create_test_cases() -> Vec<TestCase> {
    vec![TestCase::new("small_header", SMALL_HEADER), TestCase::new("large_header", LARGE_HEADER)]
}

fn benchmark_request_parser(criterion: &mut Criterion) {
    let parser = HttpParser::default();
    let mut group = criterion.benchmark_group("request_parser");

    for case in create_test_cases() {
        group.throughput(Throughput::Bytes(case.len()));
        group.bench_with_input(BenchmarkId::new("micro", case.name()), &case, |b, case| {
            b.iter(|| {
                let request = parser.parse_request(black_box(case.file().bytes()));
                black_box(request.expect("input should be a valid http request head"));
            });
        });

        // baseline, httparse only borrows slices and does not validate targets
        group.bench_with_input(BenchmarkId::new("httparse", case.name()), &case, |b, case| {
            b.iter(|| {
                let mut headers: [MaybeUninit<httparse::Header<'_>>; MAX_HEADER_NUM] = [const { MaybeUninit::uninit() }; MAX_HEADER_NUM];
                let mut request = httparse::Request::new(&mut []);
                let status = request
                    .parse_with_uninit_headers(black_box(case.file().bytes()), &mut headers)
                    .expect("input should be a valid http request head");
                black_box((status, request.headers.len()));
            });
        });
    }

    group.finish();
}

fn benchmark_request_decoder(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("request_decoder");

    for case in create_test_cases() {
        group.throughput(Throughput::Bytes(case.len()));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            let mut request_decoder = RequestHeadDecoder::new();
            b.iter_batched_ref(
                || BytesMut::from(case.file().content()),
                |bytes_mut| {
                    let request = request_decoder.decode(bytes_mut).expect("input should be valid http request header").unwrap();
                    black_box(request);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_response_parser(criterion: &mut Criterion) {
    let parser = HttpParser::default();
    let case = TestCase::new("response_header", RESPONSE_HEADER);
    let content = case.file().bytes();
    let mut group = criterion.benchmark_group("response_parser");
    group.throughput(Throughput::Bytes(case.len()));

    group.bench_function(BenchmarkId::new("micro", case.file_name()), |b| {
        b.iter(|| {
            let response = parser.parse_response(black_box(content));
            black_box(response.expect("input should be a valid http response head"));
        });
    });

    group.bench_function(BenchmarkId::new("httparse", case.file_name()), |b| {
        b.iter(|| {
            let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
            let mut response = httparse::Response::new(&mut headers);
            let status = response.parse(black_box(content)).expect("input should be a valid http response head");
            black_box((status, response.code));
        });
    });

    group.finish();
}

criterion_group!(decoder, benchmark_request_parser, benchmark_request_decoder, benchmark_response_parser);
criterion_main!(decoder);
