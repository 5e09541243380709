use bytes::Bytes;
use http_body_util::Full;
use hyper::{StatusCode, header};

use super::Response;


fn build(builder: hyper::http::response::Builder, body: impl Into<Bytes>) -> Response {
    builder.body(Full::new(body.into())).expect("bug: invalid response")
}

fn plain(status: StatusCode, body: &'static str) -> Response {
    let builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=UTF-8");
    build(builder, body)
}

pub(super) fn redirect(location: &'static str) -> Response {
    let builder = Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location);
    build(builder, Bytes::new())
}

pub(super) fn not_found() -> Response {
    plain(StatusCode::NOT_FOUND, "404 Not found")
}

pub(super) fn method_not_allowed() -> Response {
    plain(StatusCode::METHOD_NOT_ALLOWED, "405 Method not allowed")
}

pub(super) fn payload_too_large() -> Response {
    plain(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload too large")
}

pub(super) fn internal_server_error() -> Response {
    plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
