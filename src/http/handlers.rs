use bytes::Bytes;
use http_body_util::Full;
use hyper::{header, Method};
use std::{sync::Arc, time::Instant};

use crate::{api, prelude::*};
use super::{Context, Request, Response, response};


/// Request bodies larger than this are rejected with `413 Payload Too Large`.
pub(super) const MAX_BODY_SIZE: u64 = 1024 * 1024;


/// This is the main HTTP entry point, called for each incoming request.
pub(super) async fn handle(req: Request, ctx: Arc<Context>) -> Response {
    trace!(
        "Incoming HTTP {:?} request to '{}{}'",
        req.method(),
        req.uri().path(),
        req.uri().query().map(|q| format!("?{}", q)).unwrap_or_default(),
    );

    let method = req.method().clone();
    let path = req.uri().path().trim_end_matches('/').to_owned();

    match path.as_str() {
        // The GraphQL endpoint. The query can be passed either in the body
        // (JSON or plain GraphQL) or in the query part of the URL.
        "/graphql" if method == Method::POST || method == Method::GET => {
            handle_api(req, &ctx).await
        }
        "/graphql" => response::method_not_allowed(),

        // The interactive GraphQL API explorer/IDE.
        "" | "/graphiql" if !ctx.config.graphiql => reply_404(&method, &path),
        _ if method != Method::GET && method != Method::HEAD => response::method_not_allowed(),
        "" => response::redirect("/graphiql"),
        "/graphiql" => juniper_hyper::graphiql("/graphql", None).await.pipe(buffered),

        _ => reply_404(&method, &path),
    }
}

/// Replies with a 404 Not Found.
fn reply_404(method: &Method, path: &str) -> Response {
    debug!("Responding with 404 to {:?} '{}'", method, path);
    response::not_found()
}

/// Handles a request to `/graphql`.
async fn handle_api(req: Request, ctx: &Context) -> Response {
    if let Some(len) = content_length(&req) {
        if len > MAX_BODY_SIZE {
            debug!("Rejecting GraphQL request with body of {len} bytes");
            return response::payload_too_large();
        }
    }

    let before = Instant::now();
    let api_context = Arc::new(api::Context::new(Arc::clone(&ctx.data)));

    // `juniper_hyper` replies with 400 if the request could not be executed
    // at all (e.g. parse or validation errors). Field errors still result in
    // 200.
    let out = juniper_hyper::graphql(Arc::clone(&ctx.api_root), api_context, req).await;

    debug!("Finished /graphql query with {} in {:.2?}", out.status(), before.elapsed());
    buffered(out)
}

/// Returns the `Content-Length` of the request, if it is set and valid.
fn content_length(req: &Request) -> Option<u64> {
    req.headers()
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Converts the string responses of `juniper_hyper` into our response type.
fn buffered(response: hyper::Response<String>) -> Response {
    response.map(|body| Full::new(Bytes::from(body)))
}


#[cfg(test)]
mod tests {
    use hyper::{StatusCode, header};

    use super::buffered;

    #[test]
    fn buffered_keeps_status_and_headers() {
        let original = hyper::Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header(header::CONTENT_TYPE, "application/json")
            .body(r#"{"errors":[]}"#.to_owned())
            .unwrap();

        let converted = buffered(original);
        assert_eq!(converted.status(), StatusCode::BAD_REQUEST);
        assert_eq!(converted.headers()[header::CONTENT_TYPE], "application/json");
    }
}
