use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{header, Method, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use crate::{api, data::{Record, SampleData}};
use super::{accept_connections, handlers::MAX_BODY_SIZE, Context, HttpConfig};


/// Starts a server on a random port and returns its address. The server runs
/// until the test's runtime shuts down.
async fn start(data: SampleData, graphiql: bool) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let ctx = Arc::new(Context {
        api_root: Arc::new(api::root_node()),
        data: Arc::new(data),
        config: HttpConfig { port: addr.port(), address: addr.ip(), graphiql },
    });

    tokio::spawn(accept_connections(listener, ctx, std::future::pending()));
    addr
}

struct Reply {
    status: StatusCode,
    headers: hyper::HeaderMap,
    body: String,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

async fn send(
    addr: SocketAddr,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> Reply {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .unwrap();
    tokio::spawn(conn);

    let mut req = hyper::Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, addr.to_string());
    if let Some(content_type) = content_type {
        req = req.header(header::CONTENT_TYPE, content_type);
    }
    let req = req.body(Full::new(Bytes::from(body.to_owned()))).unwrap();

    let res = sender.send_request(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let body = res.into_body().collect().await.unwrap().to_bytes();
    Reply { status, headers, body: String::from_utf8(body.to_vec()).unwrap() }
}

async fn post_json(addr: SocketAddr, body: &str) -> Reply {
    send(addr, Method::POST, "/graphql", Some("application/json"), body).await
}

fn data_with_checkbox() -> SampleData {
    let mut records = SampleData::builtin().records().to_vec();
    records.push(Record {
        id: "4".into(),
        name: "Checkbox".into(),
        value: json!(true),
        values: None,
    });
    SampleData::new(records)
}


#[tokio::test]
async fn post_json_query() {
    let addr = start(SampleData::builtin(), true).await;
    let reply = post_json(addr, r#"{ "query": "{ fields { id name } }" }"#).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({
        "data": {
            "fields": [
                { "id": "1", "name": "TextField Example" },
                { "id": "2", "name": "NumberField Example" },
                { "id": "3", "name": "SelectField Example" },
            ],
        },
    }));
}

#[tokio::test]
async fn post_plain_graphql_query() {
    let addr = start(SampleData::builtin(), true).await;
    let reply = send(
        addr,
        Method::POST,
        "/graphql",
        Some("application/graphql"),
        "{ fancyFields { id } }",
    ).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["fancyFields"][2]["id"], "3");
}

#[tokio::test]
async fn get_query_in_url() {
    let addr = start(SampleData::builtin(), true).await;
    let reply = send(
        addr,
        Method::GET,
        "/graphql?query=%7B%20fieldsWithUnion%20%7B%20__typename%20%7D%20%7D",
        None,
        "",
    ).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["fieldsWithUnion"][1]["__typename"], "NumberField");
}

#[tokio::test]
async fn field_errors_still_ok() {
    let addr = start(data_with_checkbox(), true).await;
    let reply = post_json(addr, r#"{ "query": "{ fields { id } }" }"#).await;

    assert_eq!(reply.status, StatusCode::OK);
    let json = reply.json();
    assert_eq!(json["data"], Value::Null);
    assert_eq!(json["errors"][0]["extensions"]["kind"], "UNRESOLVED_TYPE");
}

#[tokio::test]
async fn validation_error_is_bad_request() {
    let addr = start(SampleData::builtin(), true).await;
    let reply = post_json(addr, r#"{ "query": "{ doesNotExist }" }"#).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.json()["errors"].as_array().is_some_and(|errors| !errors.is_empty()));
}

#[tokio::test]
async fn invalid_json_is_bad_request() {
    let addr = start(SampleData::builtin(), true).await;
    let reply = post_json(addr, "{ fields { id } }").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_method_on_graphql() {
    let addr = start(SampleData::builtin(), true).await;
    let reply = send(addr, Method::PUT, "/graphql", Some("application/json"), "{}").await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn graphiql_enabled() {
    let addr = start(SampleData::builtin(), true).await;

    let reply = send(addr, Method::GET, "/", None, "").await;
    assert_eq!(reply.status, StatusCode::FOUND);
    assert_eq!(reply.headers[header::LOCATION], "/graphiql");

    let reply = send(addr, Method::GET, "/graphiql", None, "").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    assert!(reply.body.contains("/graphql"));
}

#[tokio::test]
async fn graphiql_disabled() {
    let addr = start(SampleData::builtin(), false).await;
    assert_eq!(send(addr, Method::GET, "/", None, "").await.status, StatusCode::NOT_FOUND);
    assert_eq!(send(addr, Method::GET, "/graphiql", None, "").await.status, StatusCode::NOT_FOUND);

    // The API itself is unaffected.
    let reply = post_json(addr, r#"{ "query": "{ fields { id } }" }"#).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_path() {
    let addr = start(SampleData::builtin(), true).await;
    let reply = send(addr, Method::GET, "/graphql/nested", None, "").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let addr = start(SampleData::builtin(), true).await;

    // Only the header is sent: the server has to reject the request based on
    // the announced length without waiting for the body.
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let head = format!(
        "POST /graphql HTTP/1.1\r\n\
            Host: {addr}\r\n\
            Content-Type: application/json\r\n\
            Content-Length: {}\r\n\
            Connection: close\r\n\r\n",
        MAX_BODY_SIZE + 1,
    );
    stream.write_all(head.as_bytes()).await.unwrap();

    let mut buf = [0; 64];
    let n = stream.read(&mut buf).await.unwrap();
    let status_line = String::from_utf8_lossy(&buf[..n]);
    assert!(status_line.starts_with("HTTP/1.1 413"), "got: {status_line}");
}
