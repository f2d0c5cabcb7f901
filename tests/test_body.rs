use rawhttp::http::body::{Body, BodyLength, RequestBody, discard};
use rawhttp::http::buffer::GrowableBuffer;
use rawhttp::http::error::HttpError;
use rawhttp::http::request::{Method, Request, Version};
use rawhttp::http::response::StatusCode;
use rawhttp::stream::StreamAdapter;
use tokio::io::{AsyncWriteExt, DuplexStream, duplex};

fn post(length: &str) -> Request {
    Request::new(Method::POST, "/upload", Version::HTTP_11).with_header("Content-Length", length)
}

fn adapter() -> (DuplexStream, StreamAdapter<DuplexStream>) {
    let (client, server) = duplex(1024);
    (client, StreamAdapter::new(server))
}

#[tokio::test]
async fn test_body_uses_buffered_bytes_before_reading() {
    let (mut client, mut io) = adapter();
    let mut buffer = GrowableBuffer::new();
    buffer.append(b"hel");
    client.write_all(b"lo world").await.unwrap();

    let mut body = RequestBody::from_connection(&mut io, &mut buffer, 5);
    assert_eq!(body.length(), BodyLength::Known(5));
    assert_eq!(&body.produce().await.unwrap()[..], b"hel");
    assert_eq!(&body.produce().await.unwrap()[..], b"lo");
    assert!(body.produce().await.unwrap().is_empty());
    assert_eq!(body.remaining(), 0);
    drop(body);

    // Bytes past the declared length stay buffered for the next request
    assert_eq!(buffer.as_slice(), b" world");
}

#[tokio::test]
async fn test_body_read_to_end() {
    let (mut client, mut io) = adapter();
    let mut buffer = GrowableBuffer::new();
    client.write_all(b"0123456789").await.unwrap();

    let mut body = RequestBody::from_connection(&mut io, &mut buffer, 10);
    assert_eq!(&body.read_to_end().await.unwrap()[..], b"0123456789");
}

#[tokio::test]
async fn test_body_truncated_by_peer() {
    let (mut client, mut io) = adapter();
    let mut buffer = GrowableBuffer::new();
    client.write_all(b"abc").await.unwrap();
    client.shutdown().await.unwrap();

    let mut body = RequestBody::from_connection(&mut io, &mut buffer, 10);
    let err = body.read_to_end().await.unwrap_err();
    let http_err = err.downcast_ref::<HttpError>().unwrap();
    assert_eq!(http_err.status, StatusCode::BadRequest);
}

#[tokio::test]
async fn test_body_for_get_is_empty() {
    let (_client, mut io) = adapter();
    let mut buffer = GrowableBuffer::new();
    buffer.append(b"ignored");

    let request = Request::new(Method::GET, "/", Version::HTTP_11).with_header("Content-Length", "7");
    let mut body = RequestBody::for_request(&request, &mut io, &mut buffer).unwrap();
    assert_eq!(body.length(), BodyLength::Known(0));
    assert!(body.produce().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_body_for_post_without_framing_is_empty() {
    let (_client, mut io) = adapter();
    let mut buffer = GrowableBuffer::new();

    let request = Request::new(Method::POST, "/", Version::HTTP_11);
    let body = RequestBody::for_request(&request, &mut io, &mut buffer).unwrap();
    assert_eq!(body.length(), BodyLength::Known(0));
}

#[tokio::test]
async fn test_body_for_chunked_post_is_empty() {
    let (_client, mut io) = adapter();
    let mut buffer = GrowableBuffer::new();
    buffer.append(b"5\r\nhello\r\n0\r\n\r\n");

    let request = Request::new(Method::POST, "/", Version::HTTP_11)
        .with_header("Transfer-Encoding", "chunked");
    let mut body = RequestBody::for_request(&request, &mut io, &mut buffer).unwrap();
    assert!(body.produce().await.unwrap().is_empty());
    assert_eq!(body.remaining(), 0);
}

#[tokio::test]
async fn test_body_for_post_with_length() {
    let (_client, mut io) = adapter();
    let mut buffer = GrowableBuffer::new();
    buffer.append(b"hello");

    let request = post("5");
    let mut body = RequestBody::for_request(&request, &mut io, &mut buffer).unwrap();
    assert_eq!(body.remaining(), 5);
    assert_eq!(&body.read_to_end().await.unwrap()[..], b"hello");
}

#[tokio::test]
async fn test_body_rejects_bad_content_length() {
    let (_client, mut io) = adapter();
    let mut buffer = GrowableBuffer::new();

    let request = post("five");
    let err = RequestBody::for_request(&request, &mut io, &mut buffer)
        .err()
        .unwrap();
    assert_eq!(err.status, StatusCode::BadRequest);
}

#[tokio::test]
async fn test_in_memory_request_body() {
    let mut body = RequestBody::<DuplexStream>::in_memory(Body::from("abc"));
    assert_eq!(body.length(), BodyLength::Known(3));
    assert_eq!(&body.produce().await.unwrap()[..], b"abc");
    assert!(body.produce().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_discard_skips_unread_body() {
    let (mut client, mut io) = adapter();
    let mut buffer = GrowableBuffer::new();
    buffer.append(b"xx");
    client.write_all(b"xxxGET / HTTP/1.1\r\n\r\n").await.unwrap();

    discard(&mut io, &mut buffer, 5).await.unwrap();
    assert_eq!(buffer.as_slice(), b"GET / HTTP/1.1\r\n\r\n");
}
