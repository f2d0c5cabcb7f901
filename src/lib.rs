//! rawhttp - a small HTTP/1.x server framed by hand.
//!
//! Requests are framed directly off a byte stream: partial reads are
//! buffered until a full header block arrives, the head is parsed, the body
//! is streamed to a handler by `Content-Length`, and the response is encoded
//! back onto the same stream.

pub mod config;
pub mod handler;
pub mod http;
pub mod server;
pub mod stream;
