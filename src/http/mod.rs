//! HTTP/1.x protocol implementation.
//!
//! Messages are framed by hand on top of a [`StreamAdapter`](crate::stream::StreamAdapter).
//!
//! # Architecture
//!
//! - **`buffer`**: Growable byte buffer holding received bytes that are not yet framed
//! - **`framer`**: Finds a complete header block in the buffer and enforces the header-size cap
//! - **`parser`**: Turns a header block into a [`Request`](request::Request)
//! - **`request`**: Request head, methods and protocol versions
//! - **`body`**: Pull-based body readers for requests and responses
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Encodes the response head and streams the body
//! - **`error`**: Errors that are answered with an HTTP status
//! - **`connection`**: The per-connection serve loop
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingHeaders  │ ← Read until a full header block is buffered
//!        └──────┬───────────┘
//!               │ Request head parsed
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← Handler runs, response is written
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ HTTP/1.1 → drain unread body → AwaitingHeaders
//!               └─ HTTP/1.0 or Connection: close → Closed
//! ```
//!
//! A peer that ends the stream between requests closes the connection
//! cleanly. Ending it part-way through a request head or body is a 400.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rawhttp::config::ServerConfig;
//! use rawhttp::handler::DefaultHandler;
//! use rawhttp::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg = ServerConfig::default();
//!     let handler = Arc::new(DefaultHandler::new("hello\n"));
//!     let listener = TcpListener::bind(&cfg.listen_addr).await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let mut conn = Connection::new(socket, handler.clone(), &cfg);
//!         tokio::spawn(async move {
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod body;
pub mod buffer;
pub mod connection;
pub mod error;
pub mod framer;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
