//! Request handlers.
//!
//! A [`Handler`] maps a parsed request and its body to a response. Handlers
//! may pull the body with [`RequestBody::produce`]; anything they leave unread
//! is drained by the connection before the next request is framed.
//!
//! Chunked request bodies are never populated: the handler sees them as empty.

pub mod default;

use std::future::Future;

use crate::http::body::RequestBody;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::stream::Transport;

pub use default::DefaultHandler;

pub trait Handler: Send + Sync + 'static {
    /// Produces the response for one request.
    ///
    /// Returning an [`HttpError`](crate::http::error::HttpError) makes the
    /// connection answer with that status and close. Any other error closes
    /// the connection without a response.
    fn handle<S: Transport>(
        &self,
        request: Request,
        body: &mut RequestBody<'_, S>,
    ) -> impl Future<Output = anyhow::Result<Response>> + Send;
}
