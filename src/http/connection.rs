use std::sync::Arc;

use crate::config::ServerConfig;
use crate::handler::Handler;
use crate::http::body::{RequestBody, discard};
use crate::http::buffer::GrowableBuffer;
use crate::http::error::HttpError;
use crate::http::framer::HeaderFramer;
use crate::http::request::{Method, Request, Version};
use crate::http::response::Response;
use crate::http::writer::{write_response, write_response_head};
use crate::stream::{StreamAdapter, Transport};

/// Serves requests on one connection until it ends or fails.
pub struct Connection<S, H> {
    io: StreamAdapter<S>,
    buffer: GrowableBuffer,
    handler: Arc<H>,
    framer: HeaderFramer,
    state: ConnectionState,
}

pub enum ConnectionState {
    AwaitingHeaders,
    Dispatching(Request),
    Closed,
}

impl<S: Transport, H: Handler> Connection<S, H> {
    pub fn new(stream: S, handler: Arc<H>, cfg: &ServerConfig) -> Self {
        Self {
            io: StreamAdapter::with_read_chunk(stream, cfg.read_chunk_size),
            buffer: GrowableBuffer::new(),
            handler,
            framer: HeaderFramer::new(cfg.max_header_size),
            state: ConnectionState::AwaitingHeaders,
        }
    }

    /// Runs the connection to completion and closes it.
    ///
    /// HTTP errors are answered with one best-effort error response and are
    /// not returned. Any other failure is returned after teardown, without a
    /// response being attempted.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.serve().await;

        let outcome = match result {
            Ok(()) => Ok(()),
            Err(err) => match err.downcast_ref::<HttpError>() {
                Some(http_err) => {
                    tracing::warn!(
                        status = http_err.status.as_u16(),
                        error = %http_err.message,
                        "rejecting request"
                    );
                    self.send_error(http_err).await;
                    Ok(())
                }
                None => Err(err),
            },
        };

        self.state = ConnectionState::Closed;
        self.io.close().await;
        outcome
    }

    async fn serve(&mut self) -> anyhow::Result<()> {
        loop {
            self.state = match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::AwaitingHeaders => match self.read_request().await? {
                    Some(request) => ConnectionState::Dispatching(request),
                    None => ConnectionState::Closed,
                },

                ConnectionState::Dispatching(request) => {
                    if self.dispatch(request).await? {
                        ConnectionState::AwaitingHeaders
                    } else {
                        ConnectionState::Closed
                    }
                }

                ConnectionState::Closed => return Ok(()),
            };
        }
    }

    /// Waits for the next complete request head.
    ///
    /// Returns `None` when the peer ends the stream between requests.
    async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            if let Some(request) = self.framer.try_extract(&mut self.buffer)? {
                return Ok(Some(request));
            }

            if self.io.is_finished() {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(HttpError::bad_request(format!(
                    "connection closed after {} bytes of an incomplete request",
                    self.buffer.len()
                ))
                .into());
            }

            let chunk = self.io.read().await?;
            self.buffer.append(&chunk);
        }
    }

    /// Hands one request to the handler and writes its response.
    ///
    /// Returns whether the connection can carry another request.
    async fn dispatch(&mut self, request: Request) -> anyhow::Result<bool> {
        let version = request.version;
        let keep_alive = request.keep_alive();
        let head_only = request.method == Method::HEAD;

        tracing::debug!(
            method = %request.method,
            target = %request.target,
            version = %version,
            "dispatching request"
        );

        let (response, unread) = {
            let mut body = RequestBody::for_request(&request, &mut self.io, &mut self.buffer)?;
            let response = self.handler.handle(request, &mut body).await?;
            (response, body.remaining())
        };

        tracing::debug!(
            status = response.status.as_u16(),
            length = ?response.body.length(),
            "writing response"
        );
        if head_only {
            write_response_head(&mut self.io, version, &response).await?;
        } else {
            write_response(&mut self.io, version, response).await?;
        }

        if !keep_alive {
            return Ok(false);
        }

        // The request is already answered; a failed drain only ends the connection.
        if let Err(err) = discard(&mut self.io, &mut self.buffer, unread).await {
            if err.downcast_ref::<HttpError>().is_none() {
                return Err(err);
            }
            tracing::debug!(error = %err, "closing after incomplete request body");
            return Ok(false);
        }
        Ok(true)
    }

    async fn send_error(&mut self, err: &HttpError) {
        let response = Response::error(err.status, &err.message);
        if let Err(e) = write_response(&mut self.io, Version::HTTP_11, response).await {
            tracing::debug!(error = %e, "failed to send error response");
        }
    }
}
