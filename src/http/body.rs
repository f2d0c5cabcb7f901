//! Body readers.
//!
//! Both kinds of body are pulled one chunk at a time with `produce`, which
//! returns an empty chunk once the body is exhausted. They are forward-only
//! and cannot be restarted.
//!
//! - [`Body`] holds its chunks in memory. Responses carry one.
//! - [`RequestBody`] is handed to the handler. It either wraps a `Body` or
//!   streams a length-delimited body straight off the connection, taking
//!   already-buffered bytes first.

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};

use crate::http::buffer::GrowableBuffer;
use crate::http::error::HttpError;
use crate::http::request::Request;
use crate::stream::{StreamAdapter, Transport};

/// Cap on the up-front allocation made by `read_to_end`.
const MAX_PREALLOCATE: u64 = 64 * 1024;

/// Declared size of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLength {
    Known(u64),
    /// Length is not known up front and would need chunked framing.
    Unknown,
}

/// In-memory body.
#[derive(Debug, Clone)]
pub struct Body {
    length: BodyLength,
    chunks: VecDeque<Bytes>,
}

impl Body {
    pub fn empty() -> Self {
        Self {
            length: BodyLength::Known(0),
            chunks: VecDeque::new(),
        }
    }

    /// Body of `length` bytes delivered as the given chunks.
    pub fn sized<I>(length: u64, chunks: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
    {
        Self {
            length: BodyLength::Known(length),
            chunks: chunks.into_iter().collect(),
        }
    }

    /// Body whose length is left undeclared.
    ///
    /// Such a body cannot be written by this server; see `writer::encode_head`.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
    {
        Self {
            length: BodyLength::Unknown,
            chunks: chunks.into_iter().collect(),
        }
    }

    pub fn length(&self) -> BodyLength {
        self.length
    }

    /// Next non-empty chunk, or an empty one when the body is exhausted.
    pub fn produce(&mut self) -> Bytes {
        while let Some(chunk) = self.chunks.pop_front() {
            if !chunk.is_empty() {
                return chunk;
            }
        }
        Bytes::new()
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::sized(bytes.len() as u64, [bytes])
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes::from(bytes).into()
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Bytes::from(s).into()
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Bytes::from_static(s.as_bytes()).into()
    }
}

impl From<&'static [u8]> for Body {
    fn from(bytes: &'static [u8]) -> Self {
        Bytes::from_static(bytes).into()
    }
}

/// Request body as seen by a handler.
pub struct RequestBody<'a, S> {
    source: Source<'a, S>,
}

enum Source<'a, S> {
    Memory(Body),
    Connection {
        io: &'a mut StreamAdapter<S>,
        buffer: &'a mut GrowableBuffer,
        declared: u64,
        remaining: u64,
    },
}

impl<'a, S: Transport> RequestBody<'a, S> {
    pub fn empty() -> Self {
        Self::in_memory(Body::empty())
    }

    pub fn in_memory(body: Body) -> Self {
        Self {
            source: Source::Memory(body),
        }
    }

    /// Body bounded to `length` bytes, read from `buffer` first and then from `io`.
    pub fn from_connection(
        io: &'a mut StreamAdapter<S>,
        buffer: &'a mut GrowableBuffer,
        length: u64,
    ) -> Self {
        Self {
            source: Source::Connection {
                io,
                buffer,
                declared: length,
                remaining: length,
            },
        }
    }

    /// Picks the body framing for `request`.
    ///
    /// Chunked transfer coding is not implemented: such bodies are left
    /// unread and the handler sees an empty body.
    pub fn for_request(
        request: &Request,
        io: &'a mut StreamAdapter<S>,
        buffer: &'a mut GrowableBuffer,
    ) -> Result<Self, HttpError> {
        if !request.method.has_payload() {
            return Ok(Self::empty());
        }

        if let Some(length) = request.content_length()? {
            return Ok(Self::from_connection(io, buffer, length));
        }

        if request.is_chunked() {
            tracing::warn!(
                method = %request.method,
                target = %request.target,
                "chunked request bodies are not supported, treating body as empty"
            );
        }

        Ok(Self::empty())
    }

    pub fn length(&self) -> BodyLength {
        match &self.source {
            Source::Memory(body) => body.length(),
            Source::Connection { declared, .. } => BodyLength::Known(*declared),
        }
    }

    /// Declared bytes still waiting on the connection.
    pub fn remaining(&self) -> u64 {
        match &self.source {
            Source::Memory(_) => 0,
            Source::Connection { remaining, .. } => *remaining,
        }
    }

    /// Next chunk of the body, or an empty chunk once it is complete.
    ///
    /// Fails with a 400 if the peer ends the stream before the declared
    /// length has arrived.
    pub async fn produce(&mut self) -> anyhow::Result<Bytes> {
        match &mut self.source {
            Source::Memory(body) => Ok(body.produce()),
            Source::Connection {
                io,
                buffer,
                remaining,
                ..
            } => pull_chunk(&mut **io, &mut **buffer, remaining).await,
        }
    }

    /// Collects the rest of the body.
    pub async fn read_to_end(&mut self) -> anyhow::Result<Bytes> {
        let reserve = match self.length() {
            BodyLength::Known(n) => n.min(MAX_PREALLOCATE) as usize,
            BodyLength::Unknown => 0,
        };
        let mut out = BytesMut::with_capacity(reserve);
        loop {
            let chunk = self.produce().await?;
            if chunk.is_empty() {
                return Ok(out.freeze());
            }
            out.extend_from_slice(&chunk);
        }
    }
}

/// Reads and drops `remaining` body bytes so the next request can be framed.
pub async fn discard<S: Transport>(
    io: &mut StreamAdapter<S>,
    buffer: &mut GrowableBuffer,
    mut remaining: u64,
) -> anyhow::Result<()> {
    while remaining > 0 {
        pull_chunk(io, buffer, &mut remaining).await?;
    }
    Ok(())
}

async fn pull_chunk<S: Transport>(
    io: &mut StreamAdapter<S>,
    buffer: &mut GrowableBuffer,
    remaining: &mut u64,
) -> anyhow::Result<Bytes> {
    if *remaining == 0 {
        return Ok(Bytes::new());
    }

    if buffer.is_empty() {
        let chunk = io.read().await?;
        if chunk.is_empty() {
            return Err(HttpError::bad_request(format!(
                "connection closed with {remaining} body bytes outstanding"
            ))
            .into());
        }
        buffer.append(&chunk);
    }

    // Bytes past the declared length belong to the next request and stay buffered.
    let take = (*remaining).min(buffer.len() as u64) as usize;
    let chunk = Bytes::copy_from_slice(&buffer.as_slice()[..take]);
    buffer.consume(take);
    *remaining -= take as u64;

    Ok(chunk)
}
