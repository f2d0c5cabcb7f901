use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::stream::error::TransportError;

/// Default upper bound for a single read from the transport.
pub const DEFAULT_READ_CHUNK: usize = 16 * 1024;

/// Any duplex byte stream the server can run on.
///
/// Implemented for every `AsyncRead + AsyncWrite + Unpin + Send` type, so
/// `TcpStream` and `tokio::io::DuplexStream` both qualify.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> Transport for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// Lifecycle of the read side of a connection.
///
/// Everything other than `Open` is terminal and latched.
#[derive(Debug, Clone)]
pub enum StreamState {
    /// Bytes may still arrive
    Open,
    /// Peer finished sending
    Ended,
    /// Transport failed; the failure is replayed to every caller
    Failed(TransportError),
    /// Closed locally
    Closed,
}

/// Sequential read/write view over a duplex byte stream.
///
/// `read` only asks the transport for bytes while it is being awaited, and the
/// adapter never holds on to bytes the caller has not asked for. A caller that
/// stops reading therefore stops the flow of data. `read` takes `&mut self`,
/// so two reads can never be outstanding at once.
pub struct StreamAdapter<S> {
    stream: S,
    state: StreamState,
    read_chunk: usize,
}

impl<S: Transport> StreamAdapter<S> {
    pub fn new(stream: S) -> Self {
        Self::with_read_chunk(stream, DEFAULT_READ_CHUNK)
    }

    pub fn with_read_chunk(stream: S, read_chunk: usize) -> Self {
        Self {
            stream,
            state: StreamState::Open,
            read_chunk: read_chunk.max(1),
        }
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// True once the read side reached a terminal state.
    pub fn is_finished(&self) -> bool {
        !matches!(self.state, StreamState::Open)
    }

    /// Waits for the next chunk from the peer.
    ///
    /// Returns a non-empty chunk, or an empty one once the stream has ended.
    /// After end or failure every call resolves the same way without touching
    /// the transport again.
    pub async fn read(&mut self) -> Result<Bytes, TransportError> {
        match &self.state {
            StreamState::Open => {}
            StreamState::Ended | StreamState::Closed => return Ok(Bytes::new()),
            StreamState::Failed(err) => return Err(err.clone()),
        }

        let mut chunk = BytesMut::zeroed(self.read_chunk);
        loop {
            match self.stream.read(&mut chunk[..]).await {
                Ok(0) => {
                    tracing::trace!("peer ended stream");
                    self.state = StreamState::Ended;
                    return Ok(Bytes::new());
                }
                Ok(n) => {
                    chunk.truncate(n);
                    return Ok(chunk.freeze());
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.fail(e)),
            }
        }
    }

    /// Writes all of `bytes` and waits until the transport accepted them.
    pub async fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        match &self.state {
            StreamState::Failed(err) => return Err(err.clone()),
            StreamState::Closed => return Err(TransportError::Closed),
            StreamState::Open | StreamState::Ended => {}
        }

        if bytes.is_empty() {
            return Ok(());
        }

        if let Err(e) = self.stream.write_all(bytes).await {
            return Err(self.fail(e));
        }
        if let Err(e) = self.stream.flush().await {
            return Err(self.fail(e));
        }

        Ok(())
    }

    /// Shuts the connection down. Errors from the transport are ignored.
    pub async fn close(&mut self) {
        if let Err(e) = self.stream.shutdown().await {
            tracing::trace!(error = %e, "shutdown failed");
        }
        if matches!(self.state, StreamState::Open) {
            self.state = StreamState::Closed;
        }
    }

    fn fail(&mut self, err: std::io::Error) -> TransportError {
        let err = TransportError::from(err);
        if matches!(self.state, StreamState::Open) {
            self.state = StreamState::Failed(err.clone());
        }
        err
    }
}
