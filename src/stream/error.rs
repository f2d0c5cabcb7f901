use std::io;
use thiserror::Error;

/// Failure reported by the underlying byte stream.
///
/// Cloneable so a latched failure can be handed back to every later caller.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The transport raised an I/O error.
    #[error("transport error ({kind:?}): {message}")]
    Io { kind: io::ErrorKind, message: String },

    /// The connection was already closed locally.
    #[error("connection is closed")]
    Closed,
}

impl TransportError {
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            TransportError::Io { kind, .. } => *kind,
            TransportError::Closed => io::ErrorKind::NotConnected,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        TransportError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
