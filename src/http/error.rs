use thiserror::Error;

use crate::http::response::StatusCode;

/// Protocol-level failure that can still be reported to the peer.
///
/// Anything reaching the connection boundary as an `HttpError` is answered
/// with one best-effort error response. Other errors close the connection
/// without writing anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} {}: {message}", .status.as_u16(), .status.reason_phrase())]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BadRequest, message)
    }

    pub fn header_too_large(limit: usize) -> Self {
        Self::new(
            StatusCode::RequestHeaderFieldsTooLarge,
            format!("request header block exceeds {limit} bytes"),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::InternalServerError, message)
    }
}
