use crate::http::buffer::GrowableBuffer;
use crate::http::error::HttpError;
use crate::http::parser::parse_http_request;
use crate::http::request::Request;

/// Default cap on the size of a request header block.
pub const MAX_HEADER_SIZE: usize = 8 * 1024;

const HEADER_TERMINATOR: &[u8; 4] = b"\r\n\r\n";

/// Extracts request heads from a connection's buffer.
///
/// Remembers how far the buffer was already searched, so each new read is
/// scanned once instead of the whole pending head being rescanned.
#[derive(Debug)]
pub struct HeaderFramer {
    max_header_size: usize,
    scanned: usize,
}

impl HeaderFramer {
    pub fn new(max_header_size: usize) -> Self {
        Self {
            max_header_size,
            scanned: 0,
        }
    }

    /// Takes one complete request head off the front of `buffer`.
    ///
    /// Returns `Ok(None)` while the terminator has not arrived yet. Once
    /// `max_header_size` bytes are buffered without a terminator the request
    /// is rejected with a 431. On success the header block is consumed and
    /// anything after it (body, pipelined requests) stays in the buffer.
    pub fn try_extract(&mut self, buffer: &mut GrowableBuffer) -> Result<Option<Request>, HttpError> {
        let bytes = buffer.as_slice();
        // Back up so a terminator split across reads is still found.
        let start = self
            .scanned
            .min(bytes.len())
            .saturating_sub(HEADER_TERMINATOR.len() - 1);

        let Some(end) = find_headers_end(&bytes[start..]).map(|pos| start + pos) else {
            self.scanned = bytes.len();
            if bytes.len() >= self.max_header_size {
                return Err(HttpError::header_too_large(self.max_header_size));
            }
            return Ok(None);
        };

        let block_len = end + HEADER_TERMINATOR.len();
        // Whatever follows the head has not been searched as a head yet.
        self.scanned = 0;
        let request = parse_http_request(&bytes[..block_len])?;
        buffer.consume(block_len);

        Ok(Some(request))
    }
}

/// One-shot form of [`HeaderFramer::try_extract`] with no scan state.
pub fn try_extract_headers(
    buffer: &mut GrowableBuffer,
    max_header_size: usize,
) -> Result<Option<Request>, HttpError> {
    HeaderFramer::new(max_header_size).try_extract(buffer)
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}
