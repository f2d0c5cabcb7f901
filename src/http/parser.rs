use bytes::Bytes;

use crate::http::error::HttpError;
use crate::http::request::{Method, Request, Version, split_header};

/// Parses a complete header block into a [`Request`].
///
/// `block` runs from the first byte of the request line through the blank
/// line that ends the headers.
pub fn parse_http_request(block: &[u8]) -> Result<Request, HttpError> {
    let block = Bytes::copy_from_slice(block);
    let mut lines = Lines::new(&block);

    let request_line = lines
        .next()
        .ok_or_else(|| HttpError::bad_request("empty request"))?;
    let (method, target, version) = parse_request_line(&block.slice(request_line))?;

    let mut request = Request::new(method, target, version);

    for range in lines {
        let line = block.slice(range);

        // Blank lines, including the terminating one, carry nothing.
        if line.is_empty() {
            continue;
        }

        if split_header(&line).is_none() {
            return Err(HttpError::bad_request(format!(
                "malformed header line: {}",
                String::from_utf8_lossy(&line)
            )));
        }

        request.header_lines.push(line);
    }

    Ok(request)
}

fn parse_request_line(line: &[u8]) -> Result<(Method, String, Version), HttpError> {
    let line = std::str::from_utf8(line)
        .map_err(|_| HttpError::bad_request("request line is not valid UTF-8"))?;

    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts.as_slice() else {
        return Err(HttpError::bad_request(format!("malformed request line: {line}")));
    };

    if method.is_empty() || target.is_empty() {
        return Err(HttpError::bad_request(format!("malformed request line: {line}")));
    }

    let version = Version::parse(version)
        .ok_or_else(|| HttpError::bad_request(format!("unsupported protocol: {version}")))?;

    Ok((Method::parse(method), target.to_string(), version))
}

/// Byte ranges of CRLF-separated lines.
///
/// A trailing segment after the final CRLF is yielded only if non-empty.
struct Lines<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }
}

impl Iterator for Lines<'_> {
    type Item = std::ops::Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.buf.len() {
            return None;
        }

        let start = self.pos;
        match self.buf[start..].windows(2).position(|w| w == b"\r\n") {
            Some(offset) => {
                self.pos = start + offset + 2;
                Some(start..start + offset)
            }
            None => {
                self.pos = self.buf.len();
                Some(start..self.buf.len())
            }
        }
    }
}
