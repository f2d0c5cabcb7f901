use std::fmt;

use bytes::Bytes;

use crate::http::error::HttpError;

/// HTTP request methods.
///
/// The method token is never rejected: anything that is not one of the
/// well-known methods is carried as `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// TRACE - Loop-back test
    TRACE,
    /// CONNECT - Establish a tunnel
    CONNECT,
    /// Any other token
    Other(String),
}

impl Method {
    /// Parses a method token. Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttp::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
    /// ```
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            "TRACE" => Method::TRACE,
            "CONNECT" => Method::CONNECT,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::TRACE => "TRACE",
            Method::CONNECT => "CONNECT",
            Method::Other(token) => token,
        }
    }

    /// Whether a request with this method may carry a body at all.
    pub fn has_payload(&self) -> bool {
        !matches!(
            self,
            Method::GET
                | Method::HEAD
                | Method::DELETE
                | Method::OPTIONS
                | Method::TRACE
                | Method::CONNECT
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol version from the request line, e.g. `HTTP/1.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub const HTTP_10: Version = Version { major: 1, minor: 0 };
    pub const HTTP_11: Version = Version { major: 1, minor: 1 };

    /// Parses `HTTP/<digit>.<digit>`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.strip_prefix("HTTP/")?.as_bytes() {
            [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
                Some(Version {
                    major: major - b'0',
                    minor: minor - b'0',
                })
            }
            _ => None,
        }
    }

    /// Connections stay open between requests from HTTP/1.1 on.
    pub fn is_persistent(&self) -> bool {
        *self >= Version::HTTP_11
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

/// Represents a parsed HTTP request head.
///
/// Header lines are kept as raw bytes in arrival order, duplicates included.
/// The body is not part of the request; it is read through a
/// [`RequestBody`](crate::http::body::RequestBody).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request target exactly as sent (e.g., "/search?q=rust")
    pub target: String,
    /// Protocol version
    pub version: Version,
    /// Raw `Name: value` lines, without line terminators
    pub header_lines: Vec<Bytes>,
}

impl Request {
    pub fn new(method: Method, target: impl Into<String>, version: Version) -> Self {
        Self {
            method,
            target: target.into(),
            version,
            header_lines: Vec::new(),
        }
    }

    /// Adds a header line, mostly useful for building requests in tests.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.header_lines
            .push(Bytes::from(format!("{name}: {value}")));
        self
    }

    /// Iterates over `(name, value)` pairs in arrival order.
    ///
    /// Names are returned as sent; values have surrounding whitespace removed.
    pub fn headers(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.header_lines.iter().filter_map(|line| split_header(line))
    }

    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers()
            .find(|(key, _)| key.eq_ignore_ascii_case(name.as_bytes()))
            .map(|(_, value)| value)
    }

    /// Like [`header`](Self::header) but only for UTF-8 values.
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.header(name).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Declared body length.
    ///
    /// Returns `Ok(None)` if no `Content-Length` header is present and a
    /// 400 error if it is not a non-negative integer.
    pub fn content_length(&self) -> Result<Option<u64>, HttpError> {
        let Some(raw) = self.header("Content-Length") else {
            return Ok(None);
        };

        std::str::from_utf8(raw)
            .ok()
            .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|v| v.parse::<u64>().ok())
            .map(Some)
            .ok_or_else(|| {
                HttpError::bad_request(format!(
                    "invalid Content-Length: {}",
                    String::from_utf8_lossy(raw)
                ))
            })
    }

    /// True if the last transfer coding is `chunked`.
    pub fn is_chunked(&self) -> bool {
        self.header_str("Transfer-Encoding")
            .and_then(|v| v.rsplit(',').next())
            .map(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
            .unwrap_or(false)
    }

    /// Determines whether the connection should remain open after the response.
    ///
    /// HTTP/1.0 and older always close. HTTP/1.1 keeps the connection unless the
    /// client sent `Connection: close`.
    pub fn keep_alive(&self) -> bool {
        if !self.version.is_persistent() {
            return false;
        }
        !self
            .header_str("Connection")
            .map(|v| v.split(',').any(|t| t.trim().eq_ignore_ascii_case("close")))
            .unwrap_or(false)
    }
}

/// Splits `Name: value` at the first colon, trimming the value.
pub(crate) fn split_header(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let colon = line.iter().position(|&b| b == b':')?;
    Some((line[..colon].trim_ascii(), line[colon + 1..].trim_ascii()))
}
