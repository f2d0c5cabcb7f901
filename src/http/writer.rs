use bytes::{BufMut, BytesMut};

use crate::http::body::BodyLength;
use crate::http::error::HttpError;
use crate::http::request::Version;
use crate::http::response::Response;
use crate::stream::{StreamAdapter, Transport};

/// Framing headers the writer owns; handler-supplied copies are dropped.
const FRAMING_HEADERS: [&str; 2] = ["Content-Length", "Transfer-Encoding"];

/// Serializes the status line, headers, synthesized `Content-Length` and the
/// blank line that ends the head.
///
/// Fails with a 500 if the body length is undeclared, since chunked
/// responses are not supported.
pub fn encode_head(response: &Response, version: Version) -> Result<BytesMut, HttpError> {
    let length = declared_length(response)?;

    let mut buf = BytesMut::with_capacity(128);

    // Status line
    buf.put_slice(
        format!(
            "{} {} {}\r\n",
            version,
            response.status.as_u16(),
            response.status.reason_phrase()
        )
        .as_bytes(),
    );

    // Headers
    for (k, v) in &response.headers {
        if FRAMING_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(k)) {
            continue;
        }
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }
    buf.put_slice(format!("Content-Length: {length}\r\n").as_bytes());

    // Header/body separator
    buf.put_slice(b"\r\n");

    Ok(buf)
}

/// Writes `response` to the connection: the head in one write, then each
/// body chunk as it is produced.
pub async fn write_response<S: Transport>(
    io: &mut StreamAdapter<S>,
    version: Version,
    mut response: Response,
) -> anyhow::Result<()> {
    let declared = write_response_head(io, version, &response).await?;

    let mut written = 0u64;
    loop {
        let chunk = response.body.produce();
        if chunk.is_empty() {
            break;
        }
        written += chunk.len() as u64;
        if written > declared {
            anyhow::bail!("response body exceeds declared length of {declared} bytes");
        }
        io.write(&chunk).await?;
    }

    if written != declared {
        anyhow::bail!("response body ended after {written} of {declared} declared bytes");
    }

    Ok(())
}

/// Writes only the head of `response`, as for a HEAD request.
///
/// `Content-Length` still reports the body's declared length. Returns that length.
pub async fn write_response_head<S: Transport>(
    io: &mut StreamAdapter<S>,
    version: Version,
    response: &Response,
) -> anyhow::Result<u64> {
    let declared = declared_length(response)?;
    let head = encode_head(response, version)?;
    io.write(&head).await?;
    Ok(declared)
}

fn declared_length(response: &Response) -> Result<u64, HttpError> {
    match response.body.length() {
        BodyLength::Known(length) => Ok(length),
        BodyLength::Unknown => Err(HttpError::internal(
            "response body has no declared length and chunked encoding is not supported",
        )),
    }
}
