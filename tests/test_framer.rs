use rawhttp::http::buffer::GrowableBuffer;
use rawhttp::http::framer::{HeaderFramer, try_extract_headers};
use rawhttp::http::response::StatusCode;

const MAX: usize = 8192;

#[test]
fn test_extract_incomplete_returns_none() {
    let mut buf = GrowableBuffer::new();
    buf.append(b"GET / HTTP/1.1\r\nHost: example.com\r\n");

    assert_eq!(try_extract_headers(&mut buf, MAX).unwrap(), None);
    // Nothing is consumed while waiting
    assert_eq!(buf.len(), 35);
}

#[test]
fn test_extract_consumes_only_the_header_block() {
    let mut buf = GrowableBuffer::new();
    buf.append(b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello");

    let request = try_extract_headers(&mut buf, MAX).unwrap().unwrap();
    assert_eq!(request.target, "/echo");
    assert_eq!(buf.as_slice(), b"hello");
}

#[test]
fn test_extract_pipelined_requests_one_at_a_time() {
    let mut buf = GrowableBuffer::new();
    buf.append(b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n");

    let first = try_extract_headers(&mut buf, MAX).unwrap().unwrap();
    let second = try_extract_headers(&mut buf, MAX).unwrap().unwrap();
    assert_eq!(first.target, "/a");
    assert_eq!(second.target, "/b");
    assert!(buf.is_empty());
    assert_eq!(try_extract_headers(&mut buf, MAX).unwrap(), None);
}

#[test]
fn test_extract_independent_of_chunk_boundaries() {
    let input: &[u8] =
        b"PUT /items/7?x=1 HTTP/1.1\r\nHost: example.com\r\nX-A: 1\r\nX-A: 2\r\nContent-Length: 3\r\n\r\n";

    let mut whole = GrowableBuffer::new();
    whole.append(input);
    let expected = try_extract_headers(&mut whole, MAX).unwrap().unwrap();

    // Every two-way split
    for split in 0..=input.len() {
        let mut buf = GrowableBuffer::new();
        buf.append(&input[..split]);
        let early = try_extract_headers(&mut buf, MAX).unwrap();
        let request = match early {
            Some(request) => {
                assert_eq!(split, input.len());
                request
            }
            None => {
                buf.append(&input[split..]);
                try_extract_headers(&mut buf, MAX).unwrap().unwrap()
            }
        };
        assert_eq!(request, expected, "split at {split}");
    }

    // Byte at a time
    let mut buf = GrowableBuffer::new();
    let mut found = None;
    for (i, b) in input.iter().enumerate() {
        buf.append(std::slice::from_ref(b));
        if let Some(request) = try_extract_headers(&mut buf, MAX).unwrap() {
            assert_eq!(i, input.len() - 1);
            found = Some(request);
        }
    }
    assert_eq!(found, Some(expected));
}

#[test]
fn test_framer_finds_terminator_split_across_reads() {
    let input: &[u8] = b"GET /split HTTP/1.1\r\nHost: example.com\r\n\r\nrest";
    let head_len = input.len() - 4;

    for chunk in 1..=5 {
        let mut framer = HeaderFramer::new(MAX);
        let mut buf = GrowableBuffer::new();
        let mut found = None;
        let mut fed = 0;
        for piece in input.chunks(chunk) {
            buf.append(piece);
            fed += piece.len();
            if let Some(request) = framer.try_extract(&mut buf).unwrap() {
                assert!(found.is_none(), "chunk size {chunk}");
                assert!(fed >= head_len && fed < head_len + chunk, "chunk size {chunk}");
                found = Some(request);
            }
        }
        let request = found.unwrap_or_else(|| panic!("no head found with chunk size {chunk}"));
        assert_eq!(request.target, "/split");
        assert_eq!(buf.as_slice(), b"rest");
    }
}

#[test]
fn test_framer_rejects_oversized_head_fed_in_pieces() {
    let mut framer = HeaderFramer::new(64);
    let mut buf = GrowableBuffer::new();
    for _ in 0..7 {
        buf.append(b"aaaaaaaaa");
        assert_eq!(framer.try_extract(&mut buf).unwrap(), None);
    }
    buf.append(b"a");
    let err = framer.try_extract(&mut buf).unwrap_err();
    assert_eq!(err.status, StatusCode::RequestHeaderFieldsTooLarge);
}

#[test]
fn test_extract_rejects_oversized_header_block() {
    let mut buf = GrowableBuffer::new();
    buf.append(b"GET / HTTP/1.1\r\nX-Filler: ");
    buf.append(&vec![b'a'; MAX]);

    let err = try_extract_headers(&mut buf, MAX).unwrap_err();
    assert_eq!(err.status, StatusCode::RequestHeaderFieldsTooLarge);
}

#[test]
fn test_extract_below_limit_keeps_waiting() {
    let mut buf = GrowableBuffer::new();
    buf.append(&vec![b'a'; 63]);
    assert_eq!(try_extract_headers(&mut buf, 64).unwrap(), None);

    buf.append(b"a");
    assert!(try_extract_headers(&mut buf, 64).is_err());
}

#[test]
fn test_extract_malformed_request_line() {
    let mut buf = GrowableBuffer::new();
    buf.append(b"GET /\r\n\r\n");

    let err = try_extract_headers(&mut buf, MAX).unwrap_err();
    assert_eq!(err.status, StatusCode::BadRequest);
}
