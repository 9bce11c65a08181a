use crate::error::{FetchError, Result};
use crate::transport::TransportSession;

/// Response buffer capacity. Bodies whose declared length exceeds this are
/// rejected before any read; there is no streamed handling of larger ones.
pub const RESP_BUF_CAP: usize = 10 * 1024;

/// Drain the session body into a freshly allocated buffer of at most `cap`
/// bytes.
///
/// When the response declares a content length, a declared length above
/// `cap` fails with `CapacityExceeded` up front, and each read is handed a
/// slice no longer than the remaining declared bytes, so the loop can never
/// accumulate past the declaration. The loop ends when the declared length
/// is reached or the stream reports end-of-stream early; a short body is
/// returned as-is with its actual length.
///
/// When no length was declared, the body is read to end-of-stream, and a
/// stream still producing bytes once the buffer is full fails with
/// `CapacityExceeded` rather than truncating.
pub fn read_body(session: &mut dyn TransportSession, cap: usize) -> Result<Vec<u8>> {
    let declared = session.content_length();
    if let Some(len) = declared {
        if len > cap as u64 {
            return Err(FetchError::CapacityExceeded { declared: len, cap });
        }
    }

    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(cap)
        .map_err(|_| FetchError::AllocationFailed)?;
    buf.resize(cap, 0);

    let limit = match declared {
        Some(len) => len as usize,
        None => cap,
    };

    let mut total = 0;
    while total < limit {
        let n = session.read(&mut buf[total..limit])?;
        if n == 0 {
            break;
        }
        total += n;
    }

    // Unknown declared length and a full buffer: probe whether the stream
    // actually ended at the capacity boundary.
    if declared.is_none() && total == cap {
        let mut probe = [0u8; 1];
        if session.read(&mut probe)? != 0 {
            return Err(FetchError::CapacityExceeded {
                // Lower bound; the true length was never declared.
                declared: cap as u64 + 1,
                cap,
            });
        }
    }

    buf.truncate(total);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::{FakeTransport, Script};
    use crate::transport::Transport;

    fn open(transport: &FakeTransport) -> Box<dyn crate::transport::TransportSession> {
        transport.open("http://example.test").unwrap()
    }

    #[test]
    fn reads_whole_declared_body() {
        let transport = FakeTransport::single(Script::ok("hello body"));
        let mut session = open(&transport);
        let body = read_body(session.as_mut(), RESP_BUF_CAP).unwrap();
        assert_eq!(body, b"hello body");
    }

    #[test]
    fn accumulates_across_short_reads() {
        let mut script = Script::ok("abcdefghij");
        script.chunk = 3;
        let transport = FakeTransport::single(script);
        let mut session = open(&transport);
        let body = read_body(session.as_mut(), RESP_BUF_CAP).unwrap();
        assert_eq!(body, b"abcdefghij");
        // 3+3+3+1 bytes
        assert_eq!(*transport.counters.reads.borrow(), 4);
    }

    #[test]
    fn oversized_declared_length_fails_before_any_read() {
        let mut script = Script::ok("x");
        script.content_length = Some(RESP_BUF_CAP as u64 + 1);
        let transport = FakeTransport::single(script);
        let mut session = open(&transport);
        let err = read_body(session.as_mut(), RESP_BUF_CAP).unwrap_err();
        assert!(matches!(err, FetchError::CapacityExceeded { .. }));
        assert_eq!(*transport.counters.reads.borrow(), 0);
    }

    #[test]
    fn each_call_returns_its_own_fresh_buffer() {
        // One buffer per call, owned by the caller afterwards; releasing
        // it is dropping it, so allocations and releases balance by scope.
        let transport = FakeTransport::new(vec![Script::ok("first"), Script::ok("second")]);
        let mut session = open(&transport);
        let a = read_body(session.as_mut(), RESP_BUF_CAP).unwrap();
        let mut session = open(&transport);
        let b = read_body(session.as_mut(), RESP_BUF_CAP).unwrap();
        assert_eq!(a.capacity(), RESP_BUF_CAP);
        assert_eq!(b.capacity(), RESP_BUF_CAP);
        assert_ne!(a.as_ptr(), b.as_ptr());
        assert_eq!(a, b"first");
        assert_eq!(b, b"second");
    }

    #[test]
    fn zero_length_body_is_legal() {
        let transport = FakeTransport::single(Script::ok(""));
        let mut session = open(&transport);
        let body = read_body(session.as_mut(), RESP_BUF_CAP).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn early_end_of_stream_returns_short_body() {
        let mut script = Script::ok("abc");
        // Server promised more than it sends.
        script.content_length = Some(100);
        let transport = FakeTransport::single(script);
        let mut session = open(&transport);
        let body = read_body(session.as_mut(), RESP_BUF_CAP).unwrap();
        assert_eq!(body, b"abc");
    }

    #[test]
    fn transport_failure_maps_to_read_error() {
        let mut script = Script::ok("abc");
        script.read_error = Some(std::io::ErrorKind::ConnectionReset);
        let transport = FakeTransport::single(script);
        let mut session = open(&transport);
        let err = read_body(session.as_mut(), RESP_BUF_CAP).unwrap_err();
        assert!(matches!(err, FetchError::ReadError(_)));
    }

    #[test]
    fn undeclared_length_reads_to_end_of_stream() {
        let mut script = Script::ok("chunked body");
        script.content_length = None;
        let transport = FakeTransport::single(script);
        let mut session = open(&transport);
        let body = read_body(session.as_mut(), RESP_BUF_CAP).unwrap();
        assert_eq!(body, b"chunked body");
    }

    #[test]
    fn undeclared_length_overflowing_capacity_fails() {
        let mut script = Script::ok(&"x".repeat(32));
        script.content_length = None;
        let transport = FakeTransport::single(script);
        let mut session = open(&transport);
        let err = read_body(session.as_mut(), 16).unwrap_err();
        assert!(matches!(err, FetchError::CapacityExceeded { .. }));
    }

    #[test]
    fn undeclared_length_exactly_at_capacity_succeeds() {
        let mut script = Script::ok(&"y".repeat(16));
        script.content_length = None;
        let transport = FakeTransport::single(script);
        let mut session = open(&transport);
        let body = read_body(session.as_mut(), 16).unwrap();
        assert_eq!(body.len(), 16);
    }
}
