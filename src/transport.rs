use std::io::Read;

use crate::error::{FetchError, Result};

/// Opens HTTP sessions. The catalog operations only ever talk to the
/// network through this seam, so tests can substitute a scripted double.
pub trait Transport {
    fn open(&self, url: &str) -> Result<Box<dyn TransportSession>>;
}

/// One open HTTP response. Closing is dropping: a session holds whatever
/// connection resources it needs and releases them in `Drop`, which makes
/// the close-exactly-once guarantee fall out of scoping.
pub trait TransportSession {
    /// HTTP status code of the response.
    fn status(&self) -> u16;

    /// Declared body length from the response headers, if the server sent
    /// one. Chunked responses have no declared length.
    fn content_length(&self) -> Option<u64>;

    /// Read up to `buf.len()` body bytes. Returns 0 at end of stream.
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;
}

/// Production transport over a blocking reqwest client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

/// Sentinel used in place of a URL for failures that happen before any
/// request exists (client construction).
const NO_URL: &str = "(client setup)";

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::ConnectionFailed {
                url: NO_URL.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn open(&self, url: &str) -> Result<Box<dyn TransportSession>> {
        let response =
            self.client
                .get(url)
                .send()
                .map_err(|e| FetchError::ConnectionFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
        Ok(Box::new(HttpSession { response }))
    }
}

struct HttpSession {
    response: reqwest::blocking::Response,
}

impl TransportSession for HttpSession {
    fn status(&self) -> u16 {
        self.response.status().as_u16()
    }

    fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.response.read(buf)
    }
}
