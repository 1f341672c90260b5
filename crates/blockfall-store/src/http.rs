//! HTTP client for the weight persistence endpoint.
//!
//! The endpoint speaks plain HTTP/1.1 with JSON bodies:
//!
//! - `GET /api/weights` returns `{"weights": {...}, "generation": n}`
//! - `POST /api/weights` accepts the same shape and answers
//!   `{"success": true}`
//!
//! Requests are written directly onto a `std::net::TcpStream` with
//! `Connection: close`, so a response is everything the peer sends before
//! closing. Every network round trip has an explicit connect and I/O
//! timeout, and saves retry a bounded number of times with linear backoff.

use std::{
    io::{self, Read as _, Write as _},
    net::{SocketAddr, TcpStream, ToSocketAddrs as _},
    thread,
    time::Duration,
};

use serde::Deserialize;

use blockfall_evaluator::WeightVector;

use crate::{StoreError, StoredWeights, WeightStore};

const WEIGHTS_PATH: &str = "/api/weights";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_SAVE_RETRIES: u32 = 2;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Debug, Deserialize)]
struct SaveResponse {
    success: bool,
}

/// Weight store backed by the HTTP persistence endpoint.
#[derive(Debug, Clone)]
pub struct HttpWeightStore {
    authority: String,
    connect_timeout: Duration,
    io_timeout: Duration,
    save_retries: u32,
    retry_backoff: Duration,
}

impl HttpWeightStore {
    /// Creates a store talking to `authority` (`host:port`).
    #[must_use]
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            io_timeout: DEFAULT_IO_TIMEOUT,
            save_retries: DEFAULT_SAVE_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Configures the bounded retry applied to saves: up to `retries`
    /// additional attempts with `backoff * attempt` sleeps in between.
    #[must_use]
    pub fn with_save_retry(mut self, retries: u32, backoff: Duration) -> Self {
        self.save_retries = retries;
        self.retry_backoff = backoff;
        self
    }

    fn resolve(&self) -> Result<SocketAddr, StoreError> {
        let mut addrs = self
            .authority
            .to_socket_addrs()
            .map_err(StoreError::Connect)?;
        addrs.next().ok_or_else(|| {
            StoreError::Connect(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "endpoint address did not resolve",
            ))
        })
    }

    fn round_trip(&self, request: &str) -> Result<Response, StoreError> {
        let addr = self.resolve()?;
        let mut stream =
            TcpStream::connect_timeout(&addr, self.connect_timeout).map_err(StoreError::Connect)?;
        stream
            .set_read_timeout(Some(self.io_timeout))
            .map_err(StoreError::Io)?;
        stream
            .set_write_timeout(Some(self.io_timeout))
            .map_err(StoreError::Io)?;

        stream
            .write_all(request.as_bytes())
            .map_err(StoreError::Io)?;
        let mut raw = String::new();
        stream.read_to_string(&mut raw).map_err(StoreError::Io)?;
        parse_response(&raw)
    }

    fn try_save(&self, body: &str) -> Result<(), StoreError> {
        let request = format!(
            "POST {WEIGHTS_PATH} HTTP/1.1\r\n\
             Host: {}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {body}",
            self.authority,
            body.len(),
        );
        let response = self.round_trip(&request)?;
        if response.status != 200 {
            return Err(StoreError::Http {
                status: response.status,
            });
        }
        let parsed: SaveResponse =
            serde_json::from_str(&response.body).map_err(StoreError::Malformed)?;
        if parsed.success { Ok(()) } else { Err(StoreError::Rejected) }
    }
}

impl WeightStore for HttpWeightStore {
    fn load(&self) -> Result<StoredWeights, StoreError> {
        let request = format!(
            "GET {WEIGHTS_PATH} HTTP/1.1\r\n\
             Host: {}\r\n\
             Accept: application/json\r\n\
             Connection: close\r\n\
             \r\n",
            self.authority,
        );
        let response = self.round_trip(&request)?;
        if response.status != 200 {
            return Err(StoreError::Http {
                status: response.status,
            });
        }
        serde_json::from_str(&response.body).map_err(StoreError::Malformed)
    }

    fn save(&self, weights: &WeightVector, generation: u64) -> Result<(), StoreError> {
        let body = serde_json::to_string(&StoredWeights {
            weights: *weights,
            generation,
        })
        .map_err(StoreError::Malformed)?;

        let mut attempt = 0;
        loop {
            match self.try_save(&body) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < self.save_retries && is_retryable(&err) => {
                    attempt += 1;
                    tracing::warn!(error = %err, attempt, "weight save failed, retrying");
                    thread::sleep(self.retry_backoff * attempt);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Transient transport failures are retried; semantic failures (an HTTP
/// error status, a rejected or malformed payload) are not.
fn is_retryable(err: &StoreError) -> bool {
    matches!(
        err,
        StoreError::Connect(_) | StoreError::Io(_) | StoreError::Protocol(_)
    )
}

#[derive(Debug)]
struct Response {
    status: u16,
    body: String,
}

fn parse_response(raw: &str) -> Result<Response, StoreError> {
    let (head, body) = raw
        .split_once("\r\n\r\n")
        .ok_or_else(|| StoreError::Protocol("response has no header/body separator".to_owned()))?;
    let status_line = head
        .lines()
        .next()
        .ok_or_else(|| StoreError::Protocol("empty response head".to_owned()))?;
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| StoreError::Protocol(format!("bad status line: {status_line}")))?;
    Ok(Response {
        status,
        body: body.to_owned(),
    })
}
