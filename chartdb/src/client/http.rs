//! HTTP transport abstraction for testability.
//!
//! The client never talks to reqwest directly; it goes through the
//! [`HttpTransport`] trait so tests can inject a mock and the
//! production code path stays a thin shim over the platform stack.

use thiserror::Error;

/// HTTP verbs used by the chart API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// One outbound request as the client describes it.
///
/// `basic_auth` is the pre-computed `Basic ...` credential attached to
/// every request; `no_store` bypasses the transport-level response
/// cache for this request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub basic_auth: String,
    pub body: Option<Vec<u8>>,
    pub no_store: bool,
}

/// Raw response as seen by the client: status plus body bytes.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Errors raised below the HTTP status level.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// DNS failure, refused connection, timeout, and friends.
    #[error("request failed: {0}")]
    Request(String),

    /// No secure transport available on this platform.
    #[error("secure transport unavailable")]
    TlsUnavailable,
}

/// Trait for HTTP transport operations.
///
/// Implementations execute one request and produce either a response
/// (any status code) or a [`TransportError`]. Status interpretation is
/// the caller's job.
pub trait HttpTransport: Send + Sync {
    /// Execute a single request.
    fn execute(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;

    /// Whether a secure (TLS) connection can be established at all.
    fn tls_available(&self) -> bool {
        true
    }
}

/// Real transport implementation using reqwest.
pub struct ReqwestTransport {
    client: Option<reqwest::blocking::Client>,
}

impl ReqwestTransport {
    /// Create a transport with the given request timeout.
    ///
    /// If the secure client cannot be constructed the transport stays
    /// usable but reports `tls_available() == false` and fails every
    /// request with [`TransportError::TlsUnavailable`].
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build();

        match client {
            Ok(client) => Self {
                client: Some(client),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build secure HTTP client");
                Self { client: None }
            }
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let client = self.client.as_ref().ok_or(TransportError::TlsUnavailable)?;

        let mut builder = match request.method {
            Method::Get => client.get(&request.url),
            Method::Post => client.post(&request.url),
            Method::Put => client.put(&request.url),
            Method::Delete => client.delete(&request.url),
        };

        builder = builder
            .header(reqwest::header::AUTHORIZATION, request.basic_auth.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if request.no_store {
            builder = builder.header(reqwest::header::CACHE_CONTROL, "no-cache");
        }
        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| TransportError::Request(format!("Failed to read response: {}", e)))?;

        Ok(TransportResponse { status, body })
    }

    fn tls_available(&self) -> bool {
        self.client.is_some()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Mock transport replaying canned responses and recording every
    /// request it sees.
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
        requests: Mutex<Vec<TransportRequest>>,
        tls: bool,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
                tls: true,
            }
        }

        pub fn without_tls() -> Self {
            Self {
                tls: false,
                ..Self::new()
            }
        }

        pub fn push_status(&self, status: u16, body: &[u8]) {
            self.responses.lock().push_back(Ok(TransportResponse {
                status,
                body: body.to_vec(),
            }));
        }

        pub fn push_error(&self, error: TransportError) {
            self.responses.lock().push_back(Err(error));
        }

        pub fn requests(&self) -> Vec<TransportRequest> {
            self.requests.lock().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().len()
        }
    }

    impl HttpTransport for MockTransport {
        fn execute(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
            self.requests.lock().push(request.clone());
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Request("no canned response".to_string())))
        }

        fn tls_available(&self) -> bool {
            self.tls
        }
    }

    #[test]
    fn test_mock_replays_in_order() {
        let mock = MockTransport::new();
        mock.push_status(200, b"first");
        mock.push_status(404, b"");

        let request = TransportRequest {
            method: Method::Get,
            url: "https://example.org/chart/1".to_string(),
            basic_auth: "Basic dGVzdA==".to_string(),
            body: None,
            no_store: false,
        };

        let first = mock.execute(&request).unwrap();
        assert_eq!(first.status, 200);
        assert_eq!(first.body, b"first");

        let second = mock.execute(&request).unwrap();
        assert_eq!(second.status, 404);
        assert_eq!(mock.request_count(), 2);
    }

    #[test]
    fn test_mock_error_response() {
        let mock = MockTransport::new();
        mock.push_error(TransportError::Request("connection refused".to_string()));

        let request = TransportRequest {
            method: Method::Delete,
            url: "https://example.org/chart/1".to_string(),
            basic_auth: String::new(),
            body: None,
            no_store: false,
        };

        assert!(mock.execute(&request).is_err());
    }
}
