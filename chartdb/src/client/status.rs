//! Response-status classification and the client error taxonomy.
//!
//! Every public client operation terminates in exactly one outcome:
//! `Ok` with data, or one `ChartError` variant. Classification of raw
//! HTTP status codes is a single pure function so it can be tested
//! without any network I/O.

use thiserror::Error;

use crate::api::WireError;
use crate::client::http::TransportError;

/// Successful outcome classes of a chart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Success {
    /// Any 2xx other than 201.
    Ok,
    /// 201, returned by the create path.
    Created,
}

/// Terminal failure outcomes of chart operations.
#[derive(Debug, Clone, Error)]
pub enum ChartError {
    /// The requested chart id does not exist remotely.
    #[error("chart not found")]
    NotFound,

    /// The remote service rejected the request as conflicting.
    #[error("conflicting chart state")]
    Conflict,

    /// The remote service failed (5xx).
    #[error("server error")]
    ServerError,

    /// Transport-level failure: DNS, timeout, refused connection.
    #[error("network error: {0}")]
    Network(String),

    /// Secure transport is unavailable on this platform; no request
    /// was attempted.
    #[error("secure transport unavailable")]
    SslUnavailable,

    /// The response body did not match the wire schema; usually a
    /// client/server version mismatch.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Another operation is already in flight on this client instance.
    #[error("another request is in flight")]
    Busy,

    /// `post_chart` was called with a server-assigned id already set.
    #[error("chart id already assigned; use put_chart to update")]
    IdAlreadyAssigned,

    /// A mutating operation was called without a server-assigned id.
    #[error("chart id required")]
    IdRequired,

    /// A status code outside the documented API contract.
    #[error("unexpected status code {0}")]
    UnexpectedStatus(u16),
}

impl From<WireError> for ChartError {
    fn from(e: WireError) -> Self {
        match e {
            WireError::MalformedPayload(msg) => ChartError::MalformedPayload(msg),
        }
    }
}

impl From<TransportError> for ChartError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::TlsUnavailable => ChartError::SslUnavailable,
            TransportError::Request(msg) => ChartError::Network(msg),
        }
    }
}

/// Classify a raw HTTP status code into the client outcome space.
///
/// 201 maps to `Created`, any other 2xx to `Ok`; 404 to `NotFound`,
/// 409 to `Conflict`, 5xx to `ServerError`. Everything else is outside
/// the API contract and surfaces as `UnexpectedStatus`.
pub fn classify(status: u16) -> Result<Success, ChartError> {
    match status {
        201 => Ok(Success::Created),
        200..=299 => Ok(Success::Ok),
        404 => Err(ChartError::NotFound),
        409 => Err(ChartError::Conflict),
        500..=599 => Err(ChartError::ServerError),
        other => Err(ChartError::UnexpectedStatus(other)),
    }
}
