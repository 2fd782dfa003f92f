//! The chart database client.
//!
//! Single point of contact with the remote service: request
//! construction, status classification, JSON marshalling, and header
//! cache maintenance all live behind [`ChartClient`].

mod chart;
pub mod http;
mod status;

pub use chart::ChartClient;
pub use http::{
    HttpTransport, Method, ReqwestTransport, TransportError, TransportRequest, TransportResponse,
};
pub use status::{classify, ChartError, Success};
