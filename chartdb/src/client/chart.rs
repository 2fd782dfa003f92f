//! Chart client orchestration.
//!
//! Every public operation is one request/response exchange terminating
//! in exactly one outcome. At most one operation is in flight per
//! client instance; a second call while one is outstanding fails fast
//! with [`ChartError::Busy`] rather than racing the header cache.
//!
//! Cache policy: every successful mutating operation invalidates the
//! header cache through one uniform call site. Patch-in-place happens
//! only through the explicit [`ChartClient::update_chart_in_cache`]
//! primitive.

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::api::v1;
use crate::api::{ChartHeader, ChartRecord};
use crate::cache::HeaderCache;
use crate::client::http::{
    HttpTransport, Method, ReqwestTransport, TransportRequest, TransportResponse,
};
use crate::client::status::{classify, ChartError};
use crate::config::ClientConfig;

/// Client for the remote chart database service.
///
/// Generic over the HTTP transport so tests can inject a mock; the
/// production entry point is [`ChartClient::from_config`].
pub struct ChartClient<T: HttpTransport> {
    transport: T,
    config: ClientConfig,
    header_cache: HeaderCache,
    ssl_available: bool,
    /// Single-flight guard; held for the duration of each operation.
    flight: Mutex<()>,
}

impl ChartClient<ReqwestTransport> {
    /// Create a client backed by the real HTTP stack.
    pub fn from_config(config: ClientConfig) -> Self {
        let transport = ReqwestTransport::new(config.timeout_secs);
        Self::new(config, transport)
    }
}

impl<T: HttpTransport> ChartClient<T> {
    /// Create a client over an explicit transport.
    pub fn new(config: ClientConfig, transport: T) -> Self {
        let header_cache = HeaderCache::new(&config.cache_dir);
        let ssl_available = transport.tls_available();
        Self {
            transport,
            config,
            header_cache,
            ssl_available,
            flight: Mutex::new(()),
        }
    }

    /// Pre-flight capability check: `true` when secure transport is
    /// unavailable and every operation would fail with
    /// [`ChartError::SslUnavailable`].
    pub fn ssl_lib_missing(&self) -> bool {
        !self.ssl_available
    }

    /// Publish a new chart.
    ///
    /// The record must not carry a server-assigned id yet; the server
    /// assigns one on creation and does not echo it back, so callers
    /// learn it from a subsequent listing.
    pub fn post_chart(&self, record: &ChartRecord) -> Result<(), ChartError> {
        let _flight = self.begin_op()?;
        if record.header.id != 0 {
            return Err(ChartError::IdAlreadyAssigned);
        }

        let body = v1::encode_record(record)?;
        let response = self.request(Method::Post, self.config.chart_url.clone(), Some(body), false)?;
        classify(response.status)?;

        info!(name = %record.header.name, "Published chart");
        self.header_cache.invalidate();
        Ok(())
    }

    /// Update an existing chart identified by `record.header.id`.
    pub fn put_chart(&self, record: &ChartRecord) -> Result<(), ChartError> {
        let _flight = self.begin_op()?;
        if record.header.id == 0 {
            return Err(ChartError::IdRequired);
        }

        let body = v1::encode_record(record)?;
        let url = format!("{}/{}", self.config.chart_url, record.header.id);
        let response = self.request(Method::Put, url, Some(body), false)?;
        classify(response.status)?;

        info!(id = record.header.id, "Updated chart");
        self.header_cache.invalidate();
        Ok(())
    }

    /// Fetch one full chart record.
    ///
    /// `no_cache` bypasses the transport-level response cache; use it
    /// after a known mutation to avoid echoing stale bytes.
    pub fn get_chart_by_id(&self, id: i64, no_cache: bool) -> Result<ChartRecord, ChartError> {
        let _flight = self.begin_op()?;
        self.fetch_record(id, no_cache)
    }

    /// Mark a chart deleted (tombstone, not a hard delete).
    pub fn delete_chart_by_id(&self, id: i64) -> Result<(), ChartError> {
        let _flight = self.begin_op()?;

        let url = format!("{}/{}", self.config.chart_url, id);
        let response = self.request(Method::Delete, url, None, false)?;
        classify(response.status)?;

        info!(id, "Deleted chart");
        self.header_cache.invalidate();
        Ok(())
    }

    /// Toggle the curated flag through the privileged curation
    /// endpoint.
    pub fn curate_chart_by_id(&self, id: i64, status: bool) -> Result<(), ChartError> {
        let _flight = self.begin_op()?;

        let body = v1::encode_curation(id, status)?;
        let url = format!("{}/{}", self.config.curation_url, id);
        let response = self.request(Method::Put, url, Some(body), false)?;
        classify(response.status)?;

        info!(id, curated = status, "Curated chart");
        self.header_cache.invalidate();
        Ok(())
    }

    /// Return the full chart-header listing, cache-first.
    ///
    /// A valid disk cache answers without any network access; a miss
    /// (absent, stale format, or unreadable file) falls through to a
    /// full remote listing that rewrites the cache on success.
    pub fn get_all_chart_headers(&self) -> Result<Vec<ChartHeader>, ChartError> {
        let _flight = self.begin_op()?;

        if let Some(headers) = self.header_cache.read() {
            debug!(count = headers.len(), "Serving chart headers from cache");
            return Ok(headers);
        }

        self.fetch_headers(false)
    }

    /// Force a fresh remote listing, bypassing both the header cache
    /// and the transport response cache, and rewrite the header cache.
    pub fn refresh_chart_headers(&self) -> Result<Vec<ChartHeader>, ChartError> {
        let _flight = self.begin_op()?;
        self.fetch_headers(true)
    }

    /// Patch a single entry of the persisted header cache after the
    /// caller learned that one record changed remotely.
    ///
    /// Re-fetches the record with the response cache bypassed and
    /// rewrites the matching cached header. A failed fetch, an absent
    /// cache, or an unknown id all degrade to a no-op.
    pub fn update_chart_in_cache(&self, id: i64) {
        let Ok(_flight) = self.begin_op() else {
            debug!(id, "Skipping header cache update, client busy");
            return;
        };

        let record = match self.fetch_record(id, true) {
            Ok(record) => record,
            Err(e) => {
                debug!(id, error = %e, "Skipping header cache update");
                return;
            }
        };

        if self.header_cache.patch(&record.header) {
            debug!(id, "Patched header cache entry");
        }
    }

    /// Acquire the single-flight guard and run the SSL pre-flight
    /// check. Either failure terminates the operation before any
    /// request is attempted.
    fn begin_op(&self) -> Result<MutexGuard<'_, ()>, ChartError> {
        let guard = self.flight.try_lock().ok_or(ChartError::Busy)?;
        if !self.ssl_available {
            return Err(ChartError::SslUnavailable);
        }
        Ok(guard)
    }

    fn request(
        &self,
        method: Method,
        url: String,
        body: Option<Vec<u8>>,
        no_store: bool,
    ) -> Result<TransportResponse, ChartError> {
        let request = TransportRequest {
            method,
            url,
            basic_auth: self.config.basic_auth.clone(),
            body,
            no_store,
        };
        Ok(self.transport.execute(&request)?)
    }

    fn fetch_record(&self, id: i64, no_cache: bool) -> Result<ChartRecord, ChartError> {
        let url = format!("{}/{}", self.config.chart_url, id);
        let response = self.request(Method::Get, url, None, no_cache)?;
        classify(response.status)?;
        Ok(v1::parse_record(&response.body)?)
    }

    fn fetch_headers(&self, no_store: bool) -> Result<Vec<ChartHeader>, ChartError> {
        let response = self.request(
            Method::Get,
            self.config.chart_header_url.clone(),
            None,
            no_store,
        )?;
        classify(response.status)?;

        let headers = v1::parse_headers(&response.body)?;
        if let Err(e) = self.header_cache.write(&headers) {
            // A local cache fault never fails the listing itself.
            warn!(error = %e, "Failed to write header cache");
        }

        debug!(count = headers.len(), "Fetched chart headers from service");
        Ok(headers)
    }
}
