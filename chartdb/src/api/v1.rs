//! V1 wire schema and JSON marshalling.
//!
//! Flattened representations of a chart record as exchanged with the
//! remote service: a header (identity plus metadata) and a full record
//! (header plus XML body, preview image, and creator display fields).
//!
//! # JSON contract
//!
//! - List responses are JSON arrays, single-record responses are JSON
//!   objects.
//! - Missing fields deserialize to their type's zero value; only the
//!   top-level shape is checked strictly.
//! - The preview image travels as a base64 string.
//! - `lastChanged` is an RFC 3339 timestamp.
//!
//! All conversions here are pure: no I/O, deterministic for identical
//! byte input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while marshalling or unmarshalling wire payloads.
#[derive(Debug, Clone, Error)]
pub enum WireError {
    /// The payload was not valid JSON of the expected top-level shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Identity and metadata of a chart, without body or image.
///
/// `id` is assigned by the server on creation and never changes
/// afterwards; `0` marks a record that has not been created yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartHeader {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Source language tag of the chart texts.
    pub language: String,
    /// Minimum application version able to render this chart.
    #[serde(rename = "minVersion")]
    pub min_version: String,
    #[serde(rename = "lastChanged")]
    pub last_changed: DateTime<Utc>,
    #[serde(rename = "creatorId")]
    pub creator_id: String,
    /// Set only through the privileged curation endpoint.
    pub curated: bool,
    /// Tombstone flag; deleted records stay listable as headers.
    pub deleted: bool,
}

impl Default for ChartHeader {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            description: String::new(),
            language: String::new(),
            min_version: String::new(),
            last_changed: epoch(),
            creator_id: String::new(),
            curated: false,
            deleted: false,
        }
    }
}

/// Full chart record as used for create, update, and detail fetch.
///
/// The XML body is opaque to this client: it is never parsed, only
/// passed through.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartRecord {
    #[serde(flatten)]
    pub header: ChartHeader,
    #[serde(rename = "chartXml")]
    pub chart_xml: String,
    /// Optional preview image, base64-encoded on the wire.
    #[serde(with = "base64_bytes")]
    pub image: Vec<u8>,
    #[serde(rename = "creatorNick")]
    pub creator_nick: String,
    #[serde(rename = "creatorEmail")]
    pub creator_email: String,
}

/// Body of a curation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CurationV1 {
    pub id: i64,
    pub curated: bool,
}

/// Parse a JSON array of full chart records.
///
/// An empty array yields an empty vec; anything that is not a JSON
/// array of objects is a [`WireError::MalformedPayload`].
pub fn parse_records(bytes: &[u8]) -> Result<Vec<ChartRecord>, WireError> {
    serde_json::from_slice(bytes).map_err(|e| WireError::MalformedPayload(e.to_string()))
}

/// Parse a JSON array of chart headers.
pub fn parse_headers(bytes: &[u8]) -> Result<Vec<ChartHeader>, WireError> {
    serde_json::from_slice(bytes).map_err(|e| WireError::MalformedPayload(e.to_string()))
}

/// Parse a single JSON object into a full chart record.
pub fn parse_record(bytes: &[u8]) -> Result<ChartRecord, WireError> {
    serde_json::from_slice(bytes).map_err(|e| WireError::MalformedPayload(e.to_string()))
}

/// Parse a single JSON object into a chart header.
pub fn parse_header(bytes: &[u8]) -> Result<ChartHeader, WireError> {
    serde_json::from_slice(bytes).map_err(|e| WireError::MalformedPayload(e.to_string()))
}

/// Encode a full chart record as a JSON request body.
pub fn encode_record(record: &ChartRecord) -> Result<Vec<u8>, WireError> {
    serde_json::to_vec(record).map_err(|e| WireError::MalformedPayload(e.to_string()))
}

/// Encode a curation request body.
pub(crate) fn encode_curation(id: i64, curated: bool) -> Result<Vec<u8>, WireError> {
    serde_json::to_vec(&CurationV1 { id, curated })
        .map_err(|e| WireError::MalformedPayload(e.to_string()))
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
