//! Encoding between [`Release`] and the object every backend persists.
//!
//! A stored object is the triple `(key, labels, data)`. The labels carry
//! name, version and status so listings can be filtered without touching the
//! payload; `data` is the release as JSON, gzipped, then base64 encoded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use shared_types::{Release, Status};
use std::collections::BTreeMap;
use std::io::{Read, Write};

use crate::error::{DriverError, Result};

pub const LABEL_NAME: &str = "NAME";
pub const LABEL_VERSION: &str = "VERSION";
pub const LABEL_STATUS: &str = "STATUS";
pub const LABEL_OWNER: &str = "OWNER";
pub const OWNER: &str = "RELEASE-STORAGE";

const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub key: String,
    pub labels: BTreeMap<String, String>,
    pub data: String,
}

/// The identifying fields of a release, as recovered from labels alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSummary {
    pub name: String,
    pub version: u32,
    pub status: Status,
}

pub fn release_labels(release: &Release) -> BTreeMap<String, String> {
    BTreeMap::from([
        (LABEL_NAME.to_string(), release.name.clone()),
        (LABEL_VERSION.to_string(), release.version.to_string()),
        (LABEL_STATUS.to_string(), release.status.as_str().to_string()),
        (LABEL_OWNER.to_string(), OWNER.to_string()),
    ])
}

pub fn encode(key: &str, release: &Release) -> Result<StoredObject> {
    let json = serde_json::to_vec(release).map_err(|e| DriverError::corrupt(key, e))?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&json)
        .map_err(|e| DriverError::corrupt(key, e))?;
    let compressed = encoder.finish().map_err(|e| DriverError::corrupt(key, e))?;

    Ok(StoredObject {
        key: key.to_string(),
        labels: release_labels(release),
        data: STANDARD.encode(compressed),
    })
}

pub fn decode(object: &StoredObject) -> Result<Release> {
    let key = object.key.as_str();
    if object.data.is_empty() {
        return Err(DriverError::corrupt(key, "missing release payload"));
    }

    let bytes = STANDARD
        .decode(&object.data)
        .map_err(|e| DriverError::corrupt(key, format!("invalid base64: {e}")))?;

    // Objects written without compression are plain JSON.
    let json = if bytes.starts_with(&GZIP_MAGIC) {
        let mut out = Vec::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_end(&mut out)
            .map_err(|e| DriverError::corrupt(key, format!("invalid gzip stream: {e}")))?;
        out
    } else {
        bytes
    };

    serde_json::from_slice(&json)
        .map_err(|e| DriverError::corrupt(key, format!("invalid release json: {e}")))
}

pub fn summarize(object: &StoredObject) -> Result<ReleaseSummary> {
    let label = |name: &str| {
        object
            .labels
            .get(name)
            .ok_or_else(|| DriverError::corrupt(&object.key, format!("missing {name} label")))
    };

    let version = label(LABEL_VERSION)?;
    let status = label(LABEL_STATUS)?;

    Ok(ReleaseSummary {
        name: label(LABEL_NAME)?.clone(),
        version: version.parse().map_err(|_| {
            DriverError::corrupt(&object.key, format!("invalid VERSION label: {version}"))
        })?,
        status: status
            .parse()
            .map_err(|e| DriverError::corrupt(&object.key, e))?,
    })
}
