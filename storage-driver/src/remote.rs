//! The seam between the remote-collection drivers and the orchestration
//! client that actually talks to the cluster.
//!
//! Callers implement [`ResourceClient`] over their client library of choice.
//! The drivers only rely on the behaviour every such API exposes: fetch,
//! list by label selector, create, update and delete by name, reporting
//! missing or conflicting objects with dedicated errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::error::DriverError;
use crate::filter::LabelSelector;

/// Data key holding the encoded release inside a remote object.
pub const RELEASE_DATA_KEY: &str = "release";

pub const LABEL_CREATED_AT: &str = "CREATED_AT";
pub const LABEL_MODIFIED_AT: &str = "MODIFIED_AT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub creation_timestamp: Option<DateTime<Utc>>,
    pub resource_version: Option<String>,
}

impl ObjectMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMap {
    pub metadata: ObjectMeta,
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub metadata: ObjectMeta,
    #[serde(rename = "type")]
    pub type_: String,
    pub data: BTreeMap<String, Vec<u8>>,
}

pub trait RemoteObject: Clone + Send + Sync + 'static {
    const KIND: &'static str;

    fn metadata(&self) -> &ObjectMeta;

    fn metadata_mut(&mut self) -> &mut ObjectMeta;
}

impl RemoteObject for ConfigMap {
    const KIND: &'static str = "ConfigMap";

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

impl RemoteObject for Secret {
    const KIND: &'static str = "Secret";

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{kind} \"{name}\" already exists")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ClientError {
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }
}

/// Native operations on one collection kind within one namespace.
#[async_trait]
pub trait ResourceClient<K: RemoteObject>: Send + Sync {
    async fn get(&self, name: &str) -> Result<K, ClientError>;

    async fn list(&self, selector: &LabelSelector) -> Result<Vec<K>, ClientError>;

    async fn create(&self, object: K) -> Result<K, ClientError>;

    async fn update(&self, object: K) -> Result<K, ClientError>;

    async fn delete(&self, name: &str) -> Result<(), ClientError>;
}

/// Hands out namespaced collection clients.
pub trait ClusterClient: Send + Sync {
    fn config_maps(&self, namespace: &str) -> Arc<dyn ResourceClient<ConfigMap>>;

    fn secrets(&self, namespace: &str) -> Arc<dyn ResourceClient<Secret>>;
}

/// Map a client failure onto the driver's error taxonomy.
pub(crate) fn classify(err: ClientError, key: &str) -> DriverError {
    match err {
        ClientError::NotFound { .. } => DriverError::NotFound(key.to_string()),
        ClientError::AlreadyExists { .. } => DriverError::AlreadyExists(key.to_string()),
        err @ ClientError::Transport(_) => DriverError::BackendUnavailable(Box::new(err)),
    }
}
