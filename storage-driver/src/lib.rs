//! Pluggable storage for versioned release records.
//!
//! A [`Storage`] wraps one [`Driver`]: the in-process [`Memory`] map, or a
//! remote collection of [`ConfigMaps`] or [`Secrets`] reached through a
//! caller-supplied [`ResourceClient`]. Every driver stores the same encoded
//! object shape (see [`codec`]) under the same key (see [`release_key`]).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod codec;
pub mod config;
pub mod configmaps;
pub mod driver;
pub mod error;
pub mod filter;
pub mod key;
pub mod memory;
pub mod remote;
pub mod secrets;
pub mod storage;


pub use codec::{ReleaseSummary, StoredObject};
pub use config::{DriverKind, StorageConfig};
pub use configmaps::ConfigMaps;
pub use driver::Driver;
pub use error::{DriverError, Result};
pub use filter::{LabelSelector, ReleaseFilter};
pub use key::{parse_release_key, release_key};
pub use memory::Memory;
pub use remote::{
    ClientError, ClusterClient, ConfigMap, ObjectMeta, RemoteObject, ResourceClient, Secret,
};
pub use secrets::Secrets;
pub use storage::Storage;
