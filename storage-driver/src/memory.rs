//! In-process release storage.
//!
//! Objects are held in a `HashMap` behind a single tokio `RwLock`, so a
//! `list` always sees a consistent snapshot relative to concurrent writers.
//! Nothing survives the process; intended for tests and ephemeral use.

use async_trait::async_trait;
use shared_types::Release;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::codec::{self, StoredObject};
use crate::driver::Driver;
use crate::error::{DriverError, Result};
use crate::filter::ReleaseFilter;

/// Memory-backed [`Driver`].
///
/// # Example
///
/// ```rust
/// use shared_types::{Release, Status};
/// use storage_driver::{Driver, Memory};
///
/// # tokio_test::block_on(async {
/// let memory = Memory::new();
/// let release = Release::new("rls-a", 1, Status::Deployed);
/// memory.create("rls-a.v1", &release).await.unwrap();
/// assert_eq!(memory.get("rls-a.v1").await.unwrap(), release);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct Memory {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl Driver for Memory {
    fn name(&self) -> &'static str {
        "Memory"
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Release> {
        debug!("Getting release {}", key);
        let objects = self.objects.read().await;
        let object = objects
            .get(key)
            .ok_or_else(|| DriverError::NotFound(key.to_string()))?;
        codec::decode(object)
    }

    #[instrument(skip(self, release))]
    async fn create(&self, key: &str, release: &Release) -> Result<()> {
        let object = codec::encode(key, release)?;
        let mut objects = self.objects.write().await;
        match objects.entry(key.to_string()) {
            Entry::Occupied(_) => Err(DriverError::AlreadyExists(key.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(object);
                info!("Created release {}", key);
                Ok(())
            }
        }
    }

    #[instrument(skip(self, release))]
    async fn update(&self, key: &str, release: &Release) -> Result<()> {
        let object = codec::encode(key, release)?;
        let mut objects = self.objects.write().await;
        let slot = objects
            .get_mut(key)
            .ok_or_else(|| DriverError::NotFound(key.to_string()))?;
        *slot = object;
        info!("Updated release {}", key);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<Release> {
        let mut objects = self.objects.write().await;
        let release = match objects.get(key) {
            Some(object) => codec::decode(object)?,
            None => return Err(DriverError::NotFound(key.to_string())),
        };
        objects.remove(key);
        info!("Deleted release {}", key);
        Ok(release)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &ReleaseFilter) -> Result<Vec<Release>> {
        let objects = self.objects.read().await;
        debug!("Listing {} stored releases", objects.len());

        let mut releases = Vec::new();
        for object in objects.values() {
            let release = codec::decode(object).inspect_err(|e| {
                warn!("Failed to decode stored release {}: {}", object.key, e);
            })?;
            if filter.matches(&release) {
                releases.push(release);
            }
        }
        Ok(releases)
    }
}

#[cfg(test)]
impl Memory {
    /// Store a raw object, bypassing the codec.
    pub(crate) async fn insert_raw(&self, object: StoredObject) {
        self.objects.write().await.insert(object.key.clone(), object);
    }
}
