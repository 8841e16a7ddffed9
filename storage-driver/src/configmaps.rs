//! Releases stored as config maps, one object per release version.

use async_trait::async_trait;
use chrono::Utc;
use shared_types::Release;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::codec::{self, StoredObject};
use crate::driver::Driver;
use crate::error::Result;
use crate::filter::ReleaseFilter;
use crate::remote::{classify, ConfigMap, ObjectMeta, ResourceClient};
use crate::remote::{LABEL_CREATED_AT, LABEL_MODIFIED_AT, RELEASE_DATA_KEY};

/// [`Driver`] over a config map collection.
///
/// `create` leans on the collection's own conflict error instead of probing
/// first, so two racing creates of the same version cannot both succeed.
pub struct ConfigMaps {
    client: Arc<dyn ResourceClient<ConfigMap>>,
}

impl ConfigMaps {
    pub fn new(client: Arc<dyn ResourceClient<ConfigMap>>) -> Self {
        Self { client }
    }

    fn to_config_map(object: StoredObject) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                labels: object.labels,
                ..ObjectMeta::named(object.key)
            },
            data: BTreeMap::from([(RELEASE_DATA_KEY.to_string(), object.data)]),
        }
    }

    fn decode(config_map: &ConfigMap) -> Result<Release> {
        codec::decode(&StoredObject {
            key: config_map.metadata.name.clone(),
            labels: config_map.metadata.labels.clone(),
            data: config_map
                .data
                .get(RELEASE_DATA_KEY)
                .cloned()
                .unwrap_or_default(),
        })
    }
}

#[async_trait]
impl Driver for ConfigMaps {
    fn name(&self) -> &'static str {
        "ConfigMap"
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Release> {
        debug!("Fetching config map {}", key);
        let config_map = self.client.get(key).await.map_err(|e| classify(e, key))?;
        Self::decode(&config_map)
    }

    #[instrument(skip(self, release))]
    async fn create(&self, key: &str, release: &Release) -> Result<()> {
        let mut config_map = Self::to_config_map(codec::encode(key, release)?);
        config_map
            .metadata
            .labels
            .insert(LABEL_CREATED_AT.to_string(), Utc::now().timestamp().to_string());

        self.client
            .create(config_map)
            .await
            .map_err(|e| classify(e, key))?;
        info!("Created config map {}", key);
        Ok(())
    }

    #[instrument(skip(self, release))]
    async fn update(&self, key: &str, release: &Release) -> Result<()> {
        let mut config_map = Self::to_config_map(codec::encode(key, release)?);
        config_map
            .metadata
            .labels
            .insert(LABEL_MODIFIED_AT.to_string(), Utc::now().timestamp().to_string());

        self.client
            .update(config_map)
            .await
            .map_err(|e| classify(e, key))?;
        info!("Updated config map {}", key);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<Release> {
        let release = self.get(key).await?;
        self.client.delete(key).await.map_err(|e| classify(e, key))?;
        info!("Deleted config map {}", key);
        Ok(release)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &ReleaseFilter) -> Result<Vec<Release>> {
        let selector = filter.selector();
        let config_maps = self
            .client
            .list(&selector)
            .await
            .map_err(|e| classify(e, &selector.to_string()))?;
        debug!("Selector {} matched {} config maps", selector, config_maps.len());

        let mut releases = Vec::with_capacity(config_maps.len());
        for config_map in &config_maps {
            let release = Self::decode(config_map).inspect_err(|e| {
                warn!("Failed to decode config map {}: {}", config_map.metadata.name, e);
            })?;
            if filter.matches(&release) {
                releases.push(release);
            }
        }
        Ok(releases)
    }
}
