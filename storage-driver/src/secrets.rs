//! Releases stored as secrets, one object per release version.

use async_trait::async_trait;
use chrono::Utc;
use shared_types::Release;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::codec::{self, StoredObject};
use crate::driver::Driver;
use crate::error::{DriverError, Result};
use crate::filter::ReleaseFilter;
use crate::remote::{classify, ClientError, ObjectMeta, ResourceClient, Secret};
use crate::remote::{LABEL_CREATED_AT, LABEL_MODIFIED_AT, RELEASE_DATA_KEY};

pub const SECRET_TYPE: &str = "release-storage/release.v1";

/// [`Driver`] over a secret collection.
///
/// `create` probes for an existing secret before writing. A conflict
/// reported by the create call itself is still translated, which covers a
/// concurrent writer slipping in between the probe and the write.
pub struct Secrets {
    client: Arc<dyn ResourceClient<Secret>>,
}

impl Secrets {
    pub fn new(client: Arc<dyn ResourceClient<Secret>>) -> Self {
        Self { client }
    }

    fn to_secret(object: StoredObject) -> Secret {
        Secret {
            metadata: ObjectMeta {
                labels: object.labels,
                ..ObjectMeta::named(object.key)
            },
            type_: SECRET_TYPE.to_string(),
            data: BTreeMap::from([(RELEASE_DATA_KEY.to_string(), object.data.into_bytes())]),
        }
    }

    fn decode(secret: &Secret) -> Result<Release> {
        let key = &secret.metadata.name;
        let data = match secret.data.get(RELEASE_DATA_KEY) {
            Some(bytes) => String::from_utf8(bytes.clone())
                .map_err(|_| DriverError::corrupt(key, "release data is not valid UTF-8"))?,
            None => String::new(),
        };

        codec::decode(&StoredObject {
            key: key.clone(),
            labels: secret.metadata.labels.clone(),
            data,
        })
    }
}

#[async_trait]
impl Driver for Secrets {
    fn name(&self) -> &'static str {
        "Secret"
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Release> {
        debug!("Fetching secret {}", key);
        let secret = self.client.get(key).await.map_err(|e| classify(e, key))?;
        Self::decode(&secret)
    }

    #[instrument(skip(self, release))]
    async fn create(&self, key: &str, release: &Release) -> Result<()> {
        match self.client.get(key).await {
            Ok(_) => return Err(DriverError::AlreadyExists(key.to_string())),
            Err(ClientError::NotFound { .. }) => {}
            Err(e) => return Err(classify(e, key)),
        }

        let mut secret = Self::to_secret(codec::encode(key, release)?);
        secret
            .metadata
            .labels
            .insert(LABEL_CREATED_AT.to_string(), Utc::now().timestamp().to_string());

        self.client
            .create(secret)
            .await
            .map_err(|e| classify(e, key))?;
        info!("Created secret {}", key);
        Ok(())
    }

    #[instrument(skip(self, release))]
    async fn update(&self, key: &str, release: &Release) -> Result<()> {
        let mut secret = Self::to_secret(codec::encode(key, release)?);
        secret
            .metadata
            .labels
            .insert(LABEL_MODIFIED_AT.to_string(), Utc::now().timestamp().to_string());

        self.client
            .update(secret)
            .await
            .map_err(|e| classify(e, key))?;
        info!("Updated secret {}", key);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<Release> {
        let release = self.get(key).await?;
        self.client.delete(key).await.map_err(|e| classify(e, key))?;
        info!("Deleted secret {}", key);
        Ok(release)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &ReleaseFilter) -> Result<Vec<Release>> {
        let selector = filter.selector();
        let secrets = self
            .client
            .list(&selector)
            .await
            .map_err(|e| classify(e, &selector.to_string()))?;
        debug!("Selector {} matched {} secrets", selector, secrets.len());

        let mut releases = Vec::with_capacity(secrets.len());
        for secret in &secrets {
            let release = Self::decode(secret).inspect_err(|e| {
                warn!("Failed to decode secret {}: {}", secret.metadata.name, e);
            })?;
            if filter.matches(&release) {
                releases.push(release);
            }
        }
        Ok(releases)
    }
}
