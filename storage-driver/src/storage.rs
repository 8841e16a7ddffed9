use async_trait::async_trait;
use shared_types::{Release, Status};
use tracing::{debug, info};

use crate::config::{DriverKind, StorageConfig};
use crate::configmaps::ConfigMaps;
use crate::driver::Driver;
use crate::error::{DriverError, Result};
use crate::filter::ReleaseFilter;
use crate::key::release_key;
use crate::memory::Memory;
use crate::remote::ClusterClient;
use crate::secrets::Secrets;

/// The single entry point callers use for release storage.
///
/// Wraps exactly one backend, fixed at construction. The [`Driver`]
/// operations are forwarded untouched; the release-level helpers compute
/// keys and answer the history questions callers ask most.
pub struct Storage {
    driver: Box<dyn Driver>,
}

impl From<Box<dyn Driver>> for Storage {
    fn from(driver: Box<dyn Driver>) -> Self {
        Self { driver }
    }
}

impl Storage {
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self {
            driver: Box::new(driver),
        }
    }

    pub fn memory() -> Self {
        Self::new(Memory::new())
    }

    pub fn from_config(config: &StorageConfig, cluster: &dyn ClusterClient) -> Self {
        info!(
            "Initializing {} release storage in namespace {}",
            config.driver, config.namespace
        );
        match config.driver {
            DriverKind::Memory => Self::memory(),
            DriverKind::ConfigMap => {
                Self::new(ConfigMaps::new(cluster.config_maps(&config.namespace)))
            }
            DriverKind::Secret => Self::new(Secrets::new(cluster.secrets(&config.namespace))),
        }
    }

    pub async fn create_release(&self, release: &Release) -> Result<()> {
        self.create(&release_key(&release.name, release.version), release)
            .await
    }

    pub async fn update_release(&self, release: &Release) -> Result<()> {
        self.update(&release_key(&release.name, release.version), release)
            .await
    }

    pub async fn get_release(&self, name: &str, version: u32) -> Result<Release> {
        self.get(&release_key(name, version)).await
    }

    pub async fn delete_release(&self, name: &str, version: u32) -> Result<Release> {
        self.delete(&release_key(name, version)).await
    }

    /// All stored versions of `name`, oldest first.
    pub async fn history(&self, name: &str) -> Result<Vec<Release>> {
        let mut releases = self.query(name).await?;
        releases.sort_by_key(|r| r.version);
        Ok(releases)
    }

    /// The deployed version of `name`.
    ///
    /// Keeping a single deployed version is up to the caller; if several are
    /// marked deployed, the highest version wins.
    pub async fn deployed(&self, name: &str) -> Result<Release> {
        self.list(&ReleaseFilter::by_name(name).with_status(Status::Deployed))
            .await?
            .into_iter()
            .max_by_key(|r| r.version)
            .ok_or_else(|| DriverError::NotFound(name.to_string()))
    }

    /// The highest stored version of `name`, whatever its status.
    pub async fn latest(&self, name: &str) -> Result<Release> {
        self.query(name)
            .await?
            .into_iter()
            .max_by_key(|r| r.version)
            .ok_or_else(|| DriverError::NotFound(name.to_string()))
    }

    pub async fn next_version(&self, name: &str) -> Result<u32> {
        match self.latest(name).await {
            Ok(release) => {
                release
                    .version
                    .checked_add(1)
                    .ok_or_else(|| DriverError::VersionExhausted {
                        name: name.to_string(),
                        version: release.version,
                    })
            }
            Err(DriverError::NotFound(_)) => Ok(1),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Driver for Storage {
    fn name(&self) -> &'static str {
        self.driver.name()
    }

    async fn get(&self, key: &str) -> Result<Release> {
        debug!("{} driver: get {}", self.driver.name(), key);
        self.driver.get(key).await
    }

    async fn create(&self, key: &str, release: &Release) -> Result<()> {
        debug!("{} driver: create {}", self.driver.name(), key);
        self.driver.create(key, release).await
    }

    async fn update(&self, key: &str, release: &Release) -> Result<()> {
        debug!("{} driver: update {}", self.driver.name(), key);
        self.driver.update(key, release).await
    }

    async fn delete(&self, key: &str) -> Result<Release> {
        debug!("{} driver: delete {}", self.driver.name(), key);
        self.driver.delete(key).await
    }

    async fn list(&self, filter: &ReleaseFilter) -> Result<Vec<Release>> {
        debug!("{} driver: list {:?}", self.driver.name(), filter);
        self.driver.list(filter).await
    }

    async fn query(&self, name: &str) -> Result<Vec<Release>> {
        debug!("{} driver: query {}", self.driver.name(), name);
        self.driver.query(name).await
    }
}
