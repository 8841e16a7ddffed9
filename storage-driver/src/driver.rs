use async_trait::async_trait;
use shared_types::Release;

use crate::error::Result;
use crate::filter::ReleaseFilter;

/// Storage for release records, keyed by [`crate::release_key`].
///
/// Every backend gives the same guarantees: `create` never overwrites,
/// `update` never creates, and `delete` hands back what it removed. `list`
/// is all-or-nothing; one undecodable object fails the whole call.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Backend identifier, used in logs.
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Release>;

    async fn create(&self, key: &str, release: &Release) -> Result<()>;

    async fn update(&self, key: &str, release: &Release) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<Release>;

    /// Releases matching `filter`, in no particular order.
    async fn list(&self, filter: &ReleaseFilter) -> Result<Vec<Release>>;

    /// Every stored version of the release called `name`.
    async fn query(&self, name: &str) -> Result<Vec<Release>> {
        self.list(&ReleaseFilter::by_name(name)).await
    }
}
