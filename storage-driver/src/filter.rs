use shared_types::{Release, Status};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::codec::{LABEL_NAME, LABEL_OWNER, LABEL_STATUS, OWNER};

type Predicate = Arc<dyn Fn(&Release) -> bool + Send + Sync>;

/// Equality-based label selector, the form remote collections filter on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    pub labels: BTreeMap<String, String>,
}

impl LabelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.labels
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.labels {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// Which releases a `list` call should return.
///
/// Name and status constraints can be evaluated from labels, so remote
/// backends push them into the server-side selector. The optional predicate
/// only runs against decoded releases.
#[derive(Clone, Default)]
pub struct ReleaseFilter {
    name: Option<String>,
    status: Option<Status>,
    predicate: Option<Predicate>,
}

impl ReleaseFilter {
    /// A filter that keeps every release.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self::all().with_name(name)
    }

    pub fn by_status(status: Status) -> Self {
        Self::all().with_status(status)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matching<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Release) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn matches(&self, release: &Release) -> bool {
        self.name.as_ref().is_none_or(|name| *name == release.name)
            && self.status.is_none_or(|status| status == release.status)
            && self.predicate.as_ref().is_none_or(|pred| pred(release))
    }

    /// Label selector equivalent to the name and status constraints.
    pub fn selector(&self) -> LabelSelector {
        let mut selector = LabelSelector::new().with(LABEL_OWNER, OWNER);
        if let Some(name) = &self.name {
            selector = selector.with(LABEL_NAME, name.clone());
        }
        if let Some(status) = self.status {
            selector = selector.with(LABEL_STATUS, status.as_str());
        }
        selector
    }
}

impl fmt::Debug for ReleaseFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseFilter")
            .field("name", &self.name)
            .field("status", &self.status)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}
