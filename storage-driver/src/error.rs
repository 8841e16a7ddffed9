use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("release not found: {0}")]
    NotFound(String),

    #[error("release already exists: {0}")]
    AlreadyExists(String),

    #[error("corrupt release record {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("release {name} has no version after {version}")]
    VersionExhausted { name: String, version: u32 },

    #[error("storage backend unavailable: {0}")]
    BackendUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DriverError {
    pub(crate) fn corrupt(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::CorruptRecord {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DriverError::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, DriverError::AlreadyExists(_))
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, DriverError::CorruptRecord { .. })
    }
}

pub type Result<T> = std::result::Result<T, DriverError>;
