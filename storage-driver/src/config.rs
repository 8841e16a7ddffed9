use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_NAMESPACE: &str = "kube-system";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverKind {
    Memory,
    ConfigMap,
    Secret,
}

impl FromStr for DriverKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "configmap" | "configmaps" => Ok(Self::ConfigMap),
            "secret" | "secrets" => Ok(Self::Secret),
            _ => anyhow::bail!(
                "Unknown storage driver: {}. Must be 'memory', 'configmap' or 'secret'",
                s
            ),
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::ConfigMap => "configmap",
            Self::Secret => "secret",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub driver: DriverKind,
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::config_maps(DEFAULT_NAMESPACE)
    }
}

impl StorageConfig {
    pub fn memory() -> Self {
        Self {
            driver: DriverKind::Memory,
            namespace: default_namespace(),
        }
    }

    pub fn config_maps(namespace: impl Into<String>) -> Self {
        Self {
            driver: DriverKind::ConfigMap,
            namespace: namespace.into(),
        }
    }

    pub fn secrets(namespace: impl Into<String>) -> Self {
        Self {
            driver: DriverKind::Secret,
            namespace: namespace.into(),
        }
    }

    /// Read `STORAGE_DRIVER` and `STORAGE_NAMESPACE` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let driver = match lookup("STORAGE_DRIVER") {
            Some(value) => value
                .parse::<DriverKind>()
                .context("Invalid STORAGE_DRIVER")?,
            None => DriverKind::ConfigMap,
        };
        let namespace = lookup("STORAGE_NAMESPACE")
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(default_namespace);

        Ok(Self { driver, namespace })
    }
}
