//! Immutable snapshot registry
//!
//! Page objects capture one raw markup snapshot per element at authoring
//! time. The registry maps a symbolic key to that snapshot and is read-only
//! after construction, so concurrent actions on the same page object never
//! race on it.

use std::{collections::HashMap, fs, path::Path};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read selector registry: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse selector registry: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Mapping from registry key to raw markup snapshot.
#[derive(Debug, Clone, Default)]
pub struct SelectorRegistry {
    snapshots: HashMap<String, String>,
}

impl SelectorRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let snapshots = pairs
            .into_iter()
            .map(|(key, snapshot)| (key.into(), snapshot.into()))
            .collect::<HashMap<_, _>>();
        Self { snapshots }
    }

    /// Load a registry from a YAML mapping file. A missing file is not an
    /// error; it yields an empty registry and hint-only healing.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "registry file missing, starting empty");
            return Ok(Self::empty());
        }
        let raw = fs::read_to_string(path)?;
        let registry = Self::from_yaml_str(&raw)?;
        debug!(
            path = %path.display(),
            entries = registry.len(),
            "loaded selector registry"
        );
        Ok(registry)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, RegistryError> {
        let snapshots: HashMap<String, String> = serde_yaml::from_str(raw)?;
        Ok(Self { snapshots })
    }

    pub fn snapshot(&self, key: &str) -> Option<&str> {
        self.snapshots.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.snapshots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
