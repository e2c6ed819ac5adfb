// Copyright 2025 Cowboy AI, LLC.

//! Storage configuration and repository wiring

use crate::infrastructure::{EventStoreError, FileEventStore, InMemoryEventStore};
use crate::persistence::{EventSourcedRaffleRepository, RaffleRepository};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Environment variable naming the directory of the file store
pub const STORAGE_DIR_ENV: &str = "RAFFLE_STORAGE_DIR";

/// Where raffle events are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process memory, lost on exit
    InMemory,
    /// One JSON file per raffle under `directory`
    File {
        /// Directory holding the stream files
        directory: PathBuf,
    },
}

/// Configuration for raffle storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Selected backend
    pub backend: StorageBackend,

    /// Indent JSON written by the file backend
    pub pretty_json: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::InMemory,
            pretty_json: true,
        }
    }
}

impl StorageConfig {
    /// File-backed storage under `directory`
    pub fn file(directory: impl Into<PathBuf>) -> Self {
        Self {
            backend: StorageBackend::File {
                directory: directory.into(),
            },
            ..Self::default()
        }
    }

    /// Read the configuration from the process environment
    ///
    /// A non-empty `RAFFLE_STORAGE_DIR` selects the file backend; otherwise
    /// raffles are kept in memory.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(STORAGE_DIR_ENV) {
            Some(dir) if !dir.trim().is_empty() => Self::file(dir.trim()),
            _ => Self::default(),
        }
    }
}

/// Build the repository selected by `config`
pub async fn build_repository(config: &StorageConfig) -> Result<Arc<dyn RaffleRepository>, EventStoreError> {
    match &config.backend {
        StorageBackend::InMemory => {
            info!("Using in-memory raffle storage");
            Ok(Arc::new(EventSourcedRaffleRepository::new(InMemoryEventStore::new())))
        }
        StorageBackend::File { directory } => {
            let mut store = FileEventStore::open(directory).await?;
            if !config.pretty_json {
                store = store.compact();
            }
            info!(directory = %directory.display(), "Using file raffle storage");
            Ok(Arc::new(EventSourcedRaffleRepository::new(store)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CreateRaffle;
    use crate::raffle::Raffle;
    use crate::value_objects::Money;
    use crate::AggregateRoot;

    #[test]
    fn test_lookup_selects_backend() {
        assert_eq!(StorageConfig::from_lookup(|_| None), StorageConfig::default());
        assert_eq!(
            StorageConfig::from_lookup(|_| Some("   ".to_string())).backend,
            StorageBackend::InMemory
        );
        assert_eq!(
            StorageConfig::from_lookup(|_| Some("/var/lib/raffles".to_string())).backend,
            StorageBackend::File {
                directory: PathBuf::from("/var/lib/raffles")
            }
        );
    }

    #[test]
    fn test_config_deserializes() {
        let config: StorageConfig = serde_json::from_str(
            r#"{"backend":{"kind":"file","directory":"data"},"pretty_json":false}"#,
        )
        .unwrap();
        assert_eq!(config.backend, StorageBackend::File { directory: "data".into() });
        assert!(!config.pretty_json);
    }

    #[tokio::test]
    async fn test_file_backend_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("raffles");
        let repository = build_repository(&StorageConfig::file(&nested)).await.unwrap();

        let mut raffle = Raffle::create(CreateRaffle::new("Spring Raffle", 1, Money::from_major(1))).unwrap();
        repository.save(&mut raffle).await.unwrap();

        assert!(nested.join(format!("raffle_{}.json", raffle.id())).exists());
    }
}
