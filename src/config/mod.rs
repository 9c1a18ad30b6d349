//! Configuration loading and management

use crate::core::{InvoiceRecord, InvoiceStore, seed_invoices};
use crate::storage::{DEFAULT_STORAGE_KEY, InMemoryInvoiceStore, JsonFileInvoiceStore};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Which storage backend holds the records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    InMemory,
    JsonFile,
    Lmdb,
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// File (json_file) or directory (lmdb) holding the records
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Key the record array is stored under
    #[serde(default = "default_key")]
    pub key: String,

    /// Start from (and reset to) the sample invoices; otherwise start empty
    #[serde(default = "default_true")]
    pub seed: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            key: default_key(),
            seed: true,
        }
    }
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_true() -> bool {
    true
}

/// Upload ingestion limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Largest accepted upload, in bytes
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

fn default_max_file_bytes() -> usize {
    10 * 1024 * 1024
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration: in-memory store with sample data
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Reject combinations that cannot produce a store
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.is_empty() {
            bail!("storage.key must not be empty");
        }
        if self.storage.backend != StorageBackend::InMemory && self.storage.path.is_none() {
            bail!("storage.path is required for the {:?} backend", self.storage.backend);
        }
        if self.ingest.max_file_bytes == 0 {
            bail!("ingest.max_file_bytes must be positive");
        }
        Ok(())
    }

    /// The seed set the store starts from and resets to
    pub fn seed_records(&self) -> Vec<InvoiceRecord> {
        if self.storage.seed {
            seed_invoices()
        } else {
            Vec::new()
        }
    }

    /// Build the configured store
    pub fn build_store(&self) -> Result<Arc<dyn InvoiceStore>> {
        self.validate()?;
        let seed = self.seed_records();

        let store: Arc<dyn InvoiceStore> = match (self.storage.backend, &self.storage.path) {
            (StorageBackend::InMemory, _) => Arc::new(InMemoryInvoiceStore::with_seed(seed)),
            (StorageBackend::JsonFile, Some(path)) => Arc::new(
                JsonFileInvoiceStore::new(path)
                    .with_key(self.storage.key.clone())
                    .with_seed(seed),
            ),
            #[cfg(feature = "lmdb")]
            (StorageBackend::Lmdb, Some(path)) => Arc::new(
                crate::storage::LmdbInvoiceStore::open(path)?
                    .with_key(&self.storage.key)
                    .with_seed(seed),
            ),
            #[cfg(not(feature = "lmdb"))]
            (StorageBackend::Lmdb, _) => bail!("the lmdb backend requires the `lmdb` feature"),
            (backend, None) => bail!("storage.path is required for the {:?} backend", backend),
        };

        tracing::info!(backend = ?self.storage.backend, seed = self.storage.seed, "invoice store ready");
        Ok(store)
    }
}
