//! Record store for the bulk loader
//! Uses Apache Arrow object_store crate

pub mod loader;

pub use loader::{DocumentRecord, LoadSummary, RecordSink, load_documents};

use object_store::{ObjectStore, local::LocalFileSystem, path::Path as StoragePath};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StoreConfig, StoreProvider};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to prepare store root {path}: {source}")]
    Root {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Object store error: {0}")]
    ObjectStoreError(#[from] object_store::Error),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage client wrapping object_store; records live under `{table}/`
#[derive(Clone)]
pub struct StorageClient {
    store: Arc<dyn ObjectStore>,
    pub table: String,
}

impl StorageClient {
    /// Create new storage client with any object_store backend
    pub fn new(store: Arc<dyn ObjectStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// Create in-memory storage for testing/development
    pub fn in_memory(table: impl Into<String>) -> Self {
        Self::new(Arc::new(object_store::memory::InMemory::new()), table)
    }

    /// Local filesystem storage rooted at `root`, created if missing
    pub fn local(root: &Path, table: impl Into<String>) -> Result<Self> {
        std::fs::create_dir_all(root).map_err(|source| StorageError::Root {
            path: root.display().to_string(),
            source,
        })?;
        let store = LocalFileSystem::new_with_prefix(root)?;
        Ok(Self::new(Arc::new(store), table))
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        match config.provider {
            StoreProvider::Local => Self::local(&config.root, config.table.clone()),
            StoreProvider::Memory => Ok(Self::in_memory(config.table.clone())),
        }
    }

    /// Object key of the record for `filename`
    pub fn record_key(&self, filename: &str) -> String {
        format!("{}/{}.json", self.table, filename)
    }

    /// Upload bytes to storage
    pub async fn upload(&self, key: &str, data: Vec<u8>) -> Result<usize> {
        let path = StoragePath::from(key);
        let size = data.len();

        self.store.put(&path, data.into()).await?;

        tracing::info!(key, size, "Uploaded to storage");
        Ok(size)
    }

    /// Download from storage
    pub async fn download(&self, key: &str) -> Result<Vec<u8>> {
        let path = StoragePath::from(key);

        let result = self.store.get(&path).await?;
        let bytes = result.bytes().await?;

        tracing::debug!(key, size = bytes.len(), "Downloaded from storage");

        Ok(bytes.to_vec())
    }

    /// Read back the record stored for `filename`
    pub async fn fetch_record(&self, filename: &str) -> Result<DocumentRecord> {
        let bytes = self.download(&self.record_key(filename)).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
