//! # Catalog Store
//!
//! The catalog is a single pretty-printed JSON array on disk. Every read loads
//! the whole file and every append rewrites it in full.
//!
//! Appends made through one `CatalogStore` are serialized by an async mutex.
//! Separate processes writing the same file can still lose updates.

use super::record::TechnologyRecord;
use crate::error::CatalogError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

pub struct CatalogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the full catalog
    pub async fn load_all(&self) -> Result<Vec<TechnologyRecord>, CatalogError> {
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Push `record` to the end of the catalog and rewrite the file
    pub async fn append(&self, record: TechnologyRecord) -> Result<(), CatalogError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load_all().await?;
        records.push(record);
        self.write_all(&records).await?;

        tracing::debug!(path = ?self.path, count = records.len(), "Catalog rewritten");
        Ok(())
    }

    /// Create the catalog as an empty array if the file does not exist yet.
    ///
    /// Returns `true` when a new file was written.
    pub async fn init(&self) -> Result<bool, CatalogError> {
        let _guard = self.write_lock.lock().await;

        if fs::metadata(&self.path).await.is_ok() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|source| CatalogError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        self.write_all(&[]).await?;
        tracing::info!(path = ?self.path, "Initialized empty catalog");
        Ok(true)
    }

    async fn write_all(&self, records: &[TechnologyRecord]) -> Result<(), CatalogError> {
        let content = serde_json::to_string_pretty(records).map_err(CatalogError::Encode)?;
        fs::write(&self.path, content)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })
    }
}
