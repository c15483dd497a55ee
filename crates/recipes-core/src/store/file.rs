// # File Catalog Store
//
// File-based implementation of CatalogStore with crash recovery.
//
// ## Purpose
//
// Persists the catalog across restarts so queries keep working offline
// and the freshness gate can skip refreshes that aren't due yet.
//
// ## Crash Recovery
//
// - Atomic writes: new catalog written to a temporary file, then renamed
// - Corruption detection: JSON validated on load
// - Automatic backup: keeps .backup of the last known good catalog
// - Recovery: falls back to the backup if corruption is detected
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "last_updated": "2026-08-28T12:00:00Z",
//   "recipes": [ ... ]
// }
// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::model::{FilterQuery, StoredRecipe};
use crate::store::CatalogSnapshot;
use crate::traits::CatalogStore;

/// Catalog file format version, for future migration if the format changes
const CATALOG_FILE_VERSION: &str = "1.0";

/// Serializable catalog file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct CatalogFileFormat {
    version: String,
    last_updated: Option<DateTime<Utc>>,
    recipes: Vec<StoredRecipe>,
}

/// File-based catalog store with crash recovery
///
/// The current catalog is mirrored in memory as an immutable snapshot;
/// reads never touch the disk. An overwrite serializes and persists the
/// replacement catalog first (write-then-rename) and only then swaps the
/// in-memory snapshot, so a failed write leaves both the file and the
/// queryable set at their last known good state.
///
/// The sync coordinator is the single writer; overwrite is not designed
/// to be called from two tasks at once.
#[derive(Debug)]
pub struct FileCatalogStore {
    path: PathBuf,
    state: Arc<RwLock<Arc<CatalogSnapshot>>>,
}

impl FileCatalogStore {
    /// Create or load a file catalog store
    ///
    /// This will:
    /// 1. Try to load the existing catalog file
    /// 2. If corruption is detected, try to load from backup
    /// 3. If both fail, start with an empty, never-updated catalog
    /// 4. Create parent directories if needed
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::storage_unavailable(format!(
                        "failed to create catalog directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let snapshot = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(Arc::new(snapshot))),
        })
    }

    /// Load the catalog from file with automatic recovery
    ///
    /// Recovery strategy:
    /// 1. Try to load the main catalog file
    /// 2. On a parse error, try loading the backup
    /// 3. If the backup also fails, start with an empty catalog
    async fn load_with_recovery(path: &Path) -> Result<CatalogSnapshot, Error> {
        match Self::load(path).await {
            Ok(snapshot) => {
                tracing::debug!(
                    "loaded catalog from file: {} recipes",
                    snapshot.recipes.len()
                );
                Ok(snapshot)
            }
            // I/O failures are not corruption; surface them
            Err(e @ Error::StorageUnavailable(_)) => Err(e),
            Err(e) => {
                tracing::warn!(
                    "catalog file appears corrupted: {}. attempting recovery from backup",
                    e
                );

                let backup_path = Self::backup_path(path);
                if backup_path.exists() {
                    match Self::load(&backup_path).await {
                        Ok(snapshot) => {
                            tracing::info!(
                                "recovered catalog from backup: {} recipes",
                                snapshot.recipes.len()
                            );
                            if let Err(restore_err) = fs::copy(&backup_path, path).await {
                                tracing::error!(
                                    "failed to restore catalog file from backup: {}",
                                    restore_err
                                );
                            }
                            Ok(snapshot)
                        }
                        Err(backup_err) => {
                            tracing::error!(
                                "backup also corrupted: {}. starting with empty catalog",
                                backup_err
                            );
                            Ok(CatalogSnapshot::default())
                        }
                    }
                } else {
                    tracing::warn!("no backup file found. starting with empty catalog");
                    Ok(CatalogSnapshot::default())
                }
            }
        }
    }

    /// Load the catalog from a file
    async fn load(path: &Path) -> Result<CatalogSnapshot, Error> {
        if !path.exists() {
            tracing::debug!("catalog file does not exist: {}", path.display());
            return Ok(CatalogSnapshot::default());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::storage_unavailable(format!(
                "failed to read catalog file {}: {}",
                path.display(),
                e
            ))
        })?;

        let file: CatalogFileFormat = serde_json::from_str(&content).map_err(|e| {
            Error::Other(format!(
                "failed to parse catalog file {}: {}",
                path.display(),
                e
            ))
        })?;

        if file.version != CATALOG_FILE_VERSION {
            tracing::warn!(
                "catalog file version mismatch: expected {}, got {}. attempting to load anyway",
                CATALOG_FILE_VERSION,
                file.version
            );
        }

        Ok(CatalogSnapshot {
            recipes: file.recipes,
            last_updated: file.last_updated,
        })
    }

    /// Persist a snapshot atomically (write temp, backup current, rename)
    async fn persist(&self, snapshot: &CatalogSnapshot) -> Result<(), Error> {
        let file = CatalogFileFormat {
            version: CATALOG_FILE_VERSION.to_string(),
            last_updated: snapshot.last_updated,
            recipes: snapshot.recipes.clone(),
        };

        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::storage_write(format!("failed to serialize catalog: {}", e)))?;

        let temp_path = self.temp_path();
        {
            let mut f = fs::File::create(&temp_path).await.map_err(|e| {
                Error::storage_write(format!(
                    "failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            f.write_all(json.as_bytes()).await.map_err(|e| {
                Error::storage_write(format!(
                    "failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            f.flush().await.map_err(|e| {
                Error::storage_write(format!(
                    "failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Keep the last known good catalog around for recovery
        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("failed to create catalog backup: {}", e);
            }
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::storage_write(format!(
                "failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("catalog written to file: {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }

    async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&*self.state.read().await)
    }
}

#[async_trait]
impl CatalogStore for FileCatalogStore {
    async fn last_updated(&self) -> Result<Option<DateTime<Utc>>, Error> {
        Ok(self.snapshot().await.last_updated)
    }

    async fn query(&self, filter: &FilterQuery) -> Result<Vec<StoredRecipe>, Error> {
        let snapshot = self.snapshot().await;
        Ok(snapshot
            .recipes
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<StoredRecipe, Error> {
        let snapshot = self.snapshot().await;
        snapshot
            .recipes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(id))
    }

    async fn overwrite(
        &self,
        recipes: Vec<StoredRecipe>,
        updated_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let next = CatalogSnapshot {
            recipes,
            last_updated: Some(updated_at),
        };

        // Persist before touching the in-memory snapshot: a failed write
        // must leave the queryable set and timestamp untouched
        self.persist(&next).await?;

        *self.state.write().await = Arc::new(next);
        Ok(())
    }
}
