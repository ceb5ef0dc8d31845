use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::StorageError;
use crate::memory::Collections;
use crate::record::{ComplaintRecord, RenewalRecord, WorkerRecord};
use crate::traits::RegistryStorage;

const WORKERS_FILE: &str = "workers.json";
const COMPLAINTS_FILE: &str = "complaints.json";
const RENEWALS_FILE: &str = "renewals.json";

/// JSON-file storage backend.
///
/// Each collection lives in one file under the data directory
/// (`workers.json`, `complaints.json`, `renewals.json`) as a JSON array.
/// The whole file is rewritten on commit, via a temp file and rename.
///
/// A malformed or unreadable collection file is logged and loaded as an
/// empty collection; the registry never refuses to start over bad data.
#[derive(Clone)]
pub struct JsonStorage {
    dir: PathBuf,
    state: Arc<Mutex<Collections>>,
}

pub struct JsonSnapshot {
    guard: OwnedMutexGuard<Collections>,
    work: Collections,
    workers_dirty: bool,
    complaints_dirty: bool,
    renewals_dirty: bool,
}

impl JsonStorage {
    /// Open (or create) the data directory and load all collections.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::Io {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;

        let collections = Collections {
            workers: load_collection(&dir.join(WORKERS_FILE)),
            complaints: load_collection(&dir.join(COMPLAINTS_FILE)),
            renewals: load_collection(&dir.join(RENEWALS_FILE)),
        };

        Ok(Self {
            dir,
            state: Arc::new(Mutex::new(collections)),
        })
    }

    /// Write a collection to its temp file, without touching the live file.
    fn stage<T: Serialize>(&self, file: &str, records: &[T]) -> Result<(), StorageError> {
        let body = serde_json::to_string_pretty(records)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;
        let tmp = self.dir.join(format!("{}.tmp", file));
        std::fs::write(&tmp, body).map_err(|e| StorageError::Io {
            path: tmp.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Rename a staged temp file over the live collection file.
    fn publish(&self, file: &str) -> Result<(), StorageError> {
        let tmp = self.dir.join(format!("{}.tmp", file));
        let path = self.dir.join(file);
        std::fs::rename(&tmp, &path).map_err(|e| StorageError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Rewrite a live collection file from the committed state, after a
    /// partially published commit. A restore failure is logged; the
    /// reopened store would then diverge from committed memory, but the
    /// original commit error is still what the caller sees.
    fn restore(&self, file: &str, committed: &Collections) {
        let result = match file {
            WORKERS_FILE => self
                .stage(file, &committed.workers)
                .and_then(|_| self.publish(file)),
            COMPLAINTS_FILE => self
                .stage(file, &committed.complaints)
                .and_then(|_| self.publish(file)),
            RENEWALS_FILE => self
                .stage(file, &committed.renewals)
                .and_then(|_| self.publish(file)),
            _ => Ok(()),
        };
        if let Err(e) = result {
            eprintln!(
                "Warning: could not restore {} after failed commit: {}",
                file, e
            );
        }
    }
}

/// Load one collection file. Absent files are empty collections; malformed
/// or unreadable files are logged and treated as empty.
fn load_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    if !path.exists() {
        return Vec::new();
    }
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Warning: could not read {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    match serde_json::from_str(&text) {
        Ok(records) => records,
        Err(e) => {
            eprintln!(
                "Warning: malformed collection {}: {} (treating as empty)",
                path.display(),
                e
            );
            Vec::new()
        }
    }
}

#[async_trait]
impl RegistryStorage for JsonStorage {
    type Snapshot = JsonSnapshot;

    async fn begin_snapshot(&self) -> Result<JsonSnapshot, StorageError> {
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(JsonSnapshot {
            guard,
            work,
            workers_dirty: false,
            complaints_dirty: false,
            renewals_dirty: false,
        })
    }

    async fn commit_snapshot(&self, mut snapshot: JsonSnapshot) -> Result<(), StorageError> {
        // Two-phase publish so the collections move together: stage every
        // dirty collection as a temp file, then rename them all, and only
        // then update committed memory. A staging failure aborts before
        // any live file changes; a rename failure rolls already renamed
        // files back to the committed state.
        let mut dirty: Vec<&'static str> = Vec::new();
        if snapshot.workers_dirty {
            self.stage(WORKERS_FILE, &snapshot.work.workers)?;
            dirty.push(WORKERS_FILE);
        }
        if snapshot.complaints_dirty {
            self.stage(COMPLAINTS_FILE, &snapshot.work.complaints)?;
            dirty.push(COMPLAINTS_FILE);
        }
        if snapshot.renewals_dirty {
            self.stage(RENEWALS_FILE, &snapshot.work.renewals)?;
            dirty.push(RENEWALS_FILE);
        }

        for (i, file) in dirty.iter().enumerate() {
            if let Err(e) = self.publish(file) {
                for published in &dirty[..i] {
                    self.restore(published, &snapshot.guard);
                }
                for staged in &dirty[i..] {
                    let _ = std::fs::remove_file(self.dir.join(format!("{}.tmp", staged)));
                }
                return Err(e);
            }
        }

        *snapshot.guard = snapshot.work;
        Ok(())
    }

    async fn abort_snapshot(&self, snapshot: JsonSnapshot) -> Result<(), StorageError> {
        drop(snapshot);
        Ok(())
    }

    async fn workers(
        &self,
        snapshot: &mut JsonSnapshot,
    ) -> Result<Vec<WorkerRecord>, StorageError> {
        Ok(snapshot.work.workers.clone())
    }

    async fn put_workers(
        &self,
        snapshot: &mut JsonSnapshot,
        workers: Vec<WorkerRecord>,
    ) -> Result<(), StorageError> {
        snapshot.work.workers = workers;
        snapshot.workers_dirty = true;
        Ok(())
    }

    async fn complaints(
        &self,
        snapshot: &mut JsonSnapshot,
    ) -> Result<Vec<ComplaintRecord>, StorageError> {
        Ok(snapshot.work.complaints.clone())
    }

    async fn put_complaints(
        &self,
        snapshot: &mut JsonSnapshot,
        complaints: Vec<ComplaintRecord>,
    ) -> Result<(), StorageError> {
        snapshot.work.complaints = complaints;
        snapshot.complaints_dirty = true;
        Ok(())
    }

    async fn renewals(
        &self,
        snapshot: &mut JsonSnapshot,
    ) -> Result<Vec<RenewalRecord>, StorageError> {
        Ok(snapshot.work.renewals.clone())
    }

    async fn put_renewals(
        &self,
        snapshot: &mut JsonSnapshot,
        renewals: Vec<RenewalRecord>,
    ) -> Result<(), StorageError> {
        snapshot.work.renewals = renewals;
        snapshot.renewals_dirty = true;
        Ok(())
    }

    async fn list_workers(&self) -> Result<Vec<WorkerRecord>, StorageError> {
        Ok(self.state.lock().await.workers.clone())
    }

    async fn list_complaints(&self) -> Result<Vec<ComplaintRecord>, StorageError> {
        Ok(self.state.lock().await.complaints.clone())
    }

    async fn list_renewals(&self) -> Result<Vec<RenewalRecord>, StorageError> {
        Ok(self.state.lock().await.renewals.clone())
    }
}
