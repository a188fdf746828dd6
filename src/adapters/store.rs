//! Alarm record store.
//!
//! Implements [`StatePort`] over a small blob store addressed by
//! `namespace/key`.
//!
//! - **Memory backend** — a `HashMap` behind a `RefCell`; nothing
//!   survives the process.  Used in tests and when no state directory is
//!   configured.
//! - **Directory backend** — one file per `namespace/key`.  Writes go to
//!   a temporary file that is renamed over the target, so a crash leaves
//!   either the old or the new blob, never a torn one.
//!
//! The alarm record is stored as a postcard blob under `alarm::state`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{StateError, StatePort, StorageError};
use crate::state::AlarmState;

const STATE_NAMESPACE: &str = "alarm";
const STATE_KEY: &str = "state";

/// Upper bound for one stored blob.
const MAX_BLOB_SIZE: usize = 512;

enum Backend {
    Memory(RefCell<HashMap<String, Vec<u8>>>),
    Directory(PathBuf),
}

pub struct KvStore {
    backend: Backend,
}

impl KvStore {
    /// Volatile in-memory store.
    pub fn in_memory() -> Self {
        info!("KvStore: memory backend");
        Self {
            backend: Backend::Memory(RefCell::new(HashMap::new())),
        }
    }

    /// File-backed store rooted at `dir`, created if missing.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            warn!("KvStore: cannot create {}: {}", dir.display(), e);
            StorageError::Io
        })?;
        info!("KvStore: directory backend at {}", dir.display());
        Ok(Self {
            backend: Backend::Directory(dir),
        })
    }

    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    fn blob_path(dir: &Path, namespace: &str, key: &str) -> PathBuf {
        dir.join(namespace).join(format!("{}.bin", key))
    }

    fn read_blob(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        match &self.backend {
            Backend::Memory(map) => map
                .borrow()
                .get(&Self::composite_key(namespace, key))
                .cloned()
                .ok_or(StorageError::Missing),
            Backend::Directory(dir) => {
                fs::read(Self::blob_path(dir, namespace, key)).map_err(|e| match e.kind() {
                    ErrorKind::NotFound => StorageError::Missing,
                    _ => {
                        warn!("KvStore: read {}::{} failed: {}", namespace, key, e);
                        StorageError::Io
                    }
                })
            }
        }
    }

    /// Replace the blob at `namespace/key`.  On disk the new bytes land
    /// in a sibling `.tmp` file that is renamed over the target.
    fn write_blob(&self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if data.len() > MAX_BLOB_SIZE {
            return Err(StorageError::TooLarge);
        }
        match &self.backend {
            Backend::Memory(map) => {
                map.borrow_mut()
                    .insert(Self::composite_key(namespace, key), data.to_vec());
                Ok(())
            }
            Backend::Directory(dir) => {
                let path = Self::blob_path(dir, namespace, key);
                let tmp = path.with_extension("tmp");
                let result = path
                    .parent()
                    .map_or(Ok(()), fs::create_dir_all)
                    .and_then(|()| fs::write(&tmp, data))
                    .and_then(|()| fs::rename(&tmp, &path));
                result.map_err(|e| {
                    warn!("KvStore: write {} failed: {}", path.display(), e);
                    StorageError::Io
                })
            }
        }
    }
}

impl StatePort for KvStore {
    fn load(&self) -> Result<Option<AlarmState>, StateError> {
        let bytes = match self.read_blob(STATE_NAMESPACE, STATE_KEY) {
            Ok(bytes) => bytes,
            Err(StorageError::Missing) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state: AlarmState = postcard::from_bytes(&bytes).map_err(|_| StateError::Corrupted)?;
        Ok(Some(state))
    }

    fn save(&mut self, state: &AlarmState) -> Result<(), StateError> {
        let bytes = postcard::to_allocvec(state).map_err(|_| StateError::Encode)?;
        self.write_blob(STATE_NAMESPACE, STATE_KEY, &bytes)?;
        Ok(())
    }
}
