use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::{Document, codec};
use crate::errors::{StoreError, StoreResult};

/// Owner of the on-disk document.
///
/// Readers share the lock, commits take it exclusively, so a `load` never sees a
/// file in the middle of being replaced. [`Store::transact`] keeps the exclusive lock
/// for a whole read-modify-write cycle; every mutation in the repository goes through
/// it, which makes id assignment and deletes race-free within one process.
pub struct Store {
    path: PathBuf,
    lock: RwLock<()>,
}

impl Store {
    /// Open the document at `path`, writing an empty one first if none exists.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Store {
            path: path.into(),
            lock: RwLock::new(()),
        };

        if !store.path.exists() {
            if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            store.commit(&Document::default())?;
            info!("Created empty database at {}", store.path.display());
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> StoreResult<Document> {
        let _guard = self.lock.read();
        self.read_document()
    }

    pub fn commit(&self, doc: &Document) -> StoreResult<()> {
        let _guard = self.lock.write();
        self.write_document(doc)
    }

    /// Run `f` against the current document and commit the result, all under the
    /// exclusive lock. Nothing is written when `f` fails.
    pub fn transact<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Document) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.lock.write();
        let mut doc = self.read_document()?;
        let out = f(&mut doc)?;
        self.write_document(&doc)?;
        Ok(out)
    }

    fn read_document(&self) -> StoreResult<Document> {
        let bytes = fs::read(&self.path)?;
        debug!("Loaded {} bytes from {}", bytes.len(), self.path.display());
        codec::decode(&bytes)
    }

    // Encode first, then write a sibling temp file and rename it over the target.
    // Rename within one directory is atomic, so readers see the old file or the new one.
    fn write_document(&self, doc: &Document) -> StoreResult<()> {
        let bytes = codec::encode(doc)?;
        let tmp = self.temp_path();

        let result = write_synced(&tmp, &bytes).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!("Could not remove temp file {}: {}", tmp.display(), cleanup);
            }
            return Err(e.into());
        }

        debug!("Committed {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "database".to_string());
        self.path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
