//! Stable per-installation client id.
//!
//! The id is generated once (UUID v4), persisted under [`CLIENT_ID_KEY`] and
//! returned unchanged on every later call and launch. [`ClientIdCell`] caches
//! it; a [`ClientIdStore`] persists it across launches. Clients built without
//! an explicit store share one process-wide cell ([`ClientIdCell::shared`]).

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;

/// Key the id is stored under.
pub const CLIENT_ID_KEY: &str = "client-id";

const APP_DIR: &str = "qualtive";
const FILE_NAME: &str = "client.json";

/// Persistent home of the client id.
pub trait ClientIdStore: Send + Sync {
    /// The stored id, if one exists.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Persist `id` unless an id is already stored. Returns the id that is
    /// stored afterwards, which differs from `id` when another writer won.
    fn store_if_absent(&self, id: &str) -> Result<String, StorageError>;
}

#[derive(Serialize, Deserialize)]
struct StoredClientId {
    #[serde(rename = "client-id")]
    client_id: String,
}

/// JSON file in the per-user data directory.
///
/// Creation goes through a uniquely named temp file that is hard-linked into
/// place, so the target either does not exist or holds a complete id, and two
/// processes racing on first launch agree on one winner.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/qualtive/client.json`.
    pub fn default_location() -> Result<Self, StorageError> {
        let base = dirs::data_dir().ok_or(StorageError::NoDataDirectory)?;
        Ok(Self::new(base.join(APP_DIR).join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ClientIdStore for FileStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let stored: StoredClientId = serde_json::from_slice(&raw)?;
        Ok(Some(stored.client_id))
    }

    fn store_if_absent(&self, id: &str) -> Result<String, StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_vec(&StoredClientId {
            client_id: id.to_string(),
        })?;

        let tmp_path = self.path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        let mut tmp = fs::File::create(&tmp_path)?;
        tmp.write_all(&json)?;
        tmp.sync_all()?;
        drop(tmp);

        let linked = fs::hard_link(&tmp_path, &self.path);
        let _ = fs::remove_file(&tmp_path);
        match linked {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "client id saved");
                Ok(id.to_string())
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                self.load()?.ok_or(StorageError::Conflict)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientIdStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn store_if_absent(&self, id: &str) -> Result<String, StorageError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.get_or_insert_with(|| id.to_string()).clone())
    }
}

/// Resolves the client id at most once per cell.
pub struct ClientIdCell {
    store: Box<dyn ClientIdStore>,
    cached: Mutex<Option<String>>,
}

impl ClientIdCell {
    pub fn new(store: impl ClientIdStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            cached: Mutex::new(None),
        }
    }

    /// The process-wide cell backed by the default [`FileStore`], or by
    /// memory when the platform has no data directory.
    pub fn shared() -> Arc<ClientIdCell> {
        static SHARED: OnceLock<Arc<ClientIdCell>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| {
            let cell = match FileStore::default_location() {
                Ok(store) => ClientIdCell::new(store),
                Err(err) => {
                    tracing::warn!(error = %err, "no client id file, keeping it in memory");
                    ClientIdCell::new(MemoryStore::new())
                }
            };
            Arc::new(cell)
        }))
    }

    /// The client id. Never fails: if storage is unusable the id lives for
    /// the rest of the process only, and is the same for every cell.
    pub fn get(&self) -> String {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = cached.as_ref() {
            return id.clone();
        }
        let id = match self.resolve() {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(error = %err, "client id not persisted, using a process-lifetime id");
                process_lifetime_id()
            }
        };
        *cached = Some(id.clone());
        id
    }

    fn resolve(&self) -> Result<String, StorageError> {
        if let Some(id) = self.store.load()? {
            return Ok(id);
        }
        let fresh = generate();
        let stored = self.store.store_if_absent(&fresh)?;
        if stored == fresh {
            tracing::info!(client_id = %stored, "generated client id");
        }
        Ok(stored)
    }
}

fn generate() -> String {
    Uuid::new_v4().to_string()
}

fn process_lifetime_id() -> String {
    static ID: OnceLock<String> = OnceLock::new();
    ID.get_or_init(generate).clone()
}
