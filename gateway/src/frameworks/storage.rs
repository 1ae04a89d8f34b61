use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::{SessionStore, StorageError, StoredSession};

// In-process session store; the default for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        let guard = self.session.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        let mut guard = self.session.lock().map_err(|_| StorageError::Poisoned)?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self.session.lock().map_err(|_| StorageError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// Session persisted as a single JSON document (`{"token": ..., "user": ...}`).
///
/// The document is replaced atomically via a sibling temp file, so readers never
/// observe a token without its profile. A missing file means "anonymous".
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "session.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_vec_pretty(session)?;
        let temp = self.temp_path();
        fs::write(&temp, raw)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
