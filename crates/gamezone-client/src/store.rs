//! Persisted key-value session store.
//!
//! The store keeps two keys, `remember_session` and `user_full_name`, as one
//! JSON document. [`FileSessionStore`] survives restarts; [`MemorySessionStore`]
//! backs tests and ephemeral runs.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::{Deserialize, Serialize};

use crate::atomic_io::write_atomic;
use crate::error::StoreError;

const STORE_FILE: &str = "session_preferences.json";

/// Contents of the session store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Skip the welcome and login screens on the next launch.
    #[serde(default)]
    pub remember_session: bool,
    /// Cached display name of the last signed-in or registered user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_full_name: Option<String>,
}

/// Storage for the [`SessionRecord`].
pub trait SessionStore: Send + Sync {
    /// Current record; a store that was never written yields the default.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be read.
    fn load(&self) -> Result<SessionRecord, StoreError>;

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be written.
    fn save(&self, record: &SessionRecord) -> Result<(), StoreError>;

    /// Remove both keys.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be written.
    fn clear(&self) -> Result<(), StoreError>;

    /// Set the remember-session flag, keeping the display name.
    ///
    /// # Errors
    ///
    /// Propagates load and save failures.
    fn set_remember_session(&self, remember: bool) -> Result<(), StoreError> {
        let mut record = self.load()?;
        record.remember_session = remember;
        self.save(&record)
    }

    /// Cache a display name, keeping the remember-session flag.
    ///
    /// # Errors
    ///
    /// Propagates load and save failures.
    fn save_user_full_name(&self, full_name: &str) -> Result<(), StoreError> {
        let mut record = self.load()?;
        record.user_full_name = Some(full_name.to_owned());
        self.save(&record)
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: Mutex<SessionRecord>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `record`.
    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            record: Mutex::new(record),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionRecord> {
        self.record.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<SessionRecord, StoreError> {
        Ok(self.lock().clone())
    }

    fn save(&self, record: &SessionRecord) -> Result<(), StoreError> {
        *self.lock() = record.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.lock() = SessionRecord::default();
        Ok(())
    }
}

/// Store kept as `session_preferences.json` inside a directory.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: Dir,
    location: PathBuf,
}

impl FileSessionStore {
    /// Open (creating if needed) the store directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] when the directory cannot be created or
    /// opened.
    pub fn open(directory: &Path) -> Result<Self, StoreError> {
        let read_error = |err: io::Error| StoreError::Read {
            path: directory.to_path_buf(),
            message: err.to_string(),
        };
        Dir::create_ambient_dir_all(directory, ambient_authority()).map_err(read_error)?;
        let dir = Dir::open_ambient_dir(directory, ambient_authority()).map_err(read_error)?;
        Ok(Self {
            dir,
            location: directory.join(STORE_FILE),
        })
    }

    /// Full path of the JSON document.
    pub fn location(&self) -> &Path {
        &self.location
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<SessionRecord, StoreError> {
        let text = match self.dir.read_to_string(STORE_FILE) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(SessionRecord::default());
            }
            Err(err) => {
                return Err(StoreError::Read {
                    path: self.location.clone(),
                    message: err.to_string(),
                });
            }
        };
        serde_json::from_str(&text).map_err(|err| StoreError::Parse {
            message: err.to_string(),
        })
    }

    fn save(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(record).map_err(|err| StoreError::Write {
            path: self.location.clone(),
            message: err.to_string(),
        })?;
        write_atomic(&self.dir, Utf8Path::new(STORE_FILE), &text)
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self.dir.remove_file(STORE_FILE) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Write {
                path: self.location.clone(),
                message: err.to_string(),
            }),
        }
    }
}
