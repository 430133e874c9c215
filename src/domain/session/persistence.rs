use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::domain::session::Session;
use crate::error::{Error, Result};
use crate::loader::parser::{parse_json_file, write_json_file};

/// Where a [`Session`] lives between process runs.
pub trait SessionPersistence: std::fmt::Debug {
    /// The stored session, if any.
    fn load(&self) -> Result<Option<Session>>;

    fn save(&self, session: &Session) -> Result<()>;

    /// Forgets the stored session. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// Keeps the session in memory only; it is gone when the process exits.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    stored: Mutex<Option<Session>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionPersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.stored.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.stored.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}

/// Stores the session as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFilePersistence { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionPersistence for JsonFilePersistence {
    /// A missing file means no session. A file that no longer parses is
    /// treated the same way and logged.
    fn load(&self) -> Result<Option<Session>> {
        match parse_json_file::<Session>(&self.path) {
            Ok(session) => Ok(Some(session)),
            Err(Error::IoError(err)) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(Error::DeserializationError(err)) => {
                log::warn!("Ignoring unreadable session file '{}': {}", self.path.display(), err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        write_json_file(&self.path, session)
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
