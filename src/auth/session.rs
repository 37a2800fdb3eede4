//! Persisted session file.
//!
//! The browser storefront keeps its access token in `localStorage`; the
//! console keeps the equivalent in a small YAML file so a signed-in session
//! survives between invocations. The refresh credential itself is an HTTP
//! cookie and is never written to disk.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{models::UserIdentity, tokens::AccessToken};

/// Session state persisted between console invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: AccessToken,
    pub user: UserIdentity,
    pub saved_at: Timestamp,
}

impl StoredSession {
    #[must_use]
    pub fn new(access_token: AccessToken, user: UserIdentity) -> Self {
        Self {
            access_token,
            user,
            saved_at: Timestamp::now(),
        }
    }
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored session, or `None` when no session file exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<StoredSession>, SessionStoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SessionStoreError::io(&self.path, err)),
        };

        let session = serde_norway::from_str(&text)
            .map_err(|source| SessionStoreError::Parse { source })?;

        Ok(Some(session))
    }

    /// Writes the session, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be serialized or written.
    pub fn save(&self, session: &StoredSession) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| SessionStoreError::io(parent, err))?;
        }

        let text = serde_norway::to_string(session)
            .map_err(|source| SessionStoreError::Serialize { source })?;

        fs::write(&self.path, text).map_err(|err| SessionStoreError::io(&self.path, err))?;

        Ok(())
    }

    /// Deletes the session file; missing files are fine.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SessionStoreError::io(&self.path, err)),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session file {path} could not be accessed")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("session file is not valid")]
    Parse {
        #[source]
        source: serde_norway::Error,
    },

    #[error("session could not be serialized")]
    Serialize {
        #[source]
        source: serde_norway::Error,
    },
}

impl SessionStoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
