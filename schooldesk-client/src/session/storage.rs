//! On-disk session blob
//!
//! A single JSON file under the user's data directory. Anything that fails to
//! parse or validate is treated as "logged out" and removed so it cannot
//! poison the next start.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::Session;
use crate::error::SessionError;

pub(crate) const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at `<data dir>/schooldesk/session.json`.
    pub fn new() -> Result<Self, SessionError> {
        Self::default_path().map(Self::at).ok_or(SessionError::NoDataDir)
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "schooldesk", "schooldesk")
            .map(|dirs| dirs.data_dir().join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session, if any.
    ///
    /// Corrupt or invalid blobs are deleted and reported as `Ok(None)`.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None);
            }
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let parsed = serde_json::from_str::<Session>(&raw)
            .map_err(SessionError::from)
            .and_then(|session| {
                session.profile.validate()?;
                Ok(session)
            });

        match parsed {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                log::warn!(
                    "[SessionStore] Discarding unreadable session at {}: {}",
                    self.path.display(),
                    err
                );
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(session)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SessionError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, json).map_err(|source| self.io(source))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .map_err(|source| self.io(source))?;
        }

        log::debug!("[SessionStore] Saved session to {}", self.path.display());
        Ok(())
    }

    /// Remove the blob. Missing files are not an error.
    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io(source)),
        }
    }

    fn io(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
