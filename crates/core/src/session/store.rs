//! File-backed session store shared by the client and the controllers.

use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

use super::models::Session;

/// Failure to persist or remove the session file.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Filesystem access failed.
    #[error("failed to access session file {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The session could not be encoded.
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Thread-safe handle to the current session.
///
/// Clones share state. Writes hit disk before the in-memory copy changes,
/// so readers never observe a session that was not persisted.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug)]
struct Inner {
    path: Option<PathBuf>,
    session: Session,
}

impl SessionStore {
    /// Open the store at `path`, loading any session saved by a previous run.
    ///
    /// A missing file means "logged out". An unreadable or corrupt file is
    /// logged and treated the same way.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = match load(&path) {
            Ok(Some(session)) if session.is_complete() => session,
            Ok(Some(_)) => {
                warn!(path = %path.display(), "ignoring incomplete session file");
                Session::default()
            }
            Ok(None) => Session::default(),
            Err(err) => {
                warn!(path = %path.display(), "ignoring unreadable session file: {err}");
                Session::default()
            }
        };
        Self {
            inner: Arc::new(RwLock::new(Inner {
                path: Some(path),
                session,
            })),
        }
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                path: None,
                session: Session::default(),
            })),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<PathBuf> {
        self.inner.read().path.clone()
    }

    /// Current bearer token.
    pub fn token(&self) -> Option<String> {
        self.inner.read().session.token.clone()
    }

    /// Current display name.
    pub fn display_name(&self) -> Option<String> {
        self.inner.read().session.display_name.clone()
    }

    /// Copy of the whole session.
    pub fn snapshot(&self) -> Session {
        self.inner.read().session.clone()
    }

    /// Whether a complete session is present.
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().session.is_complete()
    }

    /// Replace the session with a new token and display name.
    pub fn set_session(
        &self,
        token: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<(), SessionError> {
        let session = Session::new(token, display_name);
        let mut inner = self.inner.write();
        if let Some(path) = inner.path.as_deref() {
            persist(path, &session)?;
        }
        info!(
            user = session.display_name.as_deref().unwrap_or_default(),
            "session stored"
        );
        inner.session = session;
        Ok(())
    }

    /// Forget the session. Clearing an empty store is a no-op.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.write();
        if let Some(path) = inner.path.as_deref() {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(SessionError::Io {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }
        if inner.session != Session::default() {
            info!("session cleared");
        }
        inner.session = Session::default();
        Ok(())
    }
}

fn load(path: &Path) -> anyhow::Result<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&contents)?))
}

fn persist(path: &Path, session: &Session) -> Result<(), SessionError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| SessionError::Io { path, source }
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(io_err(parent))?;

    let mut file = NamedTempFile::new_in(parent).map_err(io_err(parent))?;
    serde_json::to_writer_pretty(&mut file, session)?;
    file.flush().map_err(io_err(path))?;
    file.persist(path).map_err(|err| SessionError::Io {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}
