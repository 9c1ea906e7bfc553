use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write session file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Holds the team this player has chosen to play for
pub trait SessionStore {
    fn selected_team(&self) -> Option<String>;

    fn select_team(&self, team: &str) -> Result<(), SessionError>;
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn selected_team(&self) -> Option<String> {
        (**self).selected_team()
    }

    fn select_team(&self, team: &str) -> Result<(), SessionError> {
        (**self).select_team(team)
    }
}

#[derive(Debug, Default)]
pub struct MemorySession {
    team: RwLock<Option<String>>,
}

impl MemorySession {
    pub fn new(team: Option<String>) -> Self {
        Self {
            team: RwLock::new(team),
        }
    }
}

impl SessionStore for MemorySession {
    fn selected_team(&self) -> Option<String> {
        self.team
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn select_team(&self, team: &str) -> Result<(), SessionError> {
        *self.team.write().unwrap_or_else(PoisonError::into_inner) = Some(team.to_string());
        Ok(())
    }
}

/// Selected team persisted in a one-line file between runs
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/areaclaim/selected_team`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("areaclaim").join("selected_team"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSession {
    fn selected_team(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let team = contents.trim();
        (!team.is_empty()).then(|| team.to_string())
    }

    fn select_team(&self, team: &str) -> Result<(), SessionError> {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, format!("{team}\n"))
        };

        write().map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(team, path = %self.path.display(), "selected team saved");
        Ok(())
    }
}
