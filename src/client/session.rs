use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ServiceError;

/// Session cookie saved between CLI runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub email: String,
    pub base_url: String,
    pub cookie: String,
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(email: impl Into<String>, base_url: impl Into<String>, cookie: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            base_url: base_url.into(),
            cookie: cookie.into(),
            saved_at: Utc::now(),
        }
    }
}

/// JSON file holding a [`StoredSession`].
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed creating directory {}", parent.display()))?;
            }
        }

        let payload = serde_json::to_vec_pretty(session)?;
        fs::write(&self.path, payload)
            .with_context(|| format!("failed writing {}", self.path.display()))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Reads the stored session, `None` when no session file exists.
    pub fn load(&self) -> Result<Option<StoredSession>, ServiceError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read session file {}", self.path.display()))?;
        let session: StoredSession = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse session file {}", self.path.display()))?;
        Ok(Some(session))
    }

    pub fn clear(&self) -> Result<(), ServiceError> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}
