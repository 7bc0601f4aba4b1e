//! # State store: the supervisor's only durable record.
//!
//! Layout under the working directory:
//! ```text
//! <work_dir>/tmp/state.json      SupervisorState (UTF-8 JSON)
//! <work_dir>/tmp/state.json.tmp  write-then-rename staging file
//! ```
//!
//! ## Rules
//! - Missing file → default (empty) state; corrupt file → [`StoreError::Parse`].
//! - `save` fully replaces the file (tmp + rename), never appends.
//! - The file only ever records revisions that were already acted upon.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Name of the scratch directory inside the working directory.
pub(crate) const SCRATCH_DIR: &str = "tmp";

const STATE_FILE: &str = "state.json";

/// Last revisions the supervisor acted upon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorState {
    /// Revision of the supervisor's own installation directory.
    #[serde(default, alias = "softwareGitHash")]
    pub software_revision: String,
    /// Revision of the configuration repository.
    #[serde(default, alias = "configGitHash")]
    pub config_revision: String,
}

/// Reads and writes [`SupervisorState`] under `<work_dir>/tmp/`.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
    path: PathBuf,
}

impl StateStore {
    /// Creates a store rooted at `work_dir`. Nothing is touched on disk yet.
    pub fn new(work_dir: impl AsRef<Path>) -> Self {
        let dir = work_dir.as_ref().join(SCRATCH_DIR);
        let path = dir.join(STATE_FILE);
        Self { dir, path }
    }

    /// Path of the scratch directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Makes sure the scratch directory exists. "Already exists" is success.
    pub async fn ensure_dir(&self) -> Result<(), StoreError> {
        match tokio::fs::create_dir(&self.dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(source) => Err(StoreError::CreateDir {
                path: self.dir.clone(),
                source,
            }),
        }
    }

    /// Loads the state, falling back to the default when no file exists yet.
    pub async fn load(&self) -> Result<SupervisorState, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SupervisorState::default()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Atomically replaces the state file (write tmp, then rename).
    pub async fn save(&self, state: &SupervisorState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: std::io::Error::new(ErrorKind::InvalidData, e),
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|source| StoreError::Write {
                path: tmp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })
    }
}
