//! Error types used by the supervisor runtime and its components.
//!
//! Each component has its own enum so call sites can tell failures apart:
//!
//! - [`StoreError`]: working directory and state file problems.
//! - [`RevisionError`]: version-control command failures.
//! - [`ConfigError`]: configuration document and device entry problems.
//! - [`SpawnError`]: a managed client could not be launched.
//! - [`TickError`]: everything one tick can fail with (caught by the loop).
//! - [`RuntimeError`]: failures that end the process.
//! - [`PlaybackError`]: playback client failures (manifest lookup, player).
//!
//! The tick-level and runtime-level enums provide `as_label` / `as_message`
//! helpers for logs.

use std::path::PathBuf;

use thiserror::Error;

/// # Errors produced by the state store.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StoreError {
    /// The scratch directory could not be created (other than "already exists").
    #[error("cannot create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file exists but could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file is not valid JSON for [`SupervisorState`](crate::SupervisorState).
    #[error("corrupt state file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The state file could not be written or renamed into place.
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// # Errors produced by a revision source.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RevisionError {
    /// The version-control command could not be started at all.
    #[error("failed to run `{command}` in {dir}: {source}")]
    Spawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully.
    #[error("`{command}` failed in {dir} ({status}): {stderr}")]
    Command {
        command: String,
        dir: PathBuf,
        status: String,
        stderr: String,
    },

    /// The revision query wrote diagnostics; the directory is not usable.
    #[error("failed to do `{command}` in {dir}: {stderr}")]
    Stderr {
        command: String,
        dir: PathBuf,
        stderr: String,
    },

    /// The revision query printed nothing.
    #[error("no revision reported in {dir}")]
    Empty { dir: PathBuf },
}

/// # Errors produced while loading or resolving device configuration.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration document could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid JSON.
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration document is valid JSON but not an object keyed by device id.
    #[error("configuration document is not an object keyed by device id")]
    NotAnObject,

    /// This device's entry is present but cannot be used.
    #[error("invalid configuration for device {device}: {reason}")]
    InvalidEntry { device: String, reason: String },

    /// An environment override has an unusable value.
    #[error("invalid value {value:?} for {key}")]
    InvalidOverride { key: &'static str, value: String },
}

/// # A managed client could not be launched.
#[derive(Error, Debug)]
#[error("cannot launch {program}: {source}")]
pub struct SpawnError {
    /// Program that was being launched.
    pub program: String,
    #[source]
    pub source: std::io::Error,
}

/// # Errors that abort a single tick.
///
/// The supervisor loop catches these, logs them and waits for the next tick.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TickError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Revision(#[from] RevisionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TickError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use std::path::PathBuf;
    /// use signvisor::{RevisionError, TickError};
    ///
    /// let err = TickError::from(RevisionError::Empty { dir: PathBuf::from(".") });
    /// assert_eq!(err.as_label(), "tick_revision");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TickError::Store(_) => "tick_store",
            TickError::Revision(_) => "tick_revision",
            TickError::Config(_) => "tick_config",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TickError::Store(e) => format!("state: {e}"),
            TickError::Revision(e) => format!("revision: {e}"),
            TickError::Config(e) => format!("config: {e}"),
        }
    }
}

/// # Errors that end the supervisor process.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// OS signal handlers could not be installed.
    #[error("cannot install signal handlers: {0}")]
    Signal(#[source] std::io::Error),

    /// Another supervisor already runs against this working directory.
    #[error("another supervisor (pid {pid}) is running in {dir}")]
    AlreadyRunning { pid: u32, dir: PathBuf },

    /// Re-executing the supervisor binary failed.
    #[error("cannot re-exec supervisor: {0}")]
    Restart(#[source] std::io::Error),

    /// Other I/O failure outside of a tick.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Signal(_) => "runtime_signal",
            RuntimeError::AlreadyRunning { .. } => "runtime_already_running",
            RuntimeError::Restart(_) => "runtime_restart",
            RuntimeError::Io(_) => "runtime_io",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::AlreadyRunning { pid, dir } => {
                format!("instance pid={pid} already owns {}", dir.display())
            }
            other => other.to_string(),
        }
    }
}

/// # Errors produced by the playback client.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The manifest request failed (connection, TLS, body).
    #[error("manifest request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The streaming platform answered with a non-success status.
    #[error("manifest request for {url} returned {status}")]
    Status { url: String, status: u16 },

    /// The manifest has no `<media url="...">` element.
    #[error("manifest for {url} has no media url")]
    NoMediaUrl { url: String },

    /// The player program could not be started.
    #[error("cannot run player {program}: {source}")]
    Player {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_error_labels() {
        let err = TickError::from(ConfigError::NotAnObject);
        assert_eq!(err.as_label(), "tick_config");
        assert!(err.as_message().starts_with("config: "));

        let err = TickError::from(StoreError::Read {
            path: PathBuf::from("tmp/state.json"),
            source: std::io::Error::other("boom"),
        });
        assert_eq!(err.as_label(), "tick_store");
        assert!(err.to_string().contains("tmp/state.json"));
    }

    #[test]
    fn revision_stderr_message_names_directory() {
        let err = RevisionError::Stderr {
            command: "git rev-parse HEAD".into(),
            dir: PathBuf::from("/opt/signage"),
            stderr: "fatal: not a git repository".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/opt/signage"));
        assert!(msg.contains("not a git repository"));
    }
}
