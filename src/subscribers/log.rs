//! # LogWriter: the supervisor's persistent log
//!
//! Renders each [`Event`] as one line, prints it to stdout and appends it to
//! `<work_dir>/tmp/log`.
//!
//! ## Example output
//! ```text
//! [2026-10-19 08:00] Starting supervisor in /opt/signage
//! [2026-10-19 08:00] Got output on STDERR when doing git pull in /opt/signage: From github.com:org/signage
//! [2026-10-19 08:00] Stopped 1 managed process(es)
//! [2026-10-19 08:00] Started electron (pid 4242) for browser: browser.js http://x 1080 1920 --display-rotate=90
//! [2026-10-19 08:05] No configuration for device aa:bb:cc:dd:ee:ff
//! [2026-10-19 08:10] Encountered error: revision: `git pull` failed in ../config (exit status: 1): ...
//! [2026-10-19 08:15] Got new software. Restarting...
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::io::AsyncWriteExt;

use crate::events::{Event, EventKind};
use crate::store::SCRATCH_DIR;
use crate::subscribers::Subscribe;

const LOG_FILE: &str = "log";

/// Appends timestamped lines to a log file and echoes them to stdout.
#[derive(Debug, Clone)]
pub struct LogWriter {
    path: PathBuf,
    echo: bool,
}

impl LogWriter {
    /// Writer appending to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            echo: true,
        }
    }

    /// Writer for the standard `<work_dir>/tmp/log` location.
    #[must_use]
    pub fn for_work_dir(work_dir: impl AsRef<Path>) -> Self {
        Self::new(work_dir.as_ref().join(SCRATCH_DIR).join(LOG_FILE))
    }

    /// Disables the stdout echo (file only).
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full log line, `[YYYY-MM-DD HH:MM] message`.
    pub fn line(e: &Event) -> String {
        let at: DateTime<Local> = e.at.into();
        format!("[{}] {}", at.format("%Y-%m-%d %H:%M"), Self::message(e))
    }

    /// Message text for an event.
    pub fn message(e: &Event) -> String {
        let source = e.source.as_deref().unwrap_or("?");
        let device = e.device.as_deref().unwrap_or("?");
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::SupervisorStarted => format!("Starting supervisor in {source}"),
            EventKind::ShutdownRequested => {
                "Shutdown requested. Stopping managed processes...".to_string()
            }
            EventKind::PullWarning => {
                format!("Got output on STDERR when doing git pull in {source}: {reason}")
            }
            EventKind::SoftwareUpdated => "Got new software. Restarting...".to_string(),
            EventKind::ConfigRevisionAdvanced => format!(
                "Configuration repository at revision {}",
                e.revision.as_deref().unwrap_or("?")
            ),
            EventKind::IdentityMissing => format!("Could not resolve device identity: {reason}"),
            EventKind::IdentityAmbiguous => {
                format!("Multiple hardware addresses found ({reason}); using {device}")
            }
            EventKind::DeviceNotConfigured => format!("No configuration for device {device}"),
            EventKind::ProcessesTerminated => format!(
                "Stopped {} managed process(es)",
                e.count.unwrap_or_default()
            ),
            EventKind::ProcessSpawned => {
                let pid = e.pid.map_or_else(|| "?".to_string(), |p| p.to_string());
                format!(
                    "Started {source} (pid {pid}) for {}: {reason}",
                    e.mode.as_deref().unwrap_or("?")
                )
            }
            EventKind::SpawnFailed => format!(
                "Failed to start {source} for {}: {reason}",
                e.mode.as_deref().unwrap_or("?")
            ),
            EventKind::UnknownMode => format!(
                "Unknown mode {:?} for device {device}",
                e.mode.as_deref().unwrap_or("")
            ),
            EventKind::TickFailed => format!("Encountered error: {reason}"),
        }
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{line}\n").as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let line = Self::line(e);
        if self.echo {
            println!("{line}");
        }
        if let Err(err) = self.append(&line).await {
            eprintln!("[log] cannot append to {}: {err}", self.path.display());
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
