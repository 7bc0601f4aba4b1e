//! # Events emitted by the supervisor loop.
//!
//! [`EventKind`] groups events into:
//! - **Runtime events**: start, shutdown
//! - **Software events**: pull diagnostics, new software
//! - **Configuration events**: revision bookkeeping, identity, lookup misses
//! - **Process events**: terminate, spawn, spawn failure, unknown mode
//! - **Failure events**: a tick aborted with an error
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use signvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::DeviceNotConfigured).with_device("aa:bb:cc:dd:ee:ff");
//!
//! assert_eq!(ev.kind, EventKind::DeviceNotConfigured);
//! assert_eq!(ev.device.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of supervisor events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Runtime events ===
    /// Supervisor loop is starting.
    ///
    /// Sets:
    /// - `source`: working directory
    SupervisorStarted,

    /// Shutdown requested (OS signal observed).
    ShutdownRequested,

    // === Software events ===
    /// Pull succeeded but wrote diagnostics to stderr.
    ///
    /// Sets:
    /// - `source`: revision source name (directory)
    /// - `reason`: stderr text
    PullWarning,

    /// Own installation directory moved to a new revision; the supervisor will exit.
    ///
    /// Sets:
    /// - `revision`: new software revision
    SoftwareUpdated,

    // === Configuration events ===
    /// Configuration repository moved to a new revision (bookkeeping only).
    ///
    /// Sets:
    /// - `revision`: new configuration revision
    ConfigRevisionAdvanced,

    /// Device identity could not be resolved; configuration is skipped this tick.
    ///
    /// Sets:
    /// - `reason`: why resolution failed
    IdentityMissing,

    /// Several hardware addresses found; the first one is used.
    ///
    /// Sets:
    /// - `device`: chosen address
    /// - `reason`: all candidates
    IdentityAmbiguous,

    /// The configuration document has no entry for this device.
    ///
    /// Sets:
    /// - `device`: device identity
    DeviceNotConfigured,

    // === Process events ===
    /// Previously managed processes were signalled to terminate.
    ///
    /// Sets:
    /// - `count`: number of processes signalled
    ProcessesTerminated,

    /// A managed client was launched.
    ///
    /// Sets:
    /// - `source`: client program
    /// - `mode`: configuration mode
    /// - `pid`: process id (when the OS reports one)
    /// - `reason`: launch arguments
    ProcessSpawned,

    /// A managed client could not be launched.
    ///
    /// Sets:
    /// - `source`: client program
    /// - `mode`: configuration mode
    /// - `reason`: error message
    SpawnFailed,

    /// The device's configuration declares a mode the supervisor cannot run.
    ///
    /// Sets:
    /// - `device`: device identity
    /// - `mode`: declared mode
    UnknownMode,

    // === Failure events ===
    /// A tick was aborted by an error.
    ///
    /// Sets:
    /// - `reason`: error message
    TickFailed,
}

/// Supervisor event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Directory, revision source or client program the event is about.
    pub source: Option<Arc<str>>,
    /// Device identity.
    pub device: Option<Arc<str>>,
    /// Revision id.
    pub revision: Option<Arc<str>>,
    /// Configuration mode.
    pub mode: Option<Arc<str>>,
    /// Process id of a spawned client.
    pub pid: Option<u32>,
    /// Number of processes affected.
    pub count: Option<u32>,
    /// Human-readable detail (errors, stderr text, arguments).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            source: None,
            device: None,
            revision: None,
            mode: None,
            pid: None,
            count: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[inline]
    pub fn with_device(mut self, device: impl Into<Arc<str>>) -> Self {
        self.device = Some(device.into());
        self
    }

    #[inline]
    pub fn with_revision(mut self, revision: impl Into<Arc<str>>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    #[inline]
    pub fn with_mode(mut self, mode: impl Into<Arc<str>>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    #[inline]
    pub fn with_pid(mut self, pid: Option<u32>) -> Self {
        self.pid = pid;
        self
    }

    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(u32::try_from(count).unwrap_or(u32::MAX));
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::SupervisorStarted);
        let b = Event::new(EventKind::TickFailed);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_attach_metadata() {
        let ev = Event::new(EventKind::ProcessSpawned)
            .with_source("electron")
            .with_mode("browser")
            .with_pid(Some(42))
            .with_reason("browser.js http://x 1920 1080");
        assert_eq!(ev.source.as_deref(), Some("electron"));
        assert_eq!(ev.mode.as_deref(), Some("browser"));
        assert_eq!(ev.pid, Some(42));
        assert!(ev.device.is_none());
    }
}
