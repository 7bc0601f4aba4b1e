//! # signvisor
//!
//! **Signvisor** keeps an unattended signage player up to date and showing
//! the right content.
//!
//! It periodically pulls its own installation directory and a shared
//! configuration repository, restarts itself when its own code changes,
//! looks up this device's entry in the configuration document by hardware
//! address and, when that entry changes, replaces the running display or
//! playback client.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐
//!     │ GitRepo      │   │ GitRepo      │   │ SysfsIdentity    │   │ConfigResolver│
//!     │(install dir) │   │(config repo) │   │(/sys/class/net)  │   │  (cls.json)  │
//!     └──────┬───────┘   └──────┬───────┘   └────────┬─────────┘   └──────┬───────┘
//!            ▼                  ▼                    ▼                    ▼
//! ┌──────────────────────────────────────────────────────────────────────────────┐
//! │  Supervisor (one tick per poll interval)                                     │
//! │  - StateStore (tmp/state.json: revisions already acted upon)                 │
//! │  - last Fingerprint (this device's entry, in memory)                         │
//! │  - ManagedProcessSet (display client / playback client)                      │
//! │  - SubscriberSet (fans out events)                                           │
//! └──────┬───────────────────────────────────────────────────────┬───────────────┘
//!        │ spawn / terminate                                     │ emit(Event)
//!        ▼                                                       ▼
//!  ┌────────────────────────────┐                     ┌────────────────────────┐
//!  │ electron browser.js …      │                     │ SubscriberSet          │
//!  │ signage-playback <urls…>   │                     │  ├─ LogWriter (tmp/log)│
//!  └────────────────────────────┘                     │  └─ custom subscribers │
//!                                                     └────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Config::from_env() ──► InstanceGuard ──► Supervisor::builder(cfg).build() ──► run()
//!
//! run() ──► ExitReason::SoftwareUpdated ──► relaunch(strategy, delay) ──► exit 0
//!       ──► ExitReason::ShutdownRequested ──────────────────────────────► exit 130
//!       ──► Err(RuntimeError) ─────────────────────────────────────────► exit 1
//! ```
//!
//! ## Features
//! | Area               | Description                                                  | Key types / traits                          |
//! |--------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Supervision**    | Tick loop, process replacement, graceful shutdown.           | [`Supervisor`], [`TickOutcome`]             |
//! | **Revisions**      | Pull and read the checked-out revision of a directory.       | [`RevisionSource`], [`GitRepo`]             |
//! | **Identity**       | Stable per-device id from the network interface.             | [`IdentityResolver`], [`MacAddress`]        |
//! | **Device config**  | Per-device entries, validation and change detection.         | [`DeviceConfig`], [`Fingerprint`]           |
//! | **State**          | Durable revision bookkeeping.                                | [`StateStore`], [`SupervisorState`]         |
//! | **Subscriber API** | Hook into supervisor events (log file, custom sinks).        | [`Subscribe`], [`LogWriter`]                |
//! | **Playback**       | Manifest lookup and looping media playback.                  | [`ManifestResolver`], [`Playlist`]          |
//! | **Errors**         | Typed errors per component.                                  | [`TickError`], [`RuntimeError`]             |
//! | **Configuration**  | Defaults plus `SIGNAGE_*` environment overrides.             | [`Config`]                                  |
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use signvisor::{Config, ExitReason, LogWriter, Subscribe, Supervisor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg = Config::from_env()?;
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::for_work_dir(&cfg.work_dir))];
//!
//!     let sup = Supervisor::builder(cfg).with_subscribers(subs).build();
//!     match sup.run().await? {
//!         ExitReason::SoftwareUpdated { revision } => println!("now at {revision}"),
//!         ExitReason::ShutdownRequested => println!("stopped"),
//!     }
//!     Ok(())
//! }
//! ```
mod core;
mod device;
mod error;
mod events;
mod identity;
mod playback;
mod revision;
mod store;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{
    ClientCommand, Config, DisplayProfile, ExitReason, InstanceGuard, LaunchCommand,
    ManagedProcessSet, RestartStrategy, Supervisor, SupervisorBuilder, TickOutcome,
    listen_for_shutdown, relaunch,
};
pub use device::{
    ConfigResolver, DeviceConfig, DeviceMapping, Fingerprint, Orientation, ResolvedConfig,
};
pub use error::{
    ConfigError, PlaybackError, RevisionError, RuntimeError, SpawnError, StoreError, TickError,
};
pub use events::{Event, EventKind};
pub use identity::{FixedIdentity, IdentityRef, IdentityResolver, Lookup, MacAddress, SysfsIdentity};
pub use playback::{
    DEFAULT_MANIFEST_BASE, DEFAULT_PLAYER, ManifestResolver, Player, Playlist, media_url,
    play_forever, portal_entry,
};
pub use revision::{GitRepo, PullReport, RevisionRef, RevisionSource, StaticRevision};
pub use store::{StateStore, SupervisorState};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
