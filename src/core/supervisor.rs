//! # Supervisor: the tick loop.
//!
//! The [`Supervisor`] owns the state store, both revision sources, the identity
//! and configuration resolvers, the managed process set and the subscriber set.
//! It runs one tick at a time and sleeps between ticks.
//!
//! ## Tick
//! ```text
//! ensure tmp/ ─► load state
//!   │
//!   ├─► software: pull + current_revision
//!   │     └─ differs from state ─► save state ─► terminate children ─► SoftwareUpdated (loop ends)
//!   │
//!   ├─► identity: resolve (missing → logged, configuration skipped)
//!   ├─► config repo: pull + current_revision
//!   │     └─ differs from state ─► save state (bookkeeping only)
//!   │
//!   └─► identity present:
//!         load mapping ─► resolve entry
//!           ├─ absent            ─► DeviceNotConfigured, no process action
//!           ├─ same fingerprint  ─► Unchanged
//!           └─ new fingerprint   ─► terminate children ─► dispatch on mode
//!                                     ├─ browser ─► spawn display client
//!                                     ├─ video   ─► spawn playback client
//!                                     └─ unknown ─► UnknownMode
//! ```
//!
//! ## Loop
//! ```text
//! loop {
//!   tick() ── Ok(SoftwareUpdated) ─► drain log ─► return ExitReason::SoftwareUpdated
//!          ── Ok(_)               ─► continue
//!          ── Err(e)              ─► TickFailed (logged), continue
//!   select! {
//!     sleep(poll_interval)        ─► next tick
//!     shutdown.cancelled()        ─► terminate children ─► drain log ─► ExitReason::ShutdownRequested
//!   }
//! }
//! ```
//!
//! ## Rules
//! - Ticks never overlap; the only cancellable wait is the end-of-tick sleep.
//! - The state file is written only when a revision actually changed.
//! - Children are replaced only when this device's entry fingerprint changes.
//! - A failed launch leaves the fingerprint unrecorded so the next tick retries.

use tokio_util::sync::CancellationToken;

use super::{
    builder::SupervisorBuilder,
    config::Config,
    processes::{LaunchCommand, ManagedProcessSet},
    shutdown,
};
use crate::{
    device::{ConfigResolver, DeviceConfig, Fingerprint, ResolvedConfig},
    error::{RuntimeError, TickError},
    events::{Event, EventKind},
    identity::{IdentityRef, Lookup, MacAddress},
    revision::RevisionRef,
    store::{StateStore, SupervisorState},
    subscribers::SubscriberSet,
};

/// What one tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// New software revision recorded; children terminated; the loop must end.
    SoftwareUpdated { revision: String },
    /// No device identity this tick.
    NoIdentity,
    /// The configuration document has no entry for this device.
    NotConfigured { device: MacAddress },
    /// This device's entry has the fingerprint already acted upon.
    Unchanged,
    /// Children replaced by a freshly launched client.
    Applied { mode: String, pid: Option<u32> },
    /// Children terminated; the declared mode cannot be run.
    UnknownMode { mode: String },
    /// Children terminated; the new client could not be launched.
    SpawnFailed,
}

/// Why [`Supervisor::run`] returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// Own software changed; the process should be relaunched.
    SoftwareUpdated { revision: String },
    /// An OS signal (or the injected token) asked us to stop.
    ShutdownRequested,
}

/// Periodically reconciles software, configuration and the managed client.
pub struct Supervisor {
    cfg: Config,
    store: StateStore,
    software: RevisionRef,
    config_repo: RevisionRef,
    identity: IdentityRef,
    resolver: ConfigResolver,
    processes: ManagedProcessSet,
    subs: SubscriberSet,
    shutdown: Option<CancellationToken>,
    last_fingerprint: Option<Fingerprint>,
}

impl Supervisor {
    /// Creates a builder for a supervisor using `cfg`.
    pub fn builder(cfg: Config) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn new_internal(
        cfg: Config,
        store: StateStore,
        software: RevisionRef,
        config_repo: RevisionRef,
        identity: IdentityRef,
        resolver: ConfigResolver,
        processes: ManagedProcessSet,
        subs: SubscriberSet,
        shutdown: Option<CancellationToken>,
    ) -> Self {
        Self {
            cfg,
            store,
            software,
            config_repo,
            identity,
            resolver,
            processes,
            subs,
            shutdown,
            last_fingerprint: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn processes(&self) -> &ManagedProcessSet {
        &self.processes
    }

    /// Fingerprint of the entry the current children were launched for.
    pub fn last_fingerprint(&self) -> Option<&Fingerprint> {
        self.last_fingerprint.as_ref()
    }

    /// Runs ticks until the software changes or shutdown is requested.
    ///
    /// Tick failures are logged and never end the loop. The subscriber set is
    /// drained before returning.
    pub async fn run(mut self) -> Result<ExitReason, RuntimeError> {
        let token = match self.shutdown.take() {
            Some(token) => token,
            None => shutdown::listen().map_err(RuntimeError::Signal)?,
        };
        self.emit(
            Event::new(EventKind::SupervisorStarted)
                .with_source(self.cfg.work_dir.display().to_string()),
        );

        let reason = loop {
            match self.tick().await {
                Ok(TickOutcome::SoftwareUpdated { revision }) => {
                    break ExitReason::SoftwareUpdated { revision };
                }
                Ok(_) => {}
                Err(e) => self.emit(Event::new(EventKind::TickFailed).with_reason(e.as_message())),
            }

            let sleep = tokio::time::sleep(self.cfg.poll_interval);
            tokio::pin!(sleep);
            tokio::select! {
                _ = &mut sleep => {}
                _ = token.cancelled() => {
                    self.emit(Event::new(EventKind::ShutdownRequested));
                    self.terminate_all();
                    break ExitReason::ShutdownRequested;
                }
            }
        };

        self.close().await;
        Ok(reason)
    }

    /// Drains pending events into the subscribers and drops the supervisor.
    ///
    /// Managed children are left as they are.
    pub async fn close(self) {
        self.subs.shutdown().await;
    }

    /// Runs one tick.
    pub async fn tick(&mut self) -> Result<TickOutcome, TickError> {
        self.store.ensure_dir().await?;
        let mut state = self.store.load().await?;

        if !self.cfg.debug {
            let revision = self.fetch_revision(&self.software).await?;
            if revision != state.software_revision {
                return self.software_updated(state, revision).await;
            }
        }

        let lookup = self.identity.resolve().await;
        self.report_identity(&lookup);

        let config_revision = self.fetch_revision(&self.config_repo).await?;
        if config_revision != state.config_revision {
            state.config_revision = config_revision.clone();
            self.store.save(&state).await?;
            self.emit(
                Event::new(EventKind::ConfigRevisionAdvanced).with_revision(config_revision),
            );
        }

        let Some(device) = lookup.address() else {
            return Ok(TickOutcome::NoIdentity);
        };
        let mapping = self.resolver.load_mapping().await?;
        let Some(resolved) = mapping.resolve(device)? else {
            self.emit(Event::new(EventKind::DeviceNotConfigured).with_device(device.as_str()));
            return Ok(TickOutcome::NotConfigured {
                device: device.clone(),
            });
        };

        if self.last_fingerprint.as_ref() == Some(&resolved.fingerprint) {
            return Ok(TickOutcome::Unchanged);
        }
        Ok(self.apply(device, resolved))
    }

    /// Records the new software revision, then stops every child.
    async fn software_updated(
        &mut self,
        mut state: SupervisorState,
        revision: String,
    ) -> Result<TickOutcome, TickError> {
        state.software_revision = revision.clone();
        self.store.save(&state).await?;
        self.emit(Event::new(EventKind::SoftwareUpdated).with_revision(revision.as_str()));
        self.terminate_all();
        Ok(TickOutcome::SoftwareUpdated { revision })
    }

    async fn fetch_revision(&self, source: &RevisionRef) -> Result<String, TickError> {
        let report = source.pull().await?;
        if let Some(stderr) = report.stderr {
            self.emit(
                Event::new(EventKind::PullWarning)
                    .with_source(source.name())
                    .with_reason(stderr),
            );
        }
        Ok(source.current_revision().await?)
    }

    fn report_identity(&self, lookup: &Lookup) {
        match lookup {
            Lookup::Found(_) => {}
            Lookup::Ambiguous { first, all } => {
                let all: Vec<&str> = all.iter().map(MacAddress::as_str).collect();
                self.emit(
                    Event::new(EventKind::IdentityAmbiguous)
                        .with_device(first.as_str())
                        .with_reason(all.join(", ")),
                );
            }
            Lookup::Missing { reason } => {
                self.emit(Event::new(EventKind::IdentityMissing).with_reason(reason.as_str()));
            }
        }
    }

    /// Replaces the children according to a changed entry.
    fn apply(&mut self, device: &MacAddress, resolved: ResolvedConfig) -> TickOutcome {
        self.terminate_all();

        let outcome = match &resolved.config {
            DeviceConfig::Browser { url, orientation } => {
                let profile = self.cfg.display_profile(*orientation);
                let command = LaunchCommand::browser(&self.cfg.display_client, url, profile);
                self.launch("browser", command)
            }
            DeviceConfig::Video { urls } => {
                let command = LaunchCommand::video(&self.cfg.playback_client, urls);
                self.launch("video", command)
            }
            DeviceConfig::Unknown { mode } => {
                self.emit(
                    Event::new(EventKind::UnknownMode)
                        .with_device(device.as_str())
                        .with_mode(mode.as_str()),
                );
                TickOutcome::UnknownMode { mode: mode.clone() }
            }
        };

        if outcome != TickOutcome::SpawnFailed {
            self.last_fingerprint = Some(resolved.fingerprint);
        }
        outcome
    }

    fn launch(&mut self, mode: &str, command: LaunchCommand) -> TickOutcome {
        let program = command.program.clone();
        let args = command.args_line();
        match self.processes.spawn(command) {
            Ok(pid) => {
                self.emit(
                    Event::new(EventKind::ProcessSpawned)
                        .with_source(program)
                        .with_mode(mode)
                        .with_pid(pid)
                        .with_reason(args),
                );
                TickOutcome::Applied {
                    mode: mode.to_string(),
                    pid,
                }
            }
            Err(e) => {
                self.emit(
                    Event::new(EventKind::SpawnFailed)
                        .with_source(program)
                        .with_mode(mode)
                        .with_reason(e.to_string()),
                );
                TickOutcome::SpawnFailed
            }
        }
    }

    fn terminate_all(&mut self) {
        let count = self.processes.terminate_all();
        if count > 0 {
            self.emit(Event::new(EventKind::ProcessesTerminated).with_count(count));
        }
    }

    fn emit(&self, event: Event) {
        self.subs.emit(event);
    }
}
