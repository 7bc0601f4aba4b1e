//! Runtime core: the supervisor loop and everything it drives directly.
//!
//! Internal modules:
//! - [`config`]: runtime settings and environment overrides;
//! - [`builder`]: assembles a [`Supervisor`] from config plus optional overrides;
//! - [`supervisor`]: the tick and the poll loop;
//! - [`processes`]: spawning and terminating managed clients;
//! - [`shutdown`]: cross-platform shutdown signal handling;
//! - [`instance`]: single-instance pid guard;
//! - [`restart`]: relaunch after a software update.

mod builder;
mod config;
mod instance;
mod processes;
mod restart;
mod shutdown;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use config::{ClientCommand, Config, DisplayProfile, RestartStrategy};
pub use instance::InstanceGuard;
pub use processes::{LaunchCommand, ManagedProcessSet};
pub use restart::relaunch;
pub use shutdown::listen as listen_for_shutdown;
pub use supervisor::{ExitReason, Supervisor, TickOutcome};
