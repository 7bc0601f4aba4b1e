//! # Self-restart after a software update.
//!
//! ```text
//! RestartStrategy::Exit   → sleep(delay) → caller exits 0 → service manager relaunches
//! RestartStrategy::Reexec → sleep(delay) → spawn current_exe(args) → caller exits 0
//! ```
//!
//! Managed children are already terminated and the log drained by the time
//! this runs.

use std::process::Stdio;
use std::time::Duration;

use crate::core::config::RestartStrategy;
use crate::error::RuntimeError;

/// Waits `delay`, then prepares the relaunch according to `strategy`.
///
/// Returns the pid of the new copy for [`RestartStrategy::Reexec`].
pub async fn relaunch(
    strategy: RestartStrategy,
    delay: Duration,
) -> Result<Option<u32>, RuntimeError> {
    tokio::time::sleep(delay).await;
    match strategy {
        RestartStrategy::Exit => Ok(None),
        RestartStrategy::Reexec => {
            let exe = std::env::current_exe().map_err(RuntimeError::Restart)?;
            let child = std::process::Command::new(exe)
                .args(std::env::args_os().skip(1))
                .stdin(Stdio::null())
                .spawn()
                .map_err(RuntimeError::Restart)?;
            Ok(Some(child.id()))
        }
    }
}
