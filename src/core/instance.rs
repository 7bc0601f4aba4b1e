//! # Single-instance guard.
//!
//! Two supervisors against one working directory would fight over the state
//! file and each other's children. [`InstanceGuard`] records our pid in
//! `<work_dir>/tmp/signvisor.pid` and refuses to start while that file names a
//! live process other than ourselves. A stale file (dead pid, garbage) is
//! taken over.

use std::path::{Path, PathBuf};

use crate::error::RuntimeError;
use crate::store::SCRATCH_DIR;

const PID_FILE: &str = "signvisor.pid";

/// Holds the pid file for as long as it lives; removes it on drop.
#[derive(Debug)]
pub struct InstanceGuard {
    path: PathBuf,
}

impl InstanceGuard {
    /// Claims `work_dir` for this process.
    pub fn acquire(work_dir: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let dir = work_dir.as_ref().join(SCRATCH_DIR);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(PID_FILE);

        let me = std::process::id();
        if let Some(pid) = read_pid(&path) {
            if pid != me && is_process_alive(pid) {
                return Err(RuntimeError::AlreadyRunning {
                    pid,
                    dir: work_dir.as_ref().to_path_buf(),
                });
            }
        }

        std::fs::write(&path, me.to_string())?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn read_pid(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Check whether a process with the given PID is alive.
#[cfg(unix)]
fn is_process_alive(pid: u32) -> bool {
    // Values that wrap negative would address process groups.
    let Ok(raw_pid) = i32::try_from(pid) else {
        return false;
    };
    if raw_pid == 0 {
        return false;
    }
    // kill(pid, 0) checks existence without sending a signal
    nix::sys::signal::kill(nix::unistd::Pid::from_raw(raw_pid), None).is_ok()
}

#[cfg(not(unix))]
fn is_process_alive(_pid: u32) -> bool {
    false
}
