//! # Managed client processes.
//!
//! [`ManagedProcessSet`] owns every OS process the supervisor launched. Raw
//! handles never leave this module; callers see [`LaunchCommand`]s and pids.
//!
//! ## Rules
//! - `spawn` is fire-and-forget: the child runs independently of the loop.
//! - `terminate_all` sends SIGTERM (unix) to each child, hands the handle to a
//!   background reaper and clears the set without waiting for exit.
//! - Children already gone are skipped silently.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::core::config::{ClientCommand, DisplayProfile};
use crate::error::SpawnError;

/// Program and full argument list of a managed client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    /// Display client: `[client args...] url width height [extra...]`.
    pub fn browser(client: &ClientCommand, url: &str, profile: &DisplayProfile) -> Self {
        let mut args = client.args.clone();
        args.push(url.to_string());
        args.push(profile.width.to_string());
        args.push(profile.height.to_string());
        args.extend(profile.extra_args.iter().cloned());
        Self {
            program: client.program.clone(),
            args,
        }
    }

    /// Playback client: `[client args...] url...`.
    pub fn video(client: &ClientCommand, urls: &[String]) -> Self {
        let mut args = client.args.clone();
        args.extend(urls.iter().cloned());
        Self {
            program: client.program.clone(),
            args,
        }
    }

    /// Arguments joined by spaces, for logs.
    pub fn args_line(&self) -> String {
        self.args.join(" ")
    }
}

struct ManagedProcess {
    command: LaunchCommand,
    pid: Option<u32>,
    child: Child,
}

/// The set of live managed processes.
#[derive(Default)]
pub struct ManagedProcessSet {
    cwd: Option<PathBuf>,
    procs: Vec<ManagedProcess>,
}

impl ManagedProcessSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Children are started with `dir` as their working directory.
    pub fn with_cwd(dir: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(dir.into()),
            procs: Vec::new(),
        }
    }

    /// Launches `command` and starts tracking it. Returns the child's pid.
    pub fn spawn(&mut self, command: LaunchCommand) -> Result<Option<u32>, SpawnError> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .kill_on_drop(false);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|source| SpawnError {
            program: command.program.clone(),
            source,
        })?;
        let pid = child.id();
        self.procs.push(ManagedProcess {
            command,
            pid,
            child,
        });
        Ok(pid)
    }

    /// Signals every managed process to terminate and clears the set.
    ///
    /// Returns how many processes were signalled.
    pub fn terminate_all(&mut self) -> usize {
        let count = self.procs.len();
        for mut proc in self.procs.drain(..) {
            signal_terminate(&mut proc.child);
            // Reap in the background so exited clients do not linger as zombies.
            tokio::spawn(async move {
                let _ = proc.child.wait().await;
            });
        }
        count
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    /// Launch commands of the live set, oldest first.
    pub fn commands(&self) -> impl Iterator<Item = &LaunchCommand> {
        self.procs.iter().map(|p| &p.command)
    }

    /// Pids of the live set, oldest first.
    pub fn pids(&self) -> Vec<u32> {
        self.procs.iter().filter_map(|p| p.pid).collect()
    }
}

#[cfg(unix)]
fn signal_terminate(child: &mut Child) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Some(raw) = child.id().and_then(|pid| i32::try_from(pid).ok()) else {
        return;
    };
    // ESRCH: already exited.
    let _ = kill(Pid::from_raw(raw), Signal::SIGTERM);
}

#[cfg(not(unix))]
fn signal_terminate(child: &mut Child) {
    let _ = child.start_kill();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn profile() -> DisplayProfile {
        DisplayProfile {
            width: 1080,
            height: 1920,
            extra_args: vec!["--display-rotate=90".into()],
        }
    }

    #[test]
    fn browser_arguments_follow_display_contract() {
        let client = ClientCommand::new("electron").arg("browser.js");
        let cmd = LaunchCommand::browser(&client, "http://x", &profile());
        assert_eq!(cmd.program, "electron");
        assert_eq!(
            cmd.args,
            vec!["browser.js", "http://x", "1080", "1920", "--display-rotate=90"]
        );
    }

    #[test]
    fn video_arguments_keep_url_order() {
        let client = ClientCommand::new("signage-playback");
        let cmd = LaunchCommand::video(&client, &["http://a".into(), "http://b".into()]);
        assert_eq!(cmd.args, vec!["http://a", "http://b"]);
        assert_eq!(cmd.args_line(), "http://a http://b");
    }

    #[tokio::test]
    async fn spawn_failure_is_reported() {
        let mut set = ManagedProcessSet::new();
        let err = set
            .spawn(LaunchCommand {
                program: "/nonexistent/signage-client".into(),
                args: vec![],
            })
            .unwrap_err();
        assert_eq!(err.program, "/nonexistent/signage-client");
        assert!(set.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn terminate_all_signals_and_clears() {
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        let mut set = ManagedProcessSet::new();
        let pid = set
            .spawn(LaunchCommand {
                program: "sleep".into(),
                args: vec!["30".into()],
            })
            .unwrap()
            .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.pids(), vec![pid]);

        assert_eq!(set.terminate_all(), 1);
        assert!(set.is_empty());

        let pid = Pid::from_raw(i32::try_from(pid).unwrap());
        let mut gone = false;
        for _ in 0..50 {
            if kill(pid, None).is_err() {
                gone = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(gone, "child should be terminated and reaped");
    }

    #[tokio::test]
    async fn terminate_all_on_empty_set_is_a_no_op() {
        let mut set = ManagedProcessSet::new();
        assert_eq!(set.terminate_all(), 0);
    }
}
