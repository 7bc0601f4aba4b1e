//! Supervisor entry point.
//!
//! Exit codes: `0` after a software update (the process is meant to be
//! relaunched), `130` after a shutdown signal, `1` on a fatal error.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use signvisor::{
    Config, ExitReason, InstanceGuard, LogWriter, RuntimeError, Subscribe, Supervisor, relaunch,
};

const EXIT_SIGNALLED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("signvisor: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let cfg = Config::from_env().context("invalid configuration")?;
    let guard = InstanceGuard::acquire(&cfg.work_dir).map_err(|e| match e {
        RuntimeError::AlreadyRunning { .. } => anyhow::anyhow!(e.as_message()),
        other => anyhow::Error::new(other).context("cannot claim working directory"),
    })?;

    let (strategy, delay) = (cfg.restart, cfg.restart_delay);
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::for_work_dir(&cfg.work_dir))];
    let sup = Supervisor::builder(cfg).with_subscribers(subs).build();

    let reason = sup.run().await.context("supervisor stopped")?;
    // The replacement process must be able to claim the pid file.
    drop(guard);

    match reason {
        ExitReason::SoftwareUpdated { .. } => {
            if let Some(pid) = relaunch(strategy, delay).await.context("restart failed")? {
                println!("signvisor: relaunched as pid {pid}");
            }
            Ok(ExitCode::SUCCESS)
        }
        ExitReason::ShutdownRequested => Ok(ExitCode::from(EXIT_SIGNALLED)),
    }
}
