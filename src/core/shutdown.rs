//! # Cross-platform OS signal handling.
//!
//! Provides [`listen`] which installs termination signal handlers and returns
//! a [`CancellationToken`] cancelled when the first signal arrives.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd)
//! - `SIGQUIT` (quit signal, often used for core dumps or hard stop)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

use tokio_util::sync::CancellationToken;

/// Installs signal handlers and returns a token cancelled on the first signal.
///
/// Returns `Err` if signal registration fails. Must be called inside a tokio runtime.
#[cfg(unix)]
pub fn listen() -> std::io::Result<CancellationToken> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv()  => {},
            _ = sigterm.recv() => {},
            _ = sigquit.recv() => {},
        }
        trigger.cancel();
    });
    Ok(token)
}

/// Installs signal handlers and returns a token cancelled on the first signal.
///
/// Returns `Err` if signal registration fails. Must be called inside a tokio runtime.
#[cfg(not(unix))]
pub fn listen() -> std::io::Result<CancellationToken> {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    Ok(token)
}
