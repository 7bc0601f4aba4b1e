//! # Supervisor configuration.
//!
//! Provides [`Config`] centralized settings for the supervisor, built once at
//! startup and passed by reference into [`Supervisor::builder`](crate::Supervisor::builder).
//!
//! Config comes from two layers:
//! 1. **Defaults**: `Config::default()`
//! 2. **Environment**: `Config::from_env()` overrides individual fields (`SIGNAGE_*`)
//!
//! ## Debug mode
//! `debug = true` replaces every version-control call with a fixed revision,
//! the hardware lookup with [`Config::debug_device`], and the shared document
//! with a built-in browser entry (or the local file in [`Config::debug_config`]).

use std::path::PathBuf;
use std::time::Duration;

use crate::device::Orientation;
use crate::error::ConfigError;
use crate::identity::MacAddress;

/// Program plus leading arguments of an external client.
///
/// `"electron browser.js"` → program `electron`, args `["browser.js"]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ClientCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Whitespace-splits `raw`; `None` when it is blank.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

/// Window geometry and extra display-client arguments for one orientation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayProfile {
    pub width: u32,
    pub height: u32,
    pub extra_args: Vec<String>,
}

/// What happens after the supervisor decides to restart itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestartStrategy {
    /// Exit and let the service manager relaunch us (default).
    #[default]
    Exit,
    /// Launch a fresh copy of the current executable, then exit.
    Reexec,
}

/// Global configuration for the supervisor.
///
/// ## Field semantics
/// - `work_dir`: holds `tmp/state.json` and `tmp/log`
/// - `install_dir`: supervisor's own checkout (software revision source, client cwd)
/// - `config_dir`/`config_file`: configuration repository and the shared document in it
/// - `interface`: network interface whose hardware address identifies the device
/// - `poll_interval`: sleep between ticks
/// - `restart`/`restart_delay`: self-restart strategy and the pause before it
#[derive(Clone, Debug)]
pub struct Config {
    pub work_dir: PathBuf,
    pub install_dir: PathBuf,
    pub config_dir: PathBuf,
    pub config_file: String,
    pub interface: String,
    pub poll_interval: Duration,
    pub restart: RestartStrategy,
    pub restart_delay: Duration,
    /// Full-screen kiosk renderer; receives `url width height [extra...]`.
    pub display_client: ClientCommand,
    /// Media loop helper; receives the URL list.
    pub playback_client: ClientCommand,
    pub portrait: DisplayProfile,
    pub landscape: DisplayProfile,
    pub debug: bool,
    pub debug_device: MacAddress,
    /// Local mapping file used instead of the built-in one in debug mode.
    pub debug_config: Option<PathBuf>,
}

impl Config {
    /// Path of the shared device → configuration document.
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(&self.config_file)
    }

    /// Display profile for `orientation`.
    pub fn display_profile(&self, orientation: Orientation) -> &DisplayProfile {
        match orientation {
            Orientation::Portrait => &self.portrait,
            Orientation::Landscape => &self.landscape,
        }
    }

    /// Defaults overridden by `SIGNAGE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `SIGNAGE_*` key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SIGNAGE_WORK_DIR") {
            cfg.work_dir = v.into();
        }
        if let Some(v) = get("SIGNAGE_INSTALL_DIR") {
            cfg.install_dir = v.into();
        }
        if let Some(v) = get("SIGNAGE_CONFIG_DIR") {
            cfg.config_dir = v.into();
        }
        if let Some(v) = get("SIGNAGE_CONFIG_FILE") {
            cfg.config_file = v;
        }
        if let Some(v) = get("SIGNAGE_INTERFACE") {
            cfg.interface = v;
        }
        if let Some(v) = get("SIGNAGE_POLL_SECS") {
            cfg.poll_interval = Duration::from_secs(parse_secs("SIGNAGE_POLL_SECS", &v)?);
        }
        if let Some(v) = get("SIGNAGE_RESTART_DELAY_SECS") {
            cfg.restart_delay =
                Duration::from_secs(parse_secs("SIGNAGE_RESTART_DELAY_SECS", &v)?);
        }
        if let Some(v) = get("SIGNAGE_RESTART") {
            cfg.restart = match v.trim().to_ascii_lowercase().as_str() {
                "exit" => RestartStrategy::Exit,
                "reexec" => RestartStrategy::Reexec,
                _ => return Err(invalid("SIGNAGE_RESTART", v)),
            };
        }
        if let Some(v) = get("SIGNAGE_DISPLAY_CLIENT") {
            cfg.display_client =
                ClientCommand::parse(&v).ok_or_else(|| invalid("SIGNAGE_DISPLAY_CLIENT", v))?;
        }
        if let Some(v) = get("SIGNAGE_PLAYBACK_CLIENT") {
            cfg.playback_client =
                ClientCommand::parse(&v).ok_or_else(|| invalid("SIGNAGE_PLAYBACK_CLIENT", v))?;
        }
        if let Some(v) = get("SIGNAGE_DEBUG") {
            cfg.debug = matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(v) = get("SIGNAGE_DEBUG_DEVICE") {
            cfg.debug_device = v
                .parse()
                .map_err(|_| invalid("SIGNAGE_DEBUG_DEVICE", v))?;
        }
        if let Some(v) = get("SIGNAGE_DEBUG_CONFIG") {
            cfg.debug_config = Some(v.into());
        }
        Ok(cfg)
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidOverride { key, value }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| invalid(key, raw.to_string()))
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - work and install dir `.`, configuration in `../config/cls.json`
    /// - `interface = eth0`, `poll_interval = 5min`
    /// - `restart = Exit` after `5s`
    /// - display client `electron browser.js`, playback client `signage-playback`
    /// - portrait `1080×1920 --display-rotate=90`, landscape `1920×1080`
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            install_dir: PathBuf::from("."),
            config_dir: PathBuf::from("../config"),
            config_file: "cls.json".to_string(),
            interface: "eth0".to_string(),
            poll_interval: Duration::from_secs(5 * 60),
            restart: RestartStrategy::default(),
            restart_delay: Duration::from_secs(5),
            display_client: ClientCommand::new("electron").arg("browser.js"),
            playback_client: ClientCommand::new("signage-playback"),
            portrait: DisplayProfile {
                width: 1080,
                height: 1920,
                extra_args: vec!["--display-rotate=90".to_string()],
            },
            landscape: DisplayProfile {
                width: 1920,
                height: 1080,
                extra_args: Vec::new(),
            },
            debug: false,
            debug_device: MacAddress::debug_default(),
            debug_config: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_match_reference_layout() {
        let cfg = Config::default();
        assert_eq!(cfg.config_path(), PathBuf::from("../config/cls.json"));
        assert_eq!(cfg.poll_interval, Duration::from_secs(300));
        assert_eq!(cfg.restart, RestartStrategy::Exit);
        assert_eq!(cfg.display_profile(Orientation::Portrait).height, 1920);
        assert_eq!(cfg.display_profile(Orientation::Landscape).width, 1920);
        assert!(!cfg.debug);
    }

    #[test]
    fn environment_overrides_fields() {
        let cfg = from_pairs(&[
            ("SIGNAGE_POLL_SECS", "30"),
            ("SIGNAGE_INTERFACE", "wlan0"),
            ("SIGNAGE_RESTART", "ReExec"),
            ("SIGNAGE_DISPLAY_CLIENT", "chromium --kiosk"),
            ("SIGNAGE_DEBUG", "1"),
            ("SIGNAGE_DEBUG_DEVICE", "AA:BB:CC:DD:EE:FF"),
            ("SIGNAGE_WORK_DIR", ""),
        ])
        .unwrap();
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.interface, "wlan0");
        assert_eq!(cfg.restart, RestartStrategy::Reexec);
        assert_eq!(
            cfg.display_client,
            ClientCommand::new("chromium").arg("--kiosk")
        );
        assert!(cfg.debug);
        assert_eq!(cfg.debug_device.as_str(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(cfg.work_dir, PathBuf::from("."));
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        for (key, value) in [
            ("SIGNAGE_POLL_SECS", "soon"),
            ("SIGNAGE_RESTART", "reboot"),
            ("SIGNAGE_DEBUG_DEVICE", "kitchen"),
        ] {
            let err = from_pairs(&[(key, value)]).unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidOverride { key: k, .. } if *k == key),
                "{key}={value} -> {err:?}"
            );
        }
    }

    #[test]
    fn client_command_parsing() {
        assert_eq!(ClientCommand::parse("   "), None);
        assert_eq!(
            ClientCommand::parse("electron  browser.js"),
            Some(ClientCommand::new("electron").arg("browser.js"))
        );
    }
}
