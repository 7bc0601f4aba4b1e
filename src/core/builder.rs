use std::sync::Arc;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::{config::Config, processes::ManagedProcessSet, supervisor::Supervisor};
use crate::{
    device::{ConfigResolver, DeviceMapping},
    identity::{FixedIdentity, IdentityRef, SysfsIdentity},
    revision::{GitRepo, RevisionRef, StaticRevision},
    store::StateStore,
    subscribers::{Subscribe, SubscriberSet},
};

/// Revision reported by every source in debug mode.
const DEBUG_REVISION: &str = "debug";

/// Builder for constructing a [`Supervisor`].
///
/// Collaborators left unset are derived from [`Config`]: git checkouts of
/// `install_dir` and `config_dir`, sysfs lookup of `interface`, and the
/// document at [`Config::config_path`]. In debug mode they are replaced by
/// fixed local stand-ins.
pub struct SupervisorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    software: Option<RevisionRef>,
    config_repo: Option<RevisionRef>,
    identity: Option<IdentityRef>,
    resolver: Option<ConfigResolver>,
    shutdown: Option<CancellationToken>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            software: None,
            config_repo: None,
            identity: None,
            resolver: None,
            shutdown: None,
        }
    }

    /// Sets event subscribers (logging and anything custom).
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Overrides the source of the supervisor's own software revision.
    pub fn with_software_source(mut self, source: RevisionRef) -> Self {
        self.software = Some(source);
        self
    }

    /// Overrides the source of the configuration repository revision.
    pub fn with_config_source(mut self, source: RevisionRef) -> Self {
        self.config_repo = Some(source);
        self
    }

    pub fn with_identity(mut self, identity: IdentityRef) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_resolver(mut self, resolver: ConfigResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Uses `token` instead of OS signal handlers to request shutdown.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    /// Builds the supervisor. Must be called inside a tokio runtime.
    pub fn build(self) -> Supervisor {
        let cfg = self.cfg;
        let debug = cfg.debug;

        let software = self.software.unwrap_or_else(|| {
            if debug {
                StaticRevision::arc(DEBUG_REVISION)
            } else {
                GitRepo::arc(&cfg.install_dir)
            }
        });
        let config_repo = self.config_repo.unwrap_or_else(|| {
            if debug {
                StaticRevision::arc(DEBUG_REVISION)
            } else {
                GitRepo::arc(&cfg.config_dir)
            }
        });
        let identity = self.identity.unwrap_or_else(|| {
            if debug {
                Arc::new(FixedIdentity(cfg.debug_device.clone())) as IdentityRef
            } else {
                SysfsIdentity::arc(&cfg.interface)
            }
        });
        let resolver = self.resolver.unwrap_or_else(|| match (debug, &cfg.debug_config) {
            (true, Some(path)) => ConfigResolver::file(path),
            (true, None) => ConfigResolver::fixed(debug_mapping(&cfg)),
            (false, _) => ConfigResolver::file(cfg.config_path()),
        });

        let store = StateStore::new(&cfg.work_dir);
        let processes = ManagedProcessSet::with_cwd(&cfg.install_dir);
        let subs = SubscriberSet::new(self.subscribers);

        Supervisor::new_internal(
            cfg,
            store,
            software,
            config_repo,
            identity,
            resolver,
            processes,
            subs,
            self.shutdown,
        )
    }
}

/// Built-in debug document: the fabricated device shows a landscape page.
fn debug_mapping(cfg: &Config) -> DeviceMapping {
    let mut doc = serde_json::Map::new();
    doc.insert(
        cfg.debug_device.to_string(),
        json!({
            "mode": "browser",
            "url": "https://example.org",
            "orientation": "landscape"
        }),
    );
    DeviceMapping::from_value(serde_json::Value::Object(doc)).unwrap_or_default()
}
