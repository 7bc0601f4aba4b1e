//! # Identity resolution.
//!
//! ```text
//! /sys/class/net/<iface>/address
//!     ├─ missing interface        → Lookup::Missing
//!     ├─ no usable address        → Lookup::Missing
//!     ├─ exactly one address      → Lookup::Found
//!     └─ several addresses        → Lookup::Ambiguous (first one is used)
//! ```
//!
//! Resolution runs every tick; nothing is cached or persisted.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::identity::mac::MacAddress;

/// Shared handle to an identity resolver.
pub type IdentityRef = Arc<dyn IdentityResolver>;

/// Result of one identity lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Exactly one address found.
    Found(MacAddress),
    /// Several candidates; the first one is used and the anomaly logged.
    Ambiguous {
        first: MacAddress,
        all: Vec<MacAddress>,
    },
    /// No identity this tick.
    Missing { reason: String },
}

impl Lookup {
    /// The identity to use this tick, if any.
    pub fn address(&self) -> Option<&MacAddress> {
        match self {
            Lookup::Found(mac) => Some(mac),
            Lookup::Ambiguous { first, .. } => Some(first),
            Lookup::Missing { .. } => None,
        }
    }

    /// Builds a lookup from the candidate list of one interface.
    pub fn from_candidates(interface: &str, mut all: Vec<MacAddress>) -> Self {
        match all.len() {
            0 => Lookup::Missing {
                reason: format!("no hardware address on interface {interface}"),
            },
            1 => Lookup::Found(all.remove(0)),
            _ => Lookup::Ambiguous {
                first: all[0].clone(),
                all,
            },
        }
    }
}

/// # Resolves the stable per-device identifier.
#[async_trait]
pub trait IdentityResolver: Send + Sync + 'static {
    async fn resolve(&self) -> Lookup;
}

/// Reads the designated interface's address from sysfs.
#[derive(Debug, Clone)]
pub struct SysfsIdentity {
    root: PathBuf,
    interface: String,
}

impl SysfsIdentity {
    /// Resolver for `interface` under `/sys/class/net`.
    pub fn new(interface: impl Into<String>) -> Self {
        Self::with_root("/sys/class/net", interface)
    }

    /// Resolver reading `<root>/<interface>/address`.
    pub fn with_root(root: impl Into<PathBuf>, interface: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            interface: interface.into(),
        }
    }

    pub fn arc(interface: impl Into<String>) -> IdentityRef {
        Arc::new(Self::new(interface))
    }
}

#[async_trait]
impl IdentityResolver for SysfsIdentity {
    async fn resolve(&self) -> Lookup {
        let iface_dir = self.root.join(&self.interface);
        let raw = match tokio::fs::read_to_string(iface_dir.join("address")).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Lookup::Missing {
                    reason: format!("interface {} not found", self.interface),
                };
            }
            Err(e) => {
                return Lookup::Missing {
                    reason: format!("cannot read address of {}: {e}", self.interface),
                };
            }
        };

        let candidates = raw
            .split_whitespace()
            .filter_map(|tok| tok.parse::<MacAddress>().ok())
            .collect();
        Lookup::from_candidates(&self.interface, candidates)
    }
}

/// Always resolves to the same address.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub MacAddress);

#[async_trait]
impl IdentityResolver for FixedIdentity {
    async fn resolve(&self) -> Lookup {
        Lookup::Found(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sysfs_with(address: Option<&str>) -> (tempfile::TempDir, SysfsIdentity) {
        let tmp = tempfile::tempdir().unwrap();
        if let Some(address) = address {
            let dir = tmp.path().join("eth0");
            std::fs::create_dir(&dir).unwrap();
            std::fs::write(dir.join("address"), address).unwrap();
        }
        let resolver = SysfsIdentity::with_root(tmp.path(), "eth0");
        (tmp, resolver)
    }

    #[tokio::test]
    async fn single_address_is_found() {
        let (_tmp, resolver) = sysfs_with(Some("AA:BB:CC:DD:EE:FF\n"));
        let lookup = resolver.resolve().await;
        assert_eq!(
            lookup,
            Lookup::Found("aa:bb:cc:dd:ee:ff".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn missing_interface_yields_none() {
        let (_tmp, resolver) = sysfs_with(None);
        let lookup = resolver.resolve().await;
        assert!(lookup.address().is_none());
        assert!(matches!(lookup, Lookup::Missing { reason } if reason.contains("eth0")));
    }

    #[tokio::test]
    async fn zero_address_counts_as_missing() {
        let (_tmp, resolver) = sysfs_with(Some("00:00:00:00:00:00\n"));
        assert!(resolver.resolve().await.address().is_none());
    }

    #[tokio::test]
    async fn several_addresses_use_the_first() {
        let (_tmp, resolver) = sysfs_with(Some("aa:bb:cc:dd:ee:01\naa:bb:cc:dd:ee:02\n"));
        let lookup = resolver.resolve().await;
        match &lookup {
            Lookup::Ambiguous { first, all } => {
                assert_eq!(first.as_str(), "aa:bb:cc:dd:ee:01");
                assert_eq!(all.len(), 2);
            }
            other => panic!("expected ambiguous lookup, got {other:?}"),
        }
        assert_eq!(lookup.address().unwrap().as_str(), "aa:bb:cc:dd:ee:01");
    }
}
