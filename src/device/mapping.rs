//! # Device → configuration document.
//!
//! The shared document is a JSON object keyed by hardware address. Only the
//! entry of the local device is validated, so a broken entry for another
//! device never blocks this one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::device::config::DeviceConfig;
use crate::device::fingerprint::Fingerprint;
use crate::error::ConfigError;
use crate::identity::MacAddress;

/// This device's validated entry plus its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub config: DeviceConfig,
    pub fingerprint: Fingerprint,
}

/// Parsed device → configuration document.
#[derive(Debug, Clone, Default)]
pub struct DeviceMapping {
    entries: Map<String, Value>,
}

impl DeviceMapping {
    /// Wraps a parsed document; it must be a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entry for `device`; keys are matched case-insensitively.
    pub fn lookup(&self, device: &MacAddress) -> Option<&Value> {
        self.entries.get(device.as_str()).or_else(|| {
            self.entries
                .iter()
                .find(|(key, _)| device.matches(key))
                .map(|(_, value)| value)
        })
    }

    /// Validated entry and fingerprint for `device`, or `None` when absent.
    pub fn resolve(&self, device: &MacAddress) -> Result<Option<ResolvedConfig>, ConfigError> {
        let Some(value) = self.lookup(device) else {
            return Ok(None);
        };
        let config = DeviceConfig::from_value(device.as_str(), value)?;
        Ok(Some(ResolvedConfig {
            config,
            fingerprint: Fingerprint::of(value),
        }))
    }
}

#[derive(Debug, Clone)]
enum MappingSource {
    File(PathBuf),
    Fixed(Arc<DeviceMapping>),
}

/// Loads the [`DeviceMapping`] each tick.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    source: MappingSource,
}

impl ConfigResolver {
    /// Reads the document from `path` on every load.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: MappingSource::File(path.into()),
        }
    }

    /// Always returns `mapping` (debug mode, tests).
    pub fn fixed(mapping: DeviceMapping) -> Self {
        Self {
            source: MappingSource::Fixed(Arc::new(mapping)),
        }
    }

    /// Path of the backing document, if file-based.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            MappingSource::File(path) => Some(path),
            MappingSource::Fixed(_) => None,
        }
    }

    /// Loads the full mapping. Read and parse failures propagate.
    pub async fn load_mapping(&self) -> Result<DeviceMapping, ConfigError> {
        match &self.source {
            MappingSource::Fixed(mapping) => Ok(mapping.as_ref().clone()),
            MappingSource::File(path) => {
                let raw =
                    tokio::fs::read_to_string(path)
                        .await
                        .map_err(|source| ConfigError::Read {
                            path: path.clone(),
                            source,
                        })?;
                let value: Value =
                    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                        path: path.clone(),
                        source,
                    })?;
                DeviceMapping::from_value(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mac(s: &str) -> MacAddress {
        s.parse().unwrap()
    }

    #[test]
    fn resolves_entry_case_insensitively() {
        let mapping = DeviceMapping::from_value(json!({
            "AA:BB:CC:DD:EE:FF": {"mode": "browser", "url": "http://x", "orientation": "portrait"},
            "11:22:33:44:55:66": {"mode": "broken"}
        }))
        .unwrap();

        let resolved = mapping.resolve(&mac("aa:bb:cc:dd:ee:ff")).unwrap().unwrap();
        assert_eq!(resolved.config.mode(), "browser");
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn absent_device_resolves_to_none() {
        let mapping = DeviceMapping::from_value(json!({
            "11:22:33:44:55:66": {"mode": "video", "url": "http://a"}
        }))
        .unwrap();
        assert!(mapping.resolve(&mac("aa:bb:cc:dd:ee:ff")).unwrap().is_none());
    }

    #[test]
    fn other_devices_invalid_entries_are_ignored() {
        let mapping = DeviceMapping::from_value(json!({
            "aa:bb:cc:dd:ee:ff": {"mode": "video", "url": ["http://a"]},
            "11:22:33:44:55:66": {"url": 7}
        }))
        .unwrap();
        assert!(mapping.resolve(&mac("aa:bb:cc:dd:ee:ff")).unwrap().is_some());
        assert!(mapping.resolve(&mac("11:22:33:44:55:66")).is_err());
    }

    #[test]
    fn non_object_document_is_rejected() {
        assert!(matches!(
            DeviceMapping::from_value(json!(["aa:bb:cc:dd:ee:ff"])),
            Err(ConfigError::NotAnObject)
        ));
    }

    #[tokio::test]
    async fn file_resolver_reads_and_parses() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cls.json");
        std::fs::write(
            &path,
            r#"{"aa:bb:cc:dd:ee:ff": {"mode": "browser", "url": "http://x"}}"#,
        )
        .unwrap();

        let resolver = ConfigResolver::file(&path);
        let mapping = resolver.load_mapping().await.unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(resolver.path(), Some(path.as_path()));

        std::fs::write(&path, "{oops").unwrap();
        assert!(matches!(
            resolver.load_mapping().await,
            Err(ConfigError::Parse { .. })
        ));

        let missing = ConfigResolver::file(tmp.path().join("nope.json"));
        assert!(matches!(
            missing.load_mapping().await,
            Err(ConfigError::Read { .. })
        ));
    }
}
