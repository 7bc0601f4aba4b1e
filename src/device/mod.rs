//! Per-device configuration.
//!
//! ## Contents
//! - [`DeviceConfig`] tagged variant over `mode` (browser / video / unknown)
//! - [`Orientation`] portrait or landscape (default)
//! - [`Fingerprint`] content hash of an entry's canonical JSON form
//! - [`ConfigResolver`] loads the shared device → config document
//! - [`DeviceMapping`] the loaded document; resolves one device's entry
//!
//! ## Flow
//! ```text
//! ConfigResolver::load_mapping() ──► DeviceMapping
//!        DeviceMapping::resolve(&mac) ──► Option<ResolvedConfig { config, fingerprint }>
//! ```

mod config;
mod fingerprint;
mod mapping;

pub use config::{DeviceConfig, Orientation};
pub use fingerprint::Fingerprint;
pub use mapping::{ConfigResolver, DeviceMapping, ResolvedConfig};
