//! # Device configuration entry.
//!
//! Source shape (one value of the shared document):
//! ```json
//! { "mode": "browser", "url": "https://dash.example", "orientation": "portrait" }
//! { "mode": "video",   "url": ["https://a.example/1", "https://a.example/2"] }
//! ```
//!
//! ## Rules
//! - `url` is a string or an ordered list of strings; it must not be empty for known modes.
//! - Browser entries with a list show the first URL.
//! - `orientation` is case-insensitive; anything but `portrait` means landscape.
//! - An unrecognized `mode` parses into [`DeviceConfig::Unknown`], not an error.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;

/// Screen orientation of a browser kiosk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

impl Orientation {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("portrait") => Orientation::Portrait,
            _ => Orientation::Landscape,
        }
    }
}

/// Validated configuration for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceConfig {
    /// Full-screen kiosk showing `url`.
    Browser { url: String, orientation: Orientation },
    /// Playback client looping over `urls`.
    Video { urls: Vec<String> },
    /// Mode this supervisor does not know how to run.
    Unknown { mode: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UrlField {
    One(String),
    Many(Vec<String>),
}

impl UrlField {
    fn into_vec(self) -> Vec<String> {
        match self {
            UrlField::One(url) => vec![url],
            UrlField::Many(urls) => urls,
        }
    }
}

#[derive(Deserialize)]
struct RawEntry {
    mode: String,
    #[serde(default)]
    url: Option<UrlField>,
    #[serde(default)]
    orientation: Option<String>,
}

impl DeviceConfig {
    /// Validates the raw entry for `device`.
    pub fn from_value(device: &str, value: &Value) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEntry {
            device: device.to_string(),
            reason,
        };

        let raw = RawEntry::deserialize(value).map_err(|e| invalid(e.to_string()))?;
        let urls: Vec<String> = raw
            .url
            .map(UrlField::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter(|u| !u.trim().is_empty())
            .collect();

        match raw.mode.as_str() {
            "browser" => {
                let url = urls
                    .into_iter()
                    .next()
                    .ok_or_else(|| invalid("browser mode needs a url".into()))?;
                Ok(DeviceConfig::Browser {
                    url,
                    orientation: Orientation::parse(raw.orientation.as_deref()),
                })
            }
            "video" => {
                if urls.is_empty() {
                    return Err(invalid("video mode needs at least one url".into()));
                }
                Ok(DeviceConfig::Video { urls })
            }
            _ => Ok(DeviceConfig::Unknown { mode: raw.mode }),
        }
    }

    /// The `mode` string this entry was declared with.
    pub fn mode(&self) -> &str {
        match self {
            DeviceConfig::Browser { .. } => "browser",
            DeviceConfig::Video { .. } => "video",
            DeviceConfig::Unknown { mode } => mode,
        }
    }
}
