//! # Content fingerprint of a configuration entry.
//!
//! SHA-256 over a canonical serialization: object keys sorted, no
//! whitespace. Two entries that differ only in key order or formatting in the
//! source document share a fingerprint.

use std::fmt;

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of an entry's canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprints a parsed JSON value.
    pub fn of(value: &Value) -> Self {
        let mut canonical = String::new();
        write_canonical(value, &mut canonical);
        Self(hex::encode(Sha256::digest(canonical.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_and_whitespace_do_not_matter() {
        let a: Value = serde_json::from_str(r#"{"mode":"browser","url":"http://x","extra":{"b":1,"a":2}}"#).unwrap();
        let b: Value = serde_json::from_str(
            r#"{
                "extra": { "a": 2, "b": 1 },
                "url":  "http://x",
                "mode": "browser"
            }"#,
        )
        .unwrap();
        assert_eq!(Fingerprint::of(&a), Fingerprint::of(&b));
    }

    #[test]
    fn content_changes_are_detected() {
        let a = json!({"mode": "video", "url": ["http://a", "http://b"]});
        let b = json!({"mode": "video", "url": ["http://b", "http://a"]});
        let c = json!({"mode": "video", "url": ["http://a", "http://b"], "orientation": "portrait"});
        assert_ne!(Fingerprint::of(&a), Fingerprint::of(&b));
        assert_ne!(Fingerprint::of(&a), Fingerprint::of(&c));
    }

    #[test]
    fn fingerprint_is_hex_sha256() {
        let fp = Fingerprint::of(&json!({}));
        assert_eq!(fp.as_str().len(), 64);
        // sha256("{}")
        assert_eq!(
            fp.as_str(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }
}
