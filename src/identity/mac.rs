use std::fmt;
use std::str::FromStr;

/// Hardware address in lowercase colon form (`aa:bb:cc:dd:ee:ff`).
///
/// Accepts `:` or `-` separators in any case. The all-zero address is
/// rejected since interfaces without hardware report it.
///
/// # Example
/// ```
/// use signvisor::MacAddress;
///
/// let mac: MacAddress = "AA-BB-CC-DD-EE-FF".parse().unwrap();
/// assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
/// assert!("00:00:00:00:00:00".parse::<MacAddress>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress(String);

impl MacAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fabricated, locally administered address used in debug mode.
    pub(crate) fn debug_default() -> Self {
        Self("02:00:00:00:00:01".to_string())
    }

    /// Case-insensitive comparison against a raw key from a configuration document.
    pub fn matches(&self, key: &str) -> bool {
        key.parse::<MacAddress>().is_ok_and(|other| other == *self)
    }
}

impl FromStr for MacAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split([':', '-']).collect();
        let well_formed = parts.len() == 6
            && parts
                .iter()
                .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_hexdigit()));
        if !well_formed {
            return Err(format!("not a hardware address: {s:?}"));
        }
        if parts.iter().all(|p| *p == "00") {
            return Err("all-zero hardware address".to_string());
        }
        Ok(Self(parts.join(":").to_ascii_lowercase()))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
