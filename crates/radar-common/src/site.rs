//! Radar station identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RadarError;

/// A four-character NEXRAD station identifier (ICAO style, e.g. "KNQA").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SiteId([u8; 4]);

impl SiteId {
    /// Parse and validate a station code.
    ///
    /// Codes are exactly four ASCII alphanumeric characters and are stored
    /// uppercased, matching the archive bucket naming convention.
    pub fn new(code: &str) -> Result<Self, RadarError> {
        let bytes = code.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(|b| b.is_ascii_alphanumeric()) {
            return Err(RadarError::InvalidSite(code.to_string()));
        }
        let mut id = [0u8; 4];
        for (dst, src) in id.iter_mut().zip(bytes) {
            *dst = src.to_ascii_uppercase();
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        // Constructor guarantees ASCII
        std::str::from_utf8(&self.0).expect("SiteId is always ASCII")
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteId {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SiteId {
    type Error = RadarError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<SiteId> for String {
    fn from(site: SiteId) -> Self {
        site.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_site() {
        let site = SiteId::new("KNQA").unwrap();
        assert_eq!(site.as_str(), "KNQA");
        assert_eq!(site.to_string(), "KNQA");
    }

    #[test]
    fn test_lowercase_normalized() {
        assert_eq!(SiteId::new("knqa").unwrap().as_str(), "KNQA");
    }

    #[test]
    fn test_invalid_sites() {
        assert!(SiteId::new("KNQ").is_err());
        assert!(SiteId::new("KNQAX").is_err());
        assert!(SiteId::new("KN A").is_err());
        assert!(SiteId::new("").is_err());
    }
}
