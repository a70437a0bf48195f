//! Archive object-key handling.
//!
//! The Level-II archive bucket lays volumes out as
//! `YYYY/MM/DD/SITE/SITEYYYYMMDD_HHMMSS_V06`, with an optional `_MDM`
//! metadata marker object per volume that carries no scan data.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::RadarError;
use crate::site::SiteId;

/// Suffix marking metadata-only placeholder objects in the archive bucket.
pub const METADATA_SUFFIX: &str = "_MDM";

/// True when the key names a metadata marker rather than a real volume.
pub fn is_metadata_marker(key: &str) -> bool {
    key.ends_with(METADATA_SUFFIX)
}

/// Day-directory prefix and in-hour filename prefix for a site at an instant.
///
/// Listing the day prefix and filtering on the filename prefix reproduces the
/// original hour-scoped glob `SITE%Y%m%d_%H*`.
pub fn hour_prefix(site: &SiteId, now: DateTime<Utc>) -> (String, String) {
    let day = now.format("%Y/%m/%d");
    let dir = format!("{}/{}", day, site);
    let name = format!("{}{}", site, now.format("%Y%m%d_%H"));
    (dir, name)
}

/// A parsed archive object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanKey {
    key: String,
    site: SiteId,
    scan_time: DateTime<Utc>,
}

impl ScanKey {
    /// Parse a full object key, e.g. `2017/05/28/KNQA/KNQA20170528_155323_V06`.
    pub fn parse(key: &str) -> Result<Self, RadarError> {
        let name = key
            .rsplit('/')
            .next()
            .ok_or_else(|| RadarError::InvalidKey(key.to_string()))?;
        if name.len() < 19 || !name.is_ascii() {
            return Err(RadarError::InvalidKey(key.to_string()));
        }

        let site = SiteId::new(&name[..4])?;
        let date = NaiveDate::parse_from_str(&name[4..12], "%Y%m%d")
            .map_err(|_| RadarError::InvalidKey(key.to_string()))?;
        if name.as_bytes()[12] != b'_' {
            return Err(RadarError::InvalidKey(key.to_string()));
        }
        let time = NaiveTime::parse_from_str(&name[13..19], "%H%M%S")
            .map_err(|_| RadarError::InvalidKey(key.to_string()))?;

        Ok(Self {
            key: key.to_string(),
            site,
            scan_time: Utc.from_utc_datetime(&NaiveDateTime::new(date, time)),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn site(&self) -> SiteId {
        self.site
    }

    pub fn scan_time(&self) -> DateTime<Utc> {
        self.scan_time
    }

    /// Bare filename portion of the key.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }

    /// Human-readable caption for rendered output, e.g.
    /// `KNQA 2017-05-28 15:53:23 UTC`.
    pub fn caption(&self) -> String {
        format!(
            "{} {} UTC",
            self.site,
            self.scan_time.format("%Y-%m-%d %H:%M:%S")
        )
    }
}
