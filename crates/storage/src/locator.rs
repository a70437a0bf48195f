//! Latest-scan selection over the archive bucket.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument};

use radar_common::{is_metadata_marker, RadarResult, SiteId};

use crate::object_store::ArchiveStore;

/// Outcome of a locate attempt.
///
/// Listing errors are reported separately as `Err(RadarError::Storage)` so
/// callers can tell an outage from an empty hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locate {
    /// Key of the newest non-metadata volume in the hour window.
    Found(String),
    /// No volume available for the hour window.
    NotFound,
}

/// Pick the newest non-metadata key from an hour listing.
///
/// Keys embed a `SITEYYYYMMDD_HHMMSS` timestamp, so ascending lexicographic
/// order is chronological order within the hour. `_MDM` metadata markers are
/// skipped. Note the original service walked the sorted list front-to-back
/// and served the oldest scan of the hour; selecting from the end returns the
/// volume the endpoint was always meant to serve.
pub fn select_latest(mut keys: Vec<String>) -> Option<String> {
    keys.sort_unstable();
    keys.into_iter().rev().find(|key| !is_metadata_marker(key))
}

/// Locator backed by the public archive bucket.
pub struct S3ScanLocator {
    store: Arc<ArchiveStore>,
    site: SiteId,
}

impl S3ScanLocator {
    pub fn new(store: Arc<ArchiveStore>, site: SiteId) -> Self {
        Self { store, site }
    }

    /// Locate the newest volume for the configured site in the current UTC hour.
    #[instrument(skip(self), fields(site = %self.site))]
    pub async fn latest_scan(&self) -> RadarResult<Locate> {
        let keys = self.store.list_hour(&self.site, Utc::now()).await?;

        match select_latest(keys) {
            Some(key) => {
                debug!(key = %key, "Located newest volume");
                Ok(Locate::Found(key))
            }
            None => Ok(Locate::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn select_latest_empty_listing() {
        assert_eq!(select_latest(Vec::new()), None);
    }

    #[test]
    fn select_latest_all_metadata_markers() {
        let listing = keys(&[
            "2017/05/28/KNQA/KNQA20170528_150101_V06_MDM",
            "2017/05/28/KNQA/KNQA20170528_151515_V06_MDM",
        ]);
        assert_eq!(select_latest(listing), None);
    }

    #[test]
    fn select_latest_skips_metadata_markers() {
        let listing = keys(&[
            "2017/05/28/KNQA/KNQA20170528_150101_V06_MDM",
            "2017/05/28/KNQA/KNQA20170528_151515_V06",
            "2017/05/28/KNQA/KNQA20170528_152929_V06_MDM",
        ]);
        assert_eq!(
            select_latest(listing),
            Some("2017/05/28/KNQA/KNQA20170528_151515_V06".to_string())
        );
    }

    #[test]
    fn select_latest_is_order_independent() {
        let sorted = keys(&[
            "2017/05/28/KNQA/KNQA20170528_150101_V06",
            "2017/05/28/KNQA/KNQA20170528_151515_V06_MDM",
            "2017/05/28/KNQA/KNQA20170528_152929_V06",
        ]);
        let mut shuffled = sorted.clone();
        shuffled.swap(0, 2);
        shuffled.swap(1, 2);
        assert_eq!(select_latest(sorted.clone()), select_latest(shuffled));
    }

    #[test]
    fn select_latest_prefers_newest_key() {
        // Deliberate change from the original behavior, which served the
        // oldest non-metadata scan of the hour.
        let listing = keys(&[
            "2017/05/28/KNQA/KNQA20170528_150101_V06",
            "2017/05/28/KNQA/KNQA20170528_152929_V06",
            "2017/05/28/KNQA/KNQA20170528_155959_V06_MDM",
        ]);
        assert_eq!(
            select_latest(listing),
            Some("2017/05/28/KNQA/KNQA20170528_152929_V06".to_string())
        );
    }
}
