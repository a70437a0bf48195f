//! Anonymous-read S3 client for the NEXRAD Level-II archive.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::{aws::AmazonS3Builder, path::Path, ObjectStore};
use std::sync::Arc;
use tracing::{debug, instrument};

use radar_common::{hour_prefix, RadarError, RadarResult, SiteId};

/// Configuration for the archive bucket connection.
#[derive(Debug, Clone)]
pub struct ArchiveBucketConfig {
    /// Bucket name
    pub bucket: String,
    /// AWS region the bucket lives in
    pub region: String,
}

impl Default for ArchiveBucketConfig {
    fn default() -> Self {
        Self {
            bucket: "noaa-nexrad-level2".to_string(),
            region: "us-east-1".to_string(),
        }
    }
}

/// Read-only client for the public Level-II archive bucket.
///
/// The bucket allows unauthenticated reads, so requests are sent unsigned.
pub struct ArchiveStore {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ArchiveStore {
    /// Create a new archive client from config.
    pub fn new(config: &ArchiveBucketConfig) -> RadarResult<Self> {
        let store = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region)
            .with_skip_signature(true)
            .build()
            .map_err(|e| RadarError::Storage(format!("Failed to create S3 client: {}", e)))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: config.bucket.clone(),
        })
    }

    /// Read an archive object in full.
    #[instrument(skip(self), fields(bucket = %self.bucket, key = %key))]
    pub async fn get(&self, key: &str) -> RadarResult<Bytes> {
        let location = Path::from(key);

        let result = self
            .store
            .get(&location)
            .await
            .map_err(|e| RadarError::Storage(format!("Failed to read {}: {}", key, e)))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| RadarError::Storage(format!("Failed to read bytes: {}", e)))?;

        debug!(size = bytes.len(), "Read archive object");
        Ok(bytes)
    }

    /// List the keys for a site within the hour containing `now`.
    ///
    /// The bucket is laid out by day, so this lists the day directory and
    /// keeps only names carrying the in-hour filename prefix.
    #[instrument(skip(self), fields(bucket = %self.bucket, site = %site))]
    pub async fn list_hour(&self, site: &SiteId, now: DateTime<Utc>) -> RadarResult<Vec<String>> {
        use futures::TryStreamExt;

        let (dir, name_prefix) = hour_prefix(site, now);
        let prefix_path = Path::from(dir.as_str());
        let mut keys = Vec::new();

        let mut stream = self.store.list(Some(&prefix_path));
        while let Some(meta) = stream
            .try_next()
            .await
            .map_err(|e| RadarError::Storage(format!("List failed for {}: {}", dir, e)))?
        {
            let key = meta.location.to_string();
            let name = key.rsplit('/').next().unwrap_or(&key);
            if name.starts_with(&name_prefix) {
                keys.push(key);
            }
        }

        debug!(count = keys.len(), prefix = %name_prefix, "Listed hour window");
        Ok(keys)
    }
}
