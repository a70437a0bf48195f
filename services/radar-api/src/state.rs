//! Application state and the seams the handlers are tested through.

use async_trait::async_trait;
use std::sync::Arc;

use radar_common::{RadarResult, SiteId};
use storage::{ArchiveBucketConfig, ArchiveStore, Locate, S3ScanLocator};

use crate::pipeline::ArchiveRenderer;

/// Finds the newest volume key for the deployment's site.
#[async_trait]
pub trait ScanLocator: Send + Sync {
    async fn latest_scan(&self) -> RadarResult<Locate>;
}

/// Turns an archive key into composite PNG bytes.
#[async_trait]
pub trait ScanRenderer: Send + Sync {
    async fn render(&self, key: &str) -> RadarResult<Vec<u8>>;
}

#[async_trait]
impl ScanLocator for S3ScanLocator {
    async fn latest_scan(&self) -> RadarResult<Locate> {
        S3ScanLocator::latest_scan(self).await
    }
}

/// Shared application state; locator and renderer are injected so handlers
/// can be exercised without a live bucket.
pub struct AppState {
    pub locator: Arc<dyn ScanLocator>,
    pub renderer: Arc<dyn ScanRenderer>,
}

impl AppState {
    pub fn new(locator: Arc<dyn ScanLocator>, renderer: Arc<dyn ScanRenderer>) -> Self {
        Self { locator, renderer }
    }

    /// Production wiring against the public archive bucket.
    pub fn production(site: &str) -> RadarResult<Self> {
        let site = SiteId::new(site)?;
        let store = Arc::new(ArchiveStore::new(&ArchiveBucketConfig::default())?);

        Ok(Self::new(
            Arc::new(S3ScanLocator::new(store.clone(), site)),
            Arc::new(ArchiveRenderer::new(store)),
        ))
    }
}
