//! Production rendering pipeline: fetch, decode, filter, grid, draw.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

use gridding::{grid_volume, GridConfig};
use level2::{
    GateFilter, RadarVolume, REFLECTIVITY_MAX_DBZ, REFLECTIVITY_MIN_DBZ, TRAILING_GATE_TRIM,
};
use radar_common::{RadarError, RadarResult, ScanKey};
use renderer::render_composite;
use storage::ArchiveStore;

use crate::state::ScanRenderer;

/// Renderer backed by the archive bucket and the full processing pipeline.
pub struct ArchiveRenderer {
    store: Arc<ArchiveStore>,
}

impl ArchiveRenderer {
    pub fn new(store: Arc<ArchiveStore>) -> Self {
        Self { store }
    }
}

/// Decode the archive and draw the composite. CPU-bound; run off the
/// async executor.
fn render_archive(data: &[u8], key: &str) -> RadarResult<Vec<u8>> {
    let mut volume = RadarVolume::from_archive(data)?;
    volume.mask_trailing_gates(TRAILING_GATE_TRIM);

    let mut filter = GateFilter::new(&volume);
    filter.exclude_transition(&volume);
    filter.exclude_masked(&volume);
    filter.exclude_outside(&volume, REFLECTIVITY_MIN_DBZ, REFLECTIVITY_MAX_DBZ);

    let config = GridConfig::composite_default(&volume);
    let grid = grid_volume(&volume, &filter, &config)?;

    let caption = ScanKey::parse(key)
        .map(|k| k.caption())
        .unwrap_or_else(|_| key.to_string());
    render_composite(&grid, &caption)
}

#[async_trait]
impl ScanRenderer for ArchiveRenderer {
    #[instrument(skip(self), fields(key = %key))]
    async fn render(&self, key: &str) -> RadarResult<Vec<u8>> {
        let data = self.store.get(key).await?;
        debug!(size = data.len(), "Fetched archive volume");

        let key = key.to_string();
        tokio::task::spawn_blocking(move || render_archive(&data, &key))
            .await
            .map_err(|e| RadarError::Internal(format!("render task failed: {}", e)))?
    }
}
