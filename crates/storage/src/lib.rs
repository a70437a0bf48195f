//! Object-storage access for the public Level-II archive bucket.

pub mod locator;
pub mod object_store;

pub use crate::object_store::{ArchiveBucketConfig, ArchiveStore};
pub use locator::{select_latest, Locate, S3ScanLocator};
