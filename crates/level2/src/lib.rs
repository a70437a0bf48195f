//! In-memory Level-II radar volume model and quality-control filtering.
//!
//! Archive II binary decoding is delegated to the `nexrad-data` /
//! `nexrad-model` crates; this crate flattens a decoded scan into a dense
//! `[ray, gate]` reflectivity matrix suitable for gridding.

pub mod gatefilter;
pub mod volume;

pub use gatefilter::{GateFilter, REFLECTIVITY_MAX_DBZ, REFLECTIVITY_MIN_DBZ};
pub use volume::{RadarVolume, FIRST_GATE_RANGE_M, GATE_SPACING_M, TRAILING_GATE_TRIM};
