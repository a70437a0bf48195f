//! Synthetic radar volumes for the test suites.
//!
//! Generators build predictable volumes with uniform beam geometry so tests
//! can assert exact values after filtering, gridding, and rendering.

pub mod generators;

pub use generators::{storm_volume, uniform_volume, VolumeSpec};
