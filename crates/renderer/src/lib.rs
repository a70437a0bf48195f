//! Composite reflectivity rendering.
//!
//! Turns a gridded volume into a themed PNG: column-maximum field, axes,
//! colorbar, and caption, encoded in memory.

pub mod colormap;
pub mod composite;
pub mod font;
pub mod png;

pub use colormap::{ColorStop, Colormap};
pub use composite::{render_composite, FIGURE_SIZE_PX};
