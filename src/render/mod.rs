//! 2D raster rendering of the grid
//!
//! Rendering is read-only: it turns a grid snapshot into fill commands and
//! executes them on an in-memory image. It never touches simulation state.

pub mod colors;
pub mod raster;

pub use raster::{frame_commands, surface_extent, surface_size, FillRect, Raster};
