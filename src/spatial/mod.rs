//! Spatial model of the automaton

pub mod grid;

pub use grid::{BoundaryMode, Cell, Grid};
