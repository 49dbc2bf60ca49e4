//! Color Tide - neighbor-majority color takeover automaton

pub mod core;
pub mod render;
pub mod simulation;
pub mod spatial;
