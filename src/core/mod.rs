pub mod config;
pub mod error;
pub mod types;

pub use config::{GridConfig, SimulationConfig, SimulationSettings};
pub use error::{Result, TideError};
pub use types::{ColorLabel, Palette, PaletteColor, Rgb, Tick};
