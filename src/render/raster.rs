//! Grid to pixel commands, and their execution on an RGB image

use std::path::Path;

use image::{Rgb as Pixel, RgbImage};

use crate::core::error::{Result, TideError};
use crate::core::types::{Palette, Rgb};
use crate::render::colors::BACKGROUND;
use crate::spatial::grid::Grid;

/// One filled square at integer pixel offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRect {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub color: Rgb,
}

/// Pixel `(width, height)` needed to show `grid` at `cell_size`
pub fn surface_size(grid: &Grid, cell_size: u32) -> Result<(u32, u32)> {
    surface_extent(grid.rows(), grid.cols(), cell_size)
}

/// Pixel `(width, height)` of a `rows x cols` grid at `cell_size`
pub fn surface_extent(rows: usize, cols: usize, cell_size: u32) -> Result<(u32, u32)> {
    let width = pixel_extent(cols, cell_size)?;
    let height = pixel_extent(rows, cell_size)?;
    Ok((width, height))
}

fn pixel_extent(cells: usize, cell_size: u32) -> Result<u32> {
    u32::try_from(cells)
        .ok()
        .and_then(|cells| cells.checked_mul(cell_size))
        .ok_or_else(|| TideError::domain(format!("{} cells of {}px overflow the surface", cells, cell_size)))
}

/// One fill command per cell, row-major, at `(col * size, row * size)`
pub fn frame_commands(grid: &Grid, palette: &Palette, cell_size: u32) -> Result<Vec<FillRect>> {
    if cell_size == 0 {
        return Err(TideError::domain("cell size must be positive"));
    }
    let _ = surface_size(grid, cell_size)?;

    grid.iter_cells()
        .map(|((row, col), cell)| {
            let color = palette.rgb(cell.color).ok_or_else(|| {
                TideError::domain(format!("color {:?} missing from palette", cell.color))
            })?;
            Ok(FillRect {
                x: col as u32 * cell_size,
                y: row as u32 * cell_size,
                size: cell_size,
                color,
            })
        })
        .collect()
}

/// In-memory drawing surface
#[derive(Debug, Clone)]
pub struct Raster {
    image: RgbImage,
}

impl Raster {
    /// Surface of the given pixel size, cleared to the background color
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TideError::domain(format!(
                "surface must be non-empty, got {}x{}",
                width, height
            )));
        }
        let background = Pixel([BACKGROUND.r, BACKGROUND.g, BACKGROUND.b]);
        Ok(Self {
            image: RgbImage::from_pixel(width, height, background),
        })
    }

    /// Surface sized exactly for `grid` at `cell_size`
    pub fn for_grid(grid: &Grid, cell_size: u32) -> Result<Self> {
        let (width, height) = surface_size(grid, cell_size)?;
        Self::new(width, height)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Execute fill commands. Every rectangle must fit on the surface.
    pub fn paint(&mut self, commands: &[FillRect]) -> Result<()> {
        for rect in commands {
            let fits_x = rect.x.checked_add(rect.size).is_some_and(|end| end <= self.width());
            let fits_y = rect.y.checked_add(rect.size).is_some_and(|end| end <= self.height());
            if !fits_x || !fits_y {
                return Err(TideError::domain(format!(
                    "{}px cell at ({}, {}) exceeds the {}x{} surface",
                    rect.size,
                    rect.x,
                    rect.y,
                    self.width(),
                    self.height()
                )));
            }

            let pixel = Pixel([rect.color.r, rect.color.g, rect.color.b]);
            for y in rect.y..rect.y + rect.size {
                for x in rect.x..rect.x + rect.size {
                    self.image.put_pixel(x, y, pixel);
                }
            }
        }
        Ok(())
    }

    /// Color at a pixel, if inside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let Pixel([r, g, b]) = *self.image.get_pixel(x, y);
        Some(Rgb::new(r, g, b))
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Write the surface as a PNG file
    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}
