//! Fixed-size color grid with clamped or toroidal neighbor lookup

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TideError};
use crate::core::types::{ColorLabel, Palette};
use crate::simulation::random::{random_element, RandomSource};

/// Offsets of the eight cells at Chebyshev distance 1, row-major
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// How neighbor lookup treats the grid edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Out-of-range neighbors are omitted: corners see 3, edges 5
    Clamped,
    /// Coordinates wrap on both axes: every cell sees 8 (torus)
    Wrapped,
}

impl FromStr for BoundaryMode {
    type Err = TideError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamped" => Ok(Self::Clamped),
            "wrapped" => Ok(Self::Wrapped),
            other => Err(TideError::config(format!(
                "unknown boundary mode '{}', expected clamped or wrapped",
                other
            ))),
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clamped => write!(f, "clamped"),
            Self::Wrapped => write!(f, "wrapped"),
        }
    }
}

/// One grid position. Position is implicit in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub color: ColorLabel,
}

impl Cell {
    pub const fn new(color: ColorLabel) -> Self {
        Self { color }
    }
}

/// Rectangular grid of cells with dimensions fixed at creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Grid with every cell drawn uniformly from the palette
    pub fn random(
        rows: usize,
        cols: usize,
        palette: &Palette,
        rng: &mut impl RandomSource,
    ) -> Result<Self> {
        let count = cell_count(rows, cols)?;
        let labels = palette.labels();
        let mut cells = Vec::with_capacity(count);
        for _ in 0..count {
            cells.push(Cell::new(*random_element(rng, &labels)?));
        }
        Ok(Self { rows, cols, cells })
    }

    /// Grid with every cell set to `color`
    pub fn filled(rows: usize, cols: usize, color: ColorLabel) -> Result<Self> {
        let count = cell_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::new(color); count],
        })
    }

    /// Grid built from explicit rows of labels; ragged input is rejected
    pub fn from_rows(rows: Vec<Vec<ColorLabel>>) -> Result<Self> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        let count = cell_count(row_count, cols)?;

        let mut cells = Vec::with_capacity(count);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(TideError::domain(format!(
                    "row {} has {} cells, expected {}",
                    index,
                    row.len(),
                    cols
                )));
            }
            cells.extend(row.into_iter().map(Cell::new));
        }
        Ok(Self {
            rows: row_count,
            cols,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells with their `(row, col)` positions, row-major
    pub fn iter_cells(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| ((index / self.cols, index % self.cols), cell))
    }

    /// Map a row-major index to `(row, col)`
    pub fn coords_of(&self, index: usize) -> Result<(usize, usize)> {
        if index >= self.cells.len() {
            return Err(TideError::domain(format!(
                "index {} exceeds grid of {} cells",
                index,
                self.cells.len()
            )));
        }
        Ok((index / self.cols, index % self.cols))
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Cell> {
        let index = self.index(row, col)?;
        Ok(self.cells[index])
    }

    pub fn set(&mut self, row: usize, col: usize, color: ColorLabel) -> Result<()> {
        let index = self.index(row, col)?;
        self.cells[index].color = color;
        Ok(())
    }

    /// Cells at Chebyshev distance 1 from `(row, col)`, excluding itself
    pub fn neighbors_of(&self, row: usize, col: usize, boundary: BoundaryMode) -> Result<Vec<Cell>> {
        let _ = self.index(row, col)?;
        let mut neighbors = Vec::with_capacity(NEIGHBOR_OFFSETS.len());

        for (dr, dc) in NEIGHBOR_OFFSETS {
            let position = match boundary {
                BoundaryMode::Clamped => {
                    offset_clamped(row, dr, self.rows).zip(offset_clamped(col, dc, self.cols))
                }
                BoundaryMode::Wrapped => Some((
                    offset_wrapped(row, dr, self.rows),
                    offset_wrapped(col, dc, self.cols),
                )),
            };
            if let Some((r, c)) = position {
                neighbors.push(self.cells[r * self.cols + c]);
            }
        }

        Ok(neighbors)
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row < self.rows && col < self.cols {
            Ok(row * self.cols + col)
        } else {
            Err(TideError::OutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}

/// Number of cells in a `rows x cols` grid, if such a grid can be allocated
pub fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(TideError::domain(format!(
            "grid dimensions must be positive, got {}x{}",
            rows, cols
        )));
    }
    let max_cells = isize::MAX as usize / std::mem::size_of::<Cell>();
    rows.checked_mul(cols)
        .filter(|&count| count <= max_cells)
        .ok_or_else(|| TideError::domain(format!("a {}x{} grid is too large to allocate", rows, cols)))
}

#[inline]
fn offset_clamped(value: usize, delta: isize, bound: usize) -> Option<usize> {
    let shifted = value.checked_add_signed(delta)?;
    (shifted < bound).then_some(shifted)
}

#[inline]
fn offset_wrapped(value: usize, delta: isize, bound: usize) -> usize {
    // value < bound, so adding `bound` keeps the sum non-negative
    ((value + bound) as isize + delta) as usize % bound
}
