use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Value carried by a target. Kept with the layout, never shown on the board.
pub type TargetValue = u8;

/// Content of a single board cell, fixed once the layout is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Safe { adjacent: u8 },
    Target { value: TargetValue },
}

impl Cell {
    pub const fn is_target(self) -> bool {
        matches!(self, Self::Target { .. })
    }

    /// Number displayed when the cell is explored, `None` for targets.
    pub const fn adjacent_count(self) -> Option<u8> {
        match self {
            Self::Safe { adjacent } => Some(adjacent),
            Self::Target { .. } => None,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Safe { adjacent: 0 }
    }
}

/// Allocates a `false`-filled map matching a board of `size`.
pub fn boolean_map(size: Coord2) -> Array2<bool> {
    Array2::default(size.to_nd_index())
}

/// Rows × columns matrix of cells plus the number of targets placed on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
    target_count: CellCount,
}

impl Grid {
    /// A board of `size` where every cell is `Safe { adjacent: 0 }`.
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
            target_count: 0,
        }
    }

    /// Builds a finished layout from explicit targets, field values included.
    pub fn from_targets(size: Coord2, targets: &[(Coord2, TargetValue)]) -> Result<Self> {
        let mut grid = Self::new(size);
        for &(coords, value) in targets {
            let coords = grid.validate_coords(coords)?;
            grid.set_target(coords, value);
        }
        grid.compute_field_values();
        Ok(grid)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn target_count(&self) -> CellCount {
        self.target_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.target_count
    }

    pub fn is_target(&self, coords: Coord2) -> bool {
        self[coords].is_target()
    }

    /// Turns a cell into a target, returns `false` if it already was one.
    pub(crate) fn set_target(&mut self, coords: Coord2, value: TargetValue) -> bool {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.is_target() {
            return false;
        }
        *cell = Cell::Target { value };
        self.target_count += 1;
        true
    }

    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn adjacent_target_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors, always fits
        self.neighbors(coords)
            .filter(|&pos| self.is_target(pos))
            .count() as u8
    }

    /// Sets every safe cell's count to the number of neighboring targets.
    pub fn compute_field_values(&mut self) {
        for coords in self.coords() {
            if self.is_target(coords) {
                continue;
            }
            let adjacent = self.adjacent_target_count(coords);
            self.cells[coords.to_nd_index()] = Cell::Safe { adjacent };
        }
    }

    /// Every coordinate of the board in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    pub fn targets(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.coords().filter(|&coords| self.is_target(coords))
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
