//! Dense wall/floor grids shared by generation, physics, and rendering.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::CellCoord;

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Solid, impassable cell.
    Wall,
    /// Walkable cell.
    Floor,
}

/// Row-major wall/floor grid describing the dungeon layout.
///
/// Cells outside the grid are reported as walls so callers never need to
/// special-case the border.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid with every cell set to the provided tile.
    #[must_use]
    pub fn filled(width: u32, height: u32, tile: Tile) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            tiles: vec![tile; capacity],
        }
    }

    /// Parses a grid from rows of `#` (wall) and any other character (floor).
    ///
    /// Rows shorter than the first row are padded with walls.
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = u32::try_from(rows.len()).unwrap_or(0);
        let width = rows
            .first()
            .map_or(0, |row| u32::try_from(row.chars().count()).unwrap_or(0));
        let mut grid = Self::filled(width, height, Tile::Wall);
        for (row_index, row) in rows.iter().enumerate() {
            for (column_index, symbol) in row.chars().enumerate() {
                if symbol == '#' {
                    continue;
                }
                if let (Ok(column), Ok(row)) =
                    (u32::try_from(column_index), u32::try_from(row_index))
                {
                    grid.set(CellCoord::new(column, row), Tile::Floor);
                }
            }
        }
        grid
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Tile stored at the provided cell, if it lies within the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether the cell is a floor tile inside the grid.
    #[must_use]
    pub fn is_floor(&self, cell: CellCoord) -> bool {
        self.tile(cell) == Some(Tile::Floor)
    }

    /// Reports whether the cell is a wall or lies outside the grid.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        !self.is_floor(cell)
    }

    /// Overwrites the tile at the provided cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: CellCoord, tile: Tile) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = tile;
            }
        }
    }

    /// Turns the cell into floor. Used by generation and explicit door carving.
    pub fn carve(&mut self, cell: CellCoord) {
        self.set(cell, Tile::Floor);
    }

    /// Iterates every cell with its tile in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let width = self.width.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index % width, index / width), *tile)
        })
    }

    /// Counts the cells holding the provided tile.
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|candidate| **candidate == tile).count()
    }

    /// In-bounds 4-neighbours of a cell in the order -x, +x, -z, +z.
    pub fn cardinal_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        CARDINAL_OFFSETS
            .iter()
            .filter_map(move |&(dx, dz)| cell.offset(dx, dz))
            .filter(move |neighbor| self.contains(*neighbor))
    }

    /// Renders the grid with `#` for walls and `.` for floors, one line per row.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.height as usize);
        for (cell, tile) in self.cells() {
            out.push(match tile {
                Tile::Wall => '#',
                Tile::Floor => '.',
            });
            if cell.column() + 1 == self.width {
                out.push('\n');
            }
        }
        out
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Axis offsets in the order -x, +x, -z, +z.
const CARDINAL_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Physics copy of the dungeon grid taken once after generation.
///
/// Runtime movement legality is decided exclusively against this grid so later
/// edits to the display grid never change collision behaviour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollisionGrid {
    tiles: TileGrid,
}

impl CollisionGrid {
    /// Captures a collision snapshot of the provided grid.
    #[must_use]
    pub fn snapshot(grid: &TileGrid) -> Self {
        Self {
            tiles: grid.clone(),
        }
    }

    /// Reports whether a continuous point is inside a wall or outside the grid.
    #[must_use]
    pub fn collides(&self, point: Vec2) -> bool {
        match CellCoord::containing(point) {
            Some(cell) => self.tiles.is_wall(cell),
            None => true,
        }
    }

    /// Tile grid backing the collision checks.
    #[must_use]
    pub const fn tiles(&self) -> &TileGrid {
        &self.tiles
    }
}
