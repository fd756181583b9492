#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Chunk-bucketed spatial index over static level features and the
//! distance/cone culling contract used by renderers.

mod visibility;

pub use visibility::{RenderCategory, Viewpoint, Visibility};

use delve_core::{CellCoord, ChestPlacement, Tile, TileGrid, TorchPlacement};
use glam::Vec2;
use tracing::debug;

/// Coordinate of a chunk within the chunk table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    x: u32,
    z: u32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    #[must_use]
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }

    /// Chunk column.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Chunk row.
    #[must_use]
    pub const fn z(&self) -> u32 {
        self.z
    }
}

/// Static features bucketed into a single chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chunk {
    walls: Vec<CellCoord>,
    torches: Vec<TorchPlacement>,
    chests: Vec<ChestPlacement>,
}

impl Chunk {
    /// Wall tiles inside the chunk, in row-major order.
    #[must_use]
    pub fn walls(&self) -> &[CellCoord] {
        &self.walls
    }

    /// Torches whose face anchor lies inside the chunk.
    #[must_use]
    pub fn torches(&self) -> &[TorchPlacement] {
        &self.torches
    }

    /// Chests whose centre lies inside the chunk.
    #[must_use]
    pub fn chests(&self) -> &[ChestPlacement] {
        &self.chests
    }
}

/// Chunk table covering the whole grid.
///
/// The table holds `ceil(width / chunk_size) * ceil(height / chunk_size)`
/// chunks stored row-major. Every wall, torch and chest lives in exactly one
/// chunk. The index is immutable; callers rebuild it wholesale whenever the
/// chest collection changes.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialIndex {
    chunk_size: u32,
    columns: u32,
    rows: u32,
    chunks: Vec<Chunk>,
}

impl SpatialIndex {
    /// Buckets every wall, torch and chest of the level.
    ///
    /// A chunk size of zero is treated as one; configuration validation rejects
    /// it before a world is ever built.
    #[must_use]
    pub fn build(
        grid: &TileGrid,
        torches: &[TorchPlacement],
        chests: &[ChestPlacement],
        chunk_size: u32,
    ) -> Self {
        let chunk_size = chunk_size.max(1);
        let columns = grid.width().div_ceil(chunk_size);
        let rows = grid.height().div_ceil(chunk_size);
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);

        let mut index = Self {
            chunk_size,
            columns,
            rows,
            chunks: vec![Chunk::default(); capacity],
        };

        for (cell, tile) in grid.cells() {
            if tile != Tile::Wall {
                continue;
            }
            let coord = index.chunk_of_cell(cell);
            if let Some(chunk) = index.chunk_mut(coord) {
                chunk.walls.push(cell);
            }
        }
        for torch in torches {
            let coord = index.chunk_of_point(torch.anchor);
            if let Some(chunk) = index.chunk_mut(coord) {
                chunk.torches.push(*torch);
            }
        }
        for chest in chests {
            let coord = index.chunk_of_point(chest.center);
            if let Some(chunk) = index.chunk_mut(coord) {
                chunk.chests.push(*chest);
            }
        }

        debug!(
            columns,
            rows,
            torches = torches.len(),
            chests = chests.len(),
            "built spatial index"
        );
        index
    }

    /// Side length of a chunk in tiles.
    #[must_use]
    pub const fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Number of chunk columns and rows.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Chunk containing the provided world point, clamped onto the table.
    #[must_use]
    pub fn chunk_of_point(&self, point: Vec2) -> ChunkCoord {
        let size = self.chunk_size as f32;
        ChunkCoord::new(
            clamp_axis(point.x / size, self.columns),
            clamp_axis(point.y / size, self.rows),
        )
    }

    /// Writes the 3x3 neighbourhood around the chunk containing `position`,
    /// clipped to the table, into `out` in row-major order.
    pub fn nearby_chunks(&self, position: Vec2, out: &mut Vec<ChunkCoord>) {
        out.clear();
        if self.chunks.is_empty() {
            return;
        }
        let center = self.chunk_of_point(position);
        let z_range = center.z.saturating_sub(1)..=(center.z + 1).min(self.rows - 1);
        for z in z_range {
            let x_range = center.x.saturating_sub(1)..=(center.x + 1).min(self.columns - 1);
            for x in x_range {
                out.push(ChunkCoord::new(x, z));
            }
        }
    }

    /// Features bucketed into the provided chunk, if it exists.
    #[must_use]
    pub fn query_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.index_of(coord).and_then(|index| self.chunks.get(index))
    }

    /// Iterates all chunks with their coordinates in row-major order.
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk)> + '_ {
        let columns = self.columns.max(1);
        self.chunks.iter().enumerate().map(move |(index, chunk)| {
            let index = index as u32;
            (ChunkCoord::new(index % columns, index / columns), chunk)
        })
    }

    fn chunk_of_cell(&self, cell: CellCoord) -> ChunkCoord {
        ChunkCoord::new(
            cell.column() / self.chunk_size,
            cell.row() / self.chunk_size,
        )
    }

    fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.index_of(coord)
            .and_then(|index| self.chunks.get_mut(index))
    }

    fn index_of(&self, coord: ChunkCoord) -> Option<usize> {
        if coord.x >= self.columns || coord.z >= self.rows {
            return None;
        }
        let row = usize::try_from(coord.z).ok()?;
        let column = usize::try_from(coord.x).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

fn clamp_axis(scaled: f32, extent: u32) -> u32 {
    if !(scaled > 0.0) || extent == 0 {
        return 0;
    }
    (scaled.floor() as u32).min(extent - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::ChestId;
    use glam::IVec2;

    fn open_grid(width: u32, height: u32) -> TileGrid {
        let mut grid = TileGrid::filled(width, height, Tile::Wall);
        for row in 1..height - 1 {
            for column in 1..width - 1 {
                grid.carve(CellCoord::new(column, row));
            }
        }
        grid
    }

    #[test]
    fn table_dimensions_round_up() {
        let index = SpatialIndex::build(&open_grid(17, 9), &[], &[], 8);
        assert_eq!(index.dimensions(), (3, 2));
        assert_eq!(index.chunks().count(), 6);
    }

    #[test]
    fn zero_chunk_size_falls_back_to_single_tiles() {
        let index = SpatialIndex::build(&open_grid(5, 5), &[], &[], 0);
        assert_eq!(index.chunk_size(), 1);
        assert_eq!(index.dimensions(), (5, 5));
    }

    #[test]
    fn features_land_in_the_chunk_of_their_anchor() {
        let grid = open_grid(17, 17);
        let torch = TorchPlacement {
            wall: CellCoord::new(8, 0),
            normal: IVec2::new(0, 1),
            anchor: Vec2::new(8.5, 1.05),
        };
        let chest = ChestPlacement {
            id: ChestId::new(0),
            cell: CellCoord::new(3, 12),
            center: Vec2::new(3.5, 12.5),
        };
        let index = SpatialIndex::build(&grid, &[torch], &[chest], 8);

        let top_middle = index.query_chunk(ChunkCoord::new(1, 0)).expect("chunk");
        assert_eq!(top_middle.torches(), &[torch]);
        let bottom_left = index.query_chunk(ChunkCoord::new(0, 1)).expect("chunk");
        assert_eq!(bottom_left.chests(), &[chest]);
        assert!(index.query_chunk(ChunkCoord::new(3, 0)).is_none());
    }

    #[test]
    fn neighbourhood_is_clipped_at_the_corner() {
        let index = SpatialIndex::build(&open_grid(33, 33), &[], &[], 8);
        let mut chunks = Vec::new();

        index.nearby_chunks(Vec2::new(1.5, 1.5), &mut chunks);
        assert_eq!(
            chunks,
            vec![
                ChunkCoord::new(0, 0),
                ChunkCoord::new(1, 0),
                ChunkCoord::new(0, 1),
                ChunkCoord::new(1, 1),
            ]
        );

        index.nearby_chunks(Vec2::new(20.0, 20.0), &mut chunks);
        assert_eq!(chunks.len(), 9);

        index.nearby_chunks(Vec2::new(32.9, 32.9), &mut chunks);
        assert_eq!(chunks.len(), 4);
        assert!(chunks.contains(&ChunkCoord::new(4, 4)));
    }

    #[test]
    fn points_off_the_grid_clamp_to_the_edge() {
        let index = SpatialIndex::build(&open_grid(17, 17), &[], &[], 8);
        assert_eq!(index.chunk_of_point(Vec2::new(-4.0, 99.0)), ChunkCoord::new(0, 2));
    }
}
