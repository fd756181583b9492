#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid A* search producing tile paths across the dungeon floor.

use std::{cmp::Ordering, collections::BinaryHeap};

use delve_core::{CellCoord, TileGrid};

/// Reusable A* search state.
///
/// The scratch buffers are sized to the grid on each search and reused across
/// calls so repeated NPC path requests do not allocate.
#[derive(Debug, Default)]
pub struct Pathfinder {
    width: u32,
    costs: Vec<u32>,
    parents: Vec<Option<CellCoord>>,
    closed: Vec<bool>,
    open: BinaryHeap<OpenNode>,
    sequence: u64,
}

impl Pathfinder {
    /// Finds a shortest 4-connected path from `start` to `goal`.
    ///
    /// The path is written into `out` and includes both endpoints. `out` is left
    /// empty when the goal is unreachable or either endpoint is not floor.
    /// Nodes with equal estimated cost are expanded by lower heuristic first,
    /// then in insertion order, so results are deterministic.
    pub fn find_path(
        &mut self,
        grid: &TileGrid,
        start: CellCoord,
        goal: CellCoord,
        out: &mut Vec<CellCoord>,
    ) {
        out.clear();
        if !grid.is_floor(start) || !grid.is_floor(goal) {
            return;
        }
        if start == goal {
            out.push(start);
            return;
        }

        self.prepare(grid);
        let Some(start_index) = self.index(start) else {
            return;
        };
        self.costs[start_index] = 0;
        self.push(start, 0, start.manhattan_distance(goal));

        while let Some(node) = self.open.pop() {
            let Some(current_index) = self.index(node.cell) else {
                continue;
            };
            if self.closed[current_index] {
                continue;
            }
            self.closed[current_index] = true;

            if node.cell == goal {
                self.reconstruct(goal, out);
                return;
            }

            let next_cost = self.costs[current_index].saturating_add(1);
            for neighbor in grid.cardinal_neighbors(node.cell) {
                if !grid.is_floor(neighbor) {
                    continue;
                }
                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };
                if self.closed[neighbor_index] || next_cost >= self.costs[neighbor_index] {
                    continue;
                }
                self.costs[neighbor_index] = next_cost;
                self.parents[neighbor_index] = Some(node.cell);
                self.push(neighbor, next_cost, neighbor.manhattan_distance(goal));
            }
        }
    }

    fn prepare(&mut self, grid: &TileGrid) {
        let cell_count_u64 = u64::from(grid.width()) * u64::from(grid.height());
        let cell_count = usize::try_from(cell_count_u64).unwrap_or(0);
        self.width = grid.width();

        if self.costs.len() != cell_count {
            self.costs = vec![u32::MAX; cell_count];
            self.parents = vec![None; cell_count];
            self.closed = vec![false; cell_count];
        } else {
            self.costs.fill(u32::MAX);
            self.parents.fill(None);
            self.closed.fill(false);
        }
        self.open.clear();
        self.sequence = 0;
    }

    fn push(&mut self, cell: CellCoord, cost: u32, heuristic: u32) {
        self.open.push(OpenNode {
            estimate: cost.saturating_add(heuristic),
            heuristic,
            sequence: self.sequence,
            cell,
        });
        self.sequence += 1;
    }

    fn reconstruct(&self, goal: CellCoord, out: &mut Vec<CellCoord>) {
        let mut cursor = Some(goal);
        while let Some(cell) = cursor {
            out.push(cell);
            cursor = self.index(cell).and_then(|index| self.parents[index]);
        }
        out.reverse();
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        let index = row.checked_mul(width)?.checked_add(column)?;
        (index < self.costs.len()).then_some(index)
    }
}

/// Convenience wrapper that runs a one-off search with fresh buffers.
#[must_use]
pub fn find_path(grid: &TileGrid, start: CellCoord, goal: CellCoord) -> Vec<CellCoord> {
    let mut path = Vec::new();
    Pathfinder::default().find_path(grid, start, goal, &mut path);
    path
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenNode {
    estimate: u32,
    heuristic: u32,
    sequence: u64,
    cell: CellCoord,
}

impl Ord for OpenNode {
    // BinaryHeap is a max-heap; invert so the smallest key pops first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.heuristic.cmp(&self.heuristic))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
