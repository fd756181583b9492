use std::collections::VecDeque;

use delve_core::{CellCoord, GenerationTuning, GridDimensions, Tile, TileGrid};
use delve_system_generation::generate;
use delve_system_pathfinding::{find_path, Pathfinder};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn bfs_distance(grid: &TileGrid, start: CellCoord, goal: CellCoord) -> Option<usize> {
    let mut distances = vec![None; (grid.width() * grid.height()) as usize];
    let index = |cell: CellCoord| (cell.row() * grid.width() + cell.column()) as usize;
    distances[index(start)] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        let distance = distances[index(cell)].expect("visited");
        if cell == goal {
            return Some(distance);
        }
        for neighbor in grid.cardinal_neighbors(cell) {
            if grid.is_floor(neighbor) && distances[index(neighbor)].is_none() {
                distances[index(neighbor)] = Some(distance + 1);
                queue.push_back(neighbor);
            }
        }
    }
    None
}

#[test]
fn goal_inside_a_wall_ring_is_unreachable() {
    let grid = TileGrid::from_rows(&[
        "#########",
        "#.......#",
        "#.#####.#",
        "#.#...#.#",
        "#.#.#.#.#",
        "#.#...#.#",
        "#.#####.#",
        "#.......#",
        "#########",
    ]);
    let path = find_path(&grid, CellCoord::new(1, 1), CellCoord::new(4, 3));
    assert!(path.is_empty());
}

#[test]
fn paths_are_contiguous_and_shortest_on_generated_levels() {
    let dimensions = GridDimensions::new(41, 41).expect("valid dimensions");
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let layout = generate(dimensions, &GenerationTuning::default(), &mut rng);
    let floors: Vec<CellCoord> = layout
        .grid
        .cells()
        .filter(|(_, tile)| *tile == Tile::Floor)
        .map(|(cell, _)| cell)
        .collect();

    let mut pathfinder = Pathfinder::default();
    let mut path = Vec::new();
    for _ in 0..40 {
        let start = floors[rng.gen_range(0..floors.len())];
        let goal = floors[rng.gen_range(0..floors.len())];
        pathfinder.find_path(&layout.grid, start, goal, &mut path);

        match bfs_distance(&layout.grid, start, goal) {
            Some(distance) => {
                assert_eq!(path.len(), distance + 1, "{start:?} -> {goal:?}");
                assert_eq!(path.first(), Some(&start));
                assert_eq!(path.last(), Some(&goal));
                for step in path.windows(2) {
                    assert_eq!(step[0].manhattan_distance(step[1]), 1);
                    assert!(layout.grid.is_floor(step[1]));
                }
            }
            None => assert!(path.is_empty()),
        }
    }
}

#[test]
fn repeated_searches_return_identical_paths() {
    let grid = TileGrid::filled(15, 15, Tile::Floor);
    let start = CellCoord::new(1, 1);
    let goal = CellCoord::new(12, 9);
    let first = find_path(&grid, start, goal);
    let second = find_path(&grid, start, goal);
    assert_eq!(first, second);
    assert_eq!(first.len(), 21);
}
