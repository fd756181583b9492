#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural dungeon generator combining rooms, a wide-corridor maze, and
//! seeded decorations.
//!
//! Generation runs a fixed sequence of passes over a wall-filled grid: rooms
//! are stamped first, a growing-tree maze fills the remaining space, every room
//! receives a door into the maze when one is available, and finally torches,
//! chests, the player spawn and NPC spawns are derived from the carved layout.
//! All randomness flows through the caller's RNG so a seeded generator always
//! reproduces the same level.

use delve_core::{
    CellCoord, ChestId, ChestPlacement, GenerationTuning, GridDimensions, NpcKind, NpcSpawn, Room,
    Tile, TileGrid, TorchPlacement,
};
use glam::{IVec2, Vec2};
use rand::Rng;
use tracing::{debug, info};

/// Maze cursor offsets. Nodes sit two tiles apart so the midpoint becomes corridor.
const MAZE_STEPS: [(i32, i32); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

/// Cell the maze grows from.
const MAZE_ORIGIN: CellCoord = CellCoord::new(1, 1);

/// Complete output of a generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct DungeonLayout {
    /// Final wall/floor grid.
    pub grid: TileGrid,
    /// Rooms accepted by the room pass, in placement order.
    pub rooms: Vec<Room>,
    /// Cells carved by the maze pass, in carving order. May contain repeats.
    pub maze_cells: Vec<CellCoord>,
    /// Wall-mounted torches in scan order.
    pub torches: Vec<TorchPlacement>,
    /// Chests, at most one per room.
    pub chests: Vec<ChestPlacement>,
    /// Initial NPC placements.
    pub npc_spawns: Vec<NpcSpawn>,
    /// Floor tile the player starts on.
    pub player_spawn: CellCoord,
}

impl DungeonLayout {
    /// Continuous starting position of the player.
    #[must_use]
    pub fn player_spawn_point(&self) -> Vec2 {
        self.player_spawn.center()
    }
}

/// Generates a dungeon with the provided dimensions.
///
/// The dimensions were validated on construction, so generation itself never
/// fails. Degenerate outcomes such as zero rooms or rooms without a door are
/// accepted and logged at debug level.
pub fn generate<R>(
    dimensions: GridDimensions,
    tuning: &GenerationTuning,
    rng: &mut R,
) -> DungeonLayout
where
    R: Rng + ?Sized,
{
    let mut grid = TileGrid::filled(dimensions.width(), dimensions.height(), Tile::Wall);

    let rooms = carve_rooms(&mut grid, tuning, rng);
    if rooms.is_empty() {
        debug!(
            width = grid.width(),
            height = grid.height(),
            "no room fit into the grid"
        );
    }
    let maze_cells = carve_maze(&mut grid, rng);
    carve_doors(&mut grid, &rooms, rng);

    let torches = place_torches(&grid, tuning, rng);
    let chests = place_chests(&grid, &rooms, tuning, rng);
    let player_spawn = nearest_floor_to_center(&grid);
    let npc_spawns = place_npcs(&grid, &rooms, player_spawn.center(), tuning, rng);

    info!(
        width = grid.width(),
        height = grid.height(),
        rooms = rooms.len(),
        torches = torches.len(),
        chests = chests.len(),
        npcs = npc_spawns.len(),
        "generated dungeon"
    );

    DungeonLayout {
        grid,
        rooms,
        maze_cells,
        torches,
        chests,
        npc_spawns,
        player_spawn,
    }
}

fn carve_rooms<R>(grid: &mut TileGrid, tuning: &GenerationTuning, rng: &mut R) -> Vec<Room>
where
    R: Rng + ?Sized,
{
    let target = rng.gen_range(tuning.room_target_min..=tuning.room_target_max);
    let target = usize::try_from(target).unwrap_or(usize::MAX);
    let mut rooms: Vec<Room> = Vec::with_capacity(target);
    let mut attempts = 0;

    while rooms.len() < target && attempts < tuning.room_attempts {
        attempts += 1;

        let width = rng.gen_range(tuning.room_min_side..=tuning.room_max_side);
        let height = rng.gen_range(tuning.room_min_side..=tuning.room_max_side);
        let Some(x) = sample_origin(grid.width(), width, rng) else {
            continue;
        };
        let Some(y) = sample_origin(grid.height(), height, rng) else {
            continue;
        };

        let room = Room::new(x, y, width, height);
        if room.bounds().cells().any(|cell| grid.is_floor(cell)) {
            continue;
        }
        for cell in room.bounds().cells() {
            grid.carve(cell);
        }
        rooms.push(room);
    }

    rooms
}

/// Samples a room origin in `1..extent - side - 1`, or `None` when the range is empty.
fn sample_origin<R>(extent: u32, side: u32, rng: &mut R) -> Option<u32>
where
    R: Rng + ?Sized,
{
    let upper = extent.checked_sub(side.checked_add(1)?)?;
    if upper <= 1 {
        return None;
    }
    Some(rng.gen_range(1..upper))
}

fn carve_maze<R>(grid: &mut TileGrid, rng: &mut R) -> Vec<CellCoord>
where
    R: Rng + ?Sized,
{
    let mut carved = Vec::new();
    carve_wide(grid, MAZE_ORIGIN, &mut carved);

    let mut stack = vec![MAZE_ORIGIN];
    let mut options: Vec<CellCoord> = Vec::with_capacity(MAZE_STEPS.len());

    while let Some(&current) = stack.last() {
        options.clear();
        options.extend(
            MAZE_STEPS
                .iter()
                .filter_map(|&(dx, dz)| current.offset(dx, dz))
                .filter(|candidate| is_maze_node(grid, *candidate)),
        );

        if options.is_empty() {
            let _ = stack.pop();
            continue;
        }

        let next = options[rng.gen_range(0..options.len())];
        let midpoint = CellCoord::new(
            (current.column() + next.column()) / 2,
            (current.row() + next.row()) / 2,
        );
        carve_wide(grid, midpoint, &mut carved);
        carve_wide(grid, next, &mut carved);
        stack.push(next);
    }

    carved
}

/// Maze nodes stay clear of the border, leaving room for the second corridor column.
fn is_maze_node(grid: &TileGrid, cell: CellCoord) -> bool {
    cell.column() >= 1
        && cell.column() + 2 < grid.width()
        && cell.row() >= 1
        && cell.row() + 1 < grid.height()
        && grid.is_wall(cell)
}

fn carve_wide(grid: &mut TileGrid, cell: CellCoord, carved: &mut Vec<CellCoord>) {
    let twin = CellCoord::new(cell.column() + 1, cell.row());
    for target in [cell, twin] {
        grid.carve(target);
        carved.push(target);
    }
}

fn carve_doors<R>(grid: &mut TileGrid, rooms: &[Room], rng: &mut R)
where
    R: Rng + ?Sized,
{
    let mut candidates: Vec<CellCoord> = Vec::new();
    for room in rooms {
        door_candidates(grid, room, &mut candidates);
        if candidates.is_empty() {
            debug!(x = room.x(), y = room.y(), "room has no door candidate");
            continue;
        }
        let door = candidates[rng.gen_range(0..candidates.len())];
        grid.carve(door);
    }
}

/// Collects exterior cells touching the room whose next cell outward is floor.
fn door_candidates(grid: &TileGrid, room: &Room, out: &mut Vec<CellCoord>) {
    out.clear();
    let (x, y, width, height) = (room.x(), room.y(), room.width(), room.height());
    let bottom = y + height;
    let right = x + width;

    for column in x..right {
        if y > 1 && grid.is_floor(CellCoord::new(column, y - 2)) {
            out.push(CellCoord::new(column, y - 1));
        }
        if bottom + 1 < grid.height() && grid.is_floor(CellCoord::new(column, bottom + 1)) {
            out.push(CellCoord::new(column, bottom));
        }
    }
    for row in y..bottom {
        if x > 1 && grid.is_floor(CellCoord::new(x - 2, row)) {
            out.push(CellCoord::new(x - 1, row));
        }
        if right + 1 < grid.width() && grid.is_floor(CellCoord::new(right + 1, row)) {
            out.push(CellCoord::new(right, row));
        }
    }
}

fn place_torches<R>(
    grid: &TileGrid,
    tuning: &GenerationTuning,
    rng: &mut R,
) -> Vec<TorchPlacement>
where
    R: Rng + ?Sized,
{
    let mut torches: Vec<TorchPlacement> = Vec::new();

    for (wall, tile) in grid.cells() {
        if tile != Tile::Wall {
            continue;
        }
        for neighbor in grid.cardinal_neighbors(wall) {
            if !grid.is_floor(neighbor) {
                continue;
            }
            let normal = IVec2::new(
                neighbor.column() as i32 - wall.column() as i32,
                neighbor.row() as i32 - wall.row() as i32,
            );
            let anchor = wall.center() + normal.as_vec2() * tuning.torch_face_offset;
            let crowded = torches
                .iter()
                .any(|torch| torch.anchor.distance(anchor) < tuning.torch_spacing);
            if crowded {
                continue;
            }
            if rng.gen::<f64>() < tuning.torch_chance {
                torches.push(TorchPlacement {
                    wall,
                    normal,
                    anchor,
                });
            }
        }
    }

    torches
}

fn place_chests<R>(
    grid: &TileGrid,
    rooms: &[Room],
    tuning: &GenerationTuning,
    rng: &mut R,
) -> Vec<ChestPlacement>
where
    R: Rng + ?Sized,
{
    let mut chests: Vec<ChestPlacement> = Vec::new();
    for room in rooms {
        if rng.gen::<f64>() >= tuning.chest_chance {
            continue;
        }
        let center = room.center_cell();
        let cell = if grid.is_floor(center) {
            Some(center)
        } else {
            room.bounds().cells().find(|cell| grid.is_floor(*cell))
        };
        if let Some(cell) = cell {
            let id = ChestId::new(u32::try_from(chests.len()).unwrap_or(u32::MAX));
            chests.push(ChestPlacement {
                id,
                cell,
                center: cell.center(),
            });
        }
    }
    chests
}

/// Floor tile closest to the grid centre; ties keep the first tile in row-major order.
fn nearest_floor_to_center(grid: &TileGrid) -> CellCoord {
    let center = Vec2::new(grid.width() as f32 / 2.0, grid.height() as f32 / 2.0);
    let mut best: Option<(f32, CellCoord)> = None;
    for (cell, tile) in grid.cells() {
        if tile != Tile::Floor {
            continue;
        }
        let distance = cell.center().distance_squared(center);
        if best.map_or(true, |(closest, _)| distance < closest) {
            best = Some((distance, cell));
        }
    }
    best.map_or(MAZE_ORIGIN, |(_, cell)| cell)
}

fn place_npcs<R>(
    grid: &TileGrid,
    rooms: &[Room],
    player_spawn: Vec2,
    tuning: &GenerationTuning,
    rng: &mut R,
) -> Vec<NpcSpawn>
where
    R: Rng + ?Sized,
{
    let mut spawns: Vec<NpcSpawn> = Vec::new();
    let mut try_spawn = |cell: CellCoord, rng: &mut R| {
        let center = cell.center();
        if center.distance(player_spawn) <= tuning.npc_safety_radius {
            return;
        }
        spawns.push(NpcSpawn {
            cell,
            center,
            kind: NpcKind::from_roll(rng.gen::<f64>()),
        });
    };

    for room in rooms {
        if rng.gen::<f64>() < tuning.room_npc_chance {
            let cell = room.center_cell();
            if grid.is_floor(cell) {
                try_spawn(cell, rng);
            }
        }
    }

    for row in 1..grid.height().saturating_sub(1) {
        for column in 1..grid.width().saturating_sub(1) {
            let cell = CellCoord::new(column, row);
            if grid.is_floor(cell) && rng.gen::<f64>() < tuning.wandering_npc_chance {
                try_spawn(cell, rng);
            }
        }
    }

    spawns
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn origin_range_collapses_on_tiny_grids() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(sample_origin(5, 3, &mut rng), None);
        assert_eq!(sample_origin(3, 6, &mut rng), None);
        for _ in 0..32 {
            let origin = sample_origin(11, 3, &mut rng).expect("range is not empty");
            assert!((1..7).contains(&origin));
        }
    }

    #[test]
    fn door_candidates_look_two_cells_outward() {
        let mut grid = TileGrid::from_rows(&[
            "#########",
            "#.......#",
            "#########",
            "#...#####",
            "#...#####",
            "#...#####",
            "#########",
            "#########",
            "#########",
        ]);
        let room = Room::new(1, 3, 3, 3);
        let mut candidates = Vec::new();
        door_candidates(&grid, &room, &mut candidates);
        assert_eq!(
            candidates,
            vec![
                CellCoord::new(1, 2),
                CellCoord::new(2, 2),
                CellCoord::new(3, 2),
            ]
        );

        grid.carve(CellCoord::new(5, 4));
        door_candidates(&grid, &room, &mut candidates);
        assert!(candidates.contains(&CellCoord::new(4, 4)));
    }

    #[test]
    fn maze_stays_inside_the_border() {
        let mut grid = TileGrid::filled(9, 9, Tile::Wall);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let carved = carve_maze(&mut grid, &mut rng);
        assert!(carved.contains(&CellCoord::new(1, 1)));
        assert!(carved.contains(&CellCoord::new(2, 1)));
        for cell in carved {
            assert!(cell.column() >= 1 && cell.column() < 8);
            assert!(cell.row() >= 1 && cell.row() < 8);
        }
    }

    #[test]
    fn spawn_ties_keep_the_first_floor_in_scan_order() {
        let grid = TileGrid::from_rows(&[
            "#######",
            "#.....#",
            "#.###.#",
            "#.#####",
            "#.....#",
            "#######",
        ]);
        assert_eq!(nearest_floor_to_center(&grid), CellCoord::new(3, 1));
    }
}
