//! ASCII rendering of a level with its occupants.

use delve_core::{CellCoord, NpcKind};
use delve_world::{query, World};

/// Draws walls and floors with chests, items, NPCs and the player on top.
///
/// Legend: `#` wall, `.` floor, `C` chest, `*` item, `g` ghoul, `s` skeleton,
/// `h` ghost, `@` player.
pub(crate) fn render(world: &World) -> String {
    let grid = query::tile_grid(world);
    let mut rows: Vec<Vec<char>> = grid
        .to_ascii()
        .lines()
        .map(|line| line.chars().collect())
        .collect();

    let mut mark = |cell: Option<CellCoord>, glyph: char| {
        let Some(cell) = cell else {
            return;
        };
        if let Some(slot) = rows
            .get_mut(cell.row() as usize)
            .and_then(|row| row.get_mut(cell.column() as usize))
        {
            *slot = glyph;
        }
    };

    for chest in query::chests(world) {
        mark(Some(chest.cell), 'C');
    }
    for item in query::dropped_items(world).iter().filter(|item| !item.collected) {
        mark(CellCoord::containing(item.position), '*');
    }
    for npc in query::npcs(world) {
        let glyph = match npc.kind {
            NpcKind::Ghoul => 'g',
            NpcKind::Skeleton => 's',
            NpcKind::Ghost => 'h',
        };
        mark(CellCoord::containing(npc.position), glyph);
    }
    mark(CellCoord::containing(query::camera(world).position), '@');

    let mut out = String::with_capacity(grid.width() as usize * grid.height() as usize);
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}
