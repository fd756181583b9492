//! World-space records produced by generation and consumed by the systems.

use glam::{IVec2, Vec2};

use crate::{CellCoord, CellRect, CellRectSize, ChestId, ItemId, ItemKind, NpcKind};

/// Rectangular room carved during generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Room {
    bounds: CellRect,
}

impl Room {
    /// Creates a room from its top-left corner and size in tiles.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            bounds: CellRect::from_origin_and_size(
                CellCoord::new(x, y),
                CellRectSize::new(width, height),
            ),
        }
    }

    /// Cells covered by the room.
    #[must_use]
    pub const fn bounds(&self) -> CellRect {
        self.bounds
    }

    /// Leftmost column of the room.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.bounds.origin().column()
    }

    /// Topmost row of the room.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.bounds.origin().row()
    }

    /// Width of the room in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.bounds.size().width()
    }

    /// Height of the room in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bounds.size().height()
    }

    /// Tile at the integer-rounded centre of the room.
    #[must_use]
    pub const fn center_cell(&self) -> CellCoord {
        CellCoord::new(self.x() + self.width() / 2, self.y() + self.height() / 2)
    }
}

/// Decorative torch mounted on a wall face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorchPlacement {
    /// Wall tile carrying the torch.
    pub wall: CellCoord,
    /// Unit normal pointing from the wall into the adjacent floor tile.
    pub normal: IVec2,
    /// Continuous point just in front of the wall face.
    pub anchor: Vec2,
}

/// Closed chest resting on a floor tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChestPlacement {
    /// Identifier of the chest.
    pub id: ChestId,
    /// Floor tile holding the chest.
    pub cell: CellCoord,
    /// Continuous centre of the chest.
    pub center: Vec2,
}

/// Initial NPC placement chosen by generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NpcSpawn {
    /// Floor tile the NPC starts on.
    pub cell: CellCoord,
    /// Continuous spawn position.
    pub center: Vec2,
    /// Kind of NPC to spawn.
    pub kind: NpcKind,
}

/// Item lying on the floor waiting to be collected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DroppedItem {
    /// Identifier of the item.
    pub id: ItemId,
    /// Kind of the item.
    pub kind: ItemKind,
    /// Continuous position of the item.
    pub position: Vec2,
    /// Whether the player already picked the item up.
    pub collected: bool,
    /// Ticks elapsed since the item was collected.
    pub collected_for: u32,
}

impl DroppedItem {
    /// Creates an uncollected item at the provided position.
    #[must_use]
    pub const fn new(id: ItemId, kind: ItemKind, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            collected: false,
            collected_for: 0,
        }
    }
}
