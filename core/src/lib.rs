#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Delve simulation.
//!
//! This crate defines the value types and message surface that connect the
//! adapters, the authoritative world, and the pure systems. Adapters submit
//! [`Command`] values describing player intent, the world executes them via its
//! `apply` entry point, and then reports [`Event`] values describing every state
//! change the tick produced. Systems operate on the slices of state the world
//! hands them and never reach into each other's data.

mod grid;
mod kinds;
mod placement;
mod tunables;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use grid::{CollisionGrid, Tile, TileGrid};
pub use kinds::{ItemKind, LootDrop, NpcKind, NpcProfile};
pub use placement::{ChestPlacement, DroppedItem, NpcSpawn, Room, TorchPlacement};
pub use tunables::{
    ConfigError, CullingTuning, GenerationTuning, GridDimensions, InteractionTuning, NpcTuning,
    PlayerTuning, ProjectileTuning, Tunables, WorldConfig,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Delve.";

/// Logical simulation rate. Speeds and timers are tuned in units per tick.
pub const TICKS_PER_SECOND: u32 = 60;

/// Number of slots available in the player's hotbar inventory.
pub const HOTBAR_SLOTS: usize = 7;

/// Commands that express all permissible player-driven world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one tick, consuming any queued actions.
    Tick {
        /// Directional keys held during the tick.
        movement: MoveIntent,
        /// Change in camera yaw, in radians, applied before movement.
        yaw_delta: f32,
    },
    /// Moves the hotbar selection one slot to the right, wrapping around.
    SelectNextSlot,
    /// Moves the hotbar selection one slot to the left, wrapping around.
    SelectPreviousSlot,
    /// Selects the provided hotbar slot directly.
    SelectSlot {
        /// Zero-based slot index.
        slot: usize,
    },
    /// Uses the selected item: swings a sword, drinks a potion, or reads a scroll.
    UseSelected,
    /// Opens the nearby chest, or picks up the nearby dropped item.
    Interact,
    /// Drops one unit of the selected item in front of the player.
    DropSelected,
}

/// Directional keys held by the player during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveIntent {
    /// Move along the camera forward vector.
    pub forward: bool,
    /// Move against the camera forward vector.
    pub backward: bool,
    /// Strafe against the camera right vector.
    pub left: bool,
    /// Strafe along the camera right vector.
    pub right: bool,
}

impl MoveIntent {
    /// Intent with no directional keys held.
    pub const IDLE: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
    };

    /// Intent holding only the forward key.
    pub const FORWARD: Self = Self {
        forward: true,
        backward: false,
        left: false,
        right: false,
    };
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// Reports that the hotbar selection changed.
    SlotSelected {
        /// Newly selected slot.
        slot: usize,
    },
    /// Reports that the player started a melee swing.
    SwingStarted {
        /// Weapon used for the swing.
        weapon: ItemKind,
        /// Number of NPCs struck by the swing.
        hits: u32,
    },
    /// Reports that the player consumed or activated an item.
    ItemUsed {
        /// Kind of item that was used.
        kind: ItemKind,
    },
    /// Reports that an NPC struck the player.
    PlayerDamaged {
        /// NPC responsible for the attack.
        npc: NpcId,
        /// Damage applied before clamping.
        amount: u32,
        /// Player health remaining after the attack.
        remaining: u32,
    },
    /// Reports that the player's health reached zero.
    PlayerDefeated,
    /// Reports that an NPC took damage.
    NpcDamaged {
        /// NPC that was struck.
        npc: NpcId,
        /// Damage applied.
        amount: u32,
        /// Health remaining after the hit; may be negative.
        remaining: i32,
    },
    /// Reports that an NPC entered its dying state.
    NpcDied {
        /// NPC that died.
        npc: NpcId,
        /// Kind of the NPC.
        kind: NpcKind,
    },
    /// Reports that a dead NPC finished its death animation and was removed.
    NpcRemoved {
        /// NPC that was removed.
        npc: NpcId,
    },
    /// Confirms that a projectile entered the simulation.
    ProjectileSpawned {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Whether the projectile carries magic damage.
        magic: bool,
    },
    /// Reports that a projectile stopped flying.
    ProjectileRetired {
        /// Projectile that retired.
        projectile: ProjectileId,
        /// Why the projectile stopped.
        reason: RetireReason,
    },
    /// Reports that the player opened a chest.
    ChestOpened {
        /// Chest that was opened and removed.
        chest: ChestId,
        /// Number of items spilled from the chest.
        drops: u32,
    },
    /// Reports that an item landed on the floor.
    ItemDropped {
        /// Identifier of the dropped item.
        item: ItemId,
        /// Kind of the dropped item.
        kind: ItemKind,
        /// World position of the item.
        position: Vec2,
    },
    /// Reports that the player picked up a dropped item.
    ItemCollected {
        /// Identifier of the collected item.
        item: ItemId,
        /// Kind of the collected item.
        kind: ItemKind,
        /// Inventory slot that received the item.
        slot: usize,
    },
    /// Reports that the spatial index was rebuilt.
    SpatialIndexRebuilt {
        /// Number of chests bucketed by the rebuilt index.
        chests: usize,
    },
}

/// Reasons a projectile may retire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetireReason {
    /// The next step would have entered a wall.
    HitWall,
    /// The projectile struck the given NPC.
    HitNpc(NpcId),
    /// The projectile travelled its full range.
    OutOfRange,
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

identifier!(
    /// Unique identifier assigned to an NPC.
    NpcId
);
identifier!(
    /// Unique identifier assigned to a chest.
    ChestId
);
identifier!(
    /// Unique identifier assigned to a dropped item.
    ItemId
);
identifier!(
    /// Unique identifier assigned to a projectile.
    ProjectileId
);

/// Location of a single grid tile expressed as column (x) and row (z) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Continuous world point at the middle of the tile.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }

    /// Tile containing the provided world point, if the point is not negative.
    #[must_use]
    pub fn containing(point: Vec2) -> Option<Self> {
        if !(point.x >= 0.0 && point.y >= 0.0) {
            return None;
        }
        Some(Self::new(point.x as u32, point.y as u32))
    }

    /// Returns the neighbouring cell offset by the provided delta, if it stays non-negative.
    #[must_use]
    pub fn offset(self, d_column: i32, d_row: i32) -> Option<Self> {
        let column = self.column.checked_add_signed(d_column)?;
        let row = self.row.checked_add_signed(d_row)?;
        Some(Self::new(column, row))
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Reports whether the cell lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= self.origin.column()
            && cell.column() < self.origin.column() + self.size.width()
            && cell.row() >= self.origin.row()
            && cell.row() < self.origin.row() + self.size.height()
    }

    /// Iterates every cell of the rectangle in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let size = self.size;
        (0..size.height()).flat_map(move |dy| {
            (0..size.width()).map(move |dx| CellCoord::new(origin.column() + dx, origin.row() + dy))
        })
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Unit forward vector on the ground plane for the provided camera yaw.
#[must_use]
pub fn forward_from_yaw(yaw: f32) -> Vec2 {
    Vec2::new(-yaw.sin(), -yaw.cos())
}

/// Unit right vector on the ground plane for the provided camera yaw.
#[must_use]
pub fn right_from_yaw(yaw: f32) -> Vec2 {
    Vec2::new(yaw.cos(), -yaw.sin())
}

/// Shared player vitals mutated by combat and consumables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vitals {
    /// Current health points.
    pub health: u32,
    /// Maximum health points.
    pub max_health: u32,
    /// Current mana points.
    pub mana: u32,
    /// Maximum mana points.
    pub max_mana: u32,
}

impl Vitals {
    /// Creates vitals at full health and mana.
    #[must_use]
    pub const fn full(max_health: u32, max_mana: u32) -> Self {
        Self {
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
        }
    }

    /// Subtracts damage from health without dropping below zero.
    pub fn apply_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Restores health up to the maximum.
    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Restores mana up to the maximum.
    pub fn restore_mana(&mut self, amount: u32) {
        self.mana = self.mana.saturating_add(amount).min(self.max_mana);
    }

    /// Spends mana if enough is available, reporting whether the cost was paid.
    pub fn spend_mana(&mut self, amount: u32) -> bool {
        if self.mana < amount {
            return false;
        }
        self.mana -= amount;
        true
    }

    /// Reports whether the player has run out of health.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.health == 0
    }
}
