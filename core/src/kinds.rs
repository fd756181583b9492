//! Closed sets of NPC and item kinds with their per-kind constants.

use serde::{Deserialize, Serialize};

/// Hostile NPC variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NpcKind {
    /// Slow brawler, the most common dweller.
    Ghoul,
    /// Armed undead that may drop its sword.
    Skeleton,
    /// Fragile spirit with the heaviest hit.
    Ghost,
}

/// Static per-kind parameters for an NPC variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NpcProfile {
    /// Health the NPC spawns with.
    pub max_health: i32,
    /// Damage dealt to the player per attack.
    pub attack_damage: u32,
    /// Key the renderer uses to pick a billboard texture.
    pub sprite: &'static str,
    /// Item the NPC may leave behind once removed.
    pub loot: Option<LootDrop>,
}

/// Chance-gated item drop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LootDrop {
    /// Item that drops.
    pub item: ItemKind,
    /// Probability in `0.0..=1.0` that the drop happens.
    pub chance: f64,
}

const GHOUL: NpcProfile = NpcProfile {
    max_health: 20,
    attack_damage: 5,
    sprite: "ghoul",
    loot: None,
};

const SKELETON: NpcProfile = NpcProfile {
    max_health: 25,
    attack_damage: 7,
    sprite: "skeleton",
    loot: Some(LootDrop {
        item: ItemKind::SkeletonSword,
        chance: 0.4,
    }),
};

const GHOST: NpcProfile = NpcProfile {
    max_health: 15,
    attack_damage: 10,
    sprite: "ghost",
    loot: Some(LootDrop {
        item: ItemKind::MagicScroll,
        chance: 0.15,
    }),
};

/// Upper bound of the ghoul bucket when drawing a kind from a unit roll.
const GHOUL_ROLL_CEILING: f64 = 0.5;
/// Upper bound of the ghost bucket; everything above falls back to skeletons.
const GHOST_ROLL_CEILING: f64 = 0.7;

impl NpcKind {
    /// Every NPC kind, in declaration order.
    pub const ALL: [NpcKind; 3] = [NpcKind::Ghoul, NpcKind::Skeleton, NpcKind::Ghost];

    /// Static parameters for the kind.
    #[must_use]
    pub const fn profile(self) -> &'static NpcProfile {
        match self {
            Self::Ghoul => &GHOUL,
            Self::Skeleton => &SKELETON,
            Self::Ghost => &GHOST,
        }
    }

    /// Maps a uniform roll in `0.0..1.0` onto the weighted kind table.
    ///
    /// Roughly half of all spawns are ghouls, a fifth are ghosts, and the
    /// remainder are skeletons.
    #[must_use]
    pub fn from_roll(roll: f64) -> Self {
        if roll < GHOUL_ROLL_CEILING {
            Self::Ghoul
        } else if roll < GHOST_ROLL_CEILING {
            Self::Ghost
        } else {
            Self::Skeleton
        }
    }
}

/// Inventory item kinds. [`ItemKind::Empty`] marks an unused slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// No item.
    #[default]
    Empty,
    /// Starter weapon.
    RustySword,
    /// Weapon dropped by skeletons.
    SkeletonSword,
    /// Restores health when used.
    HealthPotion,
    /// Restores mana when used.
    MagicPotion,
    /// Single-use scroll that hurls a fire bolt.
    FireScroll,
    /// Reusable scroll that spends mana on a magic bolt.
    MagicScroll,
    /// Key item with no active use.
    Key,
}

impl ItemKind {
    /// Reports whether the slot is unused.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Reports whether multiple units merge into a single inventory slot.
    #[must_use]
    pub const fn is_stackable(self) -> bool {
        matches!(self, Self::HealthPotion | Self::MagicPotion)
    }

    /// Damage dealt by a melee swing, for weapons.
    #[must_use]
    pub const fn melee_damage(self) -> Option<u32> {
        match self {
            Self::RustySword => Some(5),
            Self::SkeletonSword => Some(8),
            _ => None,
        }
    }

    /// Stable lowercase name used by logs and presentation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::RustySword => "rusty_sword",
            Self::SkeletonSword => "skeleton_sword",
            Self::HealthPotion => "health_potion",
            Self::MagicPotion => "magic_potion",
            Self::FireScroll => "fire_scroll",
            Self::MagicScroll => "magic_scroll",
            Self::Key => "key",
        }
    }
}
