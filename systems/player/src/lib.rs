#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player avatar: collision-checked movement, hotbar selection, and item use.

use delve_core::{
    forward_from_yaw, right_from_yaw, CollisionGrid, Event, ItemKind, MoveIntent, NpcTuning,
    PlayerTuning, Vitals,
};
use delve_system_interaction::Inventory;
use delve_system_npc::{Hit, Npc};
use glam::Vec2;
use tracing::debug;

/// State of the player avatar.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    position: Vec2,
    yaw: f32,
    vitals: Vitals,
    inventory: Inventory,
    swing_started: Option<u64>,
}

impl Player {
    /// Places a fresh player at `position` with full vitals and the starter hotbar.
    #[must_use]
    pub fn spawn(position: Vec2, tuning: &PlayerTuning) -> Self {
        Self {
            position,
            yaw: 0.0,
            vitals: Vitals::full(tuning.max_health, tuning.max_mana),
            inventory: Inventory::starter(),
            swing_started: None,
        }
    }

    /// Continuous position on the ground plane.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Camera yaw in radians.
    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Unit vector the player is facing.
    #[must_use]
    pub fn forward(&self) -> Vec2 {
        forward_from_yaw(self.yaw)
    }

    /// Health and mana.
    #[must_use]
    pub const fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    /// Mutable health and mana, handed to the NPC controller for attacks.
    pub fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    /// Hotbar contents.
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable hotbar, handed to the interaction layer.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Tick on which the current swing started, if a swing is in progress.
    #[must_use]
    pub const fn swing_started(&self) -> Option<u64> {
        self.swing_started
    }
}

/// Selection change requested for the hotbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HotbarStep {
    /// One slot to the right, wrapping around.
    Next,
    /// One slot to the left, wrapping around.
    Previous,
    /// A specific slot.
    Slot(usize),
}

/// Effect of using the selected item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ItemUse {
    /// Nothing happened: empty slot, swing in progress, or not enough mana.
    Nothing,
    /// A melee swing started and struck `hits` NPCs.
    Swing {
        /// Number of NPCs struck.
        hits: u32,
    },
    /// A potion was drunk.
    Drank(ItemKind),
    /// A scroll was read; the caller launches the projectile.
    Cast {
        /// Where the projectile starts.
        origin: Vec2,
        /// Direction the projectile flies.
        direction: Vec2,
        /// Whether the projectile deals magic damage.
        magic: bool,
    },
}

/// Applies player commands to a [`Player`].
#[derive(Clone, Debug)]
pub struct PlayerController {
    tuning: PlayerTuning,
    npc_tuning: NpcTuning,
    swing_cone_cos: f32,
}

impl PlayerController {
    /// Creates the controller from the player and NPC tunables.
    #[must_use]
    pub fn new(tuning: &PlayerTuning, npc_tuning: &NpcTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            npc_tuning: npc_tuning.clone(),
            swing_cone_cos: (tuning.swing_cone_degrees.to_radians() / 2.0).cos(),
        }
    }

    /// Tunables the controller was created with.
    #[must_use]
    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    /// Turns the camera, then moves along the held directions.
    ///
    /// The summed step is committed only when the destination is free.
    /// Returns whether the player moved.
    pub fn steer(
        &self,
        player: &mut Player,
        movement: MoveIntent,
        yaw_delta: f32,
        collision: &CollisionGrid,
    ) -> bool {
        player.yaw += yaw_delta;

        let forward = forward_from_yaw(player.yaw);
        let right = right_from_yaw(player.yaw);
        let mut step = Vec2::ZERO;
        if movement.forward {
            step += forward;
        }
        if movement.backward {
            step -= forward;
        }
        if movement.left {
            step -= right;
        }
        if movement.right {
            step += right;
        }
        if step == Vec2::ZERO {
            return false;
        }

        let destination = player.position + step * self.tuning.move_speed;
        if collision.collides(destination) {
            return false;
        }
        player.position = destination;
        true
    }

    /// Changes the hotbar selection, reporting the new slot.
    pub fn select(&self, player: &mut Player, step: HotbarStep, out_events: &mut Vec<Event>) {
        let inventory = &mut player.inventory;
        match step {
            HotbarStep::Next => inventory.select_next(),
            HotbarStep::Previous => inventory.select_previous(),
            HotbarStep::Slot(slot) => {
                if !inventory.select(slot) {
                    return;
                }
            }
        }
        out_events.push(Event::SlotSelected {
            slot: inventory.selected(),
        });
    }

    /// Ends the current swing once its duration elapsed.
    pub fn finish_swing(&self, player: &mut Player, tick: u64) {
        if let Some(started) = player.swing_started {
            if tick >= started + u64::from(self.tuning.swing_ticks) {
                player.swing_started = None;
            }
        }
    }

    /// Uses the item in the selected slot.
    pub fn use_selected(
        &self,
        player: &mut Player,
        tick: u64,
        npcs: &mut [Npc],
        collision: &CollisionGrid,
        out_events: &mut Vec<Event>,
    ) -> ItemUse {
        let kind = player.inventory.selected_kind();
        if let Some(damage) = kind.melee_damage() {
            return self.swing(player, kind, damage, tick, npcs, collision, out_events);
        }

        let slot = player.inventory.selected();
        let outcome = match kind {
            ItemKind::HealthPotion => {
                player.vitals.heal(self.tuning.potion_restore);
                let _ = player.inventory.consume(slot);
                ItemUse::Drank(kind)
            }
            ItemKind::MagicPotion => {
                player.vitals.restore_mana(self.tuning.potion_restore);
                let _ = player.inventory.consume(slot);
                ItemUse::Drank(kind)
            }
            ItemKind::MagicScroll => {
                if !player.vitals.spend_mana(self.tuning.magic_scroll_mana) {
                    debug!(mana = player.vitals.mana, "not enough mana to cast");
                    return ItemUse::Nothing;
                }
                self.cast(player, true)
            }
            ItemKind::FireScroll => {
                let _ = player.inventory.consume(slot);
                self.cast(player, false)
            }
            _ => return ItemUse::Nothing,
        };
        out_events.push(Event::ItemUsed { kind });
        outcome
    }

    fn cast(&self, player: &Player, magic: bool) -> ItemUse {
        ItemUse::Cast {
            origin: player.position,
            direction: player.forward(),
            magic,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn swing(
        &self,
        player: &mut Player,
        weapon: ItemKind,
        damage: u32,
        tick: u64,
        npcs: &mut [Npc],
        collision: &CollisionGrid,
        out_events: &mut Vec<Event>,
    ) -> ItemUse {
        if player.swing_started.is_some() {
            return ItemUse::Nothing;
        }
        player.swing_started = Some(tick);

        let announce_at = out_events.len();
        let forward = player.forward();
        let mut hits = 0;
        for npc in npcs.iter_mut().filter(|npc| npc.is_alive()) {
            let offset = npc.position() - player.position;
            let distance = offset.length();
            if distance == 0.0 || distance > self.tuning.swing_range {
                continue;
            }
            let direction = offset / distance;
            if forward.dot(direction) <= self.swing_cone_cos {
                continue;
            }
            let hit = Hit {
                amount: damage,
                knockback: Some(direction * self.tuning.knockback),
            };
            if npc.take_damage(hit, collision, &self.npc_tuning, out_events) {
                hits += 1;
            }
        }

        out_events.insert(announce_at, Event::SwingStarted { weapon, hits });
        debug!(weapon = weapon.name(), hits, "swing");
        ItemUse::Swing { hits }
    }
}
