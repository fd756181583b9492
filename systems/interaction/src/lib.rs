#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Chests, floor items, and the player's hotbar.

mod inventory;
mod items;

pub use inventory::{Inventory, InventorySlot};
pub use items::DroppedItems;

use std::f32::consts::TAU;

use delve_core::{forward_from_yaw, ChestId, ChestPlacement, Event, InteractionTuning, ItemId, ItemKind};
use glam::Vec2;
use rand::Rng;
use tracing::debug;

/// Outcome of the interact command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    /// A chest was opened and removed; the spatial index must be rebuilt.
    OpenedChest(ChestId),
    /// A floor item moved into the hotbar.
    Collected(ItemId),
    /// Nothing in reach, or nowhere to store the item.
    Nothing,
}

/// Resolves chest openings, pickups, and drops.
#[derive(Clone, Debug)]
pub struct InteractionLayer {
    tuning: InteractionTuning,
}

impl InteractionLayer {
    /// Creates the layer using the provided tunables.
    #[must_use]
    pub fn new(tuning: &InteractionTuning) -> Self {
        Self {
            tuning: tuning.clone(),
        }
    }

    /// Tunables the layer was created with.
    #[must_use]
    pub fn tuning(&self) -> &InteractionTuning {
        &self.tuning
    }

    /// Index of the closest chest in reach of `player`, ties keeping the earlier chest.
    #[must_use]
    pub fn nearest_chest(&self, chests: &[ChestPlacement], player: Vec2) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, chest) in chests.iter().enumerate() {
            let distance = chest.center.distance(player);
            if distance > self.tuning.chest_radius {
                continue;
            }
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Index of the closest uncollected item the player can pick up.
    #[must_use]
    pub fn nearest_item(&self, items: &DroppedItems, player: Vec2) -> Option<usize> {
        items.nearest_uncollected(player, self.tuning.pickup_radius)
    }

    /// Opens a chest if one is in reach, otherwise picks up the nearest item.
    #[allow(clippy::too_many_arguments)]
    pub fn interact<R>(
        &self,
        chests: &mut Vec<ChestPlacement>,
        items: &mut DroppedItems,
        inventory: &mut Inventory,
        player: Vec2,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Interaction
    where
        R: Rng + ?Sized,
    {
        if let Some(chest) = self.open_chest(chests, items, player, rng, out_events) {
            return Interaction::OpenedChest(chest);
        }
        match self.pick_up(items, inventory, player, out_events) {
            Some(item) => Interaction::Collected(item),
            None => Interaction::Nothing,
        }
    }

    /// Opens and removes the nearest chest in reach, scattering its contents.
    ///
    /// The caller owns the spatial index and must rebuild it when this
    /// returns a chest.
    pub fn open_chest<R>(
        &self,
        chests: &mut Vec<ChestPlacement>,
        items: &mut DroppedItems,
        player: Vec2,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Option<ChestId>
    where
        R: Rng + ?Sized,
    {
        let index = self.nearest_chest(chests, player)?;
        let chest = chests.remove(index);

        let mut spilled = Vec::new();
        let rolls = rng.gen_range(self.tuning.chest_drops_min..=self.tuning.chest_drops_max);
        let mut fire_scroll_given = false;
        for _ in 0..rolls {
            let Some(kind) = self.roll_chest_item(rng, &mut fire_scroll_given) else {
                continue;
            };
            let angle = rng.gen_range(0.0..TAU);
            let radius = rng.gen_range(self.tuning.scatter_min..=self.tuning.scatter_max);
            let position = chest.center + Vec2::new(angle.cos(), angle.sin()) * radius;
            spilled.push((kind, position));
        }

        out_events.push(Event::ChestOpened {
            chest: chest.id,
            drops: spilled.len() as u32,
        });
        for (kind, position) in spilled {
            let _ = items.spawn(kind, position, out_events);
        }
        debug!(chest = chest.id.get(), rolls, "chest opened");
        Some(chest.id)
    }

    fn roll_chest_item<R>(&self, rng: &mut R, fire_scroll_given: &mut bool) -> Option<ItemKind>
    where
        R: Rng + ?Sized,
    {
        let roll = rng.gen::<f64>();
        if roll < self.tuning.fire_scroll_band {
            if *fire_scroll_given {
                return None;
            }
            *fire_scroll_given = true;
            Some(ItemKind::FireScroll)
        } else if roll < self.tuning.health_potion_band {
            Some(ItemKind::HealthPotion)
        } else if roll < self.tuning.magic_potion_band {
            Some(ItemKind::MagicPotion)
        } else {
            None
        }
    }

    /// Moves the nearest item in reach into the hotbar.
    ///
    /// A full hotbar leaves the item where it lies.
    pub fn pick_up(
        &self,
        items: &mut DroppedItems,
        inventory: &mut Inventory,
        player: Vec2,
        out_events: &mut Vec<Event>,
    ) -> Option<ItemId> {
        let index = self.nearest_item(items, player)?;
        let item = *items.get(index)?;
        let slot = inventory.insert(item.kind)?;
        items.mark_collected(index);
        out_events.push(Event::ItemCollected {
            item: item.id,
            kind: item.kind,
            slot,
        });
        Some(item.id)
    }

    /// Drops one item from the selected slot in front of the player.
    pub fn drop_selected(
        &self,
        inventory: &mut Inventory,
        items: &mut DroppedItems,
        player: Vec2,
        yaw: f32,
        out_events: &mut Vec<Event>,
    ) -> Option<ItemId> {
        let kind = inventory.take_for_drop(inventory.selected())?;
        let position = player + forward_from_yaw(yaw) * self.tuning.drop_distance;
        Some(items.spawn(kind, position, out_events))
    }

    /// Ages collected items and forgets those whose fade finished.
    pub fn prune(&self, items: &mut DroppedItems) {
        items.prune(self.tuning.pickup_fade_ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::CellCoord;

    fn chest_at(id: u32, x: f32, z: f32) -> ChestPlacement {
        ChestPlacement {
            id: ChestId::new(id),
            cell: CellCoord::new(x as u32, z as u32),
            center: Vec2::new(x, z),
        }
    }

    #[test]
    fn nearest_chest_respects_the_radius() {
        let layer = InteractionLayer::new(&InteractionTuning::default());
        let chests = [chest_at(0, 5.5, 5.5), chest_at(1, 2.5, 1.5)];
        assert_eq!(layer.nearest_chest(&chests, Vec2::new(1.5, 1.5)), Some(1));
        assert_eq!(layer.nearest_chest(&chests, Vec2::new(3.5, 5.5)), Some(0));
        assert_eq!(layer.nearest_chest(&chests, Vec2::new(9.5, 9.5)), None);
    }
}
