//! Per-NPC state and damage handling.

use std::collections::VecDeque;

use delve_core::{CellCoord, CollisionGrid, Event, NpcId, NpcKind, NpcTuning};
use glam::Vec2;
use tracing::debug;

/// Behavioural state of an NPC, refreshed every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NpcState {
    /// Alive and not reacting to the player.
    Idle,
    /// Following a path toward the player.
    Chasing,
    /// Struck the player this tick.
    Attacking,
    /// Standing still after an attack.
    Frozen,
    /// Playing the death animation.
    Dying,
    /// Finished dying; removed at the end of the tick.
    Removed,
}

/// Damage applied to an NPC by the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Health removed by the hit.
    pub amount: u32,
    /// Optional displacement applied when the destination is free.
    pub knockback: Option<Vec2>,
}

/// Hostile NPC roaming the dungeon.
#[derive(Clone, Debug, PartialEq)]
pub struct Npc {
    id: NpcId,
    kind: NpcKind,
    position: Vec2,
    health: i32,
    state: NpcState,
    flash_timer: u32,
    death_timer: u32,
    pub(crate) attack_cooldown: u32,
    pub(crate) frozen_timer: u32,
    pub(crate) path: VecDeque<CellCoord>,
    pub(crate) path_recalc_timer: u32,
    pub(crate) last_player_tile: Option<CellCoord>,
}

impl Npc {
    /// Spawns an idle NPC at full health.
    #[must_use]
    pub fn new(id: NpcId, kind: NpcKind, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            health: kind.profile().max_health,
            state: NpcState::Idle,
            flash_timer: 0,
            death_timer: 0,
            attack_cooldown: 0,
            frozen_timer: 0,
            path: VecDeque::new(),
            path_recalc_timer: 0,
            last_player_tile: None,
        }
    }

    /// Identifier of the NPC.
    #[must_use]
    pub const fn id(&self) -> NpcId {
        self.id
    }

    /// Kind of the NPC.
    #[must_use]
    pub const fn kind(&self) -> NpcKind {
        self.kind
    }

    /// Continuous position of the NPC.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Remaining health; negative after an overkill.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Current behavioural state.
    #[must_use]
    pub const fn state(&self) -> NpcState {
        self.state
    }

    /// Ticks left on the hit flash.
    #[must_use]
    pub const fn flash_timer(&self) -> u32 {
        self.flash_timer
    }

    /// Ticks left before a dying NPC is removed.
    #[must_use]
    pub const fn death_timer(&self) -> u32 {
        self.death_timer
    }

    /// Ticks left before the NPC may attack again.
    #[must_use]
    pub const fn attack_cooldown(&self) -> u32 {
        self.attack_cooldown
    }

    /// Ticks left before the NPC may move again.
    #[must_use]
    pub const fn frozen_timer(&self) -> u32 {
        self.frozen_timer
    }

    /// Ticks left before the cached path is planned again.
    #[must_use]
    pub const fn path_recalc_timer(&self) -> u32 {
        self.path_recalc_timer
    }

    /// Cached path, starting with the tile the path was planned from.
    pub fn path(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.path.iter().copied()
    }

    /// Reports whether the NPC can still act and be hit.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !matches!(self.state, NpcState::Dying | NpcState::Removed)
    }

    /// Applies a hit, reporting whether it landed.
    ///
    /// Dying and removed NPCs ignore hits entirely. A landed hit starts the
    /// flash, may start the death animation, and pushes the NPC back unless
    /// the knockback destination collides.
    pub fn take_damage(
        &mut self,
        hit: Hit,
        collision: &CollisionGrid,
        tuning: &NpcTuning,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if !self.is_alive() {
            return false;
        }

        let amount = i32::try_from(hit.amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(amount);
        self.flash_timer = tuning.flash_ticks;
        out_events.push(Event::NpcDamaged {
            npc: self.id,
            amount: hit.amount,
            remaining: self.health,
        });

        if self.health <= 0 {
            self.state = NpcState::Dying;
            self.death_timer = tuning.death_ticks;
            self.path.clear();
            debug!(npc = self.id.get(), kind = ?self.kind, "npc died");
            out_events.push(Event::NpcDied {
                npc: self.id,
                kind: self.kind,
            });
        }

        if let Some(knockback) = hit.knockback {
            let destination = self.position + knockback;
            if !collision.collides(destination) {
                self.position = destination;
            }
        }
        true
    }

    pub(crate) fn set_state(&mut self, state: NpcState) {
        self.state = state;
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn tick_flash(&mut self) {
        self.flash_timer = self.flash_timer.saturating_sub(1);
    }

    /// Advances the death animation, reporting whether it just finished.
    pub(crate) fn tick_death(&mut self) -> bool {
        self.death_timer = self.death_timer.saturating_sub(1);
        if self.death_timer == 0 {
            self.state = NpcState::Removed;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::TileGrid;

    fn corridor() -> CollisionGrid {
        CollisionGrid::snapshot(&TileGrid::from_rows(&["#######", "#.....#", "#######"]))
    }

    #[test]
    fn lethal_hit_starts_the_death_animation() {
        let tuning = NpcTuning::default();
        let mut npc = Npc::new(NpcId::new(1), NpcKind::Ghost, Vec2::new(2.5, 1.5));
        let mut events = Vec::new();

        assert!(npc.take_damage(
            Hit {
                amount: 20,
                knockback: None
            },
            &corridor(),
            &tuning,
            &mut events,
        ));

        assert_eq!(npc.state(), NpcState::Dying);
        assert_eq!(npc.health(), -5);
        assert_eq!(npc.death_timer(), 60);
        assert_eq!(npc.flash_timer(), 10);
        assert_eq!(
            events,
            vec![
                Event::NpcDamaged {
                    npc: NpcId::new(1),
                    amount: 20,
                    remaining: -5
                },
                Event::NpcDied {
                    npc: NpcId::new(1),
                    kind: NpcKind::Ghost
                },
            ]
        );
    }

    #[test]
    fn knockback_into_a_wall_is_rejected() {
        let tuning = NpcTuning::default();
        let mut npc = Npc::new(NpcId::new(2), NpcKind::Ghoul, Vec2::new(1.5, 1.5));
        let mut events = Vec::new();

        let _ = npc.take_damage(
            Hit {
                amount: 1,
                knockback: Some(Vec2::new(-0.7, 0.0)),
            },
            &corridor(),
            &tuning,
            &mut events,
        );
        assert_eq!(npc.position(), Vec2::new(1.5, 1.5));

        let _ = npc.take_damage(
            Hit {
                amount: 1,
                knockback: Some(Vec2::new(0.7, 0.0)),
            },
            &corridor(),
            &tuning,
            &mut events,
        );
        assert!((npc.position().x - 2.2).abs() < 1e-5);
        assert_eq!(npc.health(), 18);
    }
}
