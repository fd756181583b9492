#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! NPC behaviour: chasing the player along A* paths, attacking in melee range,
//! and dying with a chance to leave loot behind.

mod npc;

pub use npc::{Hit, Npc, NpcState};

use delve_core::{CellCoord, CollisionGrid, Event, ItemKind, NpcTuning, Vitals};
use delve_system_pathfinding::Pathfinder;
use glam::Vec2;
use rand::Rng;
use tracing::debug;

/// Distance under which two points are considered identical when stepping.
const ARRIVAL_EPSILON: f32 = 1e-5;

/// Item left behind by a removed NPC.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LootRoll {
    /// Kind of the dropped item.
    pub item: ItemKind,
    /// Last position of the NPC.
    pub position: Vec2,
}

/// Drives every NPC once per tick.
#[derive(Debug)]
pub struct NpcController {
    tuning: NpcTuning,
    pathfinder: Pathfinder,
    scratch_path: Vec<CellCoord>,
}

impl NpcController {
    /// Creates a controller using the provided tunables.
    #[must_use]
    pub fn new(tuning: &NpcTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            pathfinder: Pathfinder::default(),
            scratch_path: Vec::new(),
        }
    }

    /// Tunables the controller was created with.
    #[must_use]
    pub fn tuning(&self) -> &NpcTuning {
        &self.tuning
    }

    /// Advances every NPC by one tick.
    ///
    /// Attacks are applied to `vitals` immediately. NPCs whose death animation
    /// finishes are removed from `npcs` and may append a [`LootRoll`] to `loot`.
    #[allow(clippy::too_many_arguments)]
    pub fn update<R>(
        &mut self,
        npcs: &mut Vec<Npc>,
        collision: &CollisionGrid,
        player_position: Vec2,
        vitals: &mut Vitals,
        rng: &mut R,
        loot: &mut Vec<LootRoll>,
        out_events: &mut Vec<Event>,
    ) where
        R: Rng + ?Sized,
    {
        for npc in npcs.iter_mut() {
            npc.tick_flash();

            match npc.state() {
                NpcState::Removed => continue,
                NpcState::Dying => {
                    if npc.tick_death() {
                        roll_loot(npc, rng, loot);
                        debug!(npc = npc.id().get(), "npc removed");
                        out_events.push(Event::NpcRemoved { npc: npc.id() });
                    }
                    continue;
                }
                _ => {}
            }

            self.update_living(npc, collision, player_position, vitals, out_events);
        }

        npcs.retain(|npc| npc.state() != NpcState::Removed);
    }

    fn update_living(
        &mut self,
        npc: &mut Npc,
        collision: &CollisionGrid,
        player_position: Vec2,
        vitals: &mut Vitals,
        out_events: &mut Vec<Event>,
    ) {
        let distance = npc.position().distance(player_position);

        let mut attacked = false;
        if npc.attack_cooldown > 0 {
            npc.attack_cooldown -= 1;
        } else if distance < self.tuning.attack_range {
            let amount = npc.kind().profile().attack_damage;
            vitals.apply_damage(amount);
            out_events.push(Event::PlayerDamaged {
                npc: npc.id(),
                amount,
                remaining: vitals.health,
            });
            npc.attack_cooldown = self.tuning.attack_cooldown;
            npc.frozen_timer = self.tuning.attack_freeze;
            attacked = true;
        }

        if npc.frozen_timer > 0 {
            npc.frozen_timer -= 1;
        }

        let in_chase_band = distance > self.tuning.chase_min_distance
            && distance < self.tuning.chase_max_distance;

        let state = if attacked {
            NpcState::Attacking
        } else if npc.frozen_timer == 0 && in_chase_band {
            self.chase(npc, collision, player_position);
            NpcState::Chasing
        } else if npc.frozen_timer > 0 {
            NpcState::Frozen
        } else {
            NpcState::Idle
        };
        npc.set_state(state);
    }

    fn chase(&mut self, npc: &mut Npc, collision: &CollisionGrid, player_position: Vec2) {
        let (Some(npc_tile), Some(player_tile)) = (
            CellCoord::containing(npc.position()),
            CellCoord::containing(player_position),
        ) else {
            return;
        };

        // A failed search leaves the path empty; it waits for the timer.
        let stale = !npc.path.is_empty() && npc.path.front() != Some(&npc_tile);
        let player_moved = npc.last_player_tile != Some(player_tile);
        if npc.path_recalc_timer == 0 || (player_moved && stale) {
            self.pathfinder.find_path(
                collision.tiles(),
                npc_tile,
                player_tile,
                &mut self.scratch_path,
            );
            npc.path.clear();
            npc.path.extend(self.scratch_path.iter().copied());
            npc.path_recalc_timer = self.tuning.path_recalc_interval;
            npc.last_player_tile = Some(player_tile);
        } else {
            npc.path_recalc_timer -= 1;
        }

        let target = match npc.path.len() {
            0 => return,
            1 => player_position,
            _ => match npc.path.get(1) {
                Some(next) => next.center(),
                None => return,
            },
        };

        let destination = step_toward(npc.position(), target, self.tuning.step);
        if collision.collides(destination) {
            return;
        }
        npc.set_position(destination);

        if npc.path.len() >= 2 && destination.distance(target) <= ARRIVAL_EPSILON {
            let _ = npc.path.pop_front();
        }
    }
}

/// Moves at most `step` from `from` toward `to` without overshooting.
fn step_toward(from: Vec2, to: Vec2, step: f32) -> Vec2 {
    let offset = to - from;
    let distance = offset.length();
    if distance < ARRIVAL_EPSILON {
        return from;
    }
    if distance <= step {
        return to;
    }
    from + offset / distance * step
}

fn roll_loot<R>(npc: &Npc, rng: &mut R, loot: &mut Vec<LootRoll>)
where
    R: Rng + ?Sized,
{
    let Some(drop) = npc.kind().profile().loot else {
        return;
    };
    if rng.gen::<f64>() < drop.chance {
        loot.push(LootRoll {
            item: drop.item,
            position: npc.position(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_never_overshoots() {
        let from = Vec2::new(1.0, 1.0);
        assert_eq!(step_toward(from, Vec2::new(1.02, 1.0), 0.05), Vec2::new(1.02, 1.0));
        let stepped = step_toward(from, Vec2::new(2.0, 1.0), 0.05);
        assert!((stepped.x - 1.05).abs() < 1e-6);
        assert_eq!(step_toward(from, from, 0.05), from);
    }
}
