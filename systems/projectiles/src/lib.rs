#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Straight-line projectiles that retire on walls, NPCs, or range exhaustion.

use delve_core::{
    CollisionGrid, Event, NpcTuning, ProjectileId, ProjectileTuning, RetireReason,
};
use delve_system_npc::{Hit, Npc};
use glam::Vec2;
use tracing::debug;

/// Single projectile in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    id: ProjectileId,
    origin: Vec2,
    position: Vec2,
    direction: Vec2,
    speed: f32,
    traveled: f32,
    max_distance: f32,
    magic: bool,
    retired: Option<RetireReason>,
}

impl Projectile {
    /// Creates a projectile flying along `direction`.
    ///
    /// The direction is normalised. A projectile spawned inside a wall, or
    /// without a usable direction, starts out retired.
    #[must_use]
    pub fn spawn(
        id: ProjectileId,
        origin: Vec2,
        direction: Vec2,
        speed: f32,
        max_distance: f32,
        magic: bool,
        collision: &CollisionGrid,
    ) -> Self {
        let normalized = direction.try_normalize();
        let retired = if collision.collides(origin) {
            Some(RetireReason::HitWall)
        } else if normalized.is_none() {
            Some(RetireReason::OutOfRange)
        } else {
            None
        };
        Self {
            id,
            origin,
            position: origin,
            direction: normalized.unwrap_or(Vec2::ZERO),
            speed,
            traveled: 0.0,
            max_distance,
            magic,
            retired,
        }
    }

    /// Identifier of the projectile.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Unit flight direction.
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Straight-line distance from the origin.
    #[must_use]
    pub const fn traveled(&self) -> f32 {
        self.traveled
    }

    /// Whether the projectile deals magic damage.
    #[must_use]
    pub const fn is_magic(&self) -> bool {
        self.magic
    }

    /// Whether the projectile is still flying.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.retired.is_none()
    }

    /// Why the projectile stopped, if it did.
    #[must_use]
    pub const fn retire_reason(&self) -> Option<RetireReason> {
        self.retired
    }

    /// Moves the projectile one tick forward, returning the reason it retired
    /// during this step, if any.
    pub fn advance(&mut self, collision: &CollisionGrid) -> Option<RetireReason> {
        if !self.is_active() {
            return None;
        }
        let next = self.position + self.direction * self.speed;
        if collision.collides(next) {
            return self.retire(RetireReason::HitWall);
        }
        self.position = next;
        self.traveled = self.position.distance(self.origin);
        if self.traveled >= self.max_distance {
            return self.retire(RetireReason::OutOfRange);
        }
        None
    }

    fn retire(&mut self, reason: RetireReason) -> Option<RetireReason> {
        self.retired = Some(reason);
        Some(reason)
    }
}

/// Launches and advances projectiles.
#[derive(Clone, Debug)]
pub struct ProjectileSystem {
    tuning: ProjectileTuning,
    npc_tuning: NpcTuning,
}

impl ProjectileSystem {
    /// Creates the system from the projectile and NPC tunables.
    #[must_use]
    pub fn new(tuning: &ProjectileTuning, npc_tuning: &NpcTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            npc_tuning: npc_tuning.clone(),
        }
    }

    /// Fires a projectile with the configured speed and range.
    #[allow(clippy::too_many_arguments)]
    pub fn launch(
        &self,
        id: ProjectileId,
        origin: Vec2,
        direction: Vec2,
        magic: bool,
        collision: &CollisionGrid,
        projectiles: &mut Vec<Projectile>,
        out_events: &mut Vec<Event>,
    ) {
        let projectile = Projectile::spawn(
            id,
            origin,
            direction,
            self.tuning.speed,
            self.tuning.max_distance,
            magic,
            collision,
        );
        out_events.push(Event::ProjectileSpawned {
            projectile: id,
            magic,
        });
        if let Some(reason) = projectile.retire_reason() {
            out_events.push(Event::ProjectileRetired {
                projectile: id,
                reason,
            });
        }
        projectiles.push(projectile);
    }

    /// Advances every active projectile, resolves NPC hits, and purges
    /// retired projectiles.
    pub fn update(
        &self,
        projectiles: &mut Vec<Projectile>,
        npcs: &mut [Npc],
        collision: &CollisionGrid,
        out_events: &mut Vec<Event>,
    ) {
        for projectile in projectiles.iter_mut() {
            if let Some(reason) = projectile.advance(collision) {
                out_events.push(Event::ProjectileRetired {
                    projectile: projectile.id,
                    reason,
                });
                continue;
            }
            if !projectile.is_active() {
                continue;
            }
            self.resolve_npc_hit(projectile, npcs, collision, out_events);
        }

        projectiles.retain(Projectile::is_active);
    }

    fn resolve_npc_hit(
        &self,
        projectile: &mut Projectile,
        npcs: &mut [Npc],
        collision: &CollisionGrid,
        out_events: &mut Vec<Event>,
    ) {
        let Some(target) = npcs.iter_mut().find(|npc| {
            npc.is_alive() && npc.position().distance(projectile.position) <= self.tuning.hit_radius
        }) else {
            return;
        };

        let amount = if projectile.magic {
            self.tuning.magic_damage
        } else {
            self.tuning.plain_damage
        };
        let _ = target.take_damage(
            Hit {
                amount,
                knockback: None,
            },
            collision,
            &self.npc_tuning,
            out_events,
        );
        let reason = RetireReason::HitNpc(target.id());
        let _ = projectile.retire(reason);
        debug!(
            projectile = projectile.id.get(),
            npc = target.id().get(),
            "projectile hit"
        );
        out_events.push(Event::ProjectileRetired {
            projectile: projectile.id,
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::TileGrid;

    #[test]
    fn zero_direction_retires_immediately() {
        let collision = CollisionGrid::snapshot(&TileGrid::from_rows(&["###", "#.#", "###"]));
        let projectile = Projectile::spawn(
            ProjectileId::new(0),
            Vec2::new(1.5, 1.5),
            Vec2::ZERO,
            0.3,
            7.0,
            false,
            &collision,
        );
        assert!(!projectile.is_active());
    }
}
