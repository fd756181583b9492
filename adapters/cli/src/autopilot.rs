//! Scripted explorer that stands in for keyboard and mouse input.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use delve_core::{Command, MoveIntent};
use delve_world::{query, World};
use glam::Vec2;

/// NPCs closer than this draw the explorer's attention.
const ENGAGE_DISTANCE: f32 = 3.0;
/// NPCs closer than this are swung at instead of approached.
const STRIKE_DISTANCE: f32 = 1.5;

/// Wanders forward, turns away from walls, and fights what comes close.
#[derive(Clone, Debug, Default)]
pub(crate) struct Autopilot {
    last_position: Option<Vec2>,
    blocked_turns: u32,
}

impl Autopilot {
    /// Appends the commands for the next tick, always ending with a tick.
    pub(crate) fn plan(&mut self, world: &World, out: &mut Vec<Command>) {
        let camera = query::camera(world);
        let hud = query::hud(world);

        if hud.nearby_chest.is_some() || hud.nearby_item.is_some() {
            out.push(Command::Interact);
        }

        let threat = query::npcs(world)
            .into_iter()
            .filter(|npc| npc.health > 0)
            .map(|npc| npc.position - camera.position)
            .filter(|offset| offset.length() <= ENGAGE_DISTANCE)
            .min_by(|a, b| a.length().total_cmp(&b.length()));

        let mut movement = MoveIntent::FORWARD;
        let mut yaw_delta = 0.0;
        if let Some(offset) = threat {
            yaw_delta = wrap_angle(heading_toward(offset) - camera.yaw);
            if offset.length() <= STRIKE_DISTANCE {
                movement = MoveIntent::IDLE;
                let weapon = hud.slots[hud.selected_slot].kind();
                if !hud.swinging && weapon.melee_damage().is_some() {
                    out.push(Command::UseSelected);
                }
            }
        } else if self.last_position == Some(camera.position) {
            self.blocked_turns += 1;
            yaw_delta = if self.blocked_turns % 3 == 0 {
                -FRAC_PI_2
            } else {
                FRAC_PI_2
            };
        }

        self.last_position = Some(camera.position);
        out.push(Command::Tick {
            movement,
            yaw_delta,
        });
    }
}

/// Yaw whose forward vector points along `offset`.
fn heading_toward(offset: Vec2) -> f32 {
    (-offset.x).atan2(-offset.y)
}

/// Maps an angle into `[-PI, PI)`.
fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}
