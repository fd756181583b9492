//! Distance and view-cone culling.

use delve_core::{forward_from_yaw, CullingTuning};
use glam::Vec2;

/// Kinds of renderable objects, each with its own distance cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderCategory {
    /// Wall and floor tiles.
    Tile,
    /// Wall-mounted torches.
    Torch,
    /// Closed chests.
    Chest,
    /// Hostile NPCs.
    Npc,
    /// Items lying on the floor.
    DroppedItem,
    /// Flying projectiles.
    Projectile,
}

impl RenderCategory {
    /// Maximum render distance configured for the category.
    #[must_use]
    pub fn max_distance(self, tuning: &CullingTuning) -> f32 {
        match self {
            Self::Tile => tuning.wall_distance,
            Self::Torch => tuning.torch_distance,
            Self::Chest => tuning.chest_distance,
            Self::Npc => tuning.npc_distance,
            Self::DroppedItem => tuning.item_distance,
            Self::Projectile => tuning.projectile_distance,
        }
    }
}

/// Camera position and heading on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewpoint {
    /// Camera position.
    pub position: Vec2,
    /// Camera yaw in radians.
    pub yaw: f32,
}

/// Precomputed culling predicate for a fixed set of tunables.
#[derive(Clone, Debug, PartialEq)]
pub struct Visibility {
    tuning: CullingTuning,
    cone_threshold: f32,
}

impl Visibility {
    /// Derives the cone threshold from the configured field of view.
    #[must_use]
    pub fn new(tuning: &CullingTuning) -> Self {
        let half_fov = tuning.fov_degrees.to_radians() / 2.0;
        Self {
            cone_threshold: half_fov.cos() - tuning.cone_slack,
            tuning: tuning.clone(),
        }
    }

    /// Reports whether `point` should be drawn for the viewpoint.
    ///
    /// The point must lie within the category's distance cap and inside the
    /// widened view cone. A point at the camera position is always eligible.
    #[must_use]
    pub fn is_render_eligible(
        &self,
        viewpoint: Viewpoint,
        point: Vec2,
        category: RenderCategory,
    ) -> bool {
        let offset = point - viewpoint.position;
        let distance = offset.length();
        if distance > category.max_distance(&self.tuning) {
            return false;
        }
        if distance == 0.0 {
            return true;
        }
        forward_from_yaw(viewpoint.yaw).dot(offset / distance) > self.cone_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facing_north() -> Viewpoint {
        Viewpoint {
            position: Vec2::new(10.0, 10.0),
            yaw: 0.0,
        }
    }

    #[test]
    fn camera_position_is_always_eligible() {
        let visibility = Visibility::new(&CullingTuning::default());
        let viewpoint = facing_north();
        assert!(visibility.is_render_eligible(viewpoint, viewpoint.position, RenderCategory::Tile));
    }

    #[test]
    fn distance_caps_differ_per_category() {
        let visibility = Visibility::new(&CullingTuning::default());
        let viewpoint = facing_north();
        let ahead = Vec2::new(10.0, 2.5);

        assert!(!visibility.is_render_eligible(viewpoint, ahead, RenderCategory::Tile));
        assert!(visibility.is_render_eligible(viewpoint, ahead, RenderCategory::Chest));
        assert!(visibility.is_render_eligible(viewpoint, ahead, RenderCategory::Npc));
        assert!(!visibility.is_render_eligible(viewpoint, ahead, RenderCategory::DroppedItem));
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let visibility = Visibility::new(&CullingTuning::default());
        let viewpoint = facing_north();
        assert!(!visibility.is_render_eligible(
            viewpoint,
            Vec2::new(10.0, 12.0),
            RenderCategory::Npc
        ));
    }

    #[test]
    fn slack_widens_the_cone_past_the_field_of_view() {
        let visibility = Visibility::new(&CullingTuning::default());
        let viewpoint = facing_north();
        // 75 degrees off-axis lies outside the half-FOV but inside the widened cone.
        let angle = 75f32.to_radians();
        let point = viewpoint.position + Vec2::new(angle.sin(), -angle.cos()) * 3.0;
        assert!(visibility.is_render_eligible(viewpoint, point, RenderCategory::Torch));
        let sideways = viewpoint.position + Vec2::new(3.0, 0.0);
        assert!(!visibility.is_render_eligible(viewpoint, sideways, RenderCategory::Torch));
    }
}
