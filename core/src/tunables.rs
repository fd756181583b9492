//! Compiled-in tunables and the validated world configuration.

use thiserror::Error;

/// Smallest grid side accepted by generation.
const MIN_GRID_SIDE: u32 = 5;
/// Largest grid side accepted by generation.
const MAX_GRID_SIDE: u32 = 1001;

/// Errors raised while validating a [`WorldConfig`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested grid cannot hold a bordered maze.
    #[error("grid {width}x{height} is smaller than the {minimum}x{minimum} minimum")]
    GridTooSmall {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Minimum accepted side length.
        minimum: u32,
    },
    /// The requested grid would allocate an unreasonable number of tiles.
    #[error("grid {width}x{height} exceeds the {maximum}x{maximum} maximum")]
    GridTooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Maximum accepted side length.
        maximum: u32,
    },
    /// Spatial chunks must cover at least one tile.
    #[error("chunk size must be at least one tile")]
    ChunkSizeZero,
}

/// Grid dimensions that passed validation and were coerced to odd values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    width: u32,
    height: u32,
}

impl GridDimensions {
    /// Validates the requested size, bumping even sides up by one.
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width < MIN_GRID_SIDE || height < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall {
                width,
                height,
                minimum: MIN_GRID_SIDE,
            });
        }
        if width > MAX_GRID_SIDE || height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                width,
                height,
                maximum: MAX_GRID_SIDE,
            });
        }
        Ok(Self {
            width: width | 1,
            height: height | 1,
        })
    }

    /// Odd number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Odd number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Every compiled-in constant of the simulation, grouped by subsystem.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tunables {
    /// Level generation probabilities and limits.
    pub generation: GenerationTuning,
    /// Chunking and per-category render distances.
    pub culling: CullingTuning,
    /// NPC behaviour timers and ranges.
    pub npc: NpcTuning,
    /// Projectile flight and damage.
    pub projectile: ProjectileTuning,
    /// Chest, pickup and drop parameters.
    pub interaction: InteractionTuning,
    /// Player movement, vitals and melee.
    pub player: PlayerTuning,
}

/// Parameters steering the dungeon generator.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationTuning {
    /// Smallest room side in tiles.
    pub room_min_side: u32,
    /// Largest room side in tiles.
    pub room_max_side: u32,
    /// Lower bound of the target room count.
    pub room_target_min: u32,
    /// Upper bound of the target room count.
    pub room_target_max: u32,
    /// Placement attempts before room carving gives up.
    pub room_attempts: u32,
    /// Distance of a torch anchor from the wall tile centre along the face normal.
    pub torch_face_offset: f32,
    /// Minimum distance between two torch anchors.
    pub torch_spacing: f32,
    /// Chance that an eligible wall face receives a torch.
    pub torch_chance: f64,
    /// Chance that a room receives a chest.
    pub chest_chance: f64,
    /// Chance that a room centre receives an NPC.
    pub room_npc_chance: f64,
    /// Chance that any interior floor tile receives a wandering NPC.
    pub wandering_npc_chance: f64,
    /// NPCs never spawn this close to the player spawn.
    pub npc_safety_radius: f32,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            room_min_side: 3,
            room_max_side: 6,
            room_target_min: 4,
            room_target_max: 8,
            room_attempts: 100,
            torch_face_offset: 0.55,
            torch_spacing: 3.0,
            torch_chance: 0.6,
            chest_chance: 0.9,
            room_npc_chance: 0.8,
            wandering_npc_chance: 0.01,
            npc_safety_radius: 8.0,
        }
    }
}

/// Chunk size, view cone and per-category distance caps.
#[derive(Clone, Debug, PartialEq)]
pub struct CullingTuning {
    /// Side length of a spatial chunk in tiles.
    pub chunk_size: u32,
    /// Horizontal field of view in degrees.
    pub fov_degrees: f32,
    /// Slack subtracted from the half-FOV cosine so objects at the screen edge stay drawn.
    pub cone_slack: f32,
    /// Distance cap for wall and floor tiles.
    pub wall_distance: f32,
    /// Distance cap for torches.
    pub torch_distance: f32,
    /// Distance cap for chests.
    pub chest_distance: f32,
    /// Distance cap for NPCs.
    pub npc_distance: f32,
    /// Distance cap for dropped items.
    pub item_distance: f32,
    /// Distance cap for projectiles.
    pub projectile_distance: f32,
}

impl Default for CullingTuning {
    fn default() -> Self {
        Self {
            chunk_size: 8,
            fov_degrees: 120.0,
            cone_slack: 0.3,
            wall_distance: 6.0,
            torch_distance: 10.0,
            chest_distance: 8.0,
            npc_distance: 10.0,
            item_distance: 5.0,
            projectile_distance: 10.0,
        }
    }
}

/// NPC behaviour parameters. Durations are measured in ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct NpcTuning {
    /// NPCs attack when the player is strictly closer than this.
    pub attack_range: f32,
    /// Ticks between two attacks of the same NPC.
    pub attack_cooldown: u32,
    /// Ticks an NPC stands still after attacking.
    pub attack_freeze: u32,
    /// NPCs stop chasing at or below this distance.
    pub chase_min_distance: f32,
    /// NPCs ignore the player at or beyond this distance.
    pub chase_max_distance: f32,
    /// Ticks between scheduled path recalculations.
    pub path_recalc_interval: u32,
    /// Maximum distance travelled per tick.
    pub step: f32,
    /// Duration of the hit flash.
    pub flash_ticks: u32,
    /// Duration of the dying state before removal.
    pub death_ticks: u32,
}

impl Default for NpcTuning {
    fn default() -> Self {
        Self {
            attack_range: 2.0,
            attack_cooldown: 40,
            attack_freeze: 10,
            chase_min_distance: 1.7,
            chase_max_distance: 7.0,
            path_recalc_interval: 20,
            step: 0.05,
            flash_ticks: 10,
            death_ticks: 60,
        }
    }
}

/// Projectile flight and damage parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileTuning {
    /// Distance travelled per tick.
    pub speed: f32,
    /// Range after which the projectile retires.
    pub max_distance: f32,
    /// Radius around an NPC that counts as a hit.
    pub hit_radius: f32,
    /// Damage dealt by magic projectiles.
    pub magic_damage: u32,
    /// Damage dealt by every other projectile.
    pub plain_damage: u32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 0.3,
            max_distance: 7.0,
            hit_radius: 0.3,
            magic_damage: 20,
            plain_damage: 10,
        }
    }
}

/// Chest, pickup and drop parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionTuning {
    /// Chests open only within this distance of the player.
    pub chest_radius: f32,
    /// Items are collected only within this distance of the player.
    pub pickup_radius: f32,
    /// Distance in front of the player where dropped items land.
    pub drop_distance: f32,
    /// Ticks a collected item lingers before it is pruned.
    pub pickup_fade_ticks: u32,
    /// Fewest drops rolled for an opened chest.
    pub chest_drops_min: u32,
    /// Most drops rolled for an opened chest.
    pub chest_drops_max: u32,
    /// Closest distance from the chest centre a drop may land.
    pub scatter_min: f32,
    /// Farthest distance from the chest centre a drop may land.
    pub scatter_max: f32,
    /// Rolls below this yield a fire scroll.
    pub fire_scroll_band: f64,
    /// Rolls below this yield a health potion.
    pub health_potion_band: f64,
    /// Rolls below this yield a magic potion; anything above yields nothing.
    pub magic_potion_band: f64,
}

impl Default for InteractionTuning {
    fn default() -> Self {
        Self {
            chest_radius: 2.0,
            pickup_radius: 1.0,
            drop_distance: 1.0,
            pickup_fade_ticks: 20,
            chest_drops_min: 3,
            chest_drops_max: 5,
            scatter_min: 0.5,
            scatter_max: 1.5,
            fire_scroll_band: 0.10,
            health_potion_band: 0.45,
            magic_potion_band: 0.75,
        }
    }
}

/// Player movement, vitals and melee parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerTuning {
    /// Distance travelled per tick for each held direction.
    pub move_speed: f32,
    /// Starting and maximum health.
    pub max_health: u32,
    /// Starting and maximum mana.
    pub max_mana: u32,
    /// Health or mana restored by one potion.
    pub potion_restore: u32,
    /// Duration of a melee swing.
    pub swing_ticks: u32,
    /// Reach of a melee swing.
    pub swing_range: f32,
    /// Full opening angle of the melee cone in degrees.
    pub swing_cone_degrees: f32,
    /// Distance NPCs are pushed back by a melee hit.
    pub knockback: f32,
    /// Mana spent when reading a magic scroll.
    pub magic_scroll_mana: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_speed: 0.1,
            max_health: 100,
            max_mana: 100,
            potion_restore: 30,
            swing_ticks: 30,
            swing_range: 1.8,
            swing_cone_degrees: 60.0,
            knockback: 0.7,
            magic_scroll_mana: 10,
        }
    }
}

/// User-facing configuration of a single run.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Requested grid width; even values are bumped by one.
    pub width: u32,
    /// Requested grid height; even values are bumped by one.
    pub height: u32,
    /// Seed for the deterministic level and combat RNG.
    pub seed: u64,
    /// Compiled-in constants.
    pub tunables: Tunables,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 51,
            height: 51,
            seed: 0,
            tunables: Tunables::default(),
        }
    }
}

impl WorldConfig {
    /// Checks the configuration and returns the coerced grid dimensions.
    pub fn validate(&self) -> Result<GridDimensions, ConfigError> {
        let dimensions = GridDimensions::new(self.width, self.height)?;
        if self.tunables.culling.chunk_size == 0 {
            return Err(ConfigError::ChunkSizeZero);
        }
        Ok(dimensions)
    }
}
