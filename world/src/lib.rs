#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative dungeon state and the ordered tick pipeline for Delve.

use delve_core::{
    ChestId, ChestPlacement, CollisionGrid, Command, ConfigError, Event, ItemId, MoveIntent, NpcId,
    ProjectileId, Room, TileGrid, TorchPlacement, Tunables, WorldConfig, WELCOME_BANNER,
};
use delve_system_generation::generate;
use delve_system_interaction::{DroppedItems, Interaction, InteractionLayer};
use delve_system_npc::{LootRoll, Npc, NpcController};
use delve_system_player::{HotbarStep, ItemUse, Player, PlayerController};
use delve_system_projectiles::{Projectile, ProjectileSystem};
use delve_system_spatial::{SpatialIndex, Visibility};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Represents the authoritative state of one dungeon run.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tunables: Tunables,
    grid: TileGrid,
    collision: CollisionGrid,
    rooms: Vec<Room>,
    torches: Vec<TorchPlacement>,
    chests: Vec<ChestPlacement>,
    spatial: SpatialIndex,
    visibility: Visibility,
    player: Player,
    npcs: Vec<Npc>,
    projectiles: Vec<Projectile>,
    items: DroppedItems,
    rng: ChaCha8Rng,
    player_controller: PlayerController,
    npc_controller: NpcController,
    projectile_system: ProjectileSystem,
    interaction: InteractionLayer,
    actions: ActionFrame,
    loot: Vec<LootRoll>,
    next_projectile: u32,
    nearby_chest: Option<ChestId>,
    nearby_item: Option<ItemId>,
    defeated: bool,
    tick_index: u64,
}

impl World {
    /// Generates a level for the provided configuration.
    ///
    /// The configuration is validated first; generation itself never fails.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        let dimensions = config.validate()?;
        let tunables = config.tunables;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let layout = generate(dimensions, &tunables.generation, &mut rng);

        let collision = CollisionGrid::snapshot(&layout.grid);
        let spatial = SpatialIndex::build(
            &layout.grid,
            &layout.torches,
            &layout.chests,
            tunables.culling.chunk_size,
        );
        let npcs = layout
            .npc_spawns
            .iter()
            .enumerate()
            .map(|(index, spawn)| Npc::new(NpcId::new(index as u32), spawn.kind, spawn.center))
            .collect();
        let player = Player::spawn(layout.player_spawn_point(), &tunables.player);

        info!(
            width = dimensions.width(),
            height = dimensions.height(),
            seed = config.seed,
            "world ready"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            visibility: Visibility::new(&tunables.culling),
            player_controller: PlayerController::new(&tunables.player, &tunables.npc),
            npc_controller: NpcController::new(&tunables.npc),
            projectile_system: ProjectileSystem::new(&tunables.projectile, &tunables.npc),
            interaction: InteractionLayer::new(&tunables.interaction),
            grid: layout.grid,
            collision,
            rooms: layout.rooms,
            torches: layout.torches,
            chests: layout.chests,
            spatial,
            player,
            npcs,
            projectiles: Vec::new(),
            items: DroppedItems::new(),
            rng,
            actions: ActionFrame::new(),
            loot: Vec::new(),
            next_projectile: 0,
            nearby_chest: None,
            nearby_item: None,
            defeated: false,
            tick_index: 0,
            tunables,
        })
    }

    fn run_tick(&mut self, command: TickInput, out_events: &mut Vec<Event>) {
        let tick = self.tick_index;
        self.player_controller.finish_swing(&mut self.player, tick);

        let mut pending = Vec::new();
        self.actions.drain_phase(ActionPhase::Input, &mut pending);
        if !self.defeated {
            for _ in &pending {
                self.use_selected(tick, out_events);
            }
            let _ = self.player_controller.steer(
                &mut self.player,
                command.movement,
                command.yaw_delta,
                &self.collision,
            );
        }

        self.update_npcs(out_events);
        self.projectile_system.update(
            &mut self.projectiles,
            &mut self.npcs,
            &self.collision,
            out_events,
        );

        pending.clear();
        self.actions.drain_phase(ActionPhase::Interaction, &mut pending);
        if !self.defeated {
            for action in &pending {
                self.resolve_interaction(*action, out_events);
            }
        }
        self.interaction.prune(&mut self.items);
        self.refresh_proximity();

        if self.player.vitals().is_defeated() && !self.defeated {
            self.defeated = true;
            info!(tick, "player defeated");
            out_events.push(Event::PlayerDefeated);
        }

        out_events.push(Event::TimeAdvanced { tick });
        self.tick_index = self.tick_index.saturating_add(1);
    }

    fn use_selected(&mut self, tick: u64, out_events: &mut Vec<Event>) {
        let outcome = self.player_controller.use_selected(
            &mut self.player,
            tick,
            &mut self.npcs,
            &self.collision,
            out_events,
        );
        if let ItemUse::Cast {
            origin,
            direction,
            magic,
        } = outcome
        {
            let id = ProjectileId::new(self.next_projectile);
            self.next_projectile += 1;
            self.projectile_system.launch(
                id,
                origin,
                direction,
                magic,
                &self.collision,
                &mut self.projectiles,
                out_events,
            );
        }
    }

    fn update_npcs(&mut self, out_events: &mut Vec<Event>) {
        let player_position = self.player.position();
        self.npc_controller.update(
            &mut self.npcs,
            &self.collision,
            player_position,
            self.player.vitals_mut(),
            &mut self.rng,
            &mut self.loot,
            out_events,
        );
        for roll in self.loot.drain(..) {
            let _ = self.items.spawn(roll.item, roll.position, out_events);
        }
    }

    fn resolve_interaction(&mut self, action: PlayerAction, out_events: &mut Vec<Event>) {
        let position = self.player.position();
        match action {
            PlayerAction::Interact => {
                let outcome = self.interaction.interact(
                    &mut self.chests,
                    &mut self.items,
                    self.player.inventory_mut(),
                    position,
                    &mut self.rng,
                    out_events,
                );
                if let Interaction::OpenedChest(_) = outcome {
                    self.rebuild_spatial_index(out_events);
                }
            }
            PlayerAction::Drop => {
                let yaw = self.player.yaw();
                let _ = self.interaction.drop_selected(
                    self.player.inventory_mut(),
                    &mut self.items,
                    position,
                    yaw,
                    out_events,
                );
            }
            PlayerAction::Use => {}
        }
    }

    fn rebuild_spatial_index(&mut self, out_events: &mut Vec<Event>) {
        self.spatial = SpatialIndex::build(
            &self.grid,
            &self.torches,
            &self.chests,
            self.tunables.culling.chunk_size,
        );
        debug!(chests = self.chests.len(), "spatial index rebuilt");
        out_events.push(Event::SpatialIndexRebuilt {
            chests: self.chests.len(),
        });
    }

    fn refresh_proximity(&mut self) {
        let position = self.player.position();
        self.nearby_chest = self
            .interaction
            .nearest_chest(&self.chests, position)
            .map(|index| self.chests[index].id);
        self.nearby_item = self
            .interaction
            .nearest_item(&self.items, position)
            .map(|index| self.items.as_slice()[index].id);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Hotbar selection takes effect immediately. Item use, interaction and drops
/// are queued and resolved in their phase of the next tick.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let step = match command {
        Command::Tick {
            movement,
            yaw_delta,
        } => {
            world.run_tick(
                TickInput {
                    movement,
                    yaw_delta,
                },
                out_events,
            );
            return;
        }
        Command::UseSelected => {
            world.actions.queue(world.tick_index, PlayerAction::Use);
            return;
        }
        Command::Interact => {
            world.actions.queue(world.tick_index, PlayerAction::Interact);
            return;
        }
        Command::DropSelected => {
            world.actions.queue(world.tick_index, PlayerAction::Drop);
            return;
        }
        Command::SelectNextSlot => HotbarStep::Next,
        Command::SelectPreviousSlot => HotbarStep::Previous,
        Command::SelectSlot { slot } => HotbarStep::Slot(slot),
    };
    if world.defeated {
        return;
    }
    world
        .player_controller
        .select(&mut world.player, step, out_events);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use delve_core::{
        CellCoord, ChestId, ChestPlacement, CollisionGrid, DroppedItem, ItemId, ItemKind, NpcId,
        NpcKind, ProjectileId, Room, TileGrid, TorchPlacement, Tunables, Vitals, HOTBAR_SLOTS,
    };
    use delve_system_interaction::InventorySlot;
    use delve_system_npc::{Npc, NpcState};
    use delve_system_spatial::{ChunkCoord, RenderCategory, SpatialIndex, Viewpoint};
    use glam::Vec2;

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Tunables the world was built with.
    #[must_use]
    pub fn tunables(world: &World) -> &Tunables {
        &world.tunables
    }

    /// The generated wall and floor layout.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.grid
    }

    /// Runtime collision snapshot of the layout.
    #[must_use]
    pub fn collision(world: &World) -> &CollisionGrid {
        &world.collision
    }

    /// Rooms carved during generation.
    #[must_use]
    pub fn rooms(world: &World) -> &[Room] {
        &world.rooms
    }

    /// Every torch of the level.
    #[must_use]
    pub fn torches(world: &World) -> &[TorchPlacement] {
        &world.torches
    }

    /// Chests that have not been opened yet.
    #[must_use]
    pub fn chests(world: &World) -> &[ChestPlacement] {
        &world.chests
    }

    /// Items on the floor, including collected items still fading out.
    #[must_use]
    pub fn dropped_items(world: &World) -> &[DroppedItem] {
        world.items.as_slice()
    }

    /// Current chunk index of static features.
    #[must_use]
    pub fn spatial_index(world: &World) -> &SpatialIndex {
        &world.spatial
    }

    /// Camera placement of the player.
    #[must_use]
    pub fn camera(world: &World) -> Camera {
        Camera {
            position: world.player.position(),
            yaw: world.player.yaw(),
            pitch: 0.0,
        }
    }

    /// Player health and mana.
    #[must_use]
    pub fn vitals(world: &World) -> Vitals {
        *world.player.vitals()
    }

    /// Reports whether the player has been defeated.
    #[must_use]
    pub fn is_defeated(world: &World) -> bool {
        world.defeated
    }

    /// Chest within opening reach after the last tick, if any.
    #[must_use]
    pub fn nearby_chest(world: &World) -> Option<ChestId> {
        world.nearby_chest
    }

    /// Item within pickup reach after the last tick, if any.
    #[must_use]
    pub fn nearby_item(world: &World) -> Option<ItemId> {
        world.nearby_item
    }

    /// Captures every NPC still present, in simulation order.
    #[must_use]
    pub fn npcs(world: &World) -> Vec<NpcSnapshot> {
        world.npcs.iter().map(NpcSnapshot::from).collect()
    }

    /// Captures the player-facing HUD state.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        let vitals = world.player.vitals();
        let inventory = world.player.inventory();
        let swing_started = world.player.swing_started();
        HudSnapshot {
            slots: *inventory.slots(),
            selected_slot: inventory.selected(),
            health: vitals.health,
            max_health: vitals.max_health,
            mana: vitals.mana,
            max_mana: vitals.max_mana,
            swinging: swing_started.is_some(),
            swing_started,
            swing_duration: world.tunables.player.swing_ticks,
            nearby_chest: world.nearby_chest,
            nearby_item: world.nearby_item,
        }
    }

    /// Captures what the renderer should draw this frame.
    ///
    /// Walls, torches and chests are gathered from the chunks around the
    /// camera; every object is then culled by distance and view cone.
    #[must_use]
    pub fn render(world: &World) -> RenderSnapshot<'_> {
        let camera = camera(world);
        let viewpoint = Viewpoint {
            position: camera.position,
            yaw: camera.yaw,
        };
        let eligible = |point: Vec2, category: RenderCategory| {
            world
                .visibility
                .is_render_eligible(viewpoint, point, category)
        };

        let mut visible_chunks = Vec::new();
        world
            .spatial
            .nearby_chunks(camera.position, &mut visible_chunks);

        let mut walls = Vec::new();
        let mut torches = Vec::new();
        let mut chests = Vec::new();
        for chunk in visible_chunks
            .iter()
            .filter_map(|coord| world.spatial.query_chunk(*coord))
        {
            walls.extend(
                chunk
                    .walls()
                    .iter()
                    .copied()
                    .filter(|cell| eligible(cell.center(), RenderCategory::Tile)),
            );
            torches.extend(
                chunk
                    .torches()
                    .iter()
                    .copied()
                    .filter(|torch| eligible(torch.anchor, RenderCategory::Torch)),
            );
            chests.extend(
                chunk
                    .chests()
                    .iter()
                    .copied()
                    .filter(|chest| eligible(chest.center, RenderCategory::Chest)),
            );
        }

        let npcs = world
            .npcs
            .iter()
            .filter(|npc| eligible(npc.position(), RenderCategory::Npc))
            .map(NpcSnapshot::from)
            .collect();
        let items = world
            .items
            .as_slice()
            .iter()
            .filter(|item| eligible(item.position, RenderCategory::DroppedItem))
            .map(|item| ItemSnapshot {
                id: item.id,
                kind: item.kind,
                position: item.position,
                collected: item.collected,
            })
            .collect();
        let projectiles = world
            .projectiles
            .iter()
            .filter(|projectile| eligible(projectile.position(), RenderCategory::Projectile))
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id(),
                position: projectile.position(),
                magic: projectile.is_magic(),
            })
            .collect();

        RenderSnapshot {
            grid: &world.grid,
            camera,
            visible_chunks,
            walls,
            torches,
            chests,
            npcs,
            items,
            projectiles,
        }
    }

    /// Camera placement on the ground plane.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct Camera {
        /// Camera position.
        pub position: Vec2,
        /// Heading in radians.
        pub yaw: f32,
        /// Vertical tilt in radians; always level.
        pub pitch: f32,
    }

    /// Immutable representation of a single NPC used for rendering.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct NpcSnapshot {
        /// Identifier of the NPC.
        pub id: NpcId,
        /// Kind of the NPC.
        pub kind: NpcKind,
        /// Continuous position.
        pub position: Vec2,
        /// Behavioural state.
        pub state: NpcState,
        /// Remaining health.
        pub health: i32,
        /// Ticks left on the hit flash.
        pub flash_timer: u32,
        /// Ticks left on the death animation.
        pub death_timer: u32,
    }

    impl From<&Npc> for NpcSnapshot {
        fn from(npc: &Npc) -> Self {
            Self {
                id: npc.id(),
                kind: npc.kind(),
                position: npc.position(),
                state: npc.state(),
                health: npc.health(),
                flash_timer: npc.flash_timer(),
                death_timer: npc.death_timer(),
            }
        }
    }

    /// Item on the floor as seen by the renderer.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ItemSnapshot {
        /// Identifier of the item.
        pub id: ItemId,
        /// Kind of the item.
        pub kind: ItemKind,
        /// Continuous position.
        pub position: Vec2,
        /// Whether the item is fading out after pickup.
        pub collected: bool,
    }

    /// Projectile in flight as seen by the renderer.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Identifier of the projectile.
        pub id: ProjectileId,
        /// Continuous position.
        pub position: Vec2,
        /// Whether the projectile carries magic damage.
        pub magic: bool,
    }

    /// Everything the renderer needs for one frame.
    #[derive(Clone, Debug)]
    pub struct RenderSnapshot<'a> {
        /// Full wall and floor layout.
        pub grid: &'a TileGrid,
        /// Camera placement.
        pub camera: Camera,
        /// Chunks around the camera, row-major.
        pub visible_chunks: Vec<ChunkCoord>,
        /// Wall tiles that pass culling.
        pub walls: Vec<CellCoord>,
        /// Torches that pass culling.
        pub torches: Vec<TorchPlacement>,
        /// Chests that pass culling.
        pub chests: Vec<ChestPlacement>,
        /// NPCs that pass culling.
        pub npcs: Vec<NpcSnapshot>,
        /// Floor items that pass culling.
        pub items: Vec<ItemSnapshot>,
        /// Projectiles that pass culling.
        pub projectiles: Vec<ProjectileSnapshot>,
    }

    /// Player-facing status shown next to the viewport.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct HudSnapshot {
        /// Hotbar contents.
        pub slots: [InventorySlot; HOTBAR_SLOTS],
        /// Selected hotbar slot.
        pub selected_slot: usize,
        /// Current health.
        pub health: u32,
        /// Maximum health.
        pub max_health: u32,
        /// Current mana.
        pub mana: u32,
        /// Maximum mana.
        pub max_mana: u32,
        /// Whether a melee swing is in progress.
        pub swinging: bool,
        /// Tick on which the current swing started.
        pub swing_started: Option<u64>,
        /// Length of a swing in ticks.
        pub swing_duration: u32,
        /// Chest within opening reach.
        pub nearby_chest: Option<ChestId>,
        /// Item within pickup reach.
        pub nearby_item: Option<ItemId>,
    }
}

#[derive(Clone, Copy, Debug)]
struct TickInput {
    movement: MoveIntent,
    yaw_delta: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PlayerAction {
    Use,
    Interact,
    Drop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActionPhase {
    Input,
    Interaction,
}

impl PlayerAction {
    fn phase(self) -> ActionPhase {
        match self {
            Self::Use => ActionPhase::Input,
            Self::Interact | Self::Drop => ActionPhase::Interaction,
        }
    }
}

#[derive(Debug)]
struct ActionFrame {
    tick_index: u64,
    actions: Vec<PlayerAction>,
}

impl ActionFrame {
    fn new() -> Self {
        Self {
            tick_index: 0,
            actions: Vec::new(),
        }
    }

    fn queue(&mut self, tick_index: u64, action: PlayerAction) {
        if self.tick_index != tick_index {
            self.tick_index = tick_index;
            self.actions.clear();
        }
        self.actions.push(action);
    }

    fn drain_phase(&mut self, phase: ActionPhase, out: &mut Vec<PlayerAction>) {
        self.actions.retain(|action| {
            if action.phase() == phase {
                out.push(*action);
                false
            } else {
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(seed: u64) -> World {
        World::new(WorldConfig {
            seed,
            ..WorldConfig::default()
        })
        .expect("default configuration is valid")
    }

    fn idle_tick() -> Command {
        Command::Tick {
            movement: MoveIntent::IDLE,
            yaw_delta: 0.0,
        }
    }

    #[test]
    fn actions_are_split_by_phase_in_queue_order() {
        let mut frame = ActionFrame::new();
        frame.queue(3, PlayerAction::Drop);
        frame.queue(3, PlayerAction::Use);
        frame.queue(3, PlayerAction::Interact);

        let mut input = Vec::new();
        frame.drain_phase(ActionPhase::Input, &mut input);
        assert_eq!(input, vec![PlayerAction::Use]);

        let mut interaction = Vec::new();
        frame.drain_phase(ActionPhase::Interaction, &mut interaction);
        assert_eq!(interaction, vec![PlayerAction::Drop, PlayerAction::Interact]);
        assert!(frame.actions.is_empty());
    }

    #[test]
    fn stale_actions_are_discarded() {
        let mut frame = ActionFrame::new();
        frame.queue(0, PlayerAction::Use);
        frame.queue(1, PlayerAction::Drop);
        let mut drained = Vec::new();
        frame.drain_phase(ActionPhase::Input, &mut drained);
        assert!(drained.is_empty());
    }

    #[test]
    fn tiny_grids_are_rejected() {
        let config = WorldConfig {
            width: 3,
            height: 9,
            ..WorldConfig::default()
        };
        assert!(matches!(
            World::new(config),
            Err(ConfigError::GridTooSmall { .. })
        ));
    }

    #[test]
    fn ticks_advance_the_clock() {
        let mut world = world(1);
        let mut events = Vec::new();
        apply(&mut world, idle_tick(), &mut events);
        apply(&mut world, idle_tick(), &mut events);
        assert_eq!(query::tick_index(&world), 2);
        let ticks: Vec<u64> = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { tick } => Some(*tick),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![0, 1]);
    }

    #[test]
    fn player_spawns_on_floor_with_full_vitals() {
        let world = world(9);
        let camera = query::camera(&world);
        assert!(!query::collision(&world).collides(camera.position));
        let hud = query::hud(&world);
        assert_eq!((hud.health, hud.mana), (100, 100));
        assert_eq!(hud.slots[0].kind(), delve_core::ItemKind::RustySword);
        assert!(!hud.swinging);
    }

    fn world_with_chest() -> World {
        (0..32)
            .map(world)
            .find(|candidate| !candidate.chests.is_empty())
            .expect("some seed places a chest")
    }

    #[test]
    fn opening_a_chest_removes_it_from_the_index() {
        let mut world = world_with_chest();
        let chest = world.chests[0];
        let before = world.chests.len();
        world.player = Player::spawn(chest.center, &world.tunables.player);

        let mut events = Vec::new();
        apply(&mut world, Command::Interact, &mut events);
        assert!(events.is_empty(), "interaction waits for the tick");
        apply(&mut world, idle_tick(), &mut events);

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ChestOpened { chest: id, .. } if *id == chest.id)));
        assert!(events.contains(&Event::SpatialIndexRebuilt {
            chests: before - 1
        }));
        assert!(world.chests.iter().all(|remaining| remaining.id != chest.id));
        assert!(world
            .spatial
            .chunks()
            .all(|(_, chunk)| chunk.chests().iter().all(|indexed| indexed.id != chest.id)));
    }

    #[test]
    fn swings_start_on_the_next_tick_and_expire() {
        let mut world = world(3);
        let mut events = Vec::new();
        apply(&mut world, Command::UseSelected, &mut events);
        apply(&mut world, idle_tick(), &mut events);

        assert!(matches!(
            events.first(),
            Some(Event::SwingStarted {
                weapon: delve_core::ItemKind::RustySword,
                ..
            })
        ));
        let hud = query::hud(&world);
        assert!(hud.swinging);
        assert_eq!(hud.swing_started, Some(0));
        assert_eq!(hud.swing_duration, 30);

        for _ in 0..30 {
            apply(&mut world, idle_tick(), &mut events);
        }
        assert!(!query::hud(&world).swinging);
    }

    #[test]
    fn dropping_the_sword_empties_the_first_slot() {
        let mut world = world(5);
        let mut events = Vec::new();
        apply(&mut world, Command::DropSelected, &mut events);
        apply(&mut world, idle_tick(), &mut events);

        assert!(events.iter().any(|event| matches!(
            event,
            Event::ItemDropped {
                kind: delve_core::ItemKind::RustySword,
                ..
            }
        )));
        assert!(query::hud(&world).slots[0].is_empty());
        assert_eq!(query::dropped_items(&world).len(), 1);
    }

    #[test]
    fn hotbar_selection_applies_immediately() {
        let mut world = world(6);
        let mut events = Vec::new();
        apply(&mut world, Command::SelectSlot { slot: 3 }, &mut events);
        apply(&mut world, Command::SelectSlot { slot: 12 }, &mut events);
        assert_eq!(events, vec![Event::SlotSelected { slot: 3 }]);
        assert_eq!(query::hud(&world).selected_slot, 3);
    }

    #[test]
    fn defeat_is_reported_once() {
        let mut world = world(2);
        world.player.vitals_mut().health = 0;
        let mut events = Vec::new();
        for _ in 0..3 {
            apply(&mut world, idle_tick(), &mut events);
        }
        let defeats = events
            .iter()
            .filter(|event| matches!(event, Event::PlayerDefeated))
            .count();
        assert_eq!(defeats, 1);
        assert!(query::is_defeated(&world));
    }
}
