use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use delve_core::{Command, Event, MoveIntent, NpcId, WorldConfig};
use delve_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(17, scripted_commands());
    let second = replay(17, scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(
        first
            .events
            .iter()
            .filter(|record| matches!(record, EventRecord::TimeAdvanced { .. }))
            .count(),
        240
    );
}

#[test]
fn different_seeds_build_different_levels() {
    let first = World::new(config(1)).expect("valid config");
    let second = World::new(config(2)).expect("valid config");
    assert_ne!(
        query::tile_grid(&first).to_ascii(),
        query::tile_grid(&second).to_ascii()
    );
}

#[test]
fn render_snapshot_respects_the_culling_caps() {
    let mut world = World::new(config(23)).expect("valid config");
    let mut events = Vec::new();
    for command in scripted_commands().into_iter().take(60) {
        world::apply(&mut world, command, &mut events);
    }

    let tunables = query::tunables(&world).culling.clone();
    let snapshot = query::render(&world);
    let camera = snapshot.camera.position;

    assert!(!snapshot.visible_chunks.is_empty());
    assert!(snapshot.visible_chunks.len() <= 9);
    for wall in &snapshot.walls {
        assert!(wall.center().distance(camera) <= tunables.wall_distance);
    }
    for torch in &snapshot.torches {
        assert!(torch.anchor.distance(camera) <= tunables.torch_distance);
    }
    for chest in &snapshot.chests {
        assert!(chest.center.distance(camera) <= tunables.chest_distance);
    }
    for npc in &snapshot.npcs {
        assert!(npc.position.distance(camera) <= tunables.npc_distance);
    }
    for item in &snapshot.items {
        assert!(item.position.distance(camera) <= tunables.item_distance);
    }
    assert_eq!(snapshot.camera.pitch, 0.0);
}

fn config(seed: u64) -> WorldConfig {
    WorldConfig {
        seed,
        ..WorldConfig::default()
    }
}

fn replay(seed: u64, commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new(config(seed)).expect("valid config");
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        log.extend(events.iter().map(EventRecord::from));
    }

    let camera = query::camera(&world);
    let npcs = query::npcs(&world)
        .into_iter()
        .map(|npc| NpcState {
            id: npc.id,
            x_bits: npc.position.x.to_bits(),
            z_bits: npc.position.y.to_bits(),
            health: npc.health,
        })
        .collect();

    ReplayOutcome {
        player: (camera.position.x.to_bits(), camera.position.y.to_bits()),
        health: query::vitals(&world).health,
        npcs,
        events: log,
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = Vec::new();
    for step in 0..240u32 {
        match step % 40 {
            0 => commands.push(Command::UseSelected),
            10 => commands.push(Command::Interact),
            20 => commands.push(Command::SelectNextSlot),
            _ => {}
        }
        let movement = if step % 80 < 50 {
            MoveIntent::FORWARD
        } else {
            MoveIntent {
                right: true,
                ..MoveIntent::IDLE
            }
        };
        let yaw_delta = if step % 30 == 0 { 0.4 } else { 0.0 };
        commands.push(Command::Tick {
            movement,
            yaw_delta,
        });
    }
    commands
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    player: (u32, u32),
    health: u32,
    npcs: Vec<NpcState>,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct NpcState {
    id: NpcId,
    x_bits: u32,
    z_bits: u32,
    health: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    TimeAdvanced { tick: u64 },
    PlayerDamaged { npc: NpcId, remaining: u32 },
    NpcDamaged { npc: NpcId, remaining: i32 },
    Other(String),
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        match event {
            Event::TimeAdvanced { tick } => Self::TimeAdvanced { tick: *tick },
            Event::PlayerDamaged { npc, remaining, .. } => Self::PlayerDamaged {
                npc: *npc,
                remaining: *remaining,
            },
            Event::NpcDamaged { npc, remaining, .. } => Self::NpcDamaged {
                npc: *npc,
                remaining: *remaining,
            },
            other => Self::Other(format!("{other:?}")),
        }
    }
}
