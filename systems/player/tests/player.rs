use std::f32::consts::FRAC_PI_2;

use delve_core::{
    CollisionGrid, Event, ItemKind, MoveIntent, NpcId, NpcKind, NpcTuning, PlayerTuning, TileGrid,
};
use delve_system_interaction::InventorySlot;
use delve_system_npc::Npc;
use delve_system_player::{HotbarStep, ItemUse, Player, PlayerController};
use glam::Vec2;

fn hall() -> CollisionGrid {
    CollisionGrid::snapshot(&TileGrid::from_rows(&[
        "###########",
        "#.........#",
        "#.........#",
        "#.........#",
        "#.........#",
        "#.........#",
        "###########",
    ]))
}

fn controller() -> PlayerController {
    PlayerController::new(&PlayerTuning::default(), &NpcTuning::default())
}

fn player_at(x: f32, z: f32) -> Player {
    Player::spawn(Vec2::new(x, z), &PlayerTuning::default())
}

fn give(player: &mut Player, kind: ItemKind) -> usize {
    let slot = player.inventory_mut().insert(kind).expect("hotbar has room");
    assert!(player.inventory_mut().select(slot));
    slot
}

#[test]
fn forward_moves_toward_negative_z_at_zero_yaw() {
    let mut player = player_at(3.5, 3.5);
    assert!(controller().steer(&mut player, MoveIntent::FORWARD, 0.0, &hall()));
    assert!((player.position() - Vec2::new(3.5, 3.4)).length() < 1e-5);
}

#[test]
fn yaw_turns_before_moving() {
    let mut player = player_at(3.5, 3.5);
    assert!(controller().steer(&mut player, MoveIntent::FORWARD, FRAC_PI_2, &hall()));
    assert!((player.position() - Vec2::new(3.4, 3.5)).length() < 1e-5);
    assert_eq!(player.yaw(), FRAC_PI_2);
}

#[test]
fn opposing_keys_cancel_out() {
    let mut player = player_at(3.5, 3.5);
    let movement = MoveIntent {
        forward: true,
        backward: true,
        ..MoveIntent::IDLE
    };
    assert!(!controller().steer(&mut player, movement, 0.0, &hall()));
    assert_eq!(player.position(), Vec2::new(3.5, 3.5));
}

#[test]
fn walls_block_movement() {
    let mut player = player_at(1.05, 3.5);
    let movement = MoveIntent {
        left: true,
        ..MoveIntent::IDLE
    };
    assert!(!controller().steer(&mut player, movement, 0.0, &hall()));
    assert_eq!(player.position(), Vec2::new(1.05, 3.5));
}

#[test]
fn hotbar_selection_reports_the_new_slot() {
    let mut player = player_at(3.5, 3.5);
    let mut events = Vec::new();
    let controller = controller();

    controller.select(&mut player, HotbarStep::Previous, &mut events);
    controller.select(&mut player, HotbarStep::Slot(9), &mut events);
    controller.select(&mut player, HotbarStep::Next, &mut events);
    controller.select(&mut player, HotbarStep::Slot(4), &mut events);

    assert_eq!(
        events,
        vec![
            Event::SlotSelected { slot: 6 },
            Event::SlotSelected { slot: 0 },
            Event::SlotSelected { slot: 4 },
        ]
    );
}

#[test]
fn swing_hits_only_npcs_inside_the_cone() {
    let collision = hall();
    let mut player = player_at(5.5, 4.5);
    let mut npcs = vec![
        Npc::new(NpcId::new(0), NpcKind::Ghoul, Vec2::new(5.5, 3.5)),
        Npc::new(NpcId::new(1), NpcKind::Ghoul, Vec2::new(5.5, 5.5)),
        Npc::new(NpcId::new(2), NpcKind::Ghoul, Vec2::new(6.5, 4.5)),
        Npc::new(NpcId::new(3), NpcKind::Ghoul, Vec2::new(5.5, 2.5)),
    ];
    let mut events = Vec::new();

    let outcome = controller().use_selected(&mut player, 12, &mut npcs, &collision, &mut events);

    assert_eq!(outcome, ItemUse::Swing { hits: 1 });
    assert_eq!(player.swing_started(), Some(12));
    assert_eq!(npcs[0].health(), 15);
    assert!((npcs[0].position() - Vec2::new(5.5, 2.8)).length() < 1e-5);
    assert_eq!(npcs[1].health(), 20);
    assert_eq!(npcs[2].health(), 20);
    assert_eq!(npcs[3].health(), 20, "2.0 away is out of reach");
    assert_eq!(
        events,
        vec![
            Event::SwingStarted {
                weapon: ItemKind::RustySword,
                hits: 1
            },
            Event::NpcDamaged {
                npc: NpcId::new(0),
                amount: 5,
                remaining: 15
            },
        ]
    );
}

#[test]
fn a_new_swing_waits_for_the_previous_one() {
    let collision = hall();
    let controller = controller();
    let mut player = player_at(5.5, 4.5);
    let mut npcs: Vec<Npc> = Vec::new();
    let mut events = Vec::new();

    let _ = controller.use_selected(&mut player, 0, &mut npcs, &collision, &mut events);
    controller.finish_swing(&mut player, 29);
    assert_eq!(
        controller.use_selected(&mut player, 29, &mut npcs, &collision, &mut events),
        ItemUse::Nothing
    );

    controller.finish_swing(&mut player, 30);
    assert_eq!(player.swing_started(), None);
    assert_eq!(
        controller.use_selected(&mut player, 30, &mut npcs, &collision, &mut events),
        ItemUse::Swing { hits: 0 }
    );
}

#[test]
fn skeleton_sword_hits_harder() {
    let collision = hall();
    let mut player = player_at(5.5, 4.5);
    let _ = give(&mut player, ItemKind::SkeletonSword);
    let mut npcs = vec![Npc::new(NpcId::new(0), NpcKind::Skeleton, Vec2::new(5.5, 3.6))];
    let mut events = Vec::new();

    let _ = controller().use_selected(&mut player, 0, &mut npcs, &collision, &mut events);
    assert_eq!(npcs[0].health(), 17);
}

#[test]
fn potions_restore_and_are_consumed() {
    let collision = hall();
    let controller = controller();
    let mut player = player_at(3.5, 3.5);
    let slot = give(&mut player, ItemKind::HealthPotion);
    let _ = player.inventory_mut().insert(ItemKind::HealthPotion);
    player.vitals_mut().health = 50;
    let mut npcs: Vec<Npc> = Vec::new();
    let mut events = Vec::new();

    assert_eq!(
        controller.use_selected(&mut player, 0, &mut npcs, &collision, &mut events),
        ItemUse::Drank(ItemKind::HealthPotion)
    );
    assert_eq!(player.vitals().health, 80);
    assert_eq!(
        player.inventory().slots()[slot],
        InventorySlot::new(ItemKind::HealthPotion, 1)
    );

    let _ = controller.use_selected(&mut player, 1, &mut npcs, &collision, &mut events);
    assert_eq!(player.vitals().health, 100);
    assert!(player.inventory().slots()[slot].is_empty());
    assert_eq!(
        events,
        vec![
            Event::ItemUsed {
                kind: ItemKind::HealthPotion
            },
            Event::ItemUsed {
                kind: ItemKind::HealthPotion
            },
        ]
    );
}

#[test]
fn magic_scrolls_cost_mana_and_are_kept() {
    let collision = hall();
    let controller = controller();
    let mut player = player_at(3.5, 3.5);
    let slot = give(&mut player, ItemKind::MagicScroll);
    let mut npcs: Vec<Npc> = Vec::new();
    let mut events = Vec::new();

    let outcome = controller.use_selected(&mut player, 0, &mut npcs, &collision, &mut events);
    assert_eq!(
        outcome,
        ItemUse::Cast {
            origin: Vec2::new(3.5, 3.5),
            direction: player.forward(),
            magic: true,
        }
    );
    assert_eq!(player.vitals().mana, 90);
    assert_eq!(player.inventory().slots()[slot].kind(), ItemKind::MagicScroll);

    player.vitals_mut().mana = 5;
    events.clear();
    assert_eq!(
        controller.use_selected(&mut player, 1, &mut npcs, &collision, &mut events),
        ItemUse::Nothing
    );
    assert_eq!(player.vitals().mana, 5);
    assert!(events.is_empty());
}

#[test]
fn fire_scrolls_burn_up() {
    let collision = hall();
    let mut player = player_at(3.5, 3.5);
    let slot = give(&mut player, ItemKind::FireScroll);
    let mut npcs: Vec<Npc> = Vec::new();
    let mut events = Vec::new();

    let outcome = controller().use_selected(&mut player, 0, &mut npcs, &collision, &mut events);
    assert!(matches!(outcome, ItemUse::Cast { magic: false, .. }));
    assert!(player.inventory().slots()[slot].is_empty());
    assert_eq!(player.vitals().mana, 100);
}

#[test]
fn empty_slots_do_nothing() {
    let collision = hall();
    let mut player = player_at(3.5, 3.5);
    assert!(player.inventory_mut().select(5));
    let mut npcs: Vec<Npc> = Vec::new();
    let mut events = Vec::new();
    assert_eq!(
        controller().use_selected(&mut player, 0, &mut npcs, &collision, &mut events),
        ItemUse::Nothing
    );
    assert!(events.is_empty());
}
