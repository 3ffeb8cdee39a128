mod common;

use bevy::prelude::*;
use zombie_game::bullet::{spawn_bullet, Bullet};
use zombie_game::components::Velocity;
use zombie_game::difficulty::Difficulty;
use zombie_game::dog::Dog;
use zombie_game::health::Health;
use zombie_game::waves::{WaveDirector, WaveProfile};
use zombie_game::zombie::{nearest_target, spawn_zombie, zombie_mass, ZombieArchetype, ZombieController};

use common::{count_with, player_entity, run_for, started_app, tick, with_commands, TICK_MS};

fn spawn_normal(app: &mut App, position: Vec2) -> Entity {
    with_commands(app, |commands| spawn_zombie(commands, ZombieArchetype::Normal, 1.0, position))
}

#[test]
fn nearest_target_prefers_the_first_on_ties() {
    let a = Entity::from_raw(1);
    let b = Entity::from_raw(2);
    let c = Entity::from_raw(3);
    let candidates = [(a, Vec2::new(10.0, 0.0)), (b, Vec2::new(-10.0, 0.0)), (c, Vec2::new(50.0, 0.0))];
    assert_eq!(nearest_target(Vec2::ZERO, &candidates), Some(a));
    assert_eq!(nearest_target(Vec2::new(40.0, 0.0), &candidates), Some(c));
    assert_eq!(nearest_target(Vec2::ZERO, &[]), None);
}

#[test]
fn archetype_stats() {
    let boss = ZombieController::new(ZombieArchetype::Boss);
    assert_eq!(boss.props.health, 500.0);
    assert_eq!(boss.attack_range(), 30.0 * 8.0 * 0.8 + 40.0);
    assert_eq!(zombie_mass(2.0), 80.0);
    let fast = ZombieArchetype::Fast.props();
    assert!(fast.speed > ZombieArchetype::Normal.props().speed);
    assert!(fast.size < 1.0);
}

#[test]
fn first_wave_zombies_have_base_health() {
    let profile = WaveProfile::new(1, Difficulty::Normal);
    let mut app = started_app(Difficulty::Normal);
    let zombie = with_commands(&mut app, |commands| {
        spawn_zombie(commands, ZombieArchetype::Normal, profile.health_multiplier, Vec2::new(600.0, 600.0))
    });
    let health = app.world.get::<Health>(zombie).copied();
    assert_eq!(health, Some(Health::new(20.0)));
}

#[test]
fn zombies_walk_toward_the_nearest_friendly() {
    let mut app = started_app(Difficulty::Normal);
    let zombie = spawn_normal(&mut app, Vec2::new(500.0, 0.0));
    run_for(&mut app, 1600);

    let controller = app.world.get::<ZombieController>(zombie).cloned();
    let player = player_entity(&mut app);
    assert_eq!(controller.and_then(|controller| controller.target), Some(player));
    let x = app.world.get::<Transform>(zombie).map(|t| t.translation.x).unwrap_or_default();
    // 0.07 units per ms
    assert!(x < 400.0 && x > 370.0, "zombie at {}", x);
}

#[test]
fn attacks_respect_the_cooldown() {
    let mut app = started_app(Difficulty::Normal);
    let player = player_entity(&mut app);
    spawn_normal(&mut app, Vec2::new(60.0, 0.0));

    tick(&mut app, TICK_MS);
    assert_eq!(app.world.get::<Health>(player).map(|h| h.current), Some(90.0));

    run_for(&mut app, 496);
    assert_eq!(app.world.get::<Health>(player).map(|h| h.current), Some(90.0));

    run_for(&mut app, 528);
    assert_eq!(app.world.get::<Health>(player).map(|h| h.current), Some(80.0));
}

#[test]
fn later_waves_hit_harder() {
    let mut app = started_app(Difficulty::Normal);
    app.world.resource_mut::<WaveDirector>().wave = 3;
    let player = player_entity(&mut app);
    spawn_normal(&mut app, Vec2::new(60.0, 0.0));

    tick(&mut app, TICK_MS);
    let expected = 100.0 - 10.0 * (1.0 + 2f32.powf(1.1) * 0.1);
    let current = app.world.get::<Health>(player).map(|h| h.current).unwrap_or_default();
    assert!((current - expected).abs() < 1e-3, "player at {}", current);
    assert!(current < 88.0);
}

#[test]
fn bullet_hit_damages_and_knocks_back() {
    let mut app = started_app(Difficulty::Normal);
    let zombie = spawn_normal(&mut app, Vec2::new(400.0, 0.0));
    with_commands(&mut app, |commands| spawn_bullet(commands, Vec2::new(380.0, 0.0), Vec2::X, 1800.0));

    tick(&mut app, TICK_MS);
    assert_eq!(app.world.get::<Health>(zombie).map(|h| h.current), Some(10.0));
    assert_eq!(count_with::<Bullet>(&mut app), 0);
    assert!(app.world.get::<ZombieController>(zombie).is_some_and(|z| z.pending_knockback.is_some()));

    tick(&mut app, TICK_MS);
    let velocity = app.world.get::<Velocity>(zombie).map(|v| v.0).unwrap_or_default();
    // An 1800 u/s bullet shoves a normal zombie at roughly 300 u/s.
    assert!(velocity.x > 250.0 && velocity.x < 300.0, "velocity {:?}", velocity);
    assert!(app.world.get::<ZombieController>(zombie).is_some_and(|z| z.pending_knockback.is_none()));
}

#[test]
fn getting_shot_turns_a_zombie_on_the_player() {
    let mut app = started_app(Difficulty::Normal);
    let dog = app
        .world
        .query_filtered::<Entity, With<Dog>>()
        .single(&app.world);
    let player = player_entity(&mut app);
    let zombie = spawn_normal(&mut app, Vec2::new(-200.0, 0.0));

    tick(&mut app, TICK_MS);
    assert_eq!(app.world.get::<ZombieController>(zombie).and_then(|z| z.target), Some(dog));

    with_commands(&mut app, |commands| spawn_bullet(commands, Vec2::new(-225.0, 0.0), Vec2::X, 1800.0));
    tick(&mut app, TICK_MS);
    assert_eq!(app.world.get::<ZombieController>(zombie).and_then(|z| z.target), Some(player));
}

#[test]
fn piercing_bullets_pass_through() {
    let mut app = started_app(Difficulty::Normal);
    app.world
        .resource_mut::<zombie_game::upgrades::UpgradeLevels>()
        .grant(zombie_game::upgrades::UpgradeKey::BulletPiercing, 1);
    let first = spawn_normal(&mut app, Vec2::new(400.0, 300.0));
    let second = spawn_normal(&mut app, Vec2::new(460.0, 300.0));
    with_commands(&mut app, |commands| spawn_bullet(commands, Vec2::new(350.0, 300.0), Vec2::X, 1800.0));

    run_for(&mut app, 5 * TICK_MS);
    assert_eq!(app.world.get::<Health>(first).map(|h| h.current), Some(10.0));
    assert_eq!(app.world.get::<Health>(second).map(|h| h.current), Some(10.0));
    assert_eq!(count_with::<Bullet>(&mut app), 0);
}
