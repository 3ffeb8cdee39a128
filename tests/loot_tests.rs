mod common;

use bevy::prelude::*;
use zombie_game::coins::Coin;
use zombie_game::difficulty::Difficulty;
use zombie_game::health::Health;
use zombie_game::items::{Item, ItemKind};
use zombie_game::loot::{coin_drop, health_pack_chance, kill_score, BloodSplatEvent, CoinDrop};
use zombie_game::waves::{WaveDirector, WavePhase};
use zombie_game::zombie::{spawn_zombie, ZombieArchetype, ZombieController, ZombieDied};

use common::{buffered, count_with, started_app, tick, with_commands, TICK_MS};

fn kill(app: &mut App, zombie: Entity) {
    if let Some(mut health) = app.world.get_mut::<Health>(zombie) {
        health.current = 0.0;
    }
}

fn dog_treats(app: &mut App) -> usize {
    app.world
        .query::<&Item>()
        .iter(&app.world)
        .filter(|item| item.kind == ItemKind::DogTreat)
        .count()
}

#[test]
fn small_kills_drop_single_coins() {
    assert_eq!(coin_drop(1.0, 0, 0.5, 4), CoinDrop { count: 2, value: 1.0 });
    assert_eq!(coin_drop(1.0, 0, 0.0, 4), CoinDrop { count: 1, value: 1.0 });
}

#[test]
fn large_drops_are_spread_over_four_coins() {
    let drop = coin_drop(4.0, 0, 0.5, 4);
    assert_eq!(drop.count, 4);
    assert_eq!(drop.total_value(), 24.0);
    assert_eq!(drop.value, 6.0);

    let boosted = coin_drop(1.0, 3, 0.9, 4);
    // round(1 + 0.9 * 7) = 7
    assert_eq!(boosted.count, 4);
    assert!((boosted.total_value() - 7.0).abs() < 1e-5);
}

#[test]
fn score_scales_with_size_wave_and_dog() {
    assert_eq!(kill_score(1.0, 0, Difficulty::Normal, true), 100);
    assert_eq!(kill_score(1.0, 0, Difficulty::Normal, false), 50);
    assert_eq!(kill_score(1.0, 5, Difficulty::Normal, true), 200);
    assert_eq!(kill_score(2.0, 5, Difficulty::Hard, true), 579);
}

#[test]
fn health_packs_are_rarer_on_harder_tiers() {
    assert!((health_pack_chance(Difficulty::Normal) - 0.1).abs() < 1e-6);
    assert!(health_pack_chance(Difficulty::Easy) > health_pack_chance(Difficulty::Normal));
    assert!(health_pack_chance(Difficulty::Adonis) < health_pack_chance(Difficulty::Normal));
}

#[test]
fn zombie_death_pays_out_and_despawns() {
    let mut app = started_app(Difficulty::Normal);
    let zombie = with_commands(&mut app, |commands| {
        spawn_zombie(commands, ZombieArchetype::Normal, 1.0, Vec2::new(500.0, 500.0))
    });
    kill(&mut app, zombie);
    tick(&mut app, TICK_MS);

    assert!(app.world.get_entity(zombie).is_none());
    assert_eq!(app.world.resource::<WaveDirector>().score, 100);

    let died = buffered::<ZombieDied>(&app);
    assert_eq!(died.len(), 1);
    assert_eq!(died[0].archetype, ZombieArchetype::Normal);
    let splats = buffered::<BloodSplatEvent>(&app);
    assert_eq!(splats.len(), 1);
    assert_eq!(splats[0].size, 100.0);

    let coins = count_with::<Coin>(&mut app);
    assert!((1..=2).contains(&coins), "dropped {} coins", coins);
}

#[test]
fn last_kill_of_a_finished_wave_drops_a_dog_treat() {
    let mut app = started_app(Difficulty::Normal);
    let zombie = with_commands(&mut app, |commands| {
        spawn_zombie(commands, ZombieArchetype::Normal, 1.0, Vec2::new(500.0, 500.0))
    });
    {
        let mut director = app.world.resource_mut::<WaveDirector>();
        director.phase = WavePhase::Spawning;
        director.wave = 1;
        director.spawned_this_wave = 10;
    }
    kill(&mut app, zombie);
    tick(&mut app, TICK_MS);
    assert_eq!(dog_treats(&mut app), 1);
}

#[test]
fn no_treat_while_zombies_remain() {
    let mut app = started_app(Difficulty::Normal);
    let (doomed, _survivor) = with_commands(&mut app, |commands| {
        (
            spawn_zombie(commands, ZombieArchetype::Normal, 1.0, Vec2::new(500.0, 500.0)),
            spawn_zombie(commands, ZombieArchetype::Normal, 1.0, Vec2::new(-500.0, 500.0)),
        )
    });
    {
        let mut director = app.world.resource_mut::<WaveDirector>();
        director.phase = WavePhase::Spawning;
        director.wave = 1;
        director.spawned_this_wave = 10;
    }
    kill(&mut app, doomed);
    tick(&mut app, TICK_MS);
    assert_eq!(dog_treats(&mut app), 0);
    assert_eq!(count_with::<ZombieController>(&mut app), 1);
}

#[test]
fn no_treat_before_the_quota_is_out() {
    let mut app = started_app(Difficulty::Normal);
    let zombie = with_commands(&mut app, |commands| {
        spawn_zombie(commands, ZombieArchetype::Normal, 1.0, Vec2::new(500.0, 500.0))
    });
    {
        let mut director = app.world.resource_mut::<WaveDirector>();
        director.phase = WavePhase::Spawning;
        director.wave = 1;
        director.spawned_this_wave = 4;
    }
    kill(&mut app, zombie);
    tick(&mut app, TICK_MS);
    assert_eq!(dog_treats(&mut app), 0);
}
