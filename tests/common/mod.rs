#![allow(dead_code)]

use std::time::Duration;

use bevy::{ecs::system::CommandQueue, prelude::*};
use zombie_game::{config::GameConfig, difficulty::Difficulty, game::StartRun, ZombieGamePlugin};

pub const TICK_MS: u64 = 16;
pub const SEED: u64 = 7;

pub fn seeded_config() -> GameConfig {
    GameConfig { rng_seed: Some(SEED), ..default() }
}

/// A headless app already past the main menu, sitting in the first tick of a run.
pub fn started_app(difficulty: Difficulty) -> App {
    started_app_with(seeded_config(), difficulty)
}

pub fn started_app_with(config: GameConfig, difficulty: Difficulty) -> App {
    let mut app = App::new();
    app.init_resource::<Time>()
        .insert_resource(config)
        .add_plugins(ZombieGamePlugin);
    send(&mut app, StartRun { difficulty });
    // One update to accept the request, one to enter the run.
    app.update();
    app.update();
    app
}

pub fn send<E: Event>(app: &mut App, event: E) {
    app.world.resource_mut::<Events<E>>().send(event);
}

pub fn tick(app: &mut App, ms: u64) {
    app.world.resource_mut::<Time>().advance_by(Duration::from_millis(ms));
    app.update();
}

pub fn run_for(app: &mut App, total_ms: u64) {
    let mut elapsed = 0;
    while elapsed < total_ms {
        tick(app, TICK_MS);
        elapsed += TICK_MS;
    }
}

/// Events of type `E` still buffered in the world.
pub fn buffered<E: Event + Clone>(app: &App) -> Vec<E> {
    let events = app.world.resource::<Events<E>>();
    let mut reader = events.get_reader();
    reader.read(events).cloned().collect()
}

pub fn count_with<C: Component>(app: &mut App) -> usize {
    app.world.query_filtered::<(), With<C>>().iter(&app.world).count()
}

/// Runs `build` against a command buffer and applies it to the app's world.
pub fn with_commands<R>(app: &mut App, build: impl FnOnce(&mut Commands) -> R) -> R {
    let mut queue = CommandQueue::default();
    let result = {
        let mut commands = Commands::new(&mut queue, &app.world);
        build(&mut commands)
    };
    queue.apply(&mut app.world);
    result
}

pub fn player_entity(app: &mut App) -> Entity {
    app.world
        .query_filtered::<Entity, With<zombie_game::player::Player>>()
        .single(&app.world)
}
