use bevy::prelude::*;

use crate::{
    arena::spawn_arena,
    components::{Role, SessionEntity},
    config::GameConfig,
    difficulty::Difficulty,
    dog::{dog_max_health, spawn_dog},
    health::EntityDied,
    loot::{zombie_loot_system, BloodSplatEvent},
    player::{player_max_health, spawn_player},
    rng::GameRng,
    upgrades::UpgradeLevels,
    waves::WaveDirector,
    GameSet,
};

/// The dog starts a little to the side of the player.
const DOG_START: Vec2 = Vec2::new(-80.0, 0.0);
const GAME_OVER_SPLAT_SIZE: f32 = 100.0 * 20.0;

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    MainMenu,
    InGame,
    GameOver,
}

/// Asks for a new run. Ignored while a run is in progress.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartRun {
    pub difficulty: Difficulty,
}

/// Result of the last finished run.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u32,
    pub difficulty: Difficulty,
    pub wave: u32,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StartRun>()
            .add_systems(Update, start_run_system.run_if(not(in_state(AppState::InGame))))
            .add_systems(OnEnter(AppState::InGame), reset_session)
            .add_systems(
                Update,
                game_over_system.in_set(GameSet::Loot).after(zombie_loot_system),
            );
    }
}

fn start_run_system(
    mut requests: EventReader<StartRun>,
    mut difficulty: ResMut<Difficulty>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if let Some(request) = requests.read().last() {
        *difficulty = request.difficulty;
        info!("Starting a run on {}", request.difficulty);
        next_state.set(AppState::InGame);
    }
}

/// Clears every trace of the previous run and sets up the arena.
pub fn reset_session(
    mut commands: Commands,
    leftovers: Query<Entity, With<SessionEntity>>,
    config: Res<GameConfig>,
    difficulty: Res<Difficulty>,
    mut rng: ResMut<GameRng>,
) {
    for entity in leftovers.iter() {
        commands.entity(entity).despawn_recursive();
    }
    if let Some(seed) = config.rng_seed {
        *rng = GameRng::seeded(seed);
    }
    commands.remove_resource::<GameOverSummary>();

    let fresh = UpgradeLevels::default();
    spawn_arena(&mut commands);
    spawn_player(&mut commands, player_max_health(&fresh, *difficulty));
    if difficulty.has_dog() {
        spawn_dog(&mut commands, dog_max_health(&fresh, *difficulty), DOG_START);
    }
}

pub fn game_over_system(
    mut commands: Commands,
    mut deaths: EventReader<EntityDied>,
    director: Res<WaveDirector>,
    difficulty: Res<Difficulty>,
    mut next_state: ResMut<NextState<AppState>>,
    mut splats: EventWriter<BloodSplatEvent>,
) {
    let Some(death) = deaths.read().find(|death| matches!(death.role, Role::Player | Role::Dog)) else {
        return;
    };
    splats.send(BloodSplatEvent { position: death.position, size: GAME_OVER_SPLAT_SIZE });
    let summary = GameOverSummary {
        score: director.score,
        difficulty: *difficulty,
        wave: director.wave,
    };
    info!(
        "Game over: {:?} died on wave {}, score {} ({})",
        death.role, summary.wave, summary.score, summary.difficulty
    );
    commands.insert_resource(summary);
    next_state.set(AppState::GameOver);
}
