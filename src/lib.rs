//! Gameplay core of a top-down zombie survival shooter built on Bevy.
//!
//! [`ZombieGamePlugin`] carries everything that decides the outcome of a run:
//! the wave director, zombie AI, bullets and loot, coins and the upgrade
//! economy. It needs no window, renderer or audio device, so the binary layers
//! presentation plugins on top of it and the tests drive it headless.

pub mod arena;
pub mod audio;
pub mod bullet;
pub mod camera_systems;
pub mod coins;
pub mod components;
pub mod config;
pub mod debug_menu;
pub mod difficulty;
pub mod dog;
pub mod error;
pub mod game;
pub mod health;
pub mod hud;
pub mod input;
pub mod items;
pub mod loot;
pub mod physics;
pub mod player;
pub mod rng;
pub mod ui;
pub mod upgrades;
pub mod visual_effects;
pub mod waves;
pub mod zombie;

use bevy::prelude::*;

use crate::{
    arena::ArenaPlugin,
    audio::PlaySoundEvent,
    bullet::BulletPlugin,
    coins::CoinPlugin,
    config::GameConfig,
    debug_menu::DebugMenuPlugin,
    difficulty::Difficulty,
    dog::DogPlugin,
    game::{AppState, GamePlugin},
    health::HealthPlugin,
    items::ItemsPlugin,
    loot::LootPlugin,
    physics::PhysicsPlugin,
    player::PlayerPlugin,
    rng::GameRng,
    upgrades::UpgradePlugin,
    waves::WavePlugin,
    zombie::ZombiePlugin,
};

/// Per-tick ordering of the simulation. Every set only runs while a game is
/// in progress.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Player intent, purchases and orders coming from the presentation layer.
    Intent,
    /// Wave countdown and zombie spawning.
    Director,
    /// Targeting and steering of zombies and the dog.
    Ai,
    /// Velocity integration and arena confinement.
    Movement,
    /// Contact detection between colliders.
    Collision,
    /// Damage, pickups and knockback resolved from contacts.
    Combat,
    /// Health polling; dying entities are flagged and reported.
    Death,
    /// Reactions to deaths: loot, score, game over.
    Loot,
    /// Despawning of flagged entities.
    Cleanup,
}

impl GameSet {
    pub const ALL: [GameSet; 9] = [
        GameSet::Intent,
        GameSet::Director,
        GameSet::Ai,
        GameSet::Movement,
        GameSet::Collision,
        GameSet::Combat,
        GameSet::Death,
        GameSet::Loot,
        GameSet::Cleanup,
    ];
}

/// Headless gameplay. Expects a `Time` resource, which `DefaultPlugins` or
/// `MinimalPlugins` provide.
pub struct ZombieGamePlugin;

impl Plugin for ZombieGamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .init_resource::<GameConfig>()
            .init_resource::<Difficulty>()
            .init_resource::<GameRng>()
            .add_event::<PlaySoundEvent>();

        app.configure_sets(
            Update,
            (
                GameSet::Intent,
                GameSet::Director,
                GameSet::Ai,
                GameSet::Movement,
                GameSet::Collision,
                GameSet::Combat,
                GameSet::Death,
                GameSet::Loot,
                GameSet::Cleanup,
            )
                .chain(),
        );
        for set in GameSet::ALL {
            app.configure_sets(Update, set.run_if(in_state(AppState::InGame)));
        }

        app.add_plugins((
            GamePlugin,
            HealthPlugin,
            PhysicsPlugin,
            ArenaPlugin,
            UpgradePlugin,
            WavePlugin,
            ZombiePlugin,
            LootPlugin,
            CoinPlugin,
            BulletPlugin,
            ItemsPlugin,
            PlayerPlugin,
            DogPlugin,
            DebugMenuPlugin,
        ));
    }
}
