use bevy::prelude::*;

use crate::{
    audio::{PlaySoundEvent, SoundEffect},
    coins::spawn_coin,
    config::GameConfig,
    difficulty::Difficulty,
    dog::Dog,
    health::Dying,
    items::{spawn_item, ItemKind},
    rng::GameRng,
    upgrades::{UpgradeKey, UpgradeLevels},
    waves::WaveDirector,
    zombie::{ZombieController, ZombieDied},
    GameSet,
};

pub struct LootPlugin;

impl Plugin for LootPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BloodSplatEvent>()
            .add_systems(Update, zombie_loot_system.in_set(GameSet::Loot));
    }
}

/// Coins dropped by one kill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinDrop {
    pub count: u32,
    pub value: f32,
}

impl CoinDrop {
    pub fn total_value(&self) -> f32 {
        self.count as f32 * self.value
    }
}

/// Coins for a zombie of `size`. A raw count above `max_buckets` is spread
/// over exactly `max_buckets` coins so the total value stays the same.
pub fn coin_drop(size: f32, coin_level: u32, roll: f32, max_buckets: u32) -> CoinDrop {
    let raw = (size * size * (1.0 + roll * (1.0 + coin_level as f32 * 2.0))).round() as u32;
    if raw > max_buckets && max_buckets > 0 {
        CoinDrop {
            count: max_buckets,
            value: raw as f32 / max_buckets as f32,
        }
    } else {
        CoinDrop { count: raw, value: 1.0 }
    }
}

pub fn kill_score(size: f32, wave: u32, difficulty: Difficulty, dog_alive: bool) -> u32 {
    let dog_factor = if dog_alive { 1.0 } else { 0.5 };
    (size * (1.0 + wave as f32 * 0.2) * difficulty.multiplier(1.1) * dog_factor * 100.0).round() as u32
}

pub fn health_pack_chance(difficulty: Difficulty) -> f32 {
    0.1 * difficulty.multiplier(-1.0)
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BloodSplatEvent {
    pub position: Vec2,
    pub size: f32,
}

#[allow(clippy::too_many_arguments)]
pub fn zombie_loot_system(
    mut commands: Commands,
    mut deaths: EventReader<ZombieDied>,
    mut rng: ResMut<GameRng>,
    mut director: ResMut<WaveDirector>,
    levels: Res<UpgradeLevels>,
    difficulty: Res<Difficulty>,
    config: Res<GameConfig>,
    zombies: Query<(), (With<ZombieController>, Without<Dying>)>,
    dogs: Query<(), (With<Dog>, Without<Dying>)>,
    mut splats: EventWriter<BloodSplatEvent>,
    mut sound_events: EventWriter<PlaySoundEvent>,
) {
    let deaths: Vec<ZombieDied> = deaths.read().copied().collect();
    let alive = zombies.iter().count();
    let dog_alive = !dogs.is_empty();

    for (index, death) in deaths.iter().enumerate() {
        sound_events.send(PlaySoundEvent(SoundEffect::ZombieDeath));
        sound_events.send(PlaySoundEvent(SoundEffect::Splat));
        splats.send(BloodSplatEvent { position: death.position, size: 100.0 * death.size });

        if rng.unit() < health_pack_chance(*difficulty) {
            spawn_item(&mut commands, &mut rng, ItemKind::HealthPack, death.position);
        }

        let drop = coin_drop(
            death.size,
            levels.level(UpgradeKey::CoinMultiplier),
            rng.unit(),
            config.max_coin_buckets,
        );
        for _ in 0..drop.count {
            spawn_coin(&mut commands, &mut rng, death.position, drop.value);
        }

        let last_of_batch = index + 1 == deaths.len();
        if last_of_batch && alive == 0 && director.quota_reached(*difficulty) {
            spawn_item(&mut commands, &mut rng, ItemKind::DogTreat, death.position);
        }

        let points = kill_score(death.size, director.wave, *difficulty, dog_alive);
        director.add_score(points);
    }
}
