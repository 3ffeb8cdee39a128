use bevy::prelude::*;

use crate::{
    arena::SpawnPoint,
    audio::{PlaySoundEvent, SoundEffect},
    components::{delta_ms, planar},
    config::GameConfig,
    difficulty::Difficulty,
    game::AppState,
    health::Dying,
    player::Player,
    rng::GameRng,
    zombie::{growl_for, spawn_zombie, ZombieArchetype, ZombieController},
    GameSet,
};

pub struct WavePlugin;

impl Plugin for WavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaveDirector>()
            .add_event::<WaveAnnouncement>()
            .add_systems(OnEnter(AppState::InGame), reset_director)
            .add_systems(Update, wave_director_system.in_set(GameSet::Director));
    }
}

/// Spawn weights of each archetype, kept in draw order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeWeights {
    pub entries: [(ZombieArchetype, f32); 5],
}

impl ArchetypeWeights {
    pub fn for_wave(w: f32) -> Self {
        Self {
            entries: [
                (ZombieArchetype::Normal, 3.0 + 0.2 * w),
                (ZombieArchetype::Giant, 0.2 * w),
                (ZombieArchetype::Fast, 0.1 * w),
                (ZombieArchetype::Mutant, 0.2 * w),
                (ZombieArchetype::Boss, 0.01 * w.powf(1.7)),
            ],
        }
    }

    /// Only `archetype` can be drawn.
    pub fn only(archetype: ZombieArchetype) -> Self {
        let mut weights = Self::for_wave(0.0);
        for entry in weights.entries.iter_mut() {
            entry.1 = if entry.0 == archetype { 1.0 } else { 0.0 };
        }
        weights
    }

    pub fn total(&self) -> f32 {
        self.entries.iter().map(|(_, weight)| weight).sum()
    }

    /// Weighted draw from a uniform `roll` in `[0, 1)`.
    pub fn pick(&self, roll: f32) -> ZombieArchetype {
        let mut remaining = roll * self.total();
        for &(archetype, weight) in self.entries.iter() {
            if weight <= 0.0 {
                continue;
            }
            remaining -= weight;
            if remaining <= 0.0 {
                return archetype;
            }
        }
        ZombieArchetype::Normal
    }
}

/// Everything that scales with the wave number. Derived on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveProfile {
    pub max_zombies: u32,
    pub weights: ArchetypeWeights,
    pub spawn_interval_ms: f32,
    pub damage_multiplier: f32,
    pub health_multiplier: f32,
}

impl WaveProfile {
    /// Profile of wave `wave`, counted from 1. Wave 1 is the baseline.
    pub fn new(wave: u32, difficulty: Difficulty) -> Self {
        let w = wave.saturating_sub(1) as f32;
        Self {
            max_zombies: (10.0 + w.powf(1.2) * 3.0 * difficulty.multiplier(1.0)).floor() as u32,
            weights: ArchetypeWeights::for_wave(w),
            spawn_interval_ms: 1000.0 * difficulty.multiplier(-2.0),
            damage_multiplier: difficulty.multiplier(0.7) + w.powf(1.1) * 0.1,
            health_multiplier: difficulty.multiplier(0.7) + w.powf(1.4) * 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavePhase {
    #[default]
    Countdown,
    Spawning,
}

/// What a director tick asks the world to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorStep {
    Waiting,
    WaveStarted(u32),
    SpawnDue,
    WaveCompleted(u32),
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct WaveDirector {
    pub wave: u32,
    pub spawned_this_wave: u32,
    pub countdown_ms: f32,
    pub spawn_timer_ms: f32,
    pub phase: WavePhase,
    pub score: u32,
    /// Countdown restored after each completed wave.
    pub countdown_interval_ms: f32,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new(GameConfig::default().wave_countdown_ms)
    }
}

impl WaveDirector {
    pub fn new(countdown_interval_ms: f32) -> Self {
        Self {
            wave: 0,
            spawned_this_wave: 0,
            countdown_ms: countdown_interval_ms,
            spawn_timer_ms: 0.0,
            phase: WavePhase::Countdown,
            score: 0,
            countdown_interval_ms,
        }
    }

    pub fn profile(&self, difficulty: Difficulty) -> WaveProfile {
        WaveProfile::new(self.wave, difficulty)
    }

    pub fn is_wave_active(&self) -> bool {
        self.phase == WavePhase::Spawning
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    /// Has the current wave released its whole quota?
    pub fn quota_reached(&self, difficulty: Difficulty) -> bool {
        self.spawned_this_wave >= self.profile(difficulty).max_zombies
    }

    /// Advances by `dt_ms` with `alive` zombies in the arena.
    ///
    /// At most one zombie is due per tick. `SpawnDue` already counts the
    /// zombie as spawned, whether or not the caller finds a place for it.
    pub fn tick(&mut self, dt_ms: f32, alive: usize, difficulty: Difficulty) -> DirectorStep {
        match self.phase {
            WavePhase::Countdown => {
                self.countdown_ms -= dt_ms;
                if self.countdown_ms > 0.0 {
                    return DirectorStep::Waiting;
                }
                self.phase = WavePhase::Spawning;
                self.wave += 1;
                self.spawned_this_wave = 0;
                DirectorStep::WaveStarted(self.wave)
            }
            WavePhase::Spawning => {
                let profile = self.profile(difficulty);
                self.spawn_timer_ms += dt_ms;
                if self.spawned_this_wave < profile.max_zombies {
                    if self.spawn_timer_ms >= profile.spawn_interval_ms {
                        self.spawn_timer_ms = 0.0;
                        self.spawned_this_wave += 1;
                        return DirectorStep::SpawnDue;
                    }
                    DirectorStep::Waiting
                } else if alive == 0 {
                    self.phase = WavePhase::Countdown;
                    self.countdown_ms = self.countdown_interval_ms;
                    DirectorStep::WaveCompleted(self.wave)
                } else {
                    DirectorStep::Waiting
                }
            }
        }
    }
}

/// Uniform pick among the points farther than `safety_radius` from the player.
pub fn pick_spawn_point(points: &[Vec2], player: Vec2, safety_radius: f32, roll: f32) -> Option<Vec2> {
    let eligible: Vec<Vec2> = points
        .iter()
        .copied()
        .filter(|point| point.distance(player) > safety_radius)
        .collect();
    if eligible.is_empty() {
        return None;
    }
    let index = ((roll * eligible.len() as f32) as usize).min(eligible.len() - 1);
    Some(eligible[index])
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveAnnouncement {
    Started(u32),
    Completed(u32),
}

fn reset_director(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(WaveDirector::new(config.wave_countdown_ms));
}

#[allow(clippy::too_many_arguments)]
pub fn wave_director_system(
    mut commands: Commands,
    time: Res<Time>,
    mut director: ResMut<WaveDirector>,
    difficulty: Res<Difficulty>,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
    zombies: Query<(), (With<ZombieController>, Without<Dying>)>,
    player_query: Query<&Transform, (With<Player>, Without<Dying>)>,
    spawn_points: Query<&Transform, With<SpawnPoint>>,
    mut announcements: EventWriter<WaveAnnouncement>,
    mut sound_events: EventWriter<PlaySoundEvent>,
) {
    match director.tick(delta_ms(&time), zombies.iter().count(), *difficulty) {
        DirectorStep::Waiting => {}
        DirectorStep::WaveStarted(wave) => {
            info!("Wave {} started", wave);
            announcements.send(WaveAnnouncement::Started(wave));
            sound_events.send(PlaySoundEvent(SoundEffect::WaveStart));
        }
        DirectorStep::WaveCompleted(wave) => {
            info!("Wave {} complete, score {}", wave, director.score);
            announcements.send(WaveAnnouncement::Completed(wave));
            sound_events.send(PlaySoundEvent(SoundEffect::Positive));
        }
        DirectorStep::SpawnDue => {
            let Ok(player_transform) = player_query.get_single() else {
                warn!("No player to keep spawns away from");
                return;
            };
            let points: Vec<Vec2> = spawn_points.iter().map(planar).collect();
            let roll = rng.unit();
            let Some(position) = pick_spawn_point(&points, planar(player_transform), config.spawn_safety_radius, roll) else {
                warn!("No spawn point outside the safety radius");
                return;
            };
            let profile = director.profile(*difficulty);
            let archetype = profile.weights.pick(rng.unit());
            spawn_zombie(&mut commands, archetype, profile.health_multiplier, position);
            sound_events.send(PlaySoundEvent(growl_for(archetype.props().size)));
        }
    }
}
