use bevy::prelude::*;

use crate::{
    arena::Confined,
    audio::{PlaySoundEvent, SoundEffect},
    bullet::spawn_bullet,
    components::{delta_ms, facing, planar, Mass, Role, SessionEntity},
    config::GameConfig,
    difficulty::Difficulty,
    health::{Dying, Health},
    physics::{Collider, Solid},
    upgrades::{UpgradeKey, UpgradeLevels},
    game::AppState,
    GameSet,
};

pub const PLAYER_RADIUS: f32 = 30.0;
/// Units per millisecond.
const PLAYER_SPEED: f32 = 0.4;
const MUZZLE_OFFSET: f32 = 45.0;
const BURST_DURATION_MS: f32 = 200.0;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerIntent>()
            .add_systems(OnEnter(AppState::InGame), reset_intent)
            .add_systems(
                Update,
                (player_stats_sync_system, player_movement_system, player_shooting_system)
                    .chain()
                    .in_set(GameSet::Ai),
            );
    }
}

/// What the player wants this tick, filled in by the input layer.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntent {
    /// Raw movement axes; normalized before use.
    pub movement: Vec2,
    /// Aim point in world space.
    pub aim: Vec2,
    pub trigger: bool,
    /// Clicks on the upgrade panel must not fire.
    pub pointer_over_ui: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedShot {
    pub due_ms: f32,
    pub target: Vec2,
}

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Player {
    pub shooting_timer_ms: f32,
    pub lifetime_ms: f32,
    pub planned_shots: Vec<PlannedShot>,
}

pub fn player_max_health(levels: &UpgradeLevels, difficulty: Difficulty) -> f32 {
    (100.0 + 25.0 * levels.level(UpgradeKey::MaxPlayerHealth) as f32) * difficulty.multiplier(-0.7)
}

pub fn shooting_delay_ms(levels: &UpgradeLevels) -> f32 {
    1000.0 / (1.0 + levels.level(UpgradeKey::FireRate) as f32 * 0.5)
}

pub fn burst_count(levels: &UpgradeLevels) -> u32 {
    1 + levels.level(UpgradeKey::Burst)
}

/// Follow-up shots of a burst, evenly spread after `now_ms`.
pub fn plan_burst(now_ms: f32, burst: u32, target: Vec2) -> Vec<PlannedShot> {
    let delayed = burst.saturating_sub(1);
    if delayed == 0 {
        return Vec::new();
    }
    let interval = BURST_DURATION_MS / delayed as f32;
    (0..delayed)
        .map(|i| PlannedShot {
            due_ms: now_ms + interval * (i + 1) as f32,
            target,
        })
        .collect()
}

/// Removes and returns the shots due strictly before `now_ms`.
pub fn take_due_shots(planned: &mut Vec<PlannedShot>, now_ms: f32) -> Vec<PlannedShot> {
    let (due, pending): (Vec<_>, Vec<_>) = planned.drain(..).partition(|shot| shot.due_ms < now_ms);
    *planned = pending;
    due
}

pub fn spawn_player(commands: &mut Commands, max_health: f32) -> Entity {
    commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_translation(Vec3::new(0.0, 0.0, 3.0))),
            Player::default(),
            Role::Player,
            Health::new(max_health),
            Mass(10.0),
            Collider::Circle { radius: PLAYER_RADIUS },
            Solid,
            Confined,
            SessionEntity,
            Name::new("Player"),
        ))
        .id()
}

fn reset_intent(mut intent: ResMut<PlayerIntent>) {
    *intent = PlayerIntent::default();
}

fn player_stats_sync_system(
    levels: Res<UpgradeLevels>,
    difficulty: Res<Difficulty>,
    mut player_query: Query<&mut Health, (With<Player>, Without<Dying>)>,
) {
    let max = player_max_health(&levels, *difficulty);
    for mut health in player_query.iter_mut() {
        if health.max != max {
            health.set_max(max);
        }
    }
}

fn player_movement_system(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    mut player_query: Query<&mut Transform, (With<Player>, Without<Dying>)>,
) {
    let Ok(mut transform) = player_query.get_single_mut() else {
        return;
    };
    let step = intent.movement.normalize_or_zero() * PLAYER_SPEED * delta_ms(&time);
    transform.translation += step.extend(0.0);

    let aim = intent.aim - planar(&transform);
    if aim != Vec2::ZERO {
        transform.rotation = facing(aim);
    }
}

fn fire(commands: &mut Commands, origin: Vec2, target: Vec2, speed: f32, sound_events: &mut EventWriter<PlaySoundEvent>) {
    let direction = (target - origin).try_normalize().unwrap_or(Vec2::Y);
    let muzzle = origin + direction * MUZZLE_OFFSET;
    spawn_bullet(commands, muzzle, direction, speed);
    sound_events.send(PlaySoundEvent(SoundEffect::Shot));
}

pub fn player_shooting_system(
    mut commands: Commands,
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    levels: Res<UpgradeLevels>,
    config: Res<GameConfig>,
    mut player_query: Query<(&Transform, &mut Player), Without<Dying>>,
    mut sound_events: EventWriter<PlaySoundEvent>,
) {
    let Ok((transform, mut player)) = player_query.get_single_mut() else {
        return;
    };
    let dt_ms = delta_ms(&time);
    let position = planar(transform);

    player.shooting_timer_ms += dt_ms;
    let can_shoot = player.shooting_timer_ms > shooting_delay_ms(&levels);
    if intent.trigger && can_shoot && !intent.pointer_over_ui {
        player.shooting_timer_ms = 0.0;
        let lifetime = player.lifetime_ms;
        let follow_ups = plan_burst(lifetime, burst_count(&levels), intent.aim);
        player.planned_shots.extend(follow_ups);
        fire(&mut commands, position, intent.aim, config.bullet_speed, &mut sound_events);
    }

    player.lifetime_ms += dt_ms;
    let now = player.lifetime_ms;
    for shot in take_due_shots(&mut player.planned_shots, now) {
        fire(&mut commands, position, shot.target, config.bullet_speed, &mut sound_events);
    }
}
