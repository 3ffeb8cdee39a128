use bevy::prelude::*;

use crate::{
    arena::Confined,
    audio::{PlaySoundEvent, SoundEffect},
    bullet::Bullet,
    components::{delta_ms, facing, planar, Mass, Role, SessionEntity, Velocity},
    config::GameConfig,
    difficulty::Difficulty,
    health::{detect_deaths_system, Dying, EntityDied, Health},
    physics::{apply_force, Collider, CollisionStarted, Solid},
    player::Player,
    rng::GameRng,
    waves::WaveDirector,
    GameSet,
};

/// A zombie re-targets on a tick when `roll * dt_ms` falls below this.
const RETARGET_THRESHOLD: f32 = 0.02;
const GROWL_THRESHOLD: f32 = 0.01;
const MOVE_FACTOR: f32 = 0.1;
const KNOCKBACK_FROM_BULLET: f32 = 0.01;
const KNOCKBACK_FORCE: f32 = 10.0;

pub struct ZombiePlugin;

impl Plugin for ZombiePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ZombieDied>()
            .add_systems(Update, zombie_controller_system.in_set(GameSet::Ai))
            .add_systems(Update, zombie_bullet_contact_system.in_set(GameSet::Combat))
            .add_systems(
                Update,
                report_zombie_deaths_system
                    .in_set(GameSet::Death)
                    .after(detect_deaths_system),
            );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZombieArchetype {
    Normal,
    Giant,
    Boss,
    Mutant,
    Fast,
}

/// Stat template of an archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZombieProps {
    pub size: f32,
    pub health: f32,
    pub speed: f32,
    pub damage: f32,
    /// Hue shift in degrees applied to the sprite tint.
    pub hue: f32,
}

impl ZombieArchetype {
    pub fn props(self) -> ZombieProps {
        match self {
            ZombieArchetype::Normal => ZombieProps { size: 1.0, health: 20.0, speed: 0.7, damage: 10.0, hue: 0.0 },
            ZombieArchetype::Giant => ZombieProps { size: 4.0, health: 150.0, speed: 0.4, damage: 20.0, hue: 0.0 },
            ZombieArchetype::Boss => ZombieProps { size: 8.0, health: 500.0, speed: 0.15, damage: 50.0, hue: 0.0 },
            ZombieArchetype::Mutant => ZombieProps { size: 2.0, health: 40.0, speed: 0.75, damage: 13.0, hue: 70.0 },
            ZombieArchetype::Fast => ZombieProps { size: 0.7, health: 10.0, speed: 2.0, damage: 4.0, hue: 190.0 },
        }
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct ZombieController {
    pub archetype: ZombieArchetype,
    pub props: ZombieProps,
    pub attack_cooldown_ms: f32,
    pub target: Option<Entity>,
    /// Set by a bullet hit, applied and cleared on the next controller tick.
    pub pending_knockback: Option<Vec2>,
}

impl ZombieController {
    pub fn new(archetype: ZombieArchetype) -> Self {
        Self {
            archetype,
            props: archetype.props(),
            attack_cooldown_ms: 0.0,
            target: None,
            pending_knockback: None,
        }
    }

    pub fn attack_range(&self) -> f32 {
        30.0 * self.props.size * 0.8 + 40.0
    }

    pub fn queue_knockback(&mut self, bullet_velocity: Vec2) {
        self.pending_knockback = Some(bullet_velocity * KNOCKBACK_FROM_BULLET);
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ZombieDied {
    pub entity: Entity,
    pub position: Vec2,
    pub size: f32,
    pub archetype: ZombieArchetype,
}

pub fn zombie_mass(size: f32) -> f32 {
    10.0 * size * size * size
}

pub fn zombie_radius(size: f32) -> f32 {
    30.0 * size * 0.8
}

pub fn growl_for(size: f32) -> SoundEffect {
    if size > 2.0 {
        SoundEffect::ZombieBig
    } else {
        SoundEffect::ZombieGrowl
    }
}

pub fn spawn_zombie(
    commands: &mut Commands,
    archetype: ZombieArchetype,
    health_multiplier: f32,
    position: Vec2,
) -> Entity {
    let props = archetype.props();
    commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_translation(position.extend(1.0))),
            Role::Zombie,
            ZombieController::new(archetype),
            Health::new(props.health * health_multiplier),
            Velocity::default(),
            Mass(zombie_mass(props.size)),
            Collider::Circle { radius: zombie_radius(props.size) },
            Solid,
            Confined,
            SessionEntity,
            Name::new("Zombie"),
        ))
        .id()
}

/// Closest candidate to `from`. On equal distance the earlier candidate wins.
pub fn nearest_target(from: Vec2, candidates: &[(Entity, Vec2)]) -> Option<Entity> {
    let mut best: Option<(Entity, f32)> = None;
    for &(entity, position) in candidates {
        let distance = from.distance_squared(position);
        match best {
            Some((_, closest)) if closest <= distance => {}
            _ => best = Some((entity, distance)),
        }
    }
    best.map(|(entity, _)| entity)
}

#[allow(clippy::too_many_arguments)]
pub fn zombie_controller_system(
    time: Res<Time>,
    mut rng: ResMut<GameRng>,
    director: Res<WaveDirector>,
    difficulty: Res<Difficulty>,
    config: Res<GameConfig>,
    mut zombies: Query<(&mut Transform, &mut Velocity, &Mass, &mut ZombieController), Without<Dying>>,
    mut friendlies: Query<(Entity, &Transform, &Role, &mut Health), (Without<ZombieController>, Without<Dying>)>,
    mut sound_events: EventWriter<PlaySoundEvent>,
) {
    let dt_ms = delta_ms(&time);
    if dt_ms <= 0.0 {
        return;
    }
    let candidates: Vec<(Entity, Vec2)> = friendlies
        .iter()
        .filter(|(_, _, role, _)| role.is_friendly())
        .map(|(entity, transform, _, _)| (entity, planar(transform)))
        .collect();
    let damage_multiplier = director.profile(*difficulty).damage_multiplier;

    for (mut transform, mut velocity, mass, mut zombie) in zombies.iter_mut() {
        zombie.attack_cooldown_ms -= dt_ms;
        let position = planar(&transform);

        let target_present = zombie
            .target
            .is_some_and(|target| candidates.iter().any(|(entity, _)| *entity == target));
        if !target_present {
            zombie.target = nearest_target(position, &candidates);
        }
        if rng.unit() * dt_ms < RETARGET_THRESHOLD {
            zombie.target = nearest_target(position, &candidates);
        }

        let target = zombie
            .target
            .and_then(|target| candidates.iter().find(|(entity, _)| *entity == target).copied());
        if let Some((target, target_position)) = target {
            let direction = (target_position - position).normalize_or_zero();
            if direction != Vec2::ZERO {
                transform.rotation = facing(direction);
            }
            let step = direction * zombie.props.speed * dt_ms * MOVE_FACTOR;
            transform.translation += step.extend(0.0);

            if let Some(knockback) = zombie.pending_knockback.take() {
                apply_force(&mut velocity, *mass, knockback * KNOCKBACK_FORCE / dt_ms, dt_ms);
            }

            let distance = target_position.distance(position);
            if distance < zombie.attack_range() && zombie.attack_cooldown_ms <= 0.0 {
                zombie.attack_cooldown_ms = config.attack_cooldown_ms;
                if let Ok((_, _, role, mut health)) = friendlies.get_mut(target) {
                    health.damage(zombie.props.damage * damage_multiplier);
                    let cry = if *role == Role::Dog { SoundEffect::Bark } else { SoundEffect::Hurt };
                    sound_events.send(PlaySoundEvent(cry));
                    sound_events.send(PlaySoundEvent(SoundEffect::Impact));
                }
            }
        } else if let Some(knockback) = zombie.pending_knockback.take() {
            apply_force(&mut velocity, *mass, knockback * KNOCKBACK_FORCE / dt_ms, dt_ms);
        }

        if rng.unit() * dt_ms < GROWL_THRESHOLD {
            sound_events.send(PlaySoundEvent(growl_for(zombie.props.size)));
        }
    }
}

pub fn zombie_bullet_contact_system(
    mut contacts: EventReader<CollisionStarted>,
    mut zombies: Query<&mut ZombieController, Without<Dying>>,
    bullets: Query<&Velocity, With<Bullet>>,
    player_query: Query<Entity, With<Player>>,
) {
    let player = player_query.get_single().ok();
    for contact in contacts.read() {
        for (zombie_entity, other) in contact.pairs() {
            let Ok(bullet_velocity) = bullets.get(other) else {
                continue;
            };
            let Ok(mut zombie) = zombies.get_mut(zombie_entity) else {
                continue;
            };
            zombie.queue_knockback(bullet_velocity.0);
            if player.is_some() {
                zombie.target = player;
            }
        }
    }
}

fn report_zombie_deaths_system(
    mut deaths: EventReader<EntityDied>,
    zombies: Query<&ZombieController>,
    mut zombie_deaths: EventWriter<ZombieDied>,
) {
    for death in deaths.read() {
        if death.role != Role::Zombie {
            continue;
        }
        let Ok(zombie) = zombies.get(death.entity) else {
            continue;
        };
        zombie_deaths.send(ZombieDied {
            entity: death.entity,
            position: death.position,
            size: zombie.props.size,
            archetype: zombie.archetype,
        });
    }
}
