use bevy::{prelude::*, utils::HashSet};

use crate::{
    audio::{PlaySoundEvent, SoundEffect},
    components::{delta_ms, facing, Role, SessionEntity, Velocity},
    config::GameConfig,
    difficulty::Difficulty,
    health::{Dying, Health},
    physics::{Collider, CollisionStarted},
    upgrades::{UpgradeKey, UpgradeLevels},
    GameSet,
};

pub const BULLET_RADIUS: f32 = 10.0;

pub struct BulletPlugin;

impl Plugin for BulletPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (bullet_lifetime_system, bullet_hit_system).in_set(GameSet::Combat),
        );
    }
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Bullet {
    pub age_ms: f32,
    /// Damageable bodies hit so far.
    pub pierced: u32,
}

/// Damage of one bullet against a target, given the current upgrades.
pub fn bullet_damage(levels: &UpgradeLevels, difficulty: Difficulty, target_is_dog: bool) -> f32 {
    let base = 10.0 + (levels.level(UpgradeKey::BulletDamage) as f32).powf(1.5) * 3.0;
    if target_is_dog {
        let reduction = (1.0 - levels.level(UpgradeKey::FriendlyFire) as f32 * 0.1).max(0.0);
        base * difficulty.multiplier(0.7) * reduction
    } else {
        base * difficulty.multiplier(-0.7)
    }
}

/// Hits a bullet survives before it is spent.
pub fn pierce_budget(levels: &UpgradeLevels) -> u32 {
    levels.level(UpgradeKey::BulletPiercing) + 1
}

pub fn spawn_bullet(commands: &mut Commands, origin: Vec2, direction: Vec2, speed: f32) -> Entity {
    let direction = direction.normalize_or_zero();
    commands
        .spawn((
            SpatialBundle::from_transform(
                Transform::from_translation(origin.extend(2.0)).with_rotation(facing(direction)),
            ),
            Bullet::default(),
            Role::Bullet,
            Velocity(direction * speed),
            Collider::Circle { radius: BULLET_RADIUS },
            SessionEntity,
            Name::new("Bullet"),
        ))
        .id()
}

fn bullet_lifetime_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut bullets: Query<(Entity, &mut Bullet)>,
) {
    let dt_ms = delta_ms(&time);
    for (entity, mut bullet) in bullets.iter_mut() {
        bullet.age_ms += dt_ms;
        if bullet.age_ms > config.bullet_lifetime_ms {
            commands.entity(entity).despawn_recursive();
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn bullet_hit_system(
    mut commands: Commands,
    mut contacts: EventReader<CollisionStarted>,
    mut bullets: Query<&mut Bullet>,
    mut targets: Query<(&Role, &mut Health), (Without<Bullet>, Without<Dying>)>,
    walls: Query<&Role, Without<Health>>,
    levels: Res<UpgradeLevels>,
    difficulty: Res<Difficulty>,
    mut sound_events: EventWriter<PlaySoundEvent>,
) {
    let mut spent: HashSet<Entity> = HashSet::default();
    for contact in contacts.read() {
        for (bullet_entity, other) in contact.pairs() {
            if spent.contains(&bullet_entity) {
                continue;
            }
            let Ok(mut bullet) = bullets.get_mut(bullet_entity) else {
                continue;
            };

            if matches!(walls.get(other), Ok(Role::Wall)) {
                commands.entity(bullet_entity).despawn_recursive();
                spent.insert(bullet_entity);
                continue;
            }

            let Ok((role, mut health)) = targets.get_mut(other) else {
                continue;
            };
            if !role.is_damageable() || *role == Role::Player {
                continue;
            }
            let is_dog = *role == Role::Dog;
            health.damage(bullet_damage(&levels, *difficulty, is_dog));
            bullet.pierced += 1;
            if is_dog {
                sound_events.send(PlaySoundEvent(SoundEffect::Bark));
            }
            sound_events.send(PlaySoundEvent(SoundEffect::Impact));

            if bullet.pierced >= pierce_budget(&levels) {
                commands.entity(bullet_entity).despawn_recursive();
                spent.insert(bullet_entity);
            }
        }
    }
}
