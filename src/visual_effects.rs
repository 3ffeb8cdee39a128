use bevy::prelude::*;
use bevy_hanabi::prelude::*;
use rand::Rng;

use crate::{
    coins::{Coin, COIN_SIZE},
    components::{delta_ms, Role, SessionEntity},
    health::{Dying, Health},
    items::{Item, ItemKind},
    loot::BloodSplatEvent,
    physics::Collider,
    zombie::ZombieController,
};

const DECAL_GROWTH_PER_MS: f32 = 0.005;
const DECAL_FADE_PER_MS: f32 = 0.00005;
const DECAL_Z: f32 = 0.5;
const BURST_LIFETIME_SECONDS: f32 = 1.0;
const HEALTH_BAR_WIDTH: f32 = 60.0;
const HEALTH_BAR_OFFSET: f32 = 15.0;

pub struct VisualEffectsPlugin;

impl Plugin for VisualEffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_blood_effect).add_systems(
            Update,
            (
                attach_sprites_system,
                coin_sprite_size_system,
                spawn_blood_splat_system,
                blood_decal_system,
                blood_burst_cleanup_system,
                health_bar_system,
            ),
        );
    }
}

#[derive(Resource)]
pub struct BloodEffect {
    pub burst: Handle<EffectAsset>,
}

/// Splat sprite that grows from nothing to full size, then slowly fades.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BloodDecal {
    pub size: f32,
    pub growth: f32,
    pub opacity: f32,
}

impl BloodDecal {
    pub fn new(size: f32) -> Self {
        Self { size, growth: 0.0, opacity: 1.0 }
    }

    /// Advances the decal; returns false once it has faded out.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        self.growth = (self.growth + dt_ms * DECAL_GROWTH_PER_MS).min(1.0);
        self.opacity = (self.opacity - dt_ms * DECAL_FADE_PER_MS).max(0.0);
        self.opacity > 0.0
    }
}

#[derive(Component)]
struct BloodBurst(Timer);

fn role_color(role: Role, zombie: Option<&ZombieController>, item: Option<&Item>) -> Color {
    match role {
        Role::Player => Color::rgb(0.25, 0.45, 0.9),
        Role::Dog => Color::rgb(0.6, 0.4, 0.2),
        Role::Zombie => {
            let hue = zombie.map_or(0.0, |zombie| zombie.props.hue);
            Color::hsl((110.0 + hue) % 360.0, 0.45, 0.35)
        }
        Role::Item => match item.map(|item| item.kind) {
            Some(ItemKind::DogTreat) => Color::rgb(0.9, 0.8, 0.6),
            _ => Color::rgb(0.9, 0.15, 0.2),
        },
        Role::Coin => Color::GOLD,
        Role::Bullet => Color::rgb(1.0, 0.9, 0.5),
        Role::Wall => Color::DARK_GRAY,
    }
}

fn collider_size(collider: &Collider) -> Vec2 {
    match *collider {
        Collider::Circle { radius } => Vec2::splat(radius * 2.0),
        Collider::Rect { half_extents } => half_extents * 2.0,
    }
}

fn attach_sprites_system(
    mut commands: Commands,
    added: Query<(Entity, &Role, Option<&Collider>, Option<&ZombieController>, Option<&Item>), Added<Role>>,
) {
    for (entity, role, collider, zombie, item) in added.iter() {
        let size = collider.map_or(Vec2::splat(COIN_SIZE), collider_size);
        commands.entity(entity).insert((
            Sprite {
                color: role_color(*role, zombie, item),
                custom_size: Some(size),
                ..default()
            },
            Handle::<Image>::default(),
        ));
    }
}

fn coin_sprite_size_system(mut coins: Query<(&Coin, &mut Sprite), Changed<Coin>>) {
    for (coin, mut sprite) in coins.iter_mut() {
        sprite.custom_size = Some(Vec2::splat(COIN_SIZE * coin.scale()));
    }
}

fn setup_blood_effect(mut commands: Commands, mut effects: ResMut<Assets<EffectAsset>>) {
    let mut color_gradient = Gradient::new();
    color_gradient.add_key(0.0, Vec4::new(0.7, 0.0, 0.0, 1.0));
    color_gradient.add_key(1.0, Vec4::new(0.3, 0.0, 0.0, 0.0));

    let mut size_gradient = Gradient::new();
    size_gradient.add_key(0.0, Vec2::splat(8.0));
    size_gradient.add_key(1.0, Vec2::splat(2.0));

    let writer = ExprWriter::new();
    let init_pos = SetPositionCircleModifier {
        center: writer.lit(Vec3::ZERO).expr(),
        axis: writer.lit(Vec3::Z).expr(),
        radius: writer.lit(6.0).expr(),
        dimension: ShapeDimension::Volume,
    };
    let init_vel = SetVelocityCircleModifier {
        center: writer.lit(Vec3::ZERO).expr(),
        axis: writer.lit(Vec3::Z).expr(),
        speed: writer.lit(120.0).uniform(writer.lit(360.0)).expr(),
    };
    let init_age = SetAttributeModifier::new(Attribute::AGE, writer.lit(0.0).expr());
    let init_lifetime = SetAttributeModifier::new(Attribute::LIFETIME, writer.lit(0.6).expr());
    let drag = LinearDragModifier::new(writer.lit(5.0).expr());

    let burst = EffectAsset::new(vec![256], Spawner::once(40.0.into(), true), writer.finish())
        .with_name("blood_burst")
        .init(init_pos)
        .init(init_vel)
        .init(init_age)
        .init(init_lifetime)
        .update(drag)
        .render(ColorOverLifetimeModifier { gradient: color_gradient })
        .render(SizeOverLifetimeModifier { gradient: size_gradient, screen_space_size: false });

    commands.insert_resource(BloodEffect { burst: effects.add(burst) });
}

fn spawn_blood_splat_system(
    mut commands: Commands,
    mut splats: EventReader<BloodSplatEvent>,
    effect: Option<Res<BloodEffect>>,
) {
    let mut rng = rand::thread_rng();
    for splat in splats.read() {
        let rotation = Quat::from_rotation_z(rng.gen_range(0.0..std::f32::consts::TAU));
        commands.spawn((
            SpriteBundle {
                sprite: Sprite {
                    color: Color::rgba(0.5, 0.0, 0.0, 1.0),
                    custom_size: Some(Vec2::ZERO),
                    ..default()
                },
                transform: Transform::from_translation(splat.position.extend(DECAL_Z)).with_rotation(rotation),
                ..default()
            },
            BloodDecal::new(splat.size),
            SessionEntity,
            Name::new("BloodSplat"),
        ));
        if let Some(effect) = effect.as_ref() {
            commands.spawn((
                ParticleEffectBundle {
                    effect: ParticleEffect::new(effect.burst.clone()),
                    transform: Transform::from_translation(splat.position.extend(DECAL_Z + 0.1)),
                    ..default()
                },
                BloodBurst(Timer::from_seconds(BURST_LIFETIME_SECONDS, TimerMode::Once)),
            ));
        }
    }
}

fn blood_decal_system(
    mut commands: Commands,
    time: Res<Time>,
    mut decals: Query<(Entity, &mut BloodDecal, &mut Sprite)>,
) {
    let dt_ms = delta_ms(&time);
    for (entity, mut decal, mut sprite) in decals.iter_mut() {
        if !decal.advance(dt_ms) {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        sprite.custom_size = Some(Vec2::splat(decal.size * decal.growth));
        sprite.color.set_a(decal.opacity);
    }
}

fn blood_burst_cleanup_system(
    mut commands: Commands,
    time: Res<Time>,
    mut bursts: Query<(Entity, &mut BloodBurst)>,
) {
    for (entity, mut burst) in bursts.iter_mut() {
        if burst.0.tick(time.delta()).finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

fn health_bar_system(
    mut gizmos: Gizmos,
    bars: Query<(&Transform, &Health, Option<&Collider>), Without<Dying>>,
) {
    for (transform, health, collider) in bars.iter() {
        if health.current >= health.max {
            continue;
        }
        let height = collider.map_or(0.0, |collider| collider_size(collider).y);
        let left = transform.translation.truncate()
            + Vec2::new(-HEALTH_BAR_WIDTH / 2.0, height / 2.0 + HEALTH_BAR_OFFSET);
        let filled = HEALTH_BAR_WIDTH * health.percentage().clamp(0.0, 1.0);
        gizmos.line_2d(left, left + Vec2::X * HEALTH_BAR_WIDTH, Color::rgb(0.3, 0.0, 0.0));
        gizmos.line_2d(left, left + Vec2::X * filled, Color::GREEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decal_reaches_full_size_before_fading() {
        let mut decal = BloodDecal::new(100.0);
        assert!(decal.advance(100.0));
        assert!((decal.growth - 0.5).abs() < 1e-6);
        assert!(decal.advance(1000.0));
        assert_eq!(decal.growth, 1.0);
        assert!(decal.opacity < 1.0);
    }

    #[test]
    fn decal_fades_out_after_twenty_seconds() {
        let mut decal = BloodDecal::new(100.0);
        assert!(decal.advance(19_000.0));
        assert!(!decal.advance(2_000.0));
    }
}
