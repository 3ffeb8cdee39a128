use bevy::prelude::*;

use crate::{
    arena::Confined,
    components::{delta_ms, facing, planar, Mass, Role, SessionEntity},
    difficulty::Difficulty,
    health::{Dying, Health},
    items::{Item, ItemKind},
    physics::{Collider, Solid},
    player::Player,
    upgrades::{UpgradeKey, UpgradeLevels},
    GameSet,
};

pub const DOG_RADIUS: f32 = 20.0;
/// The dog stays put while the player is this close.
const HEEL_DISTANCE: f32 = 100.0;
const FOLLOW_SPEED: f32 = 0.001;
const TURN_RATE: f32 = 0.01;

pub struct DogPlugin;

impl Plugin for DogPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DogOrder>()
            .add_systems(Update, dog_order_system.in_set(GameSet::Intent))
            .add_systems(
                Update,
                (dog_stats_sync_system, dog_follow_system).chain().in_set(GameSet::Ai),
            );
    }
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Dog {
    /// Where the dog was told to wait, if anywhere.
    pub stay_point: Option<Vec2>,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum DogOrder {
    Stay(Vec2),
    Follow,
}

pub fn dog_max_health(levels: &UpgradeLevels, difficulty: Difficulty) -> f32 {
    (75.0 + 25.0 * levels.level(UpgradeKey::DoggyHealth) as f32) * difficulty.multiplier(-1.0)
}

/// One tick of the dog's pull toward `target`: faster the farther away it is.
pub fn follow_step(position: Vec2, target: Vec2, dt_ms: f32) -> Vec2 {
    let path = target - position;
    path.normalize_or_zero() * FOLLOW_SPEED * dt_ms * path.length()
}

/// Where the dog heads this tick: a treat first, then its stay point, then
/// the player once they wander off.
pub fn dog_destination(position: Vec2, dog: &Dog, treat: Option<Vec2>, player: Option<Vec2>) -> Option<Vec2> {
    if treat.is_some() {
        return treat;
    }
    if dog.stay_point.is_some() {
        return dog.stay_point;
    }
    player.filter(|player| player.distance(position) > HEEL_DISTANCE)
}

pub fn spawn_dog(commands: &mut Commands, max_health: f32, position: Vec2) -> Entity {
    commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_translation(position.extend(3.0))),
            Dog::default(),
            Role::Dog,
            Health::new(max_health),
            Mass(5.0),
            Collider::Circle { radius: DOG_RADIUS },
            Solid,
            Confined,
            SessionEntity,
            Name::new("Dog"),
        ))
        .id()
}

fn dog_order_system(mut orders: EventReader<DogOrder>, mut dogs: Query<&mut Dog>) {
    for order in orders.read() {
        for mut dog in dogs.iter_mut() {
            dog.stay_point = match order {
                DogOrder::Stay(point) => Some(*point),
                DogOrder::Follow => None,
            };
        }
    }
}

fn dog_stats_sync_system(
    levels: Res<UpgradeLevels>,
    difficulty: Res<Difficulty>,
    mut dogs: Query<&mut Health, (With<Dog>, Without<Dying>)>,
) {
    let max = dog_max_health(&levels, *difficulty);
    for mut health in dogs.iter_mut() {
        if health.max != max {
            health.set_max(max);
        }
    }
}

fn dog_follow_system(
    time: Res<Time>,
    mut dogs: Query<(&mut Transform, &Dog), Without<Dying>>,
    items: Query<(&Transform, &Item), Without<Dog>>,
    player_query: Query<&Transform, (With<Player>, Without<Dog>, Without<Item>)>,
) {
    let dt_ms = delta_ms(&time);
    let treat = items
        .iter()
        .find(|(_, item)| item.kind == ItemKind::DogTreat)
        .map(|(transform, _)| planar(transform));
    let player = player_query.get_single().ok().map(planar);

    for (mut transform, dog) in dogs.iter_mut() {
        let position = planar(&transform);
        let Some(destination) = dog_destination(position, dog, treat, player) else {
            continue;
        };
        let step = follow_step(position, destination, dt_ms);
        transform.translation += step.extend(0.0);
        if step != Vec2::ZERO {
            let turn = (TURN_RATE * dt_ms).min(1.0);
            transform.rotation = transform.rotation.slerp(facing(step), turn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn treat_beats_stay_point_and_player() {
        let dog = Dog { stay_point: Some(Vec2::new(50.0, 0.0)) };
        let treat = Some(Vec2::new(-200.0, 0.0));
        let player = Some(Vec2::new(500.0, 0.0));
        assert_eq!(dog_destination(Vec2::ZERO, &dog, treat, player), treat);
        assert_eq!(dog_destination(Vec2::ZERO, &dog, None, player), dog.stay_point);
    }

    #[test]
    fn heels_only_when_player_is_far() {
        let dog = Dog::default();
        assert_eq!(dog_destination(Vec2::ZERO, &dog, None, Some(Vec2::new(80.0, 0.0))), None);
        let far = Some(Vec2::new(300.0, 0.0));
        assert_eq!(dog_destination(Vec2::ZERO, &dog, None, far), far);
    }

    #[test]
    fn follow_step_scales_with_distance() {
        let near = follow_step(Vec2::ZERO, Vec2::new(100.0, 0.0), 10.0);
        let far = follow_step(Vec2::ZERO, Vec2::new(400.0, 0.0), 10.0);
        assert!((near.x - 1.0).abs() < 1e-5);
        assert!((far.x - 4.0).abs() < 1e-4);
    }
}
