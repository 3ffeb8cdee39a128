use bevy::{prelude::*, utils::HashSet};

use crate::{
    audio::{PlaySoundEvent, SoundEffect},
    components::{delta_ms, planar, step_toward, Role, SessionEntity},
    config::GameConfig,
    health::Dying,
    player::Player,
    rng::GameRng,
    upgrades::Wallet,
    GameSet,
};

const DRIFT_DISTANCE: f32 = 80.0;
const DRIFT_SPEED: f32 = 0.003;
const MAGNET_SPEED: f32 = 0.03;
const PICKUP_RADIUS: f32 = 30.0;
pub const COIN_SIZE: f32 = 20.0;

pub struct CoinPlugin;

impl Plugin for CoinPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, coin_update_system.in_set(GameSet::Combat));
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Coin {
    pub drift_target: Vec2,
    pub value: f32,
    pub age_ms: f32,
}

impl Coin {
    pub fn scale(&self) -> f32 {
        1.0 + (self.value - 1.0).max(0.0).powf(0.3) * 0.5
    }

    pub fn pickup_radius(&self) -> f32 {
        PICKUP_RADIUS * self.scale()
    }
}

pub fn spawn_coin(commands: &mut Commands, rng: &mut GameRng, position: Vec2, value: f32) -> Entity {
    let drift_target = position + rng.direction() * DRIFT_DISTANCE;
    commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_translation(position.extend(0.5))),
            Coin { drift_target, value, age_ms: 0.0 },
            Role::Coin,
            SessionEntity,
            Name::new("Coin"),
        ))
        .id()
}

/// A coin old enough to merge, as seen by [`merge_idle_coins`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleCoin {
    pub entity: Entity,
    pub position: Vec2,
    pub age_ms: f32,
    pub value: f32,
}

/// Merges every coin past `timeout_ms` with its nearest neighbour, at any
/// distance. Of the two, the older coin survives and takes the value of the
/// younger one; on equal age the coin that reached its timeout is absorbed.
/// A coin absorbed during this pass takes no further part in it.
///
/// Returns `(absorbed, survivor)` pairs; survivors' values are updated in place.
pub fn merge_idle_coins(coins: &mut [IdleCoin], timeout_ms: f32) -> Vec<(Entity, Entity)> {
    let mut gone: Vec<bool> = vec![false; coins.len()];
    let mut merges = Vec::new();

    for actor in 0..coins.len() {
        if gone[actor] || coins[actor].age_ms <= timeout_ms {
            continue;
        }
        let mut nearest: Option<(usize, f32)> = None;
        for other in 0..coins.len() {
            if other == actor || gone[other] {
                continue;
            }
            let distance = coins[actor].position.distance_squared(coins[other].position);
            match nearest {
                Some((_, best)) if best <= distance => {}
                _ => nearest = Some((other, distance)),
            }
        }
        let Some((other, _)) = nearest else {
            continue;
        };
        let (absorbed, survivor) = if coins[other].age_ms >= coins[actor].age_ms {
            (actor, other)
        } else {
            (other, actor)
        };
        coins[survivor].value += coins[absorbed].value;
        gone[absorbed] = true;
        merges.push((coins[absorbed].entity, coins[survivor].entity));
    }
    merges
}

#[allow(clippy::too_many_arguments)]
pub fn coin_update_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut wallet: ResMut<Wallet>,
    mut coins: Query<(Entity, &mut Transform, &mut Coin)>,
    player_query: Query<&Transform, (With<Player>, Without<Coin>, Without<Dying>)>,
    mut sound_events: EventWriter<PlaySoundEvent>,
) {
    let dt_ms = delta_ms(&time);
    let player = player_query.get_single().ok().map(planar);
    let mut removed: HashSet<Entity> = HashSet::default();

    for (entity, mut transform, mut coin) in coins.iter_mut() {
        coin.age_ms += dt_ms;
        let Some(player) = player else {
            continue;
        };
        let position = planar(&transform);
        let distance = position.distance(player);
        if distance < coin.pickup_radius() {
            wallet.credit(coin.value);
            sound_events.send(PlaySoundEvent(SoundEffect::Coin));
            commands.entity(entity).despawn_recursive();
            removed.insert(entity);
            continue;
        }
        if distance < config.coin_magnet_radius {
            let pulled = step_toward(position, player, MAGNET_SPEED * distance * dt_ms);
            transform.translation.x = pulled.x;
            transform.translation.y = pulled.y;
        }
    }

    let mut idle: Vec<IdleCoin> = coins
        .iter()
        .filter(|(entity, _, _)| !removed.contains(entity))
        .map(|(entity, transform, coin)| IdleCoin {
            entity,
            position: planar(transform),
            age_ms: coin.age_ms,
            value: coin.value,
        })
        .collect();
    let merges = merge_idle_coins(&mut idle, config.coin_merge_after_ms);
    for (absorbed, _) in merges.iter() {
        commands.entity(*absorbed).despawn_recursive();
        removed.insert(*absorbed);
    }
    for survivor in idle.iter() {
        if let Ok((_, _, mut coin)) = coins.get_mut(survivor.entity) {
            coin.value = survivor.value;
        }
    }

    for (entity, mut transform, coin) in coins.iter_mut() {
        if removed.contains(&entity) {
            continue;
        }
        let drifted = step_toward(planar(&transform), coin.drift_target, DRIFT_SPEED * dt_ms);
        transform.translation.x = drifted.x;
        transform.translation.y = drifted.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_grows_with_value() {
        let single = Coin { drift_target: Vec2::ZERO, value: 1.0, age_ms: 0.0 };
        let heavy = Coin { value: 1025.0, ..single };
        assert_eq!(single.scale(), 1.0);
        assert!((heavy.scale() - 5.0).abs() < 1e-3);
        assert!((heavy.pickup_radius() - 150.0).abs() < 1e-2);
    }
}
