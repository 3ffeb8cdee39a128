use bevy::{prelude::*, utils::HashSet};

use crate::{
    audio::{PlaySoundEvent, SoundEffect},
    arena::Confined,
    components::{Mass, Role, SessionEntity, Velocity},
    difficulty::Difficulty,
    health::{Dying, Health},
    physics::{Collider, CollisionStarted},
    rng::GameRng,
    GameSet,
};

pub const ITEM_SIZE: f32 = 50.0;
/// Initial speed of a freshly dropped item, units per second.
const DROP_SPEED: f32 = 30.0;
const HEALTH_PACK_HEAL: f32 = 70.0;

pub struct ItemsPlugin;

impl Plugin for ItemsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, item_pickup_system.in_set(GameSet::Combat));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    HealthPack,
    DogTreat,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::HealthPack => "Health Pack",
            ItemKind::DogTreat => "Dog Treat",
        }
    }

    pub fn collector(self) -> Role {
        match self {
            ItemKind::HealthPack => Role::Player,
            ItemKind::DogTreat => Role::Dog,
        }
    }

    /// Amount healed on pickup; `None` heals to full.
    pub fn heal_amount(self, difficulty: Difficulty) -> Option<f32> {
        match self {
            ItemKind::HealthPack => Some(HEALTH_PACK_HEAL * difficulty.multiplier(-0.5)),
            ItemKind::DogTreat => None,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub kind: ItemKind,
}

pub fn spawn_item(commands: &mut Commands, rng: &mut GameRng, kind: ItemKind, position: Vec2) -> Entity {
    let velocity = rng.direction() * DROP_SPEED;
    commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_translation(position.extend(0.5))),
            Item { kind },
            Role::Item,
            Velocity(velocity),
            Mass(1.0),
            Collider::Circle { radius: ITEM_SIZE / 2.0 },
            Confined,
            SessionEntity,
            Name::new(kind.name()),
        ))
        .id()
}

fn item_pickup_system(
    mut commands: Commands,
    mut contacts: EventReader<CollisionStarted>,
    items: Query<&Item>,
    mut collectors: Query<(&Role, &mut Health), Without<Dying>>,
    difficulty: Res<Difficulty>,
    mut sound_events: EventWriter<PlaySoundEvent>,
) {
    let mut taken: HashSet<Entity> = HashSet::default();
    for contact in contacts.read() {
        for (item_entity, other) in contact.pairs() {
            if taken.contains(&item_entity) {
                continue;
            }
            let Ok(item) = items.get(item_entity) else {
                continue;
            };
            let Ok((role, mut health)) = collectors.get_mut(other) else {
                continue;
            };
            if *role != item.kind.collector() {
                continue;
            }
            health.heal(item.kind.heal_amount(*difficulty));
            sound_events.send(PlaySoundEvent(SoundEffect::Positive));
            commands.entity(item_entity).despawn_recursive();
            taken.insert(item_entity);
        }
    }
}
