use bevy::prelude::*;

use crate::{
    components::{planar, Role},
    GameSet,
};

pub struct HealthPlugin;

impl Plugin for HealthPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EntityDied>()
            .add_systems(Update, detect_deaths_system.in_set(GameSet::Death))
            .add_systems(Update, reap_dying_system.in_set(GameSet::Cleanup));
    }
}

/// Hit points of a player, dog or zombie.
///
/// `current` can drop below zero between a hit and the next death check;
/// `heal` and `set_max` keep it at or under `max`. `max` must stay positive
/// for [`Health::percentage`] to be meaningful.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn damage(&mut self, amount: f32) {
        self.current -= amount;
    }

    /// Heals by `amount`, or to full with `None`.
    pub fn heal(&mut self, amount: Option<f32>) {
        let amount = amount.unwrap_or(self.max);
        self.current = (self.current + amount).min(self.max);
    }

    pub fn percentage(&self) -> f32 {
        self.current / self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    pub fn set_max(&mut self, max: f32) {
        self.max = max;
        self.current = self.current.min(max);
    }
}

/// Set on an entity whose health ran out. It is despawned at the end of the
/// tick and ignored by targeting, contacts and the alive counts meanwhile.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dying;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub role: Role,
    pub position: Vec2,
}

pub fn detect_deaths_system(
    mut commands: Commands,
    query: Query<(Entity, &Health, &Role, &Transform), Without<Dying>>,
    mut died: EventWriter<EntityDied>,
) {
    for (entity, health, role, transform) in query.iter() {
        if !health.is_depleted() {
            continue;
        }
        commands.entity(entity).insert(Dying);
        died.send(EntityDied {
            entity,
            role: *role,
            position: planar(transform),
        });
    }
}

pub fn reap_dying_system(mut commands: Commands, query: Query<Entity, With<Dying>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
