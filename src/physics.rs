use bevy::{prelude::*, utils::HashSet};

use crate::{
    components::{delta_ms, planar, Mass, Velocity},
    game::AppState,
    health::Dying,
    GameSet,
};

/// Length of one simulation step the friction and impulse constants were
/// tuned for.
pub const REFERENCE_STEP_MS: f32 = 1000.0 / 60.0;
/// Share of velocity a massive body loses per reference step.
pub const AIR_FRICTION: f32 = 0.05;

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveContacts>()
            .add_event::<CollisionStarted>()
            .add_systems(
                Update,
                (integrate_velocity_system, separate_solids_system)
                    .chain()
                    .in_set(GameSet::Movement),
            )
            .add_systems(Update, detect_contacts_system.in_set(GameSet::Collision))
            .add_systems(OnEnter(AppState::InGame), clear_contacts);
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

impl Collider {
    pub fn overlaps(&self, position: Vec2, other: &Collider, other_position: Vec2) -> bool {
        match (*self, *other) {
            (Collider::Circle { radius: a }, Collider::Circle { radius: b }) => {
                position.distance_squared(other_position) < (a + b) * (a + b)
            }
            (Collider::Circle { radius }, Collider::Rect { half_extents }) => {
                circle_touches_rect(position, radius, other_position, half_extents)
            }
            (Collider::Rect { half_extents }, Collider::Circle { radius }) => {
                circle_touches_rect(other_position, radius, position, half_extents)
            }
            (Collider::Rect { half_extents: a }, Collider::Rect { half_extents: b }) => {
                let gap = (position - other_position).abs();
                gap.x < a.x + b.x && gap.y < a.y + b.y
            }
        }
    }
}

fn circle_touches_rect(center: Vec2, radius: f32, rect_center: Vec2, half_extents: Vec2) -> bool {
    let closest = center.clamp(rect_center - half_extents, rect_center + half_extents);
    center.distance_squared(closest) < radius * radius
}

/// Bodies that push each other apart instead of overlapping.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Solid;

/// Sent once when two colliders start touching. Another event for the same
/// pair only follows after they separated.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionStarted {
    pub a: Entity,
    pub b: Entity,
}

impl CollisionStarted {
    /// The partner of `entity` in this contact, if `entity` takes part in it.
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn pairs(&self) -> [(Entity, Entity); 2] {
        [(self.a, self.b), (self.b, self.a)]
    }
}

/// Pairs touching as of the last contact pass, smaller entity first.
#[derive(Resource, Debug, Default)]
pub struct ActiveContacts(pub HashSet<(Entity, Entity)>);

fn ordered(a: Entity, b: Entity) -> (Entity, Entity) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Applies a force for one tick of `dt_ms` to a body of `mass`.
pub fn apply_force(velocity: &mut Velocity, mass: Mass, force: Vec2, dt_ms: f32) {
    if mass.0 <= 0.0 {
        return;
    }
    velocity.0 += force * dt_ms * REFERENCE_STEP_MS / mass.0;
}

pub fn friction_factor(dt_ms: f32) -> f32 {
    (1.0 - AIR_FRICTION).powf(dt_ms / REFERENCE_STEP_MS)
}

pub fn integrate_velocity_system(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &mut Velocity, Option<&Mass>)>,
) {
    let dt_ms = delta_ms(&time);
    let damping = friction_factor(dt_ms);
    for (mut transform, mut velocity, mass) in query.iter_mut() {
        transform.translation += (velocity.0 * time.delta_seconds()).extend(0.0);
        if mass.is_some() {
            velocity.0 *= damping;
        }
    }
}

pub fn separate_solids_system(
    mut query: Query<(Entity, &mut Transform, &Collider, &Mass), (With<Solid>, Without<Dying>)>,
) {
    let bodies: Vec<(Entity, Vec2, f32, f32)> = query
        .iter()
        .filter_map(|(entity, transform, collider, mass)| match collider {
            Collider::Circle { radius } => Some((entity, planar(transform), *radius, mass.0)),
            Collider::Rect { .. } => None,
        })
        .collect();

    let mut pushes: Vec<(Entity, Vec2)> = Vec::new();
    for (i, &(a, pos_a, radius_a, mass_a)) in bodies.iter().enumerate() {
        for &(b, pos_b, radius_b, mass_b) in bodies.iter().skip(i + 1) {
            let offset = pos_b - pos_a;
            let distance = offset.length();
            let overlap = radius_a + radius_b - distance;
            if overlap <= 0.0 {
                continue;
            }
            let normal = if distance > f32::EPSILON { offset / distance } else { Vec2::X };
            let total = (mass_a + mass_b).max(f32::EPSILON);
            pushes.push((a, -normal * overlap * mass_b / total));
            pushes.push((b, normal * overlap * mass_a / total));
        }
    }

    for (entity, push) in pushes {
        if let Ok((_, mut transform, _, _)) = query.get_mut(entity) {
            transform.translation += push.extend(0.0);
        }
    }
}

pub fn detect_contacts_system(
    query: Query<(Entity, &Transform, &Collider), Without<Dying>>,
    mut contacts: ResMut<ActiveContacts>,
    mut started: EventWriter<CollisionStarted>,
) {
    let bodies: Vec<(Entity, Vec2, Collider)> = query
        .iter()
        .map(|(entity, transform, collider)| (entity, planar(transform), *collider))
        .collect();

    let mut touching = HashSet::default();
    for (i, (a, pos_a, collider_a)) in bodies.iter().enumerate() {
        for (b, pos_b, collider_b) in bodies.iter().skip(i + 1) {
            // walls never move, so they never meet each other
            if matches!(collider_a, Collider::Rect { .. }) && matches!(collider_b, Collider::Rect { .. }) {
                continue;
            }
            if collider_a.overlaps(*pos_a, collider_b, *pos_b) {
                touching.insert(ordered(*a, *b));
            }
        }
    }

    for &(a, b) in touching.iter() {
        if !contacts.0.contains(&(a, b)) {
            started.send(CollisionStarted { a, b });
        }
    }
    contacts.0 = touching;
}

fn clear_contacts(mut contacts: ResMut<ActiveContacts>) {
    contacts.0.clear();
}
