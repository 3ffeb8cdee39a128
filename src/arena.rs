use bevy::prelude::*;

use crate::{
    components::{Role, SessionEntity},
    physics::{separate_solids_system, Collider},
    GameSet,
};

/// Distance from the origin to the inner face of each wall.
pub const ARENA_HALF_EXTENT: f32 = 1000.0;
pub const WALL_THICKNESS: f32 = 100.0;
const WALL_OFFSET: f32 = ARENA_HALF_EXTENT + WALL_THICKNESS / 2.0;
const WALL_LENGTH: f32 = 2.0 * (ARENA_HALF_EXTENT + WALL_THICKNESS);
const SPAWN_GRID: [f32; 5] = [-1000.0, -500.0, 0.0, 500.0, 1000.0];

/// Where the wave director may drop new zombies.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SpawnPoint;

/// Keeps the body inside the walls.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Confined;

/// The 16 points on the outer ring of the 5x5 grid.
pub fn spawn_point_positions() -> Vec<Vec2> {
    let mut points = Vec::with_capacity(16);
    for (ix, &x) in SPAWN_GRID.iter().enumerate() {
        for (iy, &y) in SPAWN_GRID.iter().enumerate() {
            let on_edge = ix == 0 || iy == 0 || ix == SPAWN_GRID.len() - 1 || iy == SPAWN_GRID.len() - 1;
            if on_edge {
                points.push(Vec2::new(x, y));
            }
        }
    }
    points
}

pub fn spawn_arena(commands: &mut Commands) {
    let horizontal = Vec2::new(WALL_LENGTH / 2.0, WALL_THICKNESS / 2.0);
    let vertical = Vec2::new(WALL_THICKNESS / 2.0, WALL_LENGTH / 2.0);
    let walls = [
        (Vec2::new(0.0, WALL_OFFSET), horizontal),
        (Vec2::new(0.0, -WALL_OFFSET), horizontal),
        (Vec2::new(WALL_OFFSET, 0.0), vertical),
        (Vec2::new(-WALL_OFFSET, 0.0), vertical),
    ];
    for (position, half_extents) in walls {
        commands.spawn((
            SpatialBundle::from_transform(Transform::from_translation(position.extend(0.0))),
            Role::Wall,
            Collider::Rect { half_extents },
            SessionEntity,
            Name::new("Wall"),
        ));
    }

    for position in spawn_point_positions() {
        commands.spawn((
            SpatialBundle::from_transform(Transform::from_translation(position.extend(0.0))),
            SpawnPoint,
            SessionEntity,
            Name::new("SpawnPoint"),
        ));
    }
}

pub fn confine(position: Vec2, radius: f32) -> Vec2 {
    let limit = (ARENA_HALF_EXTENT - radius).max(0.0);
    position.clamp(Vec2::splat(-limit), Vec2::splat(limit))
}

fn confine_to_arena_system(mut query: Query<(&mut Transform, Option<&Collider>), With<Confined>>) {
    for (mut transform, collider) in query.iter_mut() {
        let radius = match collider {
            Some(Collider::Circle { radius }) => *radius,
            _ => 0.0,
        };
        let inside = confine(transform.translation.truncate(), radius);
        transform.translation.x = inside.x;
        transform.translation.y = inside.y;
    }
}

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            confine_to_arena_system
                .in_set(GameSet::Movement)
                .after(separate_solids_system),
        );
    }
}
