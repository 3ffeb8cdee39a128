use bevy::prelude::*;

/// What an entity is, as far as gameplay is concerned.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Player,
    Dog,
    Zombie,
    Item,
    Coin,
    Bullet,
    Wall,
}

impl Role {
    /// Zombies may pick friendly entities as their target.
    pub fn is_friendly(self) -> bool {
        matches!(self, Role::Player | Role::Dog)
    }

    pub fn is_damageable(self) -> bool {
        matches!(self, Role::Player | Role::Dog | Role::Zombie)
    }
}

/// Units per second.
#[derive(Component, Deref, DerefMut, Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec2);

/// Bodies with a mass receive impulses and lose speed to air friction.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Mass(pub f32);

/// Everything spawned for a run carries this so a restart can sweep it away.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SessionEntity;

/// Elapsed milliseconds since the previous tick.
pub fn delta_ms(time: &Time) -> f32 {
    time.delta_seconds() * 1000.0
}

pub fn planar(transform: &Transform) -> Vec2 {
    transform.translation.truncate()
}

/// Rotation around the z axis that faces `direction`.
pub fn facing(direction: Vec2) -> Quat {
    Quat::from_rotation_z(direction.y.atan2(direction.x))
}

/// Moves `from` toward `to` by at most `step`, never overshooting.
pub fn step_toward(from: Vec2, to: Vec2, step: f32) -> Vec2 {
    let path = to - from;
    let distance = path.length();
    if distance <= step || distance <= f32::EPSILON {
        to
    } else {
        from + path / distance * step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_toward_stops_on_target() {
        let from = Vec2::new(0.0, 0.0);
        let to = Vec2::new(3.0, 4.0);
        assert_eq!(step_toward(from, to, 10.0), to);
        assert_eq!(step_toward(from, to, 5.0), to);
        let halfway = step_toward(from, to, 2.5);
        assert!((halfway - Vec2::new(1.5, 2.0)).length() < 1e-5);
    }

    #[test]
    fn step_toward_same_point_is_stable() {
        let p = Vec2::new(7.0, -2.0);
        assert_eq!(step_toward(p, p, 1.0), p);
    }

    #[test]
    fn friendly_roles() {
        assert!(Role::Player.is_friendly());
        assert!(Role::Dog.is_friendly());
        assert!(!Role::Zombie.is_friendly());
        assert!(Role::Zombie.is_damageable());
        assert!(!Role::Coin.is_damageable());
    }
}
